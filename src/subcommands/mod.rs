//! The subcommands for the `gst` application.

use crate::{ctx::StContext, errors::StResult};
use clap::Subcommand;

mod create;
pub use create::CreateCmd;

mod log;
pub use log::LogCmd;

mod down;
pub use down::DownCmd;

mod up;
pub use up::UpCmd;

mod track;
pub use track::TrackCmd;

mod submit;
pub use submit::SubmitCmd;

mod sync;
pub use sync::SyncCmd;

#[derive(Debug, Clone, Eq, PartialEq, Subcommand)]
pub enum Subcommands {
    /// Create a new branch from a parent and track it. The parent defaults to trunk; `.` selects the branch checked out at startup.
    #[clap(aliases = ["c", "b", "branch"])]
    Create(CreateCmd),
    /// Print a tree of all tracked branches.
    #[clap(aliases = ["p", "print"])]
    Log(LogCmd),
    /// Switch to the parent of the current branch, one step closer to trunk.
    #[clap(alias = "d")]
    Down(DownCmd),
    /// Switch to a child of the current branch, one step further from trunk.
    #[clap(alias = "u")]
    Up(UpCmd),
    /// Attach the current branch to a parent branch.
    #[clap(alias = "t")]
    Track(TrackCmd),
    /// Push every branch from the current one down to trunk and open or update their pull requests.
    #[clap(alias = "pr")]
    Submit(SubmitCmd),
    /// Integrate every tracked branch with its parent, retiring merged and closed branches.
    #[clap(alias = "s")]
    Sync(SyncCmd),
}

impl Subcommands {
    /// Run the subcommand against the given context.
    pub async fn run(self, ctx: &mut StContext<'_>) -> StResult<()> {
        match self {
            Self::Create(args) => args.run(ctx),
            Self::Log(args) => args.run(ctx),
            Self::Down(args) => args.run(ctx),
            Self::Up(args) => args.run(ctx),
            Self::Track(args) => args.run(ctx),
            Self::Submit(args) => args.run(ctx).await,
            Self::Sync(args) => args.run(ctx).await,
        }
    }
}
