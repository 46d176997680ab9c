//! `track` subcommand.

use crate::{ctx::StContext, errors::StResult, prompt::TerminalPrompt};
use clap::Args;

/// CLI arguments for the `track` subcommand.
#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct TrackCmd {
    /// Name of the parent branch to attach the current branch to.
    #[clap(index = 1)]
    parent: String,
}

impl TrackCmd {
    /// Run the `track` subcommand.
    pub fn run(self, ctx: &mut StContext<'_>) -> StResult<()> {
        ctx.track_current_branch(&self.parent, &TerminalPrompt)
    }
}
