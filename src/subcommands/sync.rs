//! `sync` subcommand.

use crate::{
    ctx::StContext, errors::StResult, prompt::TerminalPrompt, remote::GitHubRemote,
};
use clap::Args;

/// CLI arguments for the `sync` subcommand.
#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct SyncCmd;

impl SyncCmd {
    /// Run the `sync` subcommand.
    pub async fn run(self, ctx: &mut StContext<'_>) -> StResult<()> {
        let remote = GitHubRemote::from_env(ctx.repository)?;
        ctx.sync(&remote, &TerminalPrompt).await
    }
}
