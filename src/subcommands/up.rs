//! `up` subcommand.

use crate::{ctx::StContext, errors::StResult, prompt::TerminalPrompt};
use clap::Args;

/// CLI arguments for the `up` subcommand.
#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct UpCmd;

impl UpCmd {
    /// Run the `up` subcommand.
    pub fn run(self, ctx: &mut StContext<'_>) -> StResult<()> {
        ctx.checkout_child(&TerminalPrompt)
    }
}
