//! `down` subcommand.

use crate::{ctx::StContext, errors::StResult};
use clap::Args;

/// CLI arguments for the `down` subcommand.
#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct DownCmd;

impl DownCmd {
    /// Run the `down` subcommand.
    pub fn run(self, ctx: &mut StContext<'_>) -> StResult<()> {
        ctx.checkout_parent()
    }
}
