//! `create` subcommand.

use crate::{constants::CURRENT_BRANCH_SENTINEL, ctx::StContext, errors::StResult};
use clap::Args;
use nu_ansi_term::Color::Blue;

/// CLI arguments for the `create` subcommand.
#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct CreateCmd {
    /// Name of the new branch.
    #[clap(index = 1)]
    branch_name: String,
    /// Parent to base the branch on. Defaults to trunk; `.` selects the branch checked out at startup.
    #[clap(index = 2)]
    parent: Option<String>,
}

impl CreateCmd {
    /// Run the `create` subcommand.
    pub fn run(self, ctx: &mut StContext<'_>) -> StResult<()> {
        let parent = match self.parent.as_deref() {
            Some(CURRENT_BRANCH_SENTINEL) => ctx.original_branch.clone(),
            Some(parent) => parent.to_string(),
            None => ctx.tree.trunk_name.clone(),
        };

        ctx.create_branch(&self.branch_name, &parent)?;

        println!(
            "Created and tracked new branch `{}` on top of `{}`.",
            Blue.paint(&self.branch_name),
            Blue.paint(&parent)
        );
        Ok(())
    }
}
