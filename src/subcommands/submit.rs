//! `submit` subcommand.

use crate::{
    ctx::StContext,
    errors::{StError, StResult},
    git::RepositoryExt,
    prompt::{Prompt, TerminalPrompt},
    remote::{GitHubRemote, RemoteClient, RequestStatus, RequestSubmission},
};
use clap::Args;
use nu_ansi_term::Color;

/// CLI arguments for the `submit` subcommand.
#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct SubmitCmd;

impl SubmitCmd {
    /// Run the `submit` subcommand.
    ///
    /// Walks from the branch checked out at startup down to trunk, pushing
    /// each branch and opening a pull request against its tracked parent when
    /// none exists yet. The original branch is restored afterwards.
    pub async fn run(self, ctx: &mut StContext<'_>) -> StResult<()> {
        let remote = GitHubRemote::from_env(ctx.repository)?;
        let prompt = TerminalPrompt;

        let stack = ctx.tree.stack_of(&ctx.original_branch);
        if stack.len() == 1 && stack[0] == ctx.tree.trunk_name {
            println!("{}", Color::DarkGray.paint("On trunk; nothing to submit."));
            return Ok(());
        }

        for branch in &stack {
            if *branch == ctx.tree.trunk_name {
                break;
            }

            let parent = ctx
                .tree
                .get(branch)
                .and_then(|node| node.parent.clone())
                .ok_or_else(|| StError::BranchNotTracked(branch.clone()))?;

            match remote.request_status(branch).await? {
                RequestStatus::Open { .. } => {
                    ctx.repository.push_branch(branch, "origin")?;
                    println!(
                        "Updated pull request for branch `{}`.",
                        Color::Green.paint(branch)
                    );
                }
                RequestStatus::Absent => {
                    ctx.repository.push_branch(branch, "origin")?;
                    let submission = Self::prompt_request_metadata(&prompt, branch, &parent)?;
                    let created = remote.create_request(submission).await?;

                    println!(
                        "Submitted new pull request #{} for branch `{}`{}",
                        created.number,
                        Color::Green.paint(branch),
                        created
                            .url
                            .map(|url| format!(" @ `{}`", Color::Blue.paint(url)))
                            .unwrap_or_default()
                    );
                }
                RequestStatus::Merged | RequestStatus::Closed => {
                    println!(
                        "{}",
                        Color::DarkGray.paint(format!(
                            "Pull request for `{branch}` is already merged or closed; skipping. Run `gst sync` to retire it."
                        ))
                    );
                }
            }
        }

        ctx.repository.checkout_branch(&ctx.original_branch)?;
        Ok(())
    }

    /// Prompts the operator for metadata about the pull request during the
    /// initial submission process.
    fn prompt_request_metadata<'a>(
        prompt: &impl Prompt,
        branch_name: &'a str,
        parent_name: &'a str,
    ) -> StResult<RequestSubmission<'a>> {
        let title = prompt.text(
            format!(
                "Title of pull request (`{}` -> `{}`):",
                Color::Green.paint(branch_name),
                Color::Yellow.paint(parent_name)
            )
            .as_str(),
        )?;
        let body = prompt.editor("Pull request description")?;
        let draft = prompt.confirm("Is this PR a draft?", false)?;

        Ok(RequestSubmission {
            branch: branch_name,
            base: parent_name,
            title,
            body,
            draft,
        })
    }
}
