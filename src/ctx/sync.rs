//! The synchronization engine: integrates every tracked branch with its
//! parent, or retires it.

use super::StContext;
use crate::{
    errors::{StError, StResult},
    git::RepositoryExt,
    prompt::Prompt,
    remote::{RemoteClient, RequestStatus},
};
use itertools::Itertools;
use nu_ansi_term::Color;
use tracing::debug;

impl<'a> StContext<'a> {
    /// Synchronizes the whole stack.
    ///
    /// Visits every tracked branch in depth-first order (parents before
    /// children) and decides, per branch, whether it is up to date, needs to
    /// be integrated with its parent, or should be retired because it is gone
    /// or its change request was merged or closed. The original branch is
    /// restored afterwards if it still exists; it may have been deleted
    /// during the pass.
    pub async fn sync<R: RemoteClient, P: Prompt>(
        &mut self,
        remote: &R,
        prompt: &P,
    ) -> StResult<()> {
        // Snapshot the walk before mutating the graph; retiring a branch
        // mid-pass grafts its children, which are already in the snapshot.
        let trunk = self.tree.trunk_name.clone();
        let order = self.tree.branches();

        for branch in order.iter().filter(|branch| **branch != trunk) {
            self.sync_branch(branch, remote, prompt).await?;
        }

        if self.repository.branch_exists(&self.original_branch) {
            self.repository.checkout_branch(&self.original_branch)?;
        }
        Ok(())
    }

    /// Evaluates a single branch and integrates or retires it.
    async fn sync_branch<R: RemoteClient, P: Prompt>(
        &mut self,
        branch: &str,
        remote: &R,
        prompt: &P,
    ) -> StResult<()> {
        // A branch deleted outside of `gst` is silently untracked; its
        // remote state is not queried.
        if !self.repository.branch_exists(branch) {
            debug!("branch {branch} no longer exists; untracking");
            println!(
                "{}",
                Color::DarkGray.paint(format!("Branch `{branch}` no longer exists, untracking."))
            );
            self.untrack(branch);
            return Ok(());
        }

        self.repository.checkout_branch(branch)?;
        let status = remote.request_status(branch).await?;
        debug!("branch {branch} request status: {status:?}");

        match status {
            RequestStatus::Merged | RequestStatus::Closed => {
                return self.retire_branch(branch, status, prompt);
            }
            RequestStatus::Absent | RequestStatus::Open { .. } => {}
        }

        let parent = self
            .tree
            .get(branch)
            .and_then(|node| node.parent.clone())
            .ok_or_else(|| StError::BranchNotTracked(branch.to_string()))?;

        let parent_tip = self.repository.branch_tip(&parent)?;
        let merge_base = self.repository.merge_base_of(&parent, branch)?;
        if parent_tip == merge_base {
            println!(
                "{} {} {} {}",
                Color::Green.paint("Branch up-to-date"),
                Color::Blue.paint(branch),
                Color::Green.paint("->"),
                Color::Blue.paint(&parent)
            );
            return Ok(());
        }

        // Rebasing keeps history linear and is the default; it is only
        // avoided when rewriting would invalidate an externally visible,
        // non-draft change request.
        if matches!(status, RequestStatus::Absent | RequestStatus::Open { draft: true }) {
            let commits = self.repository.commits_ahead(branch, &parent)?;
            println!(
                "{}{}{}{}{}",
                Color::Yellow.paint("Rebasing these commits in "),
                Color::Blue.paint(branch),
                Color::Yellow.paint(" onto "),
                Color::Blue.paint(&parent),
                Color::Yellow.paint(":")
            );
            println!("{}", commits.iter().map(|commit| format!("* {commit}")).join("\n"));

            let proceed = prompt.confirm(
                "Continue? (declining drops into an interactive rebase)",
                true,
            )?;
            self.repository.rebase_onto(&parent, !proceed)?;
        } else {
            println!(
                "{}{}{}{}",
                Color::Yellow.paint("Merging "),
                Color::Blue.paint(&parent),
                Color::Yellow.paint(" into "),
                Color::Blue.paint(branch)
            );
            self.repository.merge_parent(&parent)?;
        }

        Ok(())
    }

    /// Deletes and untracks a branch whose change request was merged or
    /// closed, after confirmation. The branch's children are grafted onto its
    /// former parent, so the stack shortens by one link without losing
    /// descendants.
    fn retire_branch(
        &mut self,
        branch: &str,
        status: RequestStatus,
        prompt: &impl Prompt,
    ) -> StResult<()> {
        let question = match status {
            RequestStatus::Merged => format!(
                "Branch `{}` has already been merged, delete the local branch?",
                Color::Blue.paint(branch)
            ),
            _ => format!(
                "Branch `{}` has been closed, delete the local branch?",
                Color::Blue.paint(branch)
            ),
        };

        if prompt.confirm(&question, true)? {
            let trunk = self.tree.trunk_name.clone();
            self.repository.checkout_branch(&trunk)?;
            self.repository.delete_branch(branch)?;
            self.untrack(branch);
            println!("Deleted `{}`.", Color::Blue.paint(branch));
        }
        Ok(())
    }
}
