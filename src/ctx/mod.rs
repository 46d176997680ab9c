//! The in-memory context of the `gst` application.

use crate::{
    config::StConfig,
    constants::TRUNK_CANDIDATES,
    errors::{StError, StResult},
    git::RepositoryExt,
    prompt::Prompt,
    tree::{Registry, StackGraph},
};
use git2::Repository;
use nu_ansi_term::Color;
use std::path::PathBuf;
use tracing::debug;

mod fmt;
mod nav;
mod sync;

/// Returns the path to the persisted stack state for the given [Repository].
///
/// ## Takes
/// - `cfg` - The configuration carrying the state file name.
/// - `repository` - The repository to get the state path for.
///
/// ## Returns
/// - `Some(PathBuf)` - The path to the serialized stack state.
/// - `None` - If the repository does not have a workdir.
pub fn store_path(cfg: &StConfig, repository: &Repository) -> Option<PathBuf> {
    repository.workdir().map(|p| p.join(&cfg.store_file))
}

/// The in-memory context of the `gst` application.
pub struct StContext<'a> {
    /// The configuration for this invocation.
    pub cfg: StConfig,
    /// The repository associated with the context.
    pub repository: &'a Repository,
    /// The graph of branches tracked by `gst`.
    pub tree: StackGraph,
    /// The branch that was checked out when the process started.
    ///
    /// Operations that move the working copy restore this branch afterwards,
    /// when it still exists.
    pub original_branch: String,
    /// Whether the graph diverged from the persisted state this invocation.
    dirty: bool,
}

impl<'a> StContext<'a> {
    /// Loads the persisted stack state for the given [Repository] and
    /// assembles an [StContext]. A missing state file is an empty stack, not
    /// an error.
    pub fn load(cfg: StConfig, repository: &'a Repository) -> StResult<Self> {
        let path = store_path(&cfg, repository).ok_or(StError::StorePathNotFound)?;
        let registry: Registry = if path.exists() {
            serde_json::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            Registry::default()
        };

        let local_branches = repository.local_branches()?;
        let trunk = TRUNK_CANDIDATES
            .iter()
            .find(|candidate| local_branches.iter().any(|branch| branch == *candidate))
            .ok_or(StError::NoValidTrunk)?;

        let tree = StackGraph::from_registry(trunk.to_string(), registry)?;
        let original_branch = repository.current_branch_name()?;
        debug!(
            "loaded {} tracked branches from {}",
            tree.tracked().count(),
            path.display()
        );

        Ok(Self {
            cfg,
            repository,
            tree,
            original_branch,
            dirty: false,
        })
    }

    /// Persists the stack state to disk, once, iff it was mutated this
    /// invocation.
    pub fn persist(&self) -> StResult<()> {
        if !self.dirty {
            return Ok(());
        }
        let path = store_path(&self.cfg, self.repository).ok_or(StError::StorePathNotFound)?;
        debug!("persisting stack state to {}", path.display());
        std::fs::write(path, serde_json::to_string_pretty(&self.tree.to_registry())?)?;
        Ok(())
    }

    /// Whether the graph diverged from the persisted state this invocation.
    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Tracks `branch` against `parent` and marks the state dirty.
    pub fn track(&mut self, branch: &str, parent: &str) -> StResult<()> {
        self.tree.track(branch, parent)?;
        self.dirty = true;
        Ok(())
    }

    /// Removes a branch from tracking, grafting its children onto its former
    /// parent, and marks the state dirty if anything was removed.
    pub fn untrack(&mut self, branch: &str) {
        if self.tree.untrack(branch).is_some() {
            self.dirty = true;
        }
    }

    /// Creates a new branch off of `parent`, checks it out, and tracks it.
    pub fn create_branch(&mut self, branch: &str, parent: &str) -> StResult<()> {
        self.repository.create_branch_from(branch, parent)?;
        self.track(branch, parent)
    }

    /// Attaches the branch that was checked out at startup to `parent`.
    ///
    /// Bookkeeping only: re-tracking does not replay the branch's commits
    /// onto the new base.
    pub fn track_current_branch(&mut self, parent: &str, prompt: &impl Prompt) -> StResult<()> {
        if !self.repository.branch_exists(parent) {
            return Err(StError::BranchNotFound(parent.to_string()));
        }

        let branch = self.original_branch.clone();
        if branch == parent {
            return Err(StError::SelfParent(branch));
        }
        if branch == self.tree.trunk_name {
            return Err(StError::TrunkCannotHaveParent);
        }

        match self.tree.get(&branch).and_then(|node| node.parent.as_deref()) {
            Some(previous) if previous == parent => {
                println!(
                    "{}",
                    Color::DarkGray.paint(format!(
                        "Parent of `{branch}` is already `{parent}`, no changes needed."
                    ))
                );
                return Ok(());
            }
            Some(previous) => {
                let question = format!(
                    "Switch the parent of `{}` from `{}` to `{}`?",
                    Color::Blue.paint(&branch),
                    Color::Blue.paint(previous),
                    Color::Blue.paint(parent)
                );
                if !prompt.confirm(&question, false)? {
                    return Ok(());
                }
            }
            None => {}
        }

        self.track(&branch, parent)?;
        println!(
            "Tracked `{}` on top of `{}`.",
            Color::Blue.paint(&branch),
            Color::Blue.paint(parent)
        );
        Ok(())
    }

    /// Whether a branch has diverged from its parent: `true` iff the parent's
    /// tip is no longer the merge base of the two.
    pub(crate) fn needs_sync(&self, branch: &str) -> StResult<bool> {
        let Some(parent) = self.tree.get(branch).and_then(|node| node.parent.as_deref()) else {
            return Ok(false);
        };
        if !self.repository.branch_exists(branch) || !self.repository.branch_exists(parent) {
            return Ok(false);
        }

        let parent_tip = self.repository.branch_tip(parent)?;
        let merge_base = self.repository.merge_base_of(parent, branch)?;
        Ok(parent_tip != merge_base)
    }
}
