//! Utilities for interacting with `git` repositories for the `gst` application.

use crate::errors::{StError, StResult};
use git2::{build::CheckoutBuilder, BranchType, Oid, Repository};
use std::{
    env,
    path::Path,
    process::Command,
};

/// Returns the repository for the current working directory, and [None] if
/// the current working directory is not within a git repository or an error
/// occurs.
pub fn active_repository() -> Option<Repository> {
    Repository::discover(env::current_dir().ok()?).ok()
}

/// Extension trait for the [Repository] type to expose helper functions related to
/// repository management.
pub trait RepositoryExt {
    /// Returns the name of the current branch.
    fn current_branch_name(&self) -> StResult<String>;

    /// Returns the names of all local branches.
    fn local_branches(&self) -> StResult<Vec<String>>;

    /// Returns `true` if a local branch with the given name exists.
    fn branch_exists(&self, branch_name: &str) -> bool;

    /// Checks out the local branch with the given `branch_name`.
    fn checkout_branch(&self, branch_name: &str) -> StResult<()>;

    /// Creates a new local branch off of `start_point`'s tip and checks it out.
    fn create_branch_from(&self, branch_name: &str, start_point: &str) -> StResult<()>;

    /// Deletes the local branch with the given name. The branch must not be
    /// checked out.
    fn delete_branch(&self, branch_name: &str) -> StResult<()>;

    /// Returns the [Oid] of the commit a local branch's ref points to.
    fn branch_tip(&self, branch_name: &str) -> StResult<Oid>;

    /// Returns the [Oid] of the merge base of two local branches.
    fn merge_base_of(&self, one: &str, two: &str) -> StResult<Oid>;

    /// Returns one-line descriptions (`<short-id> <summary>`) of the commits
    /// reachable from `branch_name` but not from `parent_name`, oldest first.
    /// Merge commits are skipped.
    fn commits_ahead(&self, branch_name: &str, parent_name: &str) -> StResult<Vec<String>>;

    /// Rebases the currently checked out branch onto `parent_name`.
    ///
    /// Shells out to `git`; the `git2` library does not support interactive
    /// rebasing, and the non-interactive variant needs to surface conflict
    /// output to the operator either way.
    fn rebase_onto(&self, parent_name: &str, interactive: bool) -> StResult<()>;

    /// Merges `parent_name` into the currently checked out branch, always
    /// creating a merge commit.
    fn merge_parent(&self, parent_name: &str) -> StResult<()>;

    /// Pushes a local branch to the given remote.
    fn push_branch(&self, branch_name: &str, remote: &str) -> StResult<()>;
}

impl RepositoryExt for Repository {
    fn current_branch_name(&self) -> StResult<String> {
        let head = self.head()?;
        let name = head
            .name()
            .ok_or(StError::HeadNameInvalid)?
            .trim_start_matches("refs/heads/");
        Ok(name.to_string())
    }

    fn local_branches(&self) -> StResult<Vec<String>> {
        self.branches(Some(BranchType::Local))?
            .map(|branch| {
                let (branch, _) = branch?;
                branch
                    .name()?
                    .map(ToOwned::to_owned)
                    .ok_or(StError::HeadNameInvalid)
            })
            .collect()
    }

    fn branch_exists(&self, branch_name: &str) -> bool {
        self.find_branch(branch_name, BranchType::Local).is_ok()
    }

    fn checkout_branch(&self, branch_name: &str) -> StResult<()> {
        self.set_head(format!("refs/heads/{}", branch_name).as_str())?;
        let mut opts = CheckoutBuilder::new();
        opts.safe();
        self.checkout_head(Some(&mut opts))?;
        Ok(())
    }

    fn create_branch_from(&self, branch_name: &str, start_point: &str) -> StResult<()> {
        let start_commit = self
            .find_branch(start_point, BranchType::Local)
            .map_err(|_| StError::BranchNotFound(start_point.to_string()))?
            .get()
            .peel_to_commit()?;
        self.branch(branch_name, &start_commit, false)?;
        self.checkout_branch(branch_name)
    }

    fn delete_branch(&self, branch_name: &str) -> StResult<()> {
        let mut branch = self.find_branch(branch_name, BranchType::Local)?;
        branch.delete()?;
        Ok(())
    }

    fn branch_tip(&self, branch_name: &str) -> StResult<Oid> {
        let tip = self
            .find_branch(branch_name, BranchType::Local)
            .map_err(|_| StError::BranchNotFound(branch_name.to_string()))?
            .get()
            .peel_to_commit()?
            .id();
        Ok(tip)
    }

    fn merge_base_of(&self, one: &str, two: &str) -> StResult<Oid> {
        let base = self.merge_base(self.branch_tip(one)?, self.branch_tip(two)?)?;
        Ok(base)
    }

    fn commits_ahead(&self, branch_name: &str, parent_name: &str) -> StResult<Vec<String>> {
        let mut revwalk = self.revwalk()?;
        revwalk.push(self.branch_tip(branch_name)?)?;
        revwalk.hide(self.branch_tip(parent_name)?)?;

        let mut lines = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.find_commit(oid)?;
            if commit.parent_count() > 1 {
                continue;
            }
            let id = oid.to_string();
            lines.push(format!("{} {}", &id[..7], commit.summary().unwrap_or_default()));
        }

        // Revwalk yields newest-first; the operator reviews oldest-first.
        lines.reverse();
        Ok(lines)
    }

    fn rebase_onto(&self, parent_name: &str, interactive: bool) -> StResult<()> {
        let args: &[&str] = if interactive {
            &["rebase", "-i", parent_name]
        } else {
            &["rebase", parent_name]
        };
        run_git(self.workdir(), args)
    }

    fn merge_parent(&self, parent_name: &str) -> StResult<()> {
        run_git(
            self.workdir(),
            &["merge", "-q", "--no-ff", "--no-edit", parent_name],
        )
    }

    fn push_branch(&self, branch_name: &str, remote: &str) -> StResult<()> {
        run_git(self.workdir(), &["push", remote, branch_name])
    }
}

/// Runs a `git` command in the given working directory, inheriting the
/// terminal so interactive commands and conflict output reach the operator.
fn run_git(workdir: Option<&Path>, args: &[&str]) -> StResult<()> {
    let mut command = Command::new("git");
    if let Some(dir) = workdir {
        command.current_dir(dir);
    }
    let status = command.args(args).status()?;

    if !status.success() {
        return Err(StError::CommandFailed(format!("git {}", args.join(" "))));
    }
    Ok(())
}


#[cfg(test)]
mod test {
    use super::{testing::*, RepositoryExt};

    #[test]
    fn create_branch_from_checks_out_new_branch() {
        let (_dir, repo) = scratch_repo();

        repo.create_branch_from("feature/a", "main").unwrap();

        assert_eq!(repo.current_branch_name().unwrap(), "feature/a");
        assert!(repo.branch_exists("feature/a"));
    }

    #[test]
    fn commits_ahead_lists_own_commits_oldest_first() {
        let (_dir, repo) = scratch_repo();
        repo.create_branch_from("feature/a", "main").unwrap();
        commit_file(&repo, "one.txt", "one", "first change");
        commit_file(&repo, "two.txt", "two", "second change");

        let commits = repo.commits_ahead("feature/a", "main").unwrap();

        assert_eq!(commits.len(), 2);
        assert!(commits[0].ends_with("first change"));
        assert!(commits[1].ends_with("second change"));
    }

    #[test]
    fn merge_base_tracks_branch_point() {
        let (_dir, repo) = scratch_repo();
        let main_tip = repo.branch_tip("main").unwrap();
        repo.create_branch_from("feature/a", "main").unwrap();
        commit_file(&repo, "one.txt", "one", "first change");

        assert_eq!(repo.merge_base_of("main", "feature/a").unwrap(), main_tip);
    }
}
