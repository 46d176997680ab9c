//! Contains the formatting logic for the [StContext] struct.

use super::StContext;
use crate::{
    constants::{
        BOTTOM_LEFT_BOX, COLORS, EMPTY_CIRCLE, FILLED_CIRCLE, HORIZONTAL_BOX, LEFT_FORK_BOX,
        VERTICAL_BOX,
    },
    errors::{StError, StResult},
    git::RepositoryExt,
};
use itertools::Itertools;
use nu_ansi_term::Color;
use std::collections::HashSet;
use std::fmt::Write;

impl<'a> StContext<'a> {
    /// Prints the tree of branches contained within the [StContext], followed
    /// by any local branches that are not tracked.
    pub fn print_tree(&self) -> StResult<()> {
        let mut buf = String::new();
        self.write_tree(&mut buf)?;
        print!("{}", buf);
        self.print_untracked()
    }

    /// Writes the tree of branches contained within the [StContext] to the
    /// given [Write]r.
    pub fn write_tree<W: Write>(&self, w: &mut W) -> StResult<()> {
        let trunk_name = self.tree.trunk_name.clone();
        self.write_tree_recursive(w, &trunk_name, 0, "", "", true)
    }

    /// Writes the tree of branches to the given writer recursively.
    fn write_tree_recursive<W: Write>(
        &self,
        w: &mut W,
        branch: &str,
        depth: usize,
        prefix: &str,
        connection: &str,
        is_last_child: bool,
    ) -> StResult<()> {
        let checked_out = self.repository.current_branch_name()?;
        let current = self
            .tree
            .get(branch)
            .ok_or_else(|| StError::BranchNotTracked(branch.to_string()))?;
        let exists = self.repository.branch_exists(branch);

        // Form the log-line for the current branch.
        let checked_out_icon = (branch == checked_out)
            .then_some(FILLED_CIRCLE)
            .unwrap_or(EMPTY_CIRCLE);
        let rendered_branch = COLORS[depth % COLORS.len()]
            .paint(format!("{}{} {}", connection, checked_out_icon, branch));
        let branch_metadata = if !exists {
            Color::Red.paint(" (not found locally)").to_string()
        } else if self.needs_sync(branch)? {
            Color::Yellow.paint(" (needs sync)").to_string()
        } else {
            String::new()
        };

        writeln!(w, "{}{}{}", prefix, rendered_branch, branch_metadata)?;

        // Form the prefix shared by this branch's commit lines and children.
        let child_prefix = if depth > 0 {
            let color = COLORS[depth % COLORS.len()];
            is_last_child
                .then(|| format!("{}  ", prefix))
                .unwrap_or(format!(
                    "{}{} ",
                    prefix,
                    color.paint(VERTICAL_BOX.to_string())
                ))
        } else {
            prefix.to_string()
        };

        // List the branch's own commits beneath it.
        if exists {
            if let Some(parent) = current.parent.as_deref() {
                if self.repository.branch_exists(parent) {
                    let commits = self.repository.commits_ahead(branch, parent)?;
                    if commits.is_empty() {
                        writeln!(w, "{}  {}", child_prefix, Color::Red.paint("empty branch"))?;
                    }
                    for commit in commits {
                        writeln!(w, "{}  {}", child_prefix, Color::DarkGray.paint(commit))?;
                    }
                }
            }
        }

        // Write the children of the branch recursively.
        let mut children = current.children.iter().peekable();
        while let Some(child) = children.next() {
            let is_last = children.peek().is_none();
            let connection = format!(
                "{}{}",
                is_last.then_some(BOTTOM_LEFT_BOX).unwrap_or(LEFT_FORK_BOX),
                HORIZONTAL_BOX
            );

            self.write_tree_recursive(
                w,
                child,
                depth + 1,
                child_prefix.as_str(),
                connection.as_str(),
                is_last,
            )?;
        }

        Ok(())
    }

    /// Prints the local branches that are not part of the tracked forest.
    fn print_untracked(&self) -> StResult<()> {
        let tracked: HashSet<&str> = self.tree.tracked().collect();
        let untracked = self
            .repository
            .local_branches()?
            .into_iter()
            .filter(|branch| !tracked.contains(branch.as_str()))
            .sorted()
            .collect::<Vec<_>>();

        if untracked.is_empty() {
            return Ok(());
        }

        println!();
        println!("{}", Color::Red.paint("Branches not tracked with `gst`:"));
        for branch in untracked {
            println!("* {}", branch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        config::StConfig,
        ctx::StContext,
        git::{testing::*, RepositoryExt},
    };

    #[test]
    fn write_tree_renders_one_line_per_branch_plus_commits() {
        let (_dir, repo) = scratch_repo();
        repo.create_branch_from("feature/a", "main").unwrap();
        commit_file(&repo, "a.txt", "a", "add a");
        repo.create_branch_from("feature/b", "feature/a").unwrap();
        commit_file(&repo, "b.txt", "b", "add b");

        let mut ctx = StContext::load(StConfig::default(), &repo).unwrap();
        ctx.tree.track("feature/a", "main").unwrap();
        ctx.tree.track("feature/b", "feature/a").unwrap();

        let mut buf = String::new();
        ctx.write_tree(&mut buf).unwrap();

        let lines = buf.lines().collect::<Vec<_>>();
        // Trunk, feature/a, its commit, feature/b, its commit.
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("main"));
        assert!(lines[1].contains("feature/a"));
        assert!(lines[2].contains("add a"));
        assert!(lines[3].contains("feature/b"));
        assert!(lines[4].contains("add b"));
    }

    #[test]
    fn write_tree_marks_empty_branches() {
        let (_dir, repo) = scratch_repo();
        repo.create_branch_from("feature/a", "main").unwrap();

        let mut ctx = StContext::load(StConfig::default(), &repo).unwrap();
        ctx.tree.track("feature/a", "main").unwrap();

        let mut buf = String::new();
        ctx.write_tree(&mut buf).unwrap();

        assert!(buf.contains("empty branch"));
    }
}
