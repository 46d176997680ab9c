//! Navigation between adjacent branches of the stack.

use super::StContext;
use crate::{
    errors::{StError, StResult},
    git::RepositoryExt,
    prompt::Prompt,
};
use nu_ansi_term::Color;

impl<'a> StContext<'a> {
    /// Switches to the parent of the current branch, one step closer to trunk.
    pub fn checkout_parent(&self) -> StResult<()> {
        let current = self.repository.current_branch_name()?;
        if current == self.tree.trunk_name {
            println!("{}", Color::DarkGray.paint("Already on trunk."));
            return Ok(());
        }

        let parent = self
            .tree
            .get(&current)
            .and_then(|node| node.parent.clone())
            .ok_or(StError::BranchNotTracked(current))?;

        self.repository.checkout_branch(&parent)?;
        println!("Switched to `{}`.", Color::Blue.paint(parent));
        Ok(())
    }

    /// Switches to a child of the current branch, one step further from
    /// trunk. With several children, the operator picks one from an
    /// enumerated choice.
    pub fn checkout_child(&self, prompt: &impl Prompt) -> StResult<()> {
        let current = self.repository.current_branch_name()?;
        let node = self
            .tree
            .get(&current)
            .ok_or_else(|| StError::BranchNotTracked(current.clone()))?;

        let children = node.children.iter().cloned().collect::<Vec<_>>();
        let child = match children.as_slice() {
            [] => return Err(StError::NoChildren(current)),
            [only] => only.clone(),
            _ => {
                let index = prompt.select("Multiple child branches to choose from:", &children)?;
                children
                    .get(index)
                    .ok_or(StError::InvalidSelection {
                        index,
                        count: children.len(),
                    })?
                    .clone()
            }
        };

        self.repository.checkout_branch(&child)?;
        println!("Switched to `{}`.", Color::Blue.paint(child));
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        config::StConfig,
        ctx::StContext,
        errors::StError,
        git::{testing::*, RepositoryExt},
        prompt::testing::ScriptedPrompt,
    };

    fn three_children_ctx(repo: &git2::Repository) -> StContext<'_> {
        for branch in ["feature/x", "feature/y", "feature/z"] {
            repo.create_branch_from(branch, "main").unwrap();
            repo.checkout_branch("main").unwrap();
        }

        let mut ctx = StContext::load(StConfig::default(), repo).unwrap();
        for branch in ["feature/x", "feature/y", "feature/z"] {
            ctx.tree.track(branch, "main").unwrap();
        }
        ctx
    }

    #[test]
    fn checkout_child_with_single_child_needs_no_prompt() {
        let (_dir, repo) = scratch_repo();
        repo.create_branch_from("feature/a", "main").unwrap();
        repo.checkout_branch("main").unwrap();

        let mut ctx = StContext::load(StConfig::default(), &repo).unwrap();
        ctx.tree.track("feature/a", "main").unwrap();

        ctx.checkout_child(&ScriptedPrompt::default()).unwrap();

        assert_eq!(repo.current_branch_name().unwrap(), "feature/a");
    }

    #[test]
    fn checkout_child_enumerates_multiple_children() {
        let (_dir, repo) = scratch_repo();
        let ctx = three_children_ctx(&repo);

        // Children are enumerated in lexicographic order; index 1 is the
        // second-listed child.
        ctx.checkout_child(&ScriptedPrompt::with_selections([1]))
            .unwrap();

        assert_eq!(repo.current_branch_name().unwrap(), "feature/y");
    }

    #[test]
    fn checkout_child_rejects_out_of_range_selection() {
        let (_dir, repo) = scratch_repo();
        let ctx = three_children_ctx(&repo);

        let err = ctx
            .checkout_child(&ScriptedPrompt::with_selections([5]))
            .unwrap_err();

        assert!(matches!(
            err,
            StError::InvalidSelection { index: 5, count: 3 }
        ));
        assert_eq!(repo.current_branch_name().unwrap(), "main");
    }

    #[test]
    fn checkout_child_refuses_leaf_branches() {
        let (_dir, repo) = scratch_repo();
        repo.create_branch_from("feature/a", "main").unwrap();

        let mut ctx = StContext::load(StConfig::default(), &repo).unwrap();
        ctx.tree.track("feature/a", "main").unwrap();

        let err = ctx
            .checkout_child(&ScriptedPrompt::default())
            .unwrap_err();
        assert!(matches!(err, StError::NoChildren(_)));
    }

    #[test]
    fn checkout_parent_switches_up_one_level() {
        let (_dir, repo) = scratch_repo();
        repo.create_branch_from("feature/a", "main").unwrap();

        let mut ctx = StContext::load(StConfig::default(), &repo).unwrap();
        ctx.tree.track("feature/a", "main").unwrap();

        ctx.checkout_parent().unwrap();

        assert_eq!(repo.current_branch_name().unwrap(), "main");
    }

    #[test]
    fn checkout_parent_is_a_noop_on_trunk() {
        let (_dir, repo) = scratch_repo();
        let ctx = StContext::load(StConfig::default(), &repo).unwrap();

        ctx.checkout_parent().unwrap();

        assert_eq!(repo.current_branch_name().unwrap(), "main");
    }

    #[test]
    fn checkout_parent_refuses_untracked_branches() {
        let (_dir, repo) = scratch_repo();
        repo.create_branch_from("rogue", "main").unwrap();

        let ctx = StContext::load(StConfig::default(), &repo).unwrap();

        let err = ctx.checkout_parent().unwrap_err();
        assert!(matches!(err, StError::BranchNotTracked(_)));
    }
}
