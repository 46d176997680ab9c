//! Structured, in-memory representation of a stack of branches.

use crate::errors::{StError, StResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// The persisted form of the stack: a flat mapping from branch name to parent
/// branch name, serialized as a single JSON object at the repository root.
///
/// The trunk branch never appears as a key. A [BTreeMap] keeps the on-disk
/// representation stable across writes.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry(pub BTreeMap<String, String>);

/// An n-nary tree of branches, represented as a flat data structure.
///
/// Nodes are keyed by branch name and hold both directions of the
/// relationship, so no separate inverse mapping has to be rebuilt after a
/// mutation. Children are kept in a [BTreeSet]; sibling order is therefore
/// lexicographic, and deterministic.
///
/// By itself, [StackGraph] has no context of its relationship with the local
/// repository. For this functionality, [StContext] holds onto both the
/// [StackGraph] and the [Repository].
///
/// [StContext]: crate::ctx::StContext
/// [Repository]: git2::Repository
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct StackGraph {
    /// The name of the trunk branch.
    pub trunk_name: String,
    /// A map of branch names to [TrackedBranch]es.
    branches: BTreeMap<String, TrackedBranch>,
}

impl StackGraph {
    /// Creates a new [StackGraph] containing only the trunk branch.
    pub fn new(trunk_name: String) -> Self {
        let branches = BTreeMap::from([(
            trunk_name.clone(),
            TrackedBranch::new(trunk_name.clone(), None),
        )]);

        Self {
            trunk_name,
            branches,
        }
    }

    /// Builds a [StackGraph] from the persisted [Registry].
    ///
    /// Self-parent entries and entries re-parenting the trunk are rejected as
    /// corruption. Entries whose parent is neither a key nor the trunk form
    /// dangling roots; they are preserved, but never reached by [Self::traverse].
    /// Cycles in a hand-edited file are tolerated here and neutralized by the
    /// visited-set guard during traversal.
    pub fn from_registry(trunk_name: String, registry: Registry) -> StResult<Self> {
        let mut graph = Self::new(trunk_name);

        for (branch, parent) in registry.0 {
            if branch == parent {
                return Err(StError::SelfParent(branch));
            }
            if branch == graph.trunk_name {
                return Err(StError::TrunkCannotHaveParent);
            }

            graph
                .branches
                .entry(branch.clone())
                .or_insert_with(|| TrackedBranch::new(branch.clone(), None))
                .parent = Some(parent.clone());
            graph
                .branches
                .entry(parent.clone())
                .or_insert_with(|| TrackedBranch::new(parent.clone(), None))
                .children
                .insert(branch);
        }

        Ok(graph)
    }

    /// Produces the persisted [Registry] form of the graph: every branch with
    /// a parent becomes one `branch -> parent` entry.
    pub fn to_registry(&self) -> Registry {
        Registry(
            self.branches
                .values()
                .filter_map(|branch| {
                    branch
                        .parent
                        .clone()
                        .map(|parent| (branch.name.clone(), parent))
                })
                .collect(),
        )
    }

    /// Gets a branch by name from the stack graph.
    pub fn get(&self, branch_name: &str) -> Option<&TrackedBranch> {
        self.branches.get(branch_name)
    }

    /// Returns an iterator over the names of all branches in the graph,
    /// trunk included.
    pub fn tracked(&self) -> impl Iterator<Item = &str> {
        self.branches.keys().map(String::as_str)
    }

    /// Tracks `branch` against `parent`, inserting or re-pointing the link.
    ///
    /// Refuses self-parenting, re-parenting the trunk, and any link that
    /// would make `parent` a descendant of `branch`. If the parent is not yet
    /// known to the graph, a dangling node is created for it.
    pub fn track(&mut self, branch: &str, parent: &str) -> StResult<()> {
        if branch == parent {
            return Err(StError::SelfParent(branch.to_string()));
        }
        if branch == self.trunk_name {
            return Err(StError::TrunkCannotHaveParent);
        }

        // Walk the parent chain upward from `parent`; finding `branch` there
        // means the new link would close a cycle.
        let mut seen: HashSet<&str> = HashSet::new();
        let mut cursor = Some(parent);
        while let Some(name) = cursor {
            if name == branch {
                return Err(StError::CycleDetected {
                    branch: branch.to_string(),
                    parent: parent.to_string(),
                });
            }
            if !seen.insert(name) {
                break;
            }
            cursor = self.branches.get(name).and_then(|node| node.parent.as_deref());
        }

        // Detach from the previous parent when re-tracking.
        if let Some(previous) = self.branches.get(branch).and_then(|node| node.parent.clone()) {
            if let Some(previous_node) = self.branches.get_mut(&previous) {
                previous_node.children.remove(branch);
            }
        }

        self.branches
            .entry(branch.to_string())
            .or_insert_with(|| TrackedBranch::new(branch.to_string(), None))
            .parent = Some(parent.to_string());
        self.branches
            .entry(parent.to_string())
            .or_insert_with(|| TrackedBranch::new(parent.to_string(), None))
            .children
            .insert(branch.to_string());

        Ok(())
    }

    /// Removes a branch from the graph, grafting its children onto its former
    /// parent so the subtree stays connected. If the branch does not exist,
    /// returns [None].
    pub fn untrack(&mut self, branch_name: &str) -> Option<TrackedBranch> {
        let branch = self.branches.remove(branch_name)?;

        // Remove the branch from its parent's children list.
        if let Some(parent_name) = branch.parent.as_deref() {
            if let Some(parent) = self.branches.get_mut(parent_name) {
                parent.children.remove(branch_name);
            }
        }

        // Re-link the children of the removed branch to its former parent.
        for child_name in &branch.children {
            if let Some(child) = self.branches.get_mut(child_name) {
                child.parent = branch.parent.clone();
            }
            if let Some(parent_name) = branch.parent.as_deref() {
                if let Some(parent) = self.branches.get_mut(parent_name) {
                    parent.children.insert(child_name.clone());
                }
            }
        }

        Some(branch)
    }

    /// Performs a depth-first walk from the trunk, calling `visit` once per
    /// reachable branch with its depth (trunk at depth 0).
    ///
    /// A visited set guards against multiply-linked or cyclic data, so every
    /// branch is visited at most once. Branches unreachable from the trunk
    /// are never visited; callers needing a full inventory must diff
    /// [Self::tracked] against the walk.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(&str, usize),
    {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<(&str, usize)> = vec![(self.trunk_name.as_str(), 0)];

        while let Some((branch, depth)) = stack.pop() {
            if !visited.insert(branch) {
                continue;
            }
            visit(branch, depth);

            if let Some(node) = self.branches.get(branch) {
                // Reversed push keeps pop order lexicographic among siblings.
                for child in node.children.iter().rev() {
                    if !visited.contains(child.as_str()) {
                        stack.push((child.as_str(), depth + 1));
                    }
                }
            }
        }
    }

    /// Returns the branch names reachable from the trunk in depth-first
    /// order. Parents are guaranteed to be listed before their children.
    pub fn branches(&self) -> Vec<String> {
        let mut order = Vec::with_capacity(self.branches.len());
        self.traverse(|branch, _| order.push(branch.to_string()));
        order
    }

    /// Returns the full path of a branch's stack: `[branch, parent, ..., trunk]`.
    ///
    /// Stops early if the parent chain revisits a branch, so a corrupted
    /// registry cannot loop forever.
    pub fn stack_of(&self, branch_name: &str) -> Vec<String> {
        let mut stack = vec![branch_name.to_string()];
        let mut seen: HashSet<&str> = HashSet::from([branch_name]);
        let mut cursor = branch_name;

        while let Some(parent) = self
            .branches
            .get(cursor)
            .and_then(|node| node.parent.as_deref())
        {
            if !seen.insert(parent) {
                break;
            }
            stack.push(parent.to_string());
            cursor = parent;
        }

        stack
    }
}

/// A local branch tracked by `gst`.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct TrackedBranch {
    /// The branch name.
    pub name: String,
    /// The name of the parent branch.
    ///
    /// [None] if the branch is trunk or a dangling root.
    pub parent: Option<String>,
    /// The names of the child branches.
    pub children: BTreeSet<String>,
}

impl TrackedBranch {
    /// Creates a new [TrackedBranch] with the given name and parent, and no
    /// children.
    pub fn new(name: String, parent: Option<String>) -> Self {
        Self {
            name,
            parent,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Registry, StackGraph};
    use crate::errors::StError;
    use std::collections::BTreeMap;

    fn linear_graph() -> StackGraph {
        let mut graph = StackGraph::new("main".to_string());
        graph.track("feature/a", "main").unwrap();
        graph.track("feature/b", "feature/a").unwrap();
        graph.track("feature/c", "feature/a").unwrap();
        graph
    }

    #[test]
    fn track_new_branch() {
        let mut graph = StackGraph::new("main".to_string());

        graph.track("feature_branch", "main").unwrap();

        let feature_branch = graph.get("feature_branch").unwrap();
        assert_eq!(feature_branch.parent.clone().unwrap(), "main".to_string());
        assert!(graph.get("main").unwrap().children.contains("feature_branch"));
    }

    #[test]
    fn track_rejects_self_parent() {
        let mut graph = StackGraph::new("main".to_string());

        let err = graph.track("feature/a", "feature/a").unwrap_err();
        assert!(matches!(err, StError::SelfParent(_)));
    }

    #[test]
    fn track_rejects_trunk_as_child() {
        let mut graph = StackGraph::new("main".to_string());

        let err = graph.track("main", "feature/a").unwrap_err();
        assert!(matches!(err, StError::TrunkCannotHaveParent));
    }

    #[test]
    fn track_rejects_cycle() {
        let mut graph = linear_graph();

        // feature/b descends from feature/a; re-pointing feature/a at it
        // would close a loop.
        let err = graph.track("feature/a", "feature/b").unwrap_err();
        assert!(matches!(err, StError::CycleDetected { .. }));

        // The failed track must not have disturbed the existing link.
        assert_eq!(
            graph.get("feature/a").unwrap().parent.as_deref(),
            Some("main")
        );
    }

    #[test]
    fn retrack_moves_child_between_parents() {
        let mut graph = linear_graph();

        graph.track("feature/c", "main").unwrap();

        assert!(!graph.get("feature/a").unwrap().children.contains("feature/c"));
        assert!(graph.get("main").unwrap().children.contains("feature/c"));
        assert_eq!(
            graph.get("feature/c").unwrap().parent.as_deref(),
            Some("main")
        );
    }

    #[test]
    fn untrack_grafts_children_onto_former_parent() {
        let mut graph = linear_graph();

        graph.untrack("feature/a").unwrap();

        // Every former child of feature/a now points at main.
        for child in ["feature/b", "feature/c"] {
            assert_eq!(graph.get(child).unwrap().parent.as_deref(), Some("main"));
            assert!(graph.get("main").unwrap().children.contains(child));
        }

        // feature/a is gone as a key and as anyone's child.
        assert!(graph.get("feature/a").is_none());
        assert!(graph
            .tracked()
            .all(|name| !graph.get(name).unwrap().children.contains("feature/a")));
    }

    #[test]
    fn registry_round_trip() {
        let registry = Registry(BTreeMap::from([
            ("feature/a".to_string(), "main".to_string()),
            ("feature/b".to_string(), "feature/a".to_string()),
            ("feature/c".to_string(), "feature/a".to_string()),
        ]));

        let graph = StackGraph::from_registry("main".to_string(), registry.clone()).unwrap();

        assert_eq!(graph.to_registry(), registry);
    }

    #[test]
    fn from_registry_rejects_self_parent() {
        let registry = Registry(BTreeMap::from([(
            "feature/a".to_string(),
            "feature/a".to_string(),
        )]));

        let err = StackGraph::from_registry("main".to_string(), registry).unwrap_err();
        assert!(matches!(err, StError::SelfParent(_)));
    }

    #[test]
    fn traverse_visits_each_reachable_branch_once_with_increasing_depth() {
        let graph = linear_graph();

        let mut visits = Vec::new();
        graph.traverse(|branch, depth| visits.push((branch.to_string(), depth)));

        assert_eq!(
            visits,
            vec![
                ("main".to_string(), 0),
                ("feature/a".to_string(), 1),
                ("feature/b".to_string(), 2),
                ("feature/c".to_string(), 2),
            ]
        );
    }

    #[test]
    fn traverse_skips_dangling_subtrees() {
        let registry = Registry(BTreeMap::from([
            ("feature/a".to_string(), "main".to_string()),
            // `orphan` hangs off a parent that is neither a key nor trunk.
            ("orphan".to_string(), "gone".to_string()),
        ]));
        let graph = StackGraph::from_registry("main".to_string(), registry).unwrap();

        let visited = graph.branches();

        assert_eq!(visited, vec!["main".to_string(), "feature/a".to_string()]);
        // The dangling entry is still present in the inventory.
        assert!(graph.get("orphan").is_some());
    }

    #[test]
    fn stack_of_walks_to_trunk() {
        let mut graph = linear_graph();
        graph.track("feature/d", "feature/b").unwrap();

        assert_eq!(
            graph.stack_of("feature/d"),
            vec!["feature/d", "feature/b", "feature/a", "main"]
        );
        assert_eq!(graph.stack_of("main"), vec!["main"]);
    }
}
