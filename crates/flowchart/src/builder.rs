//! Tree builder: materialise a bounded, cycle-free [`TaskNode`] tree.
//!
//! The relationship graph may be cyclic, wide or deep. Three independent
//! limits keep the result finite:
//!
//! - `max_depth`: nodes deeper than this are pruned
//! - `max_nodes`: the whole build stops adding nodes once the budget is spent
//! - `max_children`: only the first children of each task are followed
//!
//! A visited set guarantees a task appears at most once; a task reachable
//! through several parents stays under the first parent that reached it.

use crate::{EdgeIndex, TaskId, TaskNode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Bounds applied while resolving and building the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildLimits {
    /// Deepest `level` a node may have (root = 0).
    pub max_depth: usize,
    /// Maximum number of nodes in one tree.
    pub max_nodes: usize,
    /// Maximum children followed per node.
    pub max_children: usize,
    /// Maximum parent links followed when resolving the root.
    pub max_ascent: usize,
}

impl Default for BuildLimits {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_nodes: 50,
            max_children: 10,
            max_ascent: 10,
        }
    }
}

/// Counters describing what the builder kept and pruned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Nodes materialised into the tree.
    pub nodes: usize,
    /// Branches cut because they exceeded `max_depth`.
    pub depth_pruned: usize,
    /// Branches cut because the node budget was spent.
    pub budget_pruned: usize,
    /// Tasks skipped because they were already in the tree.
    pub revisits: usize,
    /// Ids that had no record in the index.
    pub missing: usize,
    /// Child links dropped by the fan-out cap.
    pub fanout_truncated: usize,
}

impl BuildStats {
    /// Whether any limit or guard removed part of the graph.
    #[must_use]
    pub fn was_truncated(&self) -> bool {
        self.depth_pruned + self.budget_pruned + self.revisits + self.fanout_truncated > 0
    }
}

/// Result of [`TreeBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutput {
    /// The tree, or `None` when the root id has no record.
    pub root: Option<TaskNode>,
    /// Build counters.
    pub stats: BuildStats,
}

/// Per-build mutable state threaded through the recursion.
struct BuildContext {
    visited: HashSet<TaskId>,
    budget_used: usize,
    stats: BuildStats,
}

/// Depth-first tree builder over an [`EdgeIndex`].
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder<'a> {
    index: &'a EdgeIndex,
    limits: BuildLimits,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder reading from `index`.
    #[must_use]
    pub fn new(index: &'a EdgeIndex, limits: BuildLimits) -> Self {
        Self { index, limits }
    }

    /// Build the tree rooted at `root`.
    ///
    /// Never fails on malformed graphs; pruned branches are only counted.
    #[must_use]
    pub fn build(&self, root: TaskId) -> BuildOutput {
        let mut ctx = BuildContext {
            visited: HashSet::new(),
            budget_used: 0,
            stats: BuildStats::default(),
        };

        let tree = self.build_node(&mut ctx, root, 0);
        debug!(
            root = %root,
            nodes = ctx.stats.nodes,
            depth_pruned = ctx.stats.depth_pruned,
            budget_pruned = ctx.stats.budget_pruned,
            revisits = ctx.stats.revisits,
            fanout_truncated = ctx.stats.fanout_truncated,
            "Built flow chart tree"
        );

        BuildOutput {
            root: tree,
            stats: ctx.stats,
        }
    }

    fn build_node(&self, ctx: &mut BuildContext, id: TaskId, level: usize) -> Option<TaskNode> {
        if level > self.limits.max_depth {
            ctx.stats.depth_pruned += 1;
            debug!("Pruning task {} at level {}: depth limit", id, level);
            return None;
        }
        if ctx.budget_used >= self.limits.max_nodes {
            ctx.stats.budget_pruned += 1;
            debug!("Pruning task {}: node budget exhausted", id);
            return None;
        }
        if !ctx.visited.insert(id) {
            ctx.stats.revisits += 1;
            return None;
        }
        ctx.budget_used += 1;

        let Some(record) = self.index.get(id) else {
            ctx.stats.missing += 1;
            debug!("Task {} not found while building tree", id);
            return None;
        };

        let mut node = TaskNode::from_record(record, level);
        ctx.stats.nodes += 1;

        let child_ids = &record.child_ids;
        if child_ids.len() > self.limits.max_children {
            ctx.stats.fanout_truncated += child_ids.len() - self.limits.max_children;
        }
        for &child_id in child_ids.iter().take(self.limits.max_children) {
            if let Some(child) = self.build_node(ctx, child_id, level + 1) {
                node.children.push(child);
            }
        }

        Some(node)
    }
}
