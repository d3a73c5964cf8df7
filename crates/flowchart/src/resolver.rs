//! Root resolution: walk parent links upward from the focus task.
//!
//! When a task has several parents the walk follows the one with the lowest
//! [`TaskId`], so the chosen root does not depend on the order in which the
//! data source happened to return edges.

use crate::{EdgeIndex, TaskId};
use std::collections::HashSet;
use tracing::warn;

/// Why the upward walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AscentStop {
    /// Reached a task with no parents.
    Root,
    /// Hit the maximum ascent before finding a parentless task.
    DepthLimit,
    /// The next parent was already visited on this walk.
    Cycle,
}

/// Outcome of [`resolve_root`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Task to use as the tree root.
    pub root: TaskId,
    /// Number of parent links followed from the focus task.
    pub steps: usize,
    /// Why the walk stopped.
    pub stop: AscentStop,
}

impl Resolution {
    /// Whether the root is a true parentless ancestor rather than a truncated one.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stop == AscentStop::Root
    }
}

/// Find the topmost ancestor of `focus`, following at most `max_ascent` parent links.
///
/// A focus task that is missing from the index, or has no parents, is its
/// own root. Truncation by depth or by a cycle is not an error: the last
/// task reached is returned and a warning is logged.
#[must_use]
pub fn resolve_root(index: &EdgeIndex, focus: TaskId, max_ascent: usize) -> Resolution {
    let mut current = focus;
    let mut visited = HashSet::from([focus]);
    let mut steps = 0;

    loop {
        let Some(&parent) = index.parents_of(current).iter().min() else {
            return Resolution {
                root: current,
                steps,
                stop: AscentStop::Root,
            };
        };

        if steps >= max_ascent {
            warn!(
                focus = %focus,
                root = %current,
                max_ascent,
                "Root resolution stopped at maximum ascent"
            );
            return Resolution {
                root: current,
                steps,
                stop: AscentStop::DepthLimit,
            };
        }

        if !visited.insert(parent) {
            warn!(
                focus = %focus,
                root = %current,
                revisited = %parent,
                "Cycle detected while resolving root"
            );
            return Resolution {
                root: current,
                steps,
                stop: AscentStop::Cycle,
            };
        }

        current = parent;
        steps += 1;
    }
}
