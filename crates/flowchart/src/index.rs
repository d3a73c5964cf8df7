//! Edge index: adjacency lookup built from the flat fetch result.
//!
//! Malformed input never fails here. Edges pointing at unknown tasks and
//! self-edges are dropped, duplicate edges collapse to one adjacency entry,
//! and duplicate task ids keep the last record seen.

use crate::{RawTaskRecord, RelationshipEdge, TaskId};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Lookup from task id to its record, with `child_ids` and `parent_ids` populated.
#[derive(Debug, Clone, Default)]
pub struct EdgeIndex {
    records: BTreeMap<TaskId, RawTaskRecord>,
    edge_count: usize,
}

impl EdgeIndex {
    /// Build the index from raw records and relationship edges.
    pub fn build(
        tasks: impl IntoIterator<Item = RawTaskRecord>,
        edges: &[RelationshipEdge],
    ) -> Self {
        let mut records = BTreeMap::new();
        for mut record in tasks {
            record.child_ids.clear();
            record.parent_ids.clear();
            if let Some(previous) = records.insert(record.id, record) {
                debug!("Duplicate task id {} in fetch result, keeping last", previous.id);
            }
        }

        let mut index = Self {
            records,
            edge_count: 0,
        };
        for edge in edges {
            index.link(edge);
        }

        debug!(
            tasks = index.records.len(),
            edges = index.edge_count,
            "Built edge index"
        );
        index
    }

    fn link(&mut self, edge: &RelationshipEdge) {
        let (parent, child) = edge.endpoints();
        if parent == child {
            debug!("Ignoring self-referencing edge on task {}", parent);
            return;
        }
        if !self.records.contains_key(&parent) || !self.records.contains_key(&child) {
            debug!("Ignoring edge {} -> {} with unknown endpoint", parent, child);
            return;
        }

        let mut added = false;
        if let Some(record) = self.records.get_mut(&parent) {
            added |= push_unique(&mut record.child_ids, child);
        }
        if let Some(record) = self.records.get_mut(&child) {
            added |= push_unique(&mut record.parent_ids, parent);
        }
        if added {
            self.edge_count += 1;
        }
    }

    /// Get a record by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&RawTaskRecord> {
        self.records.get(&id)
    }

    /// Check if a task is indexed.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.records.contains_key(&id)
    }

    /// Children of a task in edge arrival order; empty for unknown ids.
    #[must_use]
    pub fn children_of(&self, id: TaskId) -> &[TaskId] {
        self.records
            .get(&id)
            .map(|record| record.child_ids.as_slice())
            .unwrap_or_default()
    }

    /// Parents of a task in edge arrival order; empty for unknown ids.
    #[must_use]
    pub fn parents_of(&self, id: TaskId) -> &[TaskId] {
        self.records
            .get(&id)
            .map(|record| record.parent_ids.as_slice())
            .unwrap_or_default()
    }

    /// Iterate over all records in id order.
    pub fn records(&self) -> impl Iterator<Item = &RawTaskRecord> {
        self.records.values()
    }

    /// Number of indexed tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct parent/child links that survived filtering.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Distinct, sorted status labels across every indexed task.
    #[must_use]
    pub fn available_statuses(&self) -> Vec<String> {
        self.records
            .values()
            .map(|record| record.status.as_str())
            .filter(|status| !status.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Check if the parent/child links contain a cycle.
    ///
    /// Only used for diagnostics; the tree builder is safe on cyclic input.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        let mut graph: DiGraph<TaskId, ()> = DiGraph::with_capacity(self.len(), self.edge_count);
        let nodes: HashMap<TaskId, NodeIndex> = self
            .records
            .keys()
            .map(|&id| (id, graph.add_node(id)))
            .collect();

        for record in self.records.values() {
            for child in &record.child_ids {
                if let (Some(&from), Some(&to)) = (nodes.get(&record.id), nodes.get(child)) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        is_cyclic_directed(&graph)
    }
}

fn push_unique(ids: &mut Vec<TaskId>, id: TaskId) -> bool {
    if ids.contains(&id) {
        return false;
    }
    ids.push(id);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EdgeKind;

    fn task(id: u64, status: &str) -> RawTaskRecord {
        RawTaskRecord::new(TaskId(id), format!("KAN-{id}"), format!("Task {id}"), status)
    }

    fn ids(raw: &[u64]) -> Vec<TaskId> {
        raw.iter().copied().map(TaskId).collect()
    }

    #[test]
    fn test_empty_index() {
        let index = EdgeIndex::build(Vec::new(), &[]);
        assert!(index.is_empty());
        assert!(index.available_statuses().is_empty());
        assert!(!index.has_cycles());
    }

    #[test]
    fn test_parent_and_child_edges_populate_both_sides() {
        let index = EdgeIndex::build(
            vec![task(1, "open"), task(2, "open"), task(3, "open")],
            &[
                RelationshipEdge::parent_of(TaskId(1), TaskId(2)),
                RelationshipEdge::new(TaskId(3), TaskId(1), EdgeKind::Child),
            ],
        );

        assert_eq!(index.children_of(TaskId(1)), ids(&[2, 3]).as_slice());
        assert_eq!(index.parents_of(TaskId(2)), ids(&[1]).as_slice());
        assert_eq!(index.parents_of(TaskId(3)), ids(&[1]).as_slice());
        assert_eq!(index.edge_count(), 2);
    }

    #[test]
    fn test_unknown_endpoints_and_self_edges_are_ignored() {
        let index = EdgeIndex::build(
            vec![task(1, "open"), task(2, "open")],
            &[
                RelationshipEdge::parent_of(TaskId(1), TaskId(99)),
                RelationshipEdge::parent_of(TaskId(98), TaskId(2)),
                RelationshipEdge::parent_of(TaskId(2), TaskId(2)),
            ],
        );

        assert_eq!(index.len(), 2);
        assert!(index.children_of(TaskId(1)).is_empty());
        assert!(index.parents_of(TaskId(2)).is_empty());
        assert_eq!(index.edge_count(), 0);
        assert!(index.children_of(TaskId(99)).is_empty());
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let edge = RelationshipEdge::parent_of(TaskId(1), TaskId(2));
        let index = EdgeIndex::build(
            vec![task(1, "open"), task(2, "open")],
            &[edge, edge, RelationshipEdge::child_of(TaskId(2), TaskId(1))],
        );
        assert_eq!(index.children_of(TaskId(1)), ids(&[2]).as_slice());
        assert_eq!(index.parents_of(TaskId(2)), ids(&[1]).as_slice());
        assert_eq!(index.edge_count(), 1);
    }

    #[test]
    fn test_duplicate_ids_last_write_wins() {
        let index = EdgeIndex::build(vec![task(1, "open"), task(1, "done")], &[]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(TaskId(1)).map(|r| r.status.as_str()), Some("done"));
    }

    #[test]
    fn test_stale_adjacency_on_input_is_discarded() {
        let mut stale = task(1, "open");
        stale.child_ids = ids(&[5]);
        let index = EdgeIndex::build(vec![stale], &[]);
        assert!(index.children_of(TaskId(1)).is_empty());
    }

    #[test]
    fn test_available_statuses_sorted_and_distinct() {
        let index = EdgeIndex::build(
            vec![task(1, "review"), task(2, "done"), task(3, "review"), task(4, "")],
            &[],
        );
        assert_eq!(index.available_statuses(), vec!["done", "review"]);
    }

    #[test]
    fn test_cycle_detection() {
        let index = EdgeIndex::build(
            vec![task(1, "open"), task(2, "open")],
            &[
                RelationshipEdge::parent_of(TaskId(1), TaskId(2)),
                RelationshipEdge::parent_of(TaskId(2), TaskId(1)),
            ],
        );
        assert!(index.has_cycles());
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let index = EdgeIndex::build(
            vec![task(1, "open"), task(2, "open"), task(3, "open"), task(4, "open")],
            &[
                RelationshipEdge::parent_of(TaskId(1), TaskId(2)),
                RelationshipEdge::parent_of(TaskId(1), TaskId(3)),
                RelationshipEdge::parent_of(TaskId(2), TaskId(4)),
                RelationshipEdge::parent_of(TaskId(3), TaskId(4)),
            ],
        );
        assert!(!index.has_cycles());
        assert_eq!(index.parents_of(TaskId(4)), ids(&[2, 3]).as_slice());
    }
}
