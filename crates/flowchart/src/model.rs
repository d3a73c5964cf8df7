//! Data model shared by every stage of the flow-chart pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a task, unique within one fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Direction of a relationship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// The edge's source is the parent of its target.
    Parent,
    /// The edge's source is a child of its target.
    Child,
}

/// A directed parent/child relationship as delivered by the data source.
///
/// The raw feed may contain duplicates and cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEdge {
    /// Task that owns the relationship record.
    pub source_task_id: TaskId,
    /// Task on the other end of the relationship.
    pub target_task_id: TaskId,
    /// How `source` relates to `target`.
    pub kind: EdgeKind,
}

impl RelationshipEdge {
    /// Create an edge from its raw parts.
    #[must_use]
    pub fn new(source_task_id: TaskId, target_task_id: TaskId, kind: EdgeKind) -> Self {
        Self {
            source_task_id,
            target_task_id,
            kind,
        }
    }

    /// `parent` is the parent of `child`, recorded from the parent's side.
    #[must_use]
    pub fn parent_of(parent: TaskId, child: TaskId) -> Self {
        Self::new(parent, child, EdgeKind::Parent)
    }

    /// `child` is a child of `parent`, recorded from the child's side.
    #[must_use]
    pub fn child_of(child: TaskId, parent: TaskId) -> Self {
        Self::new(child, parent, EdgeKind::Child)
    }

    /// Returns `(parent, child)` regardless of which side recorded the edge.
    #[must_use]
    pub fn endpoints(&self) -> (TaskId, TaskId) {
        match self.kind {
            EdgeKind::Parent => (self.source_task_id, self.target_task_id),
            EdgeKind::Child => (self.target_task_id, self.source_task_id),
        }
    }
}

/// A task as returned by the data source.
///
/// `child_ids` and `parent_ids` are not part of the wire format; they are
/// populated by [`EdgeIndex`](crate::EdgeIndex).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTaskRecord {
    /// Task identity.
    pub id: TaskId,
    /// Human-facing ticket key (e.g. `KAN-12`).
    #[serde(default)]
    pub ticket: String,
    /// Task title.
    #[serde(default)]
    pub title: String,
    /// Project the task belongs to, used for navigation.
    #[serde(default)]
    pub project_id: Option<u64>,
    /// Assigned user id.
    #[serde(default)]
    pub assignee_id: Option<u64>,
    /// Assigned user display name.
    #[serde(default)]
    pub assignee_name: Option<String>,
    /// Assigned user avatar colour.
    #[serde(default)]
    pub assignee_color: Option<String>,
    /// Planned start date.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Workflow status label.
    #[serde(default)]
    pub status: String,
    /// Priority label.
    #[serde(default)]
    pub priority: Option<String>,
    /// Children in edge arrival order.
    #[serde(skip)]
    pub child_ids: Vec<TaskId>,
    /// Parents in edge arrival order.
    #[serde(skip)]
    pub parent_ids: Vec<TaskId>,
}

impl RawTaskRecord {
    /// Create a record with the identifying fields set and everything else empty.
    #[must_use]
    pub fn new(
        id: TaskId,
        ticket: impl Into<String>,
        title: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id,
            ticket: ticket.into(),
            title: title.into(),
            project_id: None,
            assignee_id: None,
            assignee_name: None,
            assignee_color: None,
            start_date: None,
            due_date: None,
            status: status.into(),
            priority: None,
            child_ids: Vec::new(),
            parent_ids: Vec::new(),
        }
    }

    /// Set the owning project.
    #[must_use]
    pub fn with_project(mut self, project_id: u64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    fn assignee(&self) -> Option<Assignee> {
        if self.assignee_id.is_none() && self.assignee_name.is_none() {
            return None;
        }
        Some(Assignee {
            id: self.assignee_id,
            name: self.assignee_name.clone(),
            color: self.assignee_color.clone(),
        })
    }
}

/// The payload returned by the external fetch for one focus task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    /// Every task related to the focus task.
    pub tasks: Vec<RawTaskRecord>,
    /// Relationship edges between those tasks.
    pub relationships: Vec<RelationshipEdge>,
}

/// Assignee details carried onto a rendered node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    /// User id.
    pub id: Option<u64>,
    /// Display name.
    pub name: Option<String>,
    /// Avatar colour.
    pub color: Option<String>,
}

/// Layout coordinate of a node: `x` is the horizontal centre, `y` the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal centre.
    pub x: f64,
    /// Top edge.
    pub y: f64,
}

/// A node of the materialised flow-chart tree.
///
/// Each node is exclusively owned by its parent; a task reachable through
/// several parents appears only under the first one the builder reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskNode {
    /// Task identity.
    pub id: TaskId,
    /// Ticket key.
    pub ticket: String,
    /// Task title.
    pub title: String,
    /// Owning project.
    pub project_id: Option<u64>,
    /// Assignee, when the task has one.
    pub assignee: Option<Assignee>,
    /// Workflow status label.
    pub status: String,
    /// Priority label.
    pub priority: Option<String>,
    /// Planned start date.
    pub start_date: Option<NaiveDate>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Depth below the root (root = 0).
    pub level: usize,
    /// Child nodes in edge arrival order.
    pub children: Vec<TaskNode>,
    /// Set by the layout engine; `None` until the whole tree is placed.
    pub position: Option<Position>,
}

impl TaskNode {
    pub(crate) fn from_record(record: &RawTaskRecord, level: usize) -> Self {
        Self {
            id: record.id,
            ticket: record.ticket.clone(),
            title: record.title.clone(),
            project_id: record.project_id,
            assignee: record.assignee(),
            status: record.status.clone(),
            priority: record.priority.clone(),
            start_date: record.start_date,
            due_date: record.due_date,
            level,
            children: Vec::new(),
            position: None,
        }
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first, pre-order iteration over this node and its descendants.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Find a node by id in this subtree.
    #[must_use]
    pub fn find(&self, id: TaskId) -> Option<&Self> {
        self.iter().find(|node| node.id == id)
    }

    /// Deepest `level` present in this subtree.
    #[must_use]
    pub fn max_level(&self) -> usize {
        self.iter().map(|node| node.level).max().unwrap_or(self.level)
    }
}

/// Pre-order iterator returned by [`TaskNode::iter`].
#[derive(Debug)]
pub struct Nodes<'a> {
    stack: Vec<&'a TaskNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a TaskNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
