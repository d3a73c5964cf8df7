//! Task-relationship flow-chart engine for kanflow.
//!
//! Given the flat set of parent/child relationships around a focus task,
//! this crate finds the conceptual root of the subtree, materialises a
//! bounded, cycle-free tree from the edge list and lays it out on a 2D
//! plane so that sibling subtrees never overlap.
//!
//! # Pipeline
//!
//! ```text
//! FetchResult ─▶ EdgeIndex ─▶ resolve_root ─▶ TreeBuilder ─▶ LayoutEngine ─▶ FlowChart
//!                (adjacency)  (ancestor walk)  (bounded DFS)  (subtree widths)
//! ```
//!
//! Every stage is a pure, synchronous transformation. The only async
//! boundary is the [`FlowChartSource`] that supplies raw tasks and edges;
//! [`FlowChartSession`] wraps it with a last-request-wins guard.
//!
//! # Example
//!
//! ```
//! use kanflow_flowchart::{
//!     FetchResult, FlowChartConfig, RawTaskRecord, RelationshipEdge, TaskId, build_flow_chart,
//! };
//!
//! let fetch = FetchResult {
//!     tasks: vec![
//!         RawTaskRecord::new(TaskId(1), "KAN-1", "Epic", "open"),
//!         RawTaskRecord::new(TaskId(2), "KAN-2", "Story", "done"),
//!     ],
//!     relationships: vec![RelationshipEdge::parent_of(TaskId(1), TaskId(2))],
//! };
//!
//! let chart = build_flow_chart(TaskId(2), fetch, &FlowChartConfig::default());
//! let root = chart.root.as_ref().map(|node| node.id);
//! assert_eq!(root, Some(TaskId(1)));
//! assert_eq!(chart.available_statuses, vec!["done", "open"]);
//! ```

mod builder;
mod config;
mod error;
mod index;
mod layout;
mod model;
mod pipeline;
mod resolver;
mod session;
pub mod view;

pub use builder::{BuildLimits, BuildOutput, BuildStats, TreeBuilder};
pub use config::{CONFIG_FILE_NAME, FlowChartConfig};
pub use error::{Error, Result};
pub use index::EdgeIndex;
pub use layout::{Bounds, LayoutConfig, LayoutEngine};
pub use model::{
    Assignee, EdgeKind, FetchResult, Nodes, Position, RawTaskRecord, RelationshipEdge, TaskId,
    TaskNode,
};
pub use pipeline::{FlowChart, build_flow_chart};
pub use resolver::{AscentStop, Resolution, resolve_root};
pub use session::{FlowChartSession, FlowChartSource, LoadOutcome};
