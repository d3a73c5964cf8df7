//! The synchronous flow-chart pipeline: index, resolve, build, lay out.

use crate::{
    BuildStats, EdgeIndex, FetchResult, FlowChartConfig, LayoutEngine, Resolution, TaskId,
    TaskNode, TreeBuilder, resolve_root,
};
use serde::Serialize;
use tracing::{info, warn};

/// A positioned flow chart for one focus task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowChart {
    /// The task the chart was requested for.
    pub focus: TaskId,
    /// Positioned tree, or `None` when there are no related tasks.
    pub root: Option<TaskNode>,
    /// Distinct statuses across all fetched tasks, sorted.
    pub available_statuses: Vec<String>,
    /// How the root was found; `None` when nothing was fetched.
    #[serde(skip)]
    pub resolution: Option<Resolution>,
    /// Builder counters.
    pub stats: BuildStats,
}

impl FlowChart {
    /// A chart with no tasks.
    #[must_use]
    pub fn empty(focus: TaskId) -> Self {
        Self {
            focus,
            root: None,
            available_statuses: Vec::new(),
            resolution: None,
            stats: BuildStats::default(),
        }
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, TaskNode::len)
    }

    /// Find a node in the tree by id.
    #[must_use]
    pub fn find(&self, id: TaskId) -> Option<&TaskNode> {
        self.root.as_ref().and_then(|root| root.find(id))
    }
}

/// Turn one fetch result into a positioned flow chart.
///
/// Never fails: cycles, unknown ids and oversized graphs are pruned, and an
/// empty fetch yields an empty chart.
#[must_use]
pub fn build_flow_chart(focus: TaskId, fetch: FetchResult, config: &FlowChartConfig) -> FlowChart {
    let FetchResult {
        tasks,
        relationships,
    } = fetch;
    let index = EdgeIndex::build(tasks, &relationships);
    if index.is_empty() {
        info!(focus = %focus, "No related tasks for flow chart");
        return FlowChart::empty(focus);
    }

    if index.has_cycles() {
        warn!(focus = %focus, "Relationship graph contains cycles; rendering a pruned tree");
    }

    let resolution = resolve_root(&index, focus, config.limits.max_ascent);
    let output = TreeBuilder::new(&index, config.limits).build(resolution.root);

    let mut root = output.root;
    if let Some(tree) = root.as_mut() {
        LayoutEngine::new(config.layout).layout(tree);
    }

    info!(
        focus = %focus,
        root = %resolution.root,
        nodes = output.stats.nodes,
        tasks = index.len(),
        "Built flow chart"
    );

    FlowChart {
        focus,
        root,
        available_statuses: index.available_statuses(),
        resolution: Some(resolution),
        stats: output.stats,
    }
}
