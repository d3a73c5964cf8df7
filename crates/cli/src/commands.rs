//! Command implementations for the kanflow binary.

use crate::cli::OutputFormat;
use crate::errors::{CliError, Result};
use crate::snapshot::{Snapshot, SnapshotSource};
use kanflow_flowchart::view::{self, Connector, StatusFilter};
use kanflow_flowchart::{
    Bounds, EdgeIndex, FlowChart, FlowChartConfig, FlowChartSession, LayoutEngine, LoadOutcome,
    TaskId, TaskNode,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Options for `kanflow render`
#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    pub snapshot: &'a Path,
    pub focus: TaskId,
    pub statuses: &'a [String],
    pub format: OutputFormat,
}

/// JSON shape printed by `render --format json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderReport<'a> {
    #[serde(flatten)]
    chart: &'a FlowChart,
    visible_statuses: Vec<&'a str>,
    hidden: Vec<TaskId>,
    connectors: Vec<Connector>,
    bounds: Option<Bounds>,
}

#[instrument(skip(config, out), fields(snapshot = %options.snapshot.display(), focus = %options.focus))]
pub async fn run_render(
    options: RenderOptions<'_>,
    config: FlowChartConfig,
    out: &mut impl Write,
) -> Result<()> {
    let snapshot = Snapshot::load(options.snapshot).await?;
    let session = FlowChartSession::new(SnapshotSource::new(snapshot), config);

    let chart = match session.load(options.focus).await {
        LoadOutcome::Ready(chart) => chart,
        LoadOutcome::Failed(err) => return Err(err.into()),
        LoadOutcome::Superseded { focus } => {
            warn!(focus = %focus, "Load was superseded; nothing to render");
            return Ok(());
        }
    };

    let filter = StatusFilter::only(options.statuses.iter().map(String::as_str));
    for status in filter.selected() {
        if !chart.available_statuses.iter().any(|s| s == status) {
            warn!(status, "Status filter matches no fetched task");
        }
    }

    info!(
        nodes = chart.node_count(),
        truncated = chart.stats.was_truncated(),
        "Rendering flow chart"
    );

    match options.format {
        OutputFormat::Tree => write_tree(&chart, &filter, out)?,
        OutputFormat::Json => write_json(&chart, &filter, session.config(), out)?,
    }
    Ok(())
}

#[instrument(skip(snapshot, out), fields(snapshot = %snapshot.display()))]
pub async fn run_statuses(
    snapshot: &Path,
    focus: Option<TaskId>,
    out: &mut impl Write,
) -> Result<()> {
    let snapshot = Snapshot::load(snapshot).await?;
    let statuses = match focus {
        Some(focus) => {
            let fetch = snapshot
                .fetch_for(focus)
                .ok_or(CliError::UnknownFocus { focus: focus.0 })?;
            EdgeIndex::build(fetch.tasks.clone(), &[]).available_statuses()
        }
        None => snapshot.statuses(),
    };

    for status in statuses {
        writeln!(out, "{status}")?;
    }
    Ok(())
}

fn write_tree(chart: &FlowChart, filter: &StatusFilter, out: &mut impl Write) -> Result<()> {
    let Some(root) = &chart.root else {
        writeln!(out, "No related tasks for task {}", chart.focus)?;
        return Ok(());
    };

    write_node(root, root, chart.focus, filter, out)?;

    if chart.stats.was_truncated() {
        let stats = &chart.stats;
        writeln!(
            out,
            "(truncated: {} beyond depth, {} over budget, {} children dropped)",
            stats.depth_pruned, stats.budget_pruned, stats.fanout_truncated
        )?;
    }
    Ok(())
}

fn write_node(
    node: &TaskNode,
    root: &TaskNode,
    focus: TaskId,
    filter: &StatusFilter,
    out: &mut impl Write,
) -> Result<()> {
    let indent = "  ".repeat(node.level);
    let marker = if node.id == focus { "*" } else { "-" };
    write!(
        out,
        "{indent}{marker} {} {} [{}]",
        node.ticket, node.title, node.status
    )?;
    if let Some(position) = node.position {
        write!(out, " @ ({:.0}, {:.0})", position.x, position.y)?;
    }
    if !filter.is_visible(node) {
        write!(out, " (hidden)")?;
    }
    if let Some(target) = view::navigation_target(root, node.id) {
        write!(out, " {}", target.hash_fragment())?;
    }
    writeln!(out)?;

    for child in &node.children {
        write_node(child, root, focus, filter, out)?;
    }
    Ok(())
}

fn write_json(
    chart: &FlowChart,
    filter: &StatusFilter,
    config: &FlowChartConfig,
    out: &mut impl Write,
) -> Result<()> {
    let (hidden, connectors, bounds) = chart.root.as_ref().map_or_else(
        || (Vec::new(), Vec::new(), None),
        |root| {
            let hidden = root
                .iter()
                .filter(|node| !filter.is_visible(node))
                .map(|node| node.id)
                .collect();
            let connectors = view::connectors(root, &config.layout, filter);
            let bounds = LayoutEngine::new(config.layout).bounds(root);
            (hidden, connectors, bounds)
        },
    );

    let report = RenderReport {
        chart,
        visible_statuses: filter.selected().collect(),
        hidden,
        connectors,
        bounds,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}
