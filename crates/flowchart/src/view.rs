//! Presentation helpers over a laid-out tree.
//!
//! Nothing here moves a node: status filtering only decides visibility, and
//! pan/zoom live in a separate [`Viewport`] transform applied at draw time.

use crate::{LayoutConfig, Position, TaskId, TaskNode};
use serde::Serialize;
use std::collections::BTreeSet;

/// Smallest zoom factor.
pub const MIN_SCALE: f64 = 0.3;
/// Largest zoom factor.
pub const MAX_SCALE: f64 = 3.0;

/// Set of statuses to show. An empty filter shows everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFilter {
    visible: BTreeSet<String>,
}

impl StatusFilter {
    /// A filter that shows every node.
    #[must_use]
    pub fn show_all() -> Self {
        Self::default()
    }

    /// A filter showing only the given statuses.
    pub fn only<I, S>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            visible: statuses.into_iter().map(Into::into).collect(),
        }
    }

    /// Add the status if absent, remove it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, status: &str) -> bool {
        if self.visible.remove(status) {
            false
        } else {
            self.visible.insert(status.to_string());
            true
        }
    }

    /// Show every node again.
    pub fn clear(&mut self) {
        self.visible.clear();
    }

    /// Whether no status is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Selected statuses, sorted.
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.visible.iter().map(String::as_str)
    }

    /// Whether `node` should be drawn.
    #[must_use]
    pub fn is_visible(&self, node: &TaskNode) -> bool {
        self.visible.is_empty() || self.visible.contains(&node.status)
    }

    /// Visible nodes of the tree in pre-order.
    pub fn visible_nodes<'a>(&'a self, root: &'a TaskNode) -> impl Iterator<Item = &'a TaskNode> {
        root.iter().filter(move |node| self.is_visible(node))
    }
}

/// Pan/zoom transform from layout space to screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Horizontal translation in screen units.
    pub pan_x: f64,
    /// Vertical translation in screen units.
    pub pan_y: f64,
    /// Zoom factor, kept within [`MIN_SCALE`, `MAX_SCALE`].
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Back to no pan and unit zoom.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Translate by a screen-space delta (drag).
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.pan_x += dx;
            self.pan_y += dy;
        }
    }

    /// Set the zoom factor, clamped to the allowed range. Non-finite values are ignored.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    /// Multiply the zoom by `factor`, keeping the layout point under `anchor` fixed on screen.
    pub fn zoom_by(&mut self, factor: f64, anchor: Position) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let pinned = self.to_world(anchor);
        self.set_scale(self.scale * factor);
        self.pan_x = pinned.x.mul_add(-self.scale, anchor.x);
        self.pan_y = pinned.y.mul_add(-self.scale, anchor.y);
    }

    /// Map a layout point to the screen.
    #[must_use]
    pub fn to_screen(&self, point: Position) -> Position {
        Position {
            x: point.x.mul_add(self.scale, self.pan_x),
            y: point.y.mul_add(self.scale, self.pan_y),
        }
    }

    /// Map a screen point back to layout space.
    #[must_use]
    pub fn to_world(&self, point: Position) -> Position {
        Position {
            x: (point.x - self.pan_x) / self.scale,
            y: (point.y - self.pan_y) / self.scale,
        }
    }

    /// Centre `bounds` in a `width` x `height` screen, zooming out to fit if needed.
    pub fn fit(&mut self, bounds: &crate::Bounds, width: f64, height: f64) {
        if bounds.width() > 0.0 && bounds.height() > 0.0 {
            let scale = (width / bounds.width()).min(height / bounds.height()).min(1.0);
            self.set_scale(scale);
        }
        let center = bounds.center();
        self.pan_x = center.x.mul_add(-self.scale, width / 2.0);
        self.pan_y = center.y.mul_add(-self.scale, height / 2.0);
    }
}

/// A line from a parent's bottom edge to a child's top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Connector {
    /// Parent task.
    pub from: TaskId,
    /// Child task.
    pub to: TaskId,
    /// Start point (bottom centre of the parent).
    pub start: Position,
    /// End point (top centre of the child).
    pub end: Position,
    /// Whether both ends are visible under the filter.
    pub visible: bool,
}

/// Every parent/child connector of a laid-out tree, in pre-order.
///
/// Nodes without a position are skipped.
#[must_use]
pub fn connectors(root: &TaskNode, layout: &LayoutConfig, filter: &StatusFilter) -> Vec<Connector> {
    let mut lines = Vec::new();
    for parent in root.iter() {
        let Some(from) = parent.position else {
            continue;
        };
        for child in &parent.children {
            let Some(to) = child.position else {
                continue;
            };
            lines.push(Connector {
                from: parent.id,
                to: child.id,
                start: Position {
                    x: from.x,
                    y: from.y + layout.node_height,
                },
                end: to,
                visible: filter.is_visible(parent) && filter.is_visible(child),
            });
        }
    }
    lines
}

/// The visible node whose box contains `point` (layout space).
#[must_use]
pub fn hit_test<'a>(
    root: &'a TaskNode,
    point: Position,
    layout: &LayoutConfig,
    filter: &StatusFilter,
) -> Option<&'a TaskNode> {
    let half = layout.node_width / 2.0;
    root.iter().find(|node| {
        filter.is_visible(node)
            && node.position.is_some_and(|Position { x, y }| {
                (x - half..=x + half).contains(&point.x)
                    && (y..=y + layout.node_height).contains(&point.y)
            })
    })
}

/// Where clicking a node should take the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTarget {
    /// Ticket key of the task.
    pub ticket: String,
    /// Project the task lives in.
    pub project_id: u64,
}

impl NavigationTarget {
    /// URL fragment the host uses for task navigation.
    #[must_use]
    pub fn hash_fragment(&self) -> String {
        format!("#/projects/{}/tasks/{}", self.project_id, self.ticket)
    }
}

/// Navigation target for a clicked node.
///
/// The root is the chart's own context and does not navigate; nodes without
/// a project cannot be addressed.
#[must_use]
pub fn navigation_target(root: &TaskNode, id: TaskId) -> Option<NavigationTarget> {
    if root.id == id {
        return None;
    }
    let node = root.find(id)?;
    Some(NavigationTarget {
        ticket: node.ticket.clone(),
        project_id: node.project_id?,
    })
}
