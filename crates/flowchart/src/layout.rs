//! Layout engine: recursive subtree-width placement.
//!
//! Each node is centred above the span of its children, and siblings are
//! packed left to right with their full subtree widths reserved. Two sibling
//! subtrees therefore never overlap horizontally, and every level sits one
//! `node_height + vertical_spacing` step below its parent.

use crate::{Position, TaskNode};
use serde::{Deserialize, Serialize};

/// Fixed geometry used by the layout engine, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of a node box.
    pub node_width: f64,
    /// Height of a node box.
    pub node_height: f64,
    /// Gap between adjacent sibling subtrees.
    pub horizontal_spacing: f64,
    /// Gap between a node box and its children's row.
    pub vertical_spacing: f64,
    /// Horizontal centre of the root.
    pub origin_x: f64,
    /// Top edge of the root.
    pub origin_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 60.0,
            horizontal_spacing: 40.0,
            vertical_spacing: 80.0,
            origin_x: 400.0,
            origin_y: 50.0,
        }
    }
}

impl LayoutConfig {
    /// Vertical distance between the tops of two consecutive levels.
    #[must_use]
    pub fn level_step(&self) -> f64 {
        self.node_height + self.vertical_spacing
    }
}

/// Axis-aligned bounding box of a laid-out tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    /// Left edge.
    pub min_x: f64,
    /// Top edge.
    pub min_y: f64,
    /// Right edge.
    pub max_x: f64,
    /// Bottom edge.
    pub max_y: f64,
}

impl Bounds {
    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Position {
        Position {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Assigns positions to an already-built tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine with the given geometry.
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// The geometry in use.
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Horizontal space needed by `node` and all its descendants.
    #[must_use]
    pub fn subtree_width(&self, node: &TaskNode) -> f64 {
        if node.is_leaf() {
            return self.config.node_width;
        }
        let children: f64 = node
            .children
            .iter()
            .map(|child| self.subtree_width(child))
            .sum();
        let gaps = (node.children.len() - 1) as f64 * self.config.horizontal_spacing;
        self.config.node_width.max(children + gaps)
    }

    /// Position every node of the tree, starting with the root at the origin.
    pub fn layout(&self, root: &mut TaskNode) {
        self.place(root, self.config.origin_x, self.config.origin_y);
    }

    fn place(&self, node: &mut TaskNode, x: f64, y: f64) {
        node.position = Some(Position { x, y });
        if node.is_leaf() {
            return;
        }

        let total = self.subtree_width(node);
        let child_y = y + self.config.level_step();
        let mut cursor = x - total / 2.0;

        for child in &mut node.children {
            let width = self.subtree_width(child);
            self.place(child, cursor + width / 2.0, child_y);
            cursor += width + self.config.horizontal_spacing;
        }
    }

    /// Bounding box of every node box in the tree, or `None` if it is not laid out.
    #[must_use]
    pub fn bounds(&self, root: &TaskNode) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for node in root.iter() {
            let node = self.node_bounds(node)?;
            bounds = Some(bounds.map_or(node, |acc| acc.union(node)));
        }
        bounds
    }

    /// The box occupied by a single positioned node.
    #[must_use]
    pub fn node_bounds(&self, node: &TaskNode) -> Option<Bounds> {
        let Position { x, y } = node.position?;
        let half = self.config.node_width / 2.0;
        Some(Bounds {
            min_x: x - half,
            min_y: y,
            max_x: x + half,
            max_y: y + self.config.node_height,
        })
    }
}
