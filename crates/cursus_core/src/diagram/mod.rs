//! Roadmap diagram parsing and layered layout.
//!
//! # Responsibility
//! - Parse flowchart text into declared nodes and directed edges.
//! - Assign breadth-first layers and 2D coordinates for rendering.
//!
//! # Invariants
//! - Neither parsing nor layout ever fails; unrecognized input is skipped.
//! - Every edge endpoint references a node in the same `Diagram`.
//! - Every node appears exactly once in a layout.

pub mod layout;
pub mod parser;

use serde::{Deserialize, Serialize};

pub use layout::{
    assign_layers, layout_diagram, layout_graph, Bounds, Layout, LayoutConfig, LayoutNode,
};
pub use parser::parse_diagram;

/// Visual node shape selected by the bracket style; layout ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    /// `id[label]`
    Rect,
    /// `id(label)`
    Round,
    /// `id((label))`
    Circle,
    /// `id{label}`
    Diamond,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiagramNode {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub from: String,
    pub to: String,
    /// Decorative inline label (`-->|text|` or `-- text -->`).
    pub label: Option<String>,
}

/// Parsed flowchart: nodes in first-declaration order, edges in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

impl Diagram {
    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
