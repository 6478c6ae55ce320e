//! Breadth-first layer assignment and coordinate layout.
//!
//! # Responsibility
//! - Rank nodes into layers from the root set: nodes with outgoing edges but
//!   no incoming edge.
//! - Center each layer horizontally and stack layers vertically.
//!
//! # Invariants
//! - Every distinct node id appears in exactly one layer.
//! - Nodes unreachable from the roots, including nodes without any edge,
//!   form one trailing layer in declaration order.
//! - An empty root set falls back to the first declared node that has an
//!   edge, or to the first declared node when the graph has no edges.

use super::{Diagram, DiagramEdge, DiagramNode};
use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Node box size and spacing, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    pub horizontal_gap: f64,
    pub vertical_gap: f64,
    pub margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 60.0,
            horizontal_gap: 40.0,
            vertical_gap: 80.0,
            margin: 40.0,
        }
    }
}

/// A diagram node with its rank and center coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    #[serde(flatten)]
    pub node: DiagramNode,
    pub layer: usize,
    pub x: f64,
    pub y: f64,
}

/// Canvas extents covering every node box plus margin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub bounds: Bounds,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|placed| placed.node.id == id)
    }

    pub fn layer_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|placed| placed.layer + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Groups node positions (indexes into `nodes`) into breadth-first layers.
///
/// Duplicate ids keep their first occurrence; edges naming unknown ids are
/// ignored.
pub fn assign_layers(nodes: &[DiagramNode], edges: &[DiagramEdge]) -> Vec<Vec<usize>> {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let mut by_id: HashMap<&str, NodeIndex> = HashMap::new();
    let mut declared = Vec::new();

    for (position, node) in nodes.iter().enumerate() {
        if by_id.contains_key(node.id.as_str()) {
            continue;
        }
        let index = graph.add_node(position);
        by_id.insert(node.id.as_str(), index);
        declared.push(index);
    }
    for edge in edges {
        if let (Some(&from), Some(&to)) = (by_id.get(edge.from.as_str()), by_id.get(edge.to.as_str()))
        {
            graph.update_edge(from, to, ());
        }
    }

    let Some(&first) = declared.first() else {
        return Vec::new();
    };

    let has_edges = |index: NodeIndex, direction: Direction| {
        graph.neighbors_directed(index, direction).next().is_some()
    };
    let mut roots = declared
        .iter()
        .copied()
        .filter(|&index| {
            !has_edges(index, Direction::Incoming) && has_edges(index, Direction::Outgoing)
        })
        .collect::<Vec<_>>();
    if roots.is_empty() {
        // Only cycles remain; isolated nodes still belong to the trailing layer.
        let fallback = declared
            .iter()
            .copied()
            .find(|&index| has_edges(index, Direction::Outgoing))
            .unwrap_or(first);
        roots.push(fallback);
    }

    let mut visited = vec![false; graph.node_count()];
    for root in &roots {
        visited[root.index()] = true;
    }

    let mut layers = Vec::new();
    let mut current = roots;
    while !current.is_empty() {
        let mut next = Vec::new();
        for &index in &current {
            // petgraph walks adjacency newest-first.
            let mut targets = graph
                .neighbors_directed(index, Direction::Outgoing)
                .collect::<Vec<_>>();
            targets.reverse();
            for target in targets {
                if !visited[target.index()] {
                    visited[target.index()] = true;
                    next.push(target);
                }
            }
        }
        layers.push(current);
        current = next;
    }

    let unreached = declared
        .iter()
        .copied()
        .filter(|index| !visited[index.index()])
        .collect::<Vec<_>>();
    if !unreached.is_empty() {
        layers.push(unreached);
    }

    layers
        .into_iter()
        .map(|layer| layer.into_iter().map(|index| graph[index]).collect())
        .collect()
}

/// Lays out nodes with the default box size and spacing.
pub fn layout_graph(nodes: &[DiagramNode], edges: &[DiagramEdge]) -> Vec<LayoutNode> {
    place_nodes(nodes, edges, &LayoutConfig::default())
}

/// Lays out a parsed diagram and computes its canvas bounds.
pub fn layout_diagram(diagram: &Diagram, config: &LayoutConfig) -> Layout {
    let nodes = place_nodes(&diagram.nodes, &diagram.edges, config);
    let bounds = compute_bounds(&nodes, config);
    debug!(
        "event=diagram_layout module=diagram status=ok nodes={} layers={} width={} height={}",
        nodes.len(),
        nodes.iter().map(|placed| placed.layer + 1).max().unwrap_or(0),
        bounds.width(),
        bounds.height()
    );
    Layout { nodes, bounds }
}

fn place_nodes(
    nodes: &[DiagramNode],
    edges: &[DiagramEdge],
    config: &LayoutConfig,
) -> Vec<LayoutNode> {
    let step_x = config.node_width + config.horizontal_gap;
    let step_y = config.node_height + config.vertical_gap;

    let mut placed = Vec::with_capacity(nodes.len());
    for (layer, members) in assign_layers(nodes, edges).into_iter().enumerate() {
        let count = members.len() as f64;
        let total_width = count * config.node_width + (count - 1.0) * config.horizontal_gap;
        for (slot, position) in members.into_iter().enumerate() {
            placed.push(LayoutNode {
                node: nodes[position].clone(),
                layer,
                x: -total_width / 2.0 + slot as f64 * step_x + config.node_width / 2.0,
                y: layer as f64 * step_y,
            });
        }
    }
    placed
}

fn compute_bounds(nodes: &[LayoutNode], config: &LayoutConfig) -> Bounds {
    if nodes.is_empty() {
        return Bounds::default();
    }
    let half_width = config.node_width / 2.0;
    let half_height = config.node_height / 2.0;

    let mut bounds = Bounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    for placed in nodes {
        bounds.min_x = bounds.min_x.min(placed.x - half_width);
        bounds.max_x = bounds.max_x.max(placed.x + half_width);
        bounds.min_y = bounds.min_y.min(placed.y - half_height);
        bounds.max_y = bounds.max_y.max(placed.y + half_height);
    }

    Bounds {
        min_x: bounds.min_x - config.margin,
        min_y: bounds.min_y - config.margin,
        max_x: bounds.max_x + config.margin,
        max_y: bounds.max_y + config.margin,
    }
}
