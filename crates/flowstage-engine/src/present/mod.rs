//! Graph presentation.
//!
//! Assembles stages, placements and edges into a [`RenderableGraph`] that a
//! generic graph-drawing surface can consume. Selection is passed in on every
//! call instead of being kept as shared state, and interaction events are
//! routed back through a [`SelectHandler`].

mod handler;

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

pub use handler::SelectHandler;

use crate::edge::GraphEdge;
use crate::layout::{Layout, Placement, Position};
use crate::stage::Stage;
use crate::step::{StepId, StepRecord};

/// Tracing target for presentation.
const TRACING_TARGET: &str = "flowstage_engine::present";

/// Node type understood by the drawing surface.
pub const NODE_KIND: &str = "workflowStep";

/// A renderable step node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Node identifier, equal to the step ID.
    pub id: StepId,
    /// Node type, always [`NODE_KIND`].
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Position on the drawing surface.
    pub position: Position,
    /// The step shown in the node.
    #[serde(rename = "data")]
    pub payload: StepRecord,
    /// Whether the step is the current selection.
    pub selected: bool,
    /// Index of the stage the step belongs to.
    pub stage_index: usize,
    /// Order among steps sharing this position.
    pub stack_index: usize,
    /// Number of steps sharing this position.
    pub stack_size: usize,
}

impl GraphNode {
    /// Returns the icon name for the node's step type.
    pub fn icon(&self) -> &'static str {
        self.payload.step_type().icon()
    }
}

/// Nodes and edges ready for a drawing surface.
///
/// An empty graph is the signal to show an empty-state placeholder instead
/// of a canvas.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderableGraph {
    /// One node per step, in stage order.
    pub nodes: Vec<GraphNode>,
    /// Precedence edges between consecutive stages.
    pub edges: Vec<GraphEdge>,
    #[serde(skip)]
    on_select: SelectHandler,
}

impl RenderableGraph {
    /// Returns whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Returns the node for a step.
    pub fn node(&self, id: &StepId) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    /// Returns the selected node, if any.
    pub fn selected(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.selected)
    }

    /// Dispatches an interaction event on a node.
    ///
    /// Invokes the selection callback with the step ID and returns `true`
    /// when the node exists; unknown IDs are ignored.
    pub fn select(&self, id: &StepId) -> bool {
        if self.node(id).is_none() {
            tracing::debug!(
                target: TRACING_TARGET,
                step_id = %id,
                "Ignoring interaction on unknown node"
            );
            return false;
        }

        self.on_select.call(id);
        true
    }

    /// Builds a petgraph view of the graph.
    ///
    /// Node weights are step IDs and edge weights are edge IDs.
    pub fn to_digraph(&self) -> DiGraph<StepId, String> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut indices: HashMap<&StepId, NodeIndex> = HashMap::with_capacity(self.nodes.len());

        for node in &self.nodes {
            indices
                .entry(&node.id)
                .or_insert_with(|| graph.add_node(node.id.clone()));
        }

        for edge in &self.edges {
            let (Some(&from), Some(&to)) = (indices.get(&edge.source), indices.get(&edge.target))
            else {
                continue;
            };
            graph.add_edge(from, to, edge.id.clone());
        }

        graph
    }
}

/// Assembles the renderable graph.
///
/// Builds one node per step using its placement and marks the node whose ID
/// equals `selection`. Edges are passed through unmodified.
pub fn present(
    stages: &[Stage],
    layout: &Layout,
    edges: Vec<GraphEdge>,
    selection: Option<&StepId>,
    on_select: SelectHandler,
) -> RenderableGraph {
    let capacity = stages.iter().map(Stage::len).sum();
    let mut nodes = Vec::with_capacity(capacity);

    for (stage_index, stage) in stages.iter().enumerate() {
        for step in &stage.steps {
            let placement = layout.get(&step.id).copied().unwrap_or_else(|| {
                tracing::warn!(
                    target: TRACING_TARGET,
                    step_id = %step.id,
                    "Step has no placement, drawing at origin"
                );
                Placement {
                    position: Position::default(),
                    stage_index,
                    stack_index: 0,
                    stack_size: 1,
                }
            });

            nodes.push(GraphNode {
                id: step.id.clone(),
                kind: NODE_KIND,
                position: placement.position,
                payload: step.clone(),
                selected: selection == Some(&step.id),
                stage_index: placement.stage_index,
                stack_index: placement.stack_index,
                stack_size: placement.stack_size,
            });
        }
    }

    RenderableGraph {
        nodes,
        edges,
        on_select,
    }
}
