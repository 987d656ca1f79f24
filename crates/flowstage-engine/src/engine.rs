//! Stage graph engine.

use crate::edge::synthesize;
use crate::error::EngineResult;
use crate::layout::{LayoutOptions, layout};
use crate::present::{RenderableGraph, SelectHandler, present};
use crate::stage::group;
use crate::step::{StepId, StepRecord};

/// Tracing target for engine operations.
const TRACING_TARGET: &str = "flowstage_engine::engine";

/// Runs the full pipeline: grouping, layout, edge synthesis, presentation.
///
/// The engine holds only its layout options. Every call recomputes the graph
/// from scratch, so the same steps always produce the same graph and two
/// workflows can be rendered concurrently.
#[derive(Debug, Clone, Default)]
pub struct StageGraphEngine {
    options: LayoutOptions,
}

impl StageGraphEngine {
    /// Creates an engine with validated layout options.
    pub fn new(options: LayoutOptions) -> EngineResult<Self> {
        options.validate()?;

        tracing::debug!(
            target: TRACING_TARGET,
            primary_spacing = options.spacing.primary,
            secondary_spacing = options.spacing.secondary,
            orientation = %options.orientation,
            secondary_base = %options.secondary_base,
            "Stage graph engine initialized"
        );

        Ok(Self { options })
    }

    /// Returns the layout options.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Renders the graph for a workflow's steps.
    pub fn render(
        &self,
        steps: &[StepRecord],
        selection: Option<&StepId>,
        on_select: SelectHandler,
    ) -> RenderableGraph {
        let stages = group(steps.iter().cloned());
        let layout = layout(&stages, &self.options);
        let edges = synthesize(&stages);
        let graph = present(&stages, &layout, edges, selection, on_select);

        tracing::debug!(
            target: TRACING_TARGET,
            step_count = steps.len(),
            stage_count = stages.len(),
            node_count = graph.nodes.len(),
            edge_count = graph.edges.len(),
            "Rendered stage graph"
        );

        graph
    }
}
