//! Canvas host model.
//!
//! [`WorkflowCanvas`] is what a hosting surface keeps between renders: the
//! current workflow, the last loaded steps, the selected step and the graph
//! computed from them. Every mutation goes through the gateway and is
//! followed by a full reload; nothing is diffed.

use crate::engine::StageGraphEngine;
use crate::error::{EngineError, EngineResult};
use crate::gateway::StepGateway;
use crate::present::{RenderableGraph, SelectHandler};
use crate::stage;
use crate::step::{NewStep, StepId, StepPatch, StepRecord};
use crate::workflow::WorkflowId;

/// Tracing target for canvas operations.
const TRACING_TARGET: &str = "flowstage_engine::canvas";

/// Token identifying one step fetch.
///
/// Tickets are ordered by issue time. A fetch result is applied only if no
/// later-issued fetch for the same workflow has already been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    workflow_id: WorkflowId,
    sequence: u64,
}

impl LoadTicket {
    /// Returns the workflow being fetched.
    pub const fn workflow_id(&self) -> WorkflowId {
        self.workflow_id
    }
}

/// Outcome of [`WorkflowCanvas::finish_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetched steps replaced the rendered graph.
    Applied,
    /// A newer fetch was already applied, or the workflow changed.
    Discarded,
}

/// State of the workflow canvas.
#[derive(Debug)]
pub struct WorkflowCanvas<G> {
    gateway: G,
    engine: StageGraphEngine,
    on_select: SelectHandler,
    workflow_id: Option<WorkflowId>,
    steps: Vec<StepRecord>,
    selection: Option<StepId>,
    graph: RenderableGraph,
    issued: u64,
    applied: u64,
}

impl<G: StepGateway> WorkflowCanvas<G> {
    /// Creates an empty canvas with no workflow selected.
    pub fn new(gateway: G, engine: StageGraphEngine, on_select: SelectHandler) -> Self {
        Self {
            gateway,
            engine,
            on_select,
            workflow_id: None,
            steps: Vec::new(),
            selection: None,
            graph: RenderableGraph::default(),
            issued: 0,
            applied: 0,
        }
    }

    /// Returns the gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Returns the current workflow.
    pub fn workflow_id(&self) -> Option<WorkflowId> {
        self.workflow_id
    }

    /// Returns the steps of the last applied load.
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Returns the selected step.
    pub fn selection(&self) -> Option<&StepId> {
        self.selection.as_ref()
    }

    /// Returns the rendered graph.
    pub fn graph(&self) -> &RenderableGraph {
        &self.graph
    }

    /// Returns the step number for appending to a stage.
    pub fn next_step_number(&self, sequence_group: i64) -> i64 {
        stage::next_step_number(&self.steps, sequence_group)
    }

    /// Returns the group key for appending a new stage.
    pub fn next_sequence_group(&self) -> i64 {
        stage::next_sequence_group(&self.steps)
    }

    /// Switches to another workflow and loads its steps.
    ///
    /// The selection and the previous workflow's graph are dropped first.
    pub async fn switch_workflow(&mut self, workflow_id: WorkflowId) -> EngineResult<()> {
        tracing::debug!(
            target: TRACING_TARGET,
            workflow_id = %workflow_id,
            "Switching workflow"
        );

        self.workflow_id = Some(workflow_id);
        self.selection = None;
        self.steps.clear();
        self.rerender();
        self.reload().await
    }

    /// Fetches the current workflow's steps and re-renders.
    ///
    /// On failure the previously rendered graph stays in place.
    pub async fn reload(&mut self) -> EngineResult<()> {
        let ticket = self.begin_load()?;
        let result = self.gateway.list_steps(ticket.workflow_id).await;
        self.finish_load(ticket, result).map(|_| ())
    }

    /// Issues a ticket for a step fetch of the current workflow.
    pub fn begin_load(&mut self) -> EngineResult<LoadTicket> {
        let workflow_id = self.workflow_id.ok_or(EngineError::NoWorkflow)?;
        self.issued += 1;
        Ok(LoadTicket {
            workflow_id,
            sequence: self.issued,
        })
    }

    /// Applies the result of a fetch started with [`begin_load`].
    ///
    /// Results for another workflow, or older than an already applied fetch,
    /// are discarded whether they succeeded or not. A failed current fetch
    /// keeps the graph and returns the error.
    ///
    /// [`begin_load`]: Self::begin_load
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: EngineResult<Vec<StepRecord>>,
    ) -> EngineResult<LoadOutcome> {
        if self.workflow_id != Some(ticket.workflow_id) || ticket.sequence <= self.applied {
            tracing::debug!(
                target: TRACING_TARGET,
                workflow_id = %ticket.workflow_id,
                sequence = ticket.sequence,
                applied = self.applied,
                failed = result.is_err(),
                "Discarding stale step load"
            );
            return Ok(LoadOutcome::Discarded);
        }

        let steps = match result {
            Ok(steps) => steps,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    workflow_id = %ticket.workflow_id,
                    error = %error,
                    "Failed to load steps, keeping previous graph"
                );
                return Err(error);
            }
        };

        self.applied = ticket.sequence;
        self.steps = steps;
        let selection_removed = self
            .selection
            .as_ref()
            .is_some_and(|selected| !self.steps.iter().any(|step| &step.id == selected));
        if selection_removed {
            self.selection = None;
        }
        self.rerender();

        Ok(LoadOutcome::Applied)
    }

    /// Creates a step in the current workflow and reloads.
    pub async fn create_step(&mut self, step: NewStep) -> EngineResult<StepRecord> {
        let workflow_id = self.workflow_id.ok_or(EngineError::NoWorkflow)?;
        let created = self.gateway.create_step(workflow_id, step).await?;
        self.reload().await?;
        Ok(created)
    }

    /// Updates a step in the current workflow and reloads.
    pub async fn update_step(
        &mut self,
        step_id: &StepId,
        patch: StepPatch,
    ) -> EngineResult<StepRecord> {
        let workflow_id = self.workflow_id.ok_or(EngineError::NoWorkflow)?;
        let updated = self
            .gateway
            .update_step(workflow_id, step_id, patch)
            .await?;
        self.reload().await?;
        Ok(updated)
    }

    /// Deletes a step from the current workflow and reloads.
    pub async fn delete_step(&mut self, step_id: &StepId) -> EngineResult<()> {
        let workflow_id = self.workflow_id.ok_or(EngineError::NoWorkflow)?;
        self.gateway.delete_step(workflow_id, step_id).await?;
        if self.selection.as_ref() == Some(step_id) {
            self.selection = None;
        }
        self.reload().await
    }

    /// Marks a step as selected and re-renders.
    ///
    /// Returns `false` and leaves the selection alone when the step is not
    /// part of the loaded workflow.
    pub fn select(&mut self, step_id: &StepId) -> bool {
        if !self.steps.iter().any(|step| &step.id == step_id) {
            return false;
        }

        self.selection = Some(step_id.clone());
        self.rerender();
        true
    }

    /// Clears the selection and re-renders.
    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.rerender();
        }
    }

    fn rerender(&mut self) {
        self.graph = self.engine.render(
            &self.steps,
            self.selection.as_ref(),
            self.on_select.clone(),
        );
    }
}
