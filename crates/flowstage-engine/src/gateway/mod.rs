//! Persistence gateway contract.
//!
//! The engine never stores steps itself. A [`StepGateway`] is the sole source
//! of truth for step records and the only place IDs are generated.

mod memory;

pub use memory::MemoryGateway;

use crate::error::EngineResult;
use crate::step::{NewStep, StepId, StepPatch, StepRecord};
use crate::workflow::WorkflowId;

/// Source and sink of a workflow's step records.
///
/// Implementations wrap their own failures with
/// [`EngineError::gateway`](crate::EngineError::gateway).
#[async_trait::async_trait]
pub trait StepGateway: Send + Sync {
    /// Lists the steps of a workflow in creation order.
    async fn list_steps(&self, workflow_id: WorkflowId) -> EngineResult<Vec<StepRecord>>;

    /// Creates a step and returns the stored record with its new ID.
    async fn create_step(&self, workflow_id: WorkflowId, step: NewStep)
    -> EngineResult<StepRecord>;

    /// Applies a partial update and returns the stored record.
    async fn update_step(
        &self,
        workflow_id: WorkflowId,
        step_id: &StepId,
        patch: StepPatch,
    ) -> EngineResult<StepRecord>;

    /// Deletes a step.
    async fn delete_step(&self, workflow_id: WorkflowId, step_id: &StepId) -> EngineResult<()>;
}
