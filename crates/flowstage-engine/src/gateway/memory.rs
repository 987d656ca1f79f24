//! In-process step gateway.

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::StepGateway;
use crate::error::{EngineError, EngineResult};
use crate::step::{NewStep, StepId, StepPatch, StepRecord};
use crate::workflow::WorkflowId;

/// Tracing target for the in-memory gateway.
const TRACING_TARGET: &str = "flowstage_engine::gateway::memory";

/// Step gateway backed by an in-process map.
///
/// Steps are kept in creation order and receive UUID v7 IDs. Listing an
/// unknown workflow yields no steps.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    workflows: RwLock<HashMap<WorkflowId, Vec<StepRecord>>>,
}

impl MemoryGateway {
    /// Creates an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway holding existing records for one workflow.
    pub fn with_steps(workflow_id: WorkflowId, steps: Vec<StepRecord>) -> Self {
        Self {
            workflows: RwLock::new(HashMap::from([(workflow_id, steps)])),
        }
    }

    fn not_found(workflow_id: WorkflowId, step_id: &StepId) -> EngineError {
        EngineError::StepNotFound {
            workflow_id,
            step_id: step_id.clone(),
        }
    }
}

#[async_trait::async_trait]
impl StepGateway for MemoryGateway {
    async fn list_steps(&self, workflow_id: WorkflowId) -> EngineResult<Vec<StepRecord>> {
        let workflows = self.workflows.read().await;
        Ok(workflows.get(&workflow_id).cloned().unwrap_or_default())
    }

    async fn create_step(
        &self,
        workflow_id: WorkflowId,
        step: NewStep,
    ) -> EngineResult<StepRecord> {
        let record = step.into_record(StepId::new(Uuid::now_v7().to_string()));

        let mut workflows = self.workflows.write().await;
        workflows.entry(workflow_id).or_default().push(record.clone());

        tracing::trace!(
            target: TRACING_TARGET,
            workflow_id = %workflow_id,
            step_id = %record.id,
            "Step created"
        );

        Ok(record)
    }

    async fn update_step(
        &self,
        workflow_id: WorkflowId,
        step_id: &StepId,
        patch: StepPatch,
    ) -> EngineResult<StepRecord> {
        let mut workflows = self.workflows.write().await;
        let record = workflows
            .get_mut(&workflow_id)
            .and_then(|steps| steps.iter_mut().find(|step| &step.id == step_id))
            .ok_or_else(|| Self::not_found(workflow_id, step_id))?;

        patch.apply(record);
        Ok(record.clone())
    }

    async fn delete_step(&self, workflow_id: WorkflowId, step_id: &StepId) -> EngineResult<()> {
        let mut workflows = self.workflows.write().await;
        let steps = workflows
            .get_mut(&workflow_id)
            .ok_or_else(|| Self::not_found(workflow_id, step_id))?;

        let before = steps.len();
        steps.retain(|step| &step.id != step_id);
        if steps.len() == before {
            return Err(Self::not_found(workflow_id, step_id));
        }

        tracing::trace!(
            target: TRACING_TARGET,
            workflow_id = %workflow_id,
            step_id = %step_id,
            "Step deleted"
        );

        Ok(())
    }
}
