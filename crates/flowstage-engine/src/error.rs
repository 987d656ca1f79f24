//! Engine error types.

use thiserror::Error;

use crate::step::StepId;
use crate::workflow::WorkflowId;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur around the graph pipeline.
///
/// The pipeline itself (grouping, layout, edge synthesis, presentation) is
/// total and never fails. Errors only come from configuration and from the
/// persistence gateway the canvas talks to.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A persistence gateway call failed.
    #[error("gateway {operation} failed: {source}")]
    Gateway {
        /// Name of the gateway operation.
        operation: &'static str,
        /// Underlying gateway error.
        #[source]
        source: BoxedError,
    },

    /// The referenced step does not exist in the workflow.
    #[error("step {step_id} not found in workflow {workflow_id}")]
    StepNotFound {
        /// ID of the workflow that was searched.
        workflow_id: WorkflowId,
        /// ID of the missing step.
        step_id: StepId,
    },

    /// No workflow is loaded on the canvas.
    #[error("no workflow selected")]
    NoWorkflow,

    /// Layout options are invalid.
    #[error("invalid layout options: {0}")]
    InvalidLayout(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Wraps an arbitrary error raised by a gateway operation.
    pub fn gateway(operation: &'static str, source: impl Into<BoxedError>) -> Self {
        Self::Gateway {
            operation,
            source: source.into(),
        }
    }

    /// Returns whether this error originated in the persistence gateway.
    pub const fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway { .. })
    }
}
