//! Data for creating a step.

use super::{StepId, StepKind, StepRecord};

/// Data for creating a new step.
///
/// The persistence gateway assigns the ID, so a new step has none yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStep {
    /// Display label.
    pub step_name: String,
    /// Behavioral payload.
    pub kind: StepKind,
    /// Position within the stage.
    pub step_number: i64,
    /// Stage the step belongs to.
    pub sequence_group: i64,
    /// Whether the step is laid out beside its stage siblings.
    pub is_parallel: bool,
    /// Whether the step must complete for the workflow to proceed.
    pub is_required: bool,
    /// Whether the step escalates when left pending.
    pub escalation_enabled: bool,
    /// Hours before escalation kicks in.
    pub escalation_after_hours: Option<u32>,
}

impl NewStep {
    /// Creates a required, non-parallel step at the given stage and position.
    pub fn new(kind: impl Into<StepKind>, sequence_group: i64, step_number: i64) -> Self {
        Self {
            step_name: String::new(),
            kind: kind.into(),
            step_number,
            sequence_group,
            is_parallel: false,
            is_required: true,
            escalation_enabled: false,
            escalation_after_hours: None,
        }
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_step_name(mut self, step_name: impl Into<String>) -> Self {
        self.step_name = step_name.into();
        self
    }

    /// Sets the parallel flag.
    #[must_use]
    pub fn with_parallel(mut self, is_parallel: bool) -> Self {
        self.is_parallel = is_parallel;
        self
    }

    /// Turns the data into a record with the assigned ID.
    pub fn into_record(self, id: StepId) -> StepRecord {
        StepRecord {
            id,
            step_name: self.step_name,
            kind: self.kind,
            step_number: self.step_number,
            sequence_group: self.sequence_group,
            is_parallel: self.is_parallel,
            is_required: self.is_required,
            escalation_enabled: self.escalation_enabled,
            escalation_after_hours: self.escalation_after_hours,
        }
    }
}
