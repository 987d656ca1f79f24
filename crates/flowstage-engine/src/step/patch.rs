//! Partial updates of step records.

use super::{StepKind, StepRecord};

/// Partial update of a [`StepRecord`].
///
/// Every field is optional; `None` leaves the stored value untouched. The
/// step ID is not part of a patch and can never change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepPatch {
    /// New display label.
    pub step_name: Option<String>,
    /// New behavioral payload (also changes `step_type`).
    pub kind: Option<StepKind>,
    /// New position within the stage.
    pub step_number: Option<i64>,
    /// New stage.
    pub sequence_group: Option<i64>,
    /// New parallel flag.
    pub is_parallel: Option<bool>,
    /// New required flag.
    pub is_required: Option<bool>,
    /// New escalation flag.
    pub escalation_enabled: Option<bool>,
    /// New escalation delay; `Some(None)` clears it.
    pub escalation_after_hours: Option<Option<u32>>,
}

impl StepPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the step to another stage and position.
    #[must_use]
    pub fn with_placement(mut self, sequence_group: i64, step_number: i64) -> Self {
        self.sequence_group = Some(sequence_group);
        self.step_number = Some(step_number);
        self
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_step_name(mut self, step_name: impl Into<String>) -> Self {
        self.step_name = Some(step_name.into());
        self
    }

    /// Sets the parallel flag.
    #[must_use]
    pub fn with_parallel(mut self, is_parallel: bool) -> Self {
        self.is_parallel = Some(is_parallel);
        self
    }

    /// Returns whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies the patch onto a record in place.
    pub fn apply(self, step: &mut StepRecord) {
        if let Some(step_name) = self.step_name {
            step.step_name = step_name;
        }
        if let Some(kind) = self.kind {
            step.kind = kind;
        }
        if let Some(step_number) = self.step_number {
            step.step_number = step_number;
        }
        if let Some(sequence_group) = self.sequence_group {
            step.sequence_group = sequence_group;
        }
        if let Some(is_parallel) = self.is_parallel {
            step.is_parallel = is_parallel;
        }
        if let Some(is_required) = self.is_required {
            step.is_required = is_required;
        }
        if let Some(escalation_enabled) = self.escalation_enabled {
            step.escalation_enabled = escalation_enabled;
        }
        if let Some(escalation_after_hours) = self.escalation_after_hours {
            step.escalation_after_hours = escalation_after_hours;
        }
    }
}
