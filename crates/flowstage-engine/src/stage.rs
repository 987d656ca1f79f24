//! Stage grouping.
//!
//! A [`Stage`] is a derived, non-persisted set of steps sharing one
//! `sequence_group`. Stages are ordered by ascending group key and steps
//! inside a stage by ascending `step_number`.

use serde::Serialize;

use crate::step::StepRecord;

/// Tracing target for stage grouping.
const TRACING_TARGET: &str = "flowstage_engine::stage";

/// Steps sharing one `sequence_group`.
///
/// A stage is only ever built from existing steps, so it is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    /// The shared `sequence_group` value.
    pub group_key: i64,
    /// Steps ordered by `step_number`, ties kept in input order.
    pub steps: Vec<StepRecord>,
}

impl Stage {
    /// Returns the number of steps in the stage.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns whether the stage has no steps.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns whether the stage fans out its steps side by side.
    ///
    /// That is the case when it holds more than one step and at least one of
    /// them is flagged parallel.
    pub fn fans_out(&self) -> bool {
        self.steps.len() > 1 && self.steps.iter().any(|step| step.is_parallel)
    }
}

/// Partitions steps into stages.
///
/// Steps are stable-sorted by `(sequence_group, step_number)`, so steps that
/// tie on both keys keep their relative input order. Gaps in the group
/// numbering are skipped. An empty input yields no stages.
pub fn group(steps: impl IntoIterator<Item = StepRecord>) -> Vec<Stage> {
    let mut sorted: Vec<StepRecord> = steps.into_iter().collect();
    sorted.sort_by_key(StepRecord::ordering_key);

    let mut stages: Vec<Stage> = Vec::new();
    for step in sorted {
        match stages.last_mut() {
            Some(stage) if stage.group_key == step.sequence_group => stage.steps.push(step),
            _ => stages.push(Stage {
                group_key: step.sequence_group,
                steps: vec![step],
            }),
        }
    }

    tracing::trace!(
        target: TRACING_TARGET,
        stage_count = stages.len(),
        "Grouped steps into stages"
    );

    stages
}

/// Returns the step number to use when appending to `sequence_group`.
///
/// That is one past the highest number in the group, or `1` when the group
/// has no steps yet.
pub fn next_step_number<'a>(
    steps: impl IntoIterator<Item = &'a StepRecord>,
    sequence_group: i64,
) -> i64 {
    steps
        .into_iter()
        .filter(|step| step.sequence_group == sequence_group)
        .map(|step| step.step_number)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Returns the group key to use when appending a new stage.
///
/// That is one past the highest group key, or `1` when there are no steps.
pub fn next_sequence_group<'a>(steps: impl IntoIterator<Item = &'a StepRecord>) -> i64 {
    steps
        .into_iter()
        .map(|step| step.sequence_group)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{StepId, StepKind};

    fn step(id: &str, sequence_group: i64, step_number: i64) -> StepRecord {
        StepRecord::builder()
            .with_id(id)
            .with_kind(StepKind::Action)
            .with_sequence_group(sequence_group)
            .with_step_number(step_number)
            .build()
            .expect("builder failed")
    }

    fn ids(stage: &Stage) -> Vec<&str> {
        stage.steps.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_group_empty() {
        assert!(group(Vec::new()).is_empty());
    }

    #[test]
    fn test_group_orders_stages_and_steps() {
        let stages = group(vec![
            step("c", 2, 2),
            step("a", 1, 1),
            step("b", 2, 1),
        ]);

        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].group_key, 1);
        assert_eq!(ids(&stages[0]), ["a"]);
        assert_eq!(stages[1].group_key, 2);
        assert_eq!(ids(&stages[1]), ["b", "c"]);
    }

    #[test]
    fn test_group_skips_gaps_and_negative_keys() {
        let stages = group(vec![step("x", 10, 1), step("y", -3, 1), step("z", 4, 1)]);
        let keys: Vec<i64> = stages.iter().map(|s| s.group_key).collect();
        assert_eq!(keys, [-3, 4, 10]);
    }

    #[test]
    fn test_group_ties_keep_input_order() {
        let stages = group(vec![step("second", 1, 1), step("first", 1, 1), step("zero", 1, 0)]);
        assert_eq!(stages.len(), 1);
        assert_eq!(ids(&stages[0]), ["zero", "second", "first"]);
    }

    #[test]
    fn test_group_is_permutation_invariant() {
        let input = vec![
            step("a", 1, 1),
            step("b", 2, 1),
            step("c", 2, 2),
            step("d", 3, 5),
            step("e", 3, 1),
        ];
        let expected = group(input.clone());

        let mut reversed = input.clone();
        reversed.reverse();
        assert_eq!(group(reversed), expected);

        let mut rotated = input;
        rotated.rotate_left(2);
        assert_eq!(group(rotated), expected);
    }

    #[test]
    fn test_group_keeps_every_step_once() {
        let input = vec![step("a", 1, 1), step("b", 1, 2), step("c", 7, 1), step("d", 0, 0)];
        let stages = group(input.clone());

        let total: usize = stages.iter().map(Stage::len).sum();
        assert_eq!(total, input.len());

        let mut seen: Vec<StepId> = stages
            .iter()
            .flat_map(|s| s.steps.iter().map(|step| step.id.clone()))
            .collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), input.len());
        assert!(stages.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn test_fans_out() {
        let mut parallel = step("p", 1, 2);
        parallel.is_parallel = true;

        let stages = group(vec![step("a", 1, 1), parallel.clone(), step("solo", 2, 1)]);
        assert!(stages[0].fans_out());
        assert!(!stages[1].fans_out());

        let single = group(vec![parallel]);
        assert!(!single[0].fans_out());
    }

    #[test]
    fn test_next_numbers() {
        let steps = vec![step("a", 1, 1), step("b", 1, 4), step("c", 3, 2)];
        assert_eq!(next_step_number(&steps, 1), 5);
        assert_eq!(next_step_number(&steps, 2), 1);
        assert_eq!(next_sequence_group(&steps), 4);
        assert_eq!(next_sequence_group(&Vec::<StepRecord>::new()), 1);
    }
}
