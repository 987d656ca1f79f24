//! Layout engine.
//!
//! Assigns a [`Position`] to every step. Stages advance one primary spacing
//! unit per stage index. Inside a stage that [fans out](Stage::fans_out), the
//! k-th step sits `k` secondary units past the stage's base; every other
//! stage stacks its steps on the base and records the stacking order in the
//! [`Placement`] instead.
//!
//! Where each stage starts on the secondary axis is set by [`SecondaryBase`].
//! The default, [`SecondaryBase::Aligned`], starts every stage at the origin,
//! so steps of adjacent stages may share secondary offsets. Disjoint
//! secondary bands per stage require [`SecondaryBase::Cumulative`], which
//! offsets stage `i` by `max(1, len)` units for every earlier stage.
//!
//! The computation is deterministic: the same stages and options always
//! produce bit-identical positions.

mod options;
mod position;

use std::collections::BTreeMap;

use serde::Serialize;

pub use options::{
    AxisSpacing, DEFAULT_PRIMARY_SPACING, DEFAULT_SECONDARY_SPACING, LayoutOptions,
    LayoutOptionsBuilder, LayoutOptionsBuilderError, Orientation, SecondaryBase,
};
pub use position::Position;

use crate::stage::Stage;
use crate::step::StepId;

/// Tracing target for layout operations.
const TRACING_TARGET: &str = "flowstage_engine::layout";

/// Computed placement of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    /// Position on the drawing surface.
    pub position: Position,
    /// Index of the stage the step belongs to.
    pub stage_index: usize,
    /// Order of the step among steps sharing this position.
    pub stack_index: usize,
    /// Number of steps sharing this position.
    pub stack_size: usize,
}

impl Placement {
    /// Returns whether other steps are drawn at the same position.
    #[inline]
    pub const fn is_stacked(&self) -> bool {
        self.stack_size > 1
    }
}

/// Mapping from step ID to placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Layout {
    placements: BTreeMap<StepId, Placement>,
}

impl Layout {
    /// Returns the placement of a step.
    pub fn get(&self, id: &StepId) -> Option<&Placement> {
        self.placements.get(id)
    }

    /// Returns the position of a step.
    pub fn position(&self, id: &StepId) -> Option<Position> {
        self.placements.get(id).map(|placement| placement.position)
    }

    /// Returns the number of placed steps.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Returns whether no step was placed.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Returns placements ordered by step ID.
    pub fn iter(&self) -> impl Iterator<Item = (&StepId, &Placement)> {
        self.placements.iter()
    }
}

/// Computes placements for every step of the given stages.
pub fn layout(stages: &[Stage], options: &LayoutOptions) -> Layout {
    let spacing = options.spacing;
    let mut placements = BTreeMap::new();
    // Secondary units consumed by the stages laid out so far.
    let mut consumed: usize = 0;

    for (stage_index, stage) in stages.iter().enumerate() {
        let primary = stage_index as f32 * spacing.primary;
        let base = match options.secondary_base {
            SecondaryBase::Aligned => 0.0,
            SecondaryBase::Cumulative => consumed as f32 * spacing.secondary,
        };
        let fans_out = stage.fans_out();
        let stack_size = if fans_out { 1 } else { stage.len() };

        for (k, step) in stage.steps.iter().enumerate() {
            let secondary = if fans_out {
                base + k as f32 * spacing.secondary
            } else {
                base
            };
            let position = options
                .orientation
                .place(primary, secondary)
                .offset(options.origin.x, options.origin.y);

            placements.insert(
                step.id.clone(),
                Placement {
                    position,
                    stage_index,
                    stack_index: if fans_out { 0 } else { k },
                    stack_size,
                },
            );
        }

        consumed += stage.len().max(1);
    }

    tracing::trace!(
        target: TRACING_TARGET,
        stage_count = stages.len(),
        node_count = placements.len(),
        "Computed layout"
    );

    Layout { placements }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::group;
    use crate::step::{StepKind, StepRecord};

    fn step(id: &str, sequence_group: i64, step_number: i64, is_parallel: bool) -> StepRecord {
        StepRecord::builder()
            .with_id(id)
            .with_kind(StepKind::Action)
            .with_sequence_group(sequence_group)
            .with_step_number(step_number)
            .with_is_parallel(is_parallel)
            .build()
            .expect("builder failed")
    }

    fn unit() -> LayoutOptions {
        LayoutOptions::with_spacing(AxisSpacing::UNIT)
    }

    fn at(layout: &Layout, id: &str) -> Position {
        layout.position(&StepId::from(id)).expect("step not placed")
    }

    #[test]
    fn test_layout_empty() {
        assert!(layout(&[], &LayoutOptions::default()).is_empty());
    }

    #[test]
    fn test_layout_example_scenario() {
        let stages = group(vec![
            step("A", 1, 1, false),
            step("B", 2, 1, true),
            step("C", 2, 2, true),
        ]);
        let layout = layout(&stages, &unit());

        assert_eq!(at(&layout, "A"), Position::new(0.0, 0.0));
        assert_eq!(at(&layout, "B"), Position::new(1.0, 0.0));
        assert_eq!(at(&layout, "C"), Position::new(1.0, 1.0));
    }

    #[test]
    fn test_layout_parallel_fan_out() {
        let stages = group(vec![
            step("c", 1, 3, true),
            step("a", 1, 1, true),
            step("b", 1, 2, true),
        ]);
        let options = LayoutOptions::with_spacing(AxisSpacing::new(300.0, 150.0));
        let layout = layout(&stages, &options);

        assert_eq!(at(&layout, "a").y, 0.0);
        assert_eq!(at(&layout, "b").y, 150.0);
        assert_eq!(at(&layout, "c").y, 300.0);
        assert!(layout.iter().all(|(_, p)| !p.is_stacked()));
    }

    #[test]
    fn test_layout_cumulative_base() {
        let stages = group(vec![
            step("a", 1, 1, false),
            step("b", 2, 1, true),
            step("c", 2, 2, true),
            step("d", 2, 3, false),
            step("e", 3, 1, false),
        ]);
        let options = LayoutOptions {
            secondary_base: SecondaryBase::Cumulative,
            ..unit()
        };
        let layout = layout(&stages, &options);

        // base(1) = 1, base(2) = 1 + 3
        assert_eq!(at(&layout, "a"), Position::new(0.0, 0.0));
        assert_eq!(at(&layout, "b"), Position::new(1.0, 1.0));
        assert_eq!(at(&layout, "c"), Position::new(1.0, 2.0));
        assert_eq!(at(&layout, "d"), Position::new(1.0, 3.0));
        assert_eq!(at(&layout, "e"), Position::new(2.0, 4.0));
    }

    #[test]
    fn test_secondary_bands_overlap_only_when_aligned() {
        let stages = group(vec![
            step("a", 1, 1, true),
            step("b", 1, 2, true),
            step("c", 2, 1, true),
            step("d", 2, 2, true),
        ]);
        let band = |layout: &Layout, ids: [&str; 2]| ids.map(|id| at(layout, id).y);

        let aligned = layout(&stages, &unit());
        assert_eq!(band(&aligned, ["a", "b"]), band(&aligned, ["c", "d"]));

        let options = LayoutOptions {
            secondary_base: SecondaryBase::Cumulative,
            ..unit()
        };
        let cumulative = layout(&stages, &options);
        let [_, last_of_first] = band(&cumulative, ["a", "b"]);
        let [first_of_second, _] = band(&cumulative, ["c", "d"]);
        assert!(last_of_first < first_of_second);
    }

    #[test]
    fn test_layout_stacks_non_parallel_siblings() {
        let stages = group(vec![step("a", 1, 1, false), step("b", 1, 2, false)]);
        let layout = layout(&stages, &unit());

        assert_eq!(at(&layout, "a"), at(&layout, "b"));
        let a = layout.get(&StepId::from("a")).expect("missing");
        let b = layout.get(&StepId::from("b")).expect("missing");
        assert_eq!((a.stack_index, a.stack_size), (0, 2));
        assert_eq!((b.stack_index, b.stack_size), (1, 2));
        assert!(b.is_stacked());
    }

    #[test]
    fn test_layout_stages_strictly_advance() {
        let stages = group(vec![
            step("a", 5, 1, true),
            step("b", 5, 2, true),
            step("c", 9, 1, false),
            step("d", 12, 1, true),
            step("e", 12, 2, false),
        ]);
        let layout = layout(&stages, &LayoutOptions::default());

        for (i, earlier) in stages.iter().enumerate() {
            for later in &stages[i + 1..] {
                for x in &earlier.steps {
                    for y in &later.steps {
                        assert!(at(&layout, x.id.as_str()).x < at(&layout, y.id.as_str()).x);
                    }
                }
            }
        }
    }

    #[test]
    fn test_layout_orientation_and_origin() {
        let stages = group(vec![
            step("a", 1, 1, false),
            step("b", 2, 1, true),
            step("c", 2, 2, true),
        ]);
        let options = LayoutOptions {
            orientation: Orientation::TopToBottom,
            origin: Position::new(10.0, 20.0),
            ..unit()
        };
        let layout = layout(&stages, &options);

        assert_eq!(at(&layout, "a"), Position::new(10.0, 20.0));
        assert_eq!(at(&layout, "b"), Position::new(10.0, 21.0));
        assert_eq!(at(&layout, "c"), Position::new(11.0, 21.0));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let stages = group(vec![
            step("a", 1, 1, false),
            step("b", 2, 1, true),
            step("c", 2, 2, true),
            step("d", 3, 1, false),
        ]);
        let options = LayoutOptions {
            secondary_base: SecondaryBase::Cumulative,
            ..LayoutOptions::default()
        };

        let first = layout(&stages, &options);
        let second = layout(&stages, &options);
        for ((id, p1), (_, p2)) in first.iter().zip(second.iter()) {
            assert_eq!(p1.position.x.to_bits(), p2.position.x.to_bits(), "{id}");
            assert_eq!(p1.position.y.to_bits(), p2.position.y.to_bits(), "{id}");
        }
    }
}
