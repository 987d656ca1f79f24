//! Edge synthesis between consecutive stages.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;
use crate::step::StepId;

/// Tracing target for edge synthesis.
const TRACING_TARGET: &str = "flowstage_engine::edge";

/// A directed precedence edge between two steps.
///
/// Edges are derived on every render and never persisted. Their identity is
/// the ordered pair of endpoint IDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Edge identifier, `"<source>-<target>"`.
    pub id: String,
    /// Step that must complete first.
    pub source: StepId,
    /// Step that waits for `source`.
    pub target: StepId,
    /// Always `true`; drawn with an arrowhead.
    pub directed: bool,
}

impl GraphEdge {
    /// Creates a directed edge between two steps.
    pub fn new(source: StepId, target: StepId) -> Self {
        Self {
            id: format!("{source}-{target}"),
            source,
            target,
            directed: true,
        }
    }
}

/// Connects every step of each stage to every step of the next stage.
///
/// No edges are emitted inside a stage, before the first stage or after the
/// last one. Edges come out in stage order, then source order, then target
/// order.
pub fn synthesize(stages: &[Stage]) -> Vec<GraphEdge> {
    let capacity = stages.windows(2).map(|w| w[0].len() * w[1].len()).sum();
    let mut edges = Vec::with_capacity(capacity);

    for pair in stages.windows(2) {
        let [from, to] = pair else { continue };
        for source in &from.steps {
            for target in &to.steps {
                edges.push(GraphEdge::new(source.id.clone(), target.id.clone()));
            }
        }
    }

    tracing::trace!(
        target: TRACING_TARGET,
        edge_count = edges.len(),
        "Synthesized stage edges"
    );

    edges
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::stage::group;
    use crate::step::{StepKind, StepRecord};

    fn step(id: &str, sequence_group: i64, step_number: i64) -> StepRecord {
        StepRecord::builder()
            .with_id(id)
            .with_kind(StepKind::Notification)
            .with_sequence_group(sequence_group)
            .with_step_number(step_number)
            .build()
            .expect("builder failed")
    }

    fn pairs(edges: &[GraphEdge]) -> Vec<(&str, &str)> {
        edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect()
    }

    #[test]
    fn test_synthesize_empty_and_single_stage() {
        assert!(synthesize(&[]).is_empty());

        let stages = group(vec![step("a", 1, 1), step("b", 1, 2)]);
        assert!(synthesize(&stages).is_empty());
    }

    #[test]
    fn test_synthesize_example_scenario() {
        let stages = group(vec![step("A", 1, 1), step("B", 2, 1), step("C", 2, 2)]);
        let edges = synthesize(&stages);

        assert_eq!(pairs(&edges), [("A", "B"), ("A", "C")]);
        assert_eq!(edges[0].id, "A-B");
        assert!(edges.iter().all(|e| e.directed));
    }

    #[test]
    fn test_synthesize_full_bipartite_join() {
        let stages = group(vec![
            step("a1", 1, 1),
            step("a2", 1, 2),
            step("b1", 2, 1),
            step("b2", 2, 2),
            step("b3", 2, 3),
        ]);
        let edges = synthesize(&stages);

        assert_eq!(edges.len(), 6);
        let distinct: HashSet<_> = pairs(&edges).into_iter().collect();
        assert_eq!(distinct.len(), 6);

        let stage_of = |id: &str| if id.starts_with('a') { 1 } else { 2 };
        assert!(
            edges
                .iter()
                .all(|e| stage_of(e.source.as_str()) != stage_of(e.target.as_str()))
        );
    }

    #[test]
    fn test_synthesize_only_adjacent_stages() {
        let stages = group(vec![step("a", 1, 1), step("b", 4, 1), step("c", 9, 1)]);
        let edges = synthesize(&stages);

        assert_eq!(pairs(&edges), [("a", "b"), ("b", "c")]);
    }
}
