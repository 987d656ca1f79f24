//! Command implementations.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::Context;
use flowstage_engine::prelude::*;
use petgraph::dot::{Config, Dot};
use serde::Deserialize;

use crate::TRACING_TARGET_COMMAND;
use crate::config::{InputArgs, OutputFormat, RenderArgs};

/// Accepted shapes of the input document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StepsDocument {
    /// A bare array of step records.
    Steps(Vec<StepRecord>),
    /// An object carrying the steps, e.g. a workflow export.
    Wrapped { steps: Vec<StepRecord> },
}

impl StepsDocument {
    fn into_steps(self) -> Vec<StepRecord> {
        match self {
            Self::Steps(steps) | Self::Wrapped { steps } => steps,
        }
    }
}

/// Reads step records from a file or stdin.
pub fn read_steps(input: &InputArgs) -> anyhow::Result<Vec<StepRecord>> {
    let content = match &input.input {
        Some(path) => read_file(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read steps from stdin")?;
            buffer
        }
    };

    parse_steps(&content)
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parses step records from a JSON document.
pub fn parse_steps(content: &str) -> anyhow::Result<Vec<StepRecord>> {
    let document: StepsDocument =
        serde_json::from_str(content).context("input is not a list of step records")?;
    let steps = document.into_steps();

    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        step_count = steps.len(),
        "Parsed step records"
    );

    Ok(steps)
}

/// Renders the graph through a canvas backed by the in-memory gateway.
pub async fn render(
    engine: StageGraphEngine,
    steps: Vec<StepRecord>,
    args: &RenderArgs,
) -> anyhow::Result<String> {
    let workflow_id = WorkflowId::new();
    let gateway = MemoryGateway::with_steps(workflow_id, steps);
    let mut canvas = WorkflowCanvas::new(gateway, engine, SelectHandler::noop());
    canvas
        .switch_workflow(workflow_id)
        .await
        .context("failed to load steps")?;

    if let Some(selected) = &args.selected {
        let step_id = StepId::new(selected.as_str());
        if !canvas.select(&step_id) {
            tracing::warn!(
                target: TRACING_TARGET_COMMAND,
                step_id = %step_id,
                "Selected step does not exist"
            );
        }
    }

    format_graph(canvas.graph(), args.format, args.pretty)
}

/// Formats a renderable graph.
pub fn format_graph(
    graph: &RenderableGraph,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    let output = match format {
        OutputFormat::Json if pretty => serde_json::to_string_pretty(graph)?,
        OutputFormat::Json => serde_json::to_string(graph)?,
        OutputFormat::Dot => {
            let digraph = graph.to_digraph();
            Dot::with_config(&digraph, &[Config::EdgeNoLabel]).to_string()
        }
    };
    Ok(output)
}

/// Formats a one-line-per-stage summary.
pub fn format_stages(stages: &[Stage]) -> String {
    stages
        .iter()
        .enumerate()
        .map(|(index, stage)| {
            let steps: Vec<String> = stage
                .steps
                .iter()
                .map(|step| match step.step_name.as_str() {
                    "" => format!("{} ({})", step.id, step.step_type()),
                    name => format!("{} ({}, {name})", step.id, step.step_type()),
                })
                .collect();
            let mode = match (stage.fans_out(), stage.len()) {
                (true, _) => "parallel",
                (false, 1) => "single",
                (false, _) => "stacked",
            };
            format!(
                "stage {index} [group {}, {mode}]: {}",
                stage.group_key,
                steps.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputArgs;

    const STEPS: &str = r#"[
        { "id": "a", "step_type": "approval", "sequence_group": 1, "step_number": 1, "step_name": "Sign-off" },
        { "id": "b", "step_type": "notification", "sequence_group": "2", "step_number": 1, "is_parallel": true },
        { "id": "c", "step_type": "action", "sequence_group": 2, "step_number": 2, "is_parallel": true }
    ]"#;

    fn render_args(format: OutputFormat, selected: Option<&str>) -> RenderArgs {
        RenderArgs {
            input: InputArgs { input: None },
            selected: selected.map(str::to_owned),
            format,
            pretty: false,
        }
    }

    #[test]
    fn test_parse_steps_shapes() {
        assert_eq!(parse_steps(STEPS).expect("parse failed").len(), 3);

        let wrapped = format!(r#"{{ "name": "Purchase", "steps": {STEPS} }}"#);
        assert_eq!(parse_steps(&wrapped).expect("parse failed").len(), 3);

        assert!(parse_steps(r#"{ "nodes": [] }"#).is_err());

        let loose = parse_steps(r#"[{ "id": "z", "step_name": null, "sequence_group": "2" }]"#)
            .expect("parse failed");
        assert_eq!(loose[0].step_type(), StepType::Action);
        assert_eq!(loose[0].sequence_group, 2);
    }

    #[tokio::test]
    async fn test_render_json() {
        let steps = parse_steps(STEPS).expect("parse failed");
        let output = render(
            StageGraphEngine::default(),
            steps,
            &render_args(OutputFormat::Json, Some("b")),
        )
        .await
        .expect("render failed");

        let value: serde_json::Value = serde_json::from_str(&output).expect("invalid json");
        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["edges"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["nodes"][1]["selected"], true);
    }

    #[tokio::test]
    async fn test_render_dot() {
        let steps = parse_steps(STEPS).expect("parse failed");
        let output = render(
            StageGraphEngine::default(),
            steps,
            &render_args(OutputFormat::Dot, None),
        )
        .await
        .expect("render failed");

        assert!(output.starts_with("digraph {"));
        assert!(output.contains("0 -> 1"));
        assert!(output.contains("0 -> 2"));
    }

    #[test]
    fn test_format_stages_empty_and_stacked() {
        assert_eq!(format_stages(&[]), "");

        let steps = parse_steps(
            r#"[
                { "id": "x", "step_type": "delay", "sequence_group": 4, "step_number": 1 },
                { "id": "y", "step_type": "delay", "sequence_group": 4, "step_number": 2 }
            ]"#,
        )
        .expect("parse failed");
        assert_eq!(
            format_stages(&group(steps)),
            "stage 0 [group 4, stacked]: x (delay), y (delay)"
        );
    }

    #[test]
    fn test_format_stages() {
        let stages = group(parse_steps(STEPS).expect("parse failed"));
        let summary = format_stages(&stages);
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(
            lines,
            [
                "stage 0 [group 1, single]: a (approval, Sign-off)",
                "stage 1 [group 2, parallel]: b (notification), c (action)",
            ]
        );
    }
}
