#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod render;

use std::io::{self, Write};
use std::process;

use anyhow::Context;
use flowstage_engine::StageGraphEngine;
use flowstage_engine::stage::group;

use crate::config::{Cli, Command};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "flowstage_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "flowstage_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "flowstage_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            error = %error,
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();

    let options = cli.layout.to_options()?;
    let engine = StageGraphEngine::new(options).context("failed to create engine")?;

    let output = match &cli.command {
        Command::Render(args) => {
            let steps = render::read_steps(&args.input)?;
            render::render(engine, steps, args).await?
        }
        Command::Stages(input) => {
            let steps = render::read_steps(input)?;
            render::format_stages(&group(steps))
        }
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", output.trim_end()).context("failed to write output")?;

    Ok(())
}
