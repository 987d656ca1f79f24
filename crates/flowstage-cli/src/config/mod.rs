//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── layout: LayoutConfig   # Spacing, orientation, secondary base
//! └── command: Command
//!     ├── render             # Renderable graph as JSON or DOT
//!     └── stages             # Stage summary
//! ```
//!
//! Layout options can be provided via CLI arguments or environment variables.

mod layout;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
pub use layout::LayoutConfig;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::TRACING_TARGET_STARTUP;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "flowstage")]
#[command(about = "Render workflow steps as a staged graph")]
#[command(version)]
pub struct Cli {
    /// Layout configuration.
    #[clap(flatten)]
    pub layout: LayoutConfig,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the renderable graph (nodes and edges).
    Render(RenderArgs),
    /// Print the stages the steps are grouped into.
    Stages(InputArgs),
}

/// Where step records are read from.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct InputArgs {
    /// JSON file with step records; reads stdin when omitted.
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

/// Arguments of the `render` command.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct RenderArgs {
    /// Input source.
    #[clap(flatten)]
    pub input: InputArgs,

    /// Step to mark as selected.
    #[arg(long)]
    pub selected: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Output format of the `render` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Nodes and edges as JSON.
    Json,
    /// Graphviz DOT.
    Dot,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so that stdout only carries command output.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Logs configuration at debug level.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            features = ?Self::enabled_features(),
            "Build information"
        );
        self.layout.log();
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
