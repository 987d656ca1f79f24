#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod canvas;
pub mod edge;
mod engine;
mod error;
pub mod gateway;
pub mod layout;
pub mod present;
pub mod stage;
pub mod step;
pub mod workflow;

#[doc(hidden)]
pub mod prelude;

pub use canvas::{LoadOutcome, LoadTicket, WorkflowCanvas};
pub use engine::StageGraphEngine;
pub use error::{BoxedError, EngineError, EngineResult};
pub use gateway::{MemoryGateway, StepGateway};

/// Tracing target for engine operations.
pub const TRACING_TARGET: &str = "flowstage_engine";
