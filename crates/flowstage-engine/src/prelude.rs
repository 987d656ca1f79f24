//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types for ergonomic imports:
//!
//! ```rust
//! use flowstage_engine::prelude::*;
//! ```

pub use crate::canvas::{LoadOutcome, WorkflowCanvas};
pub use crate::edge::{GraphEdge, synthesize};
pub use crate::engine::StageGraphEngine;
pub use crate::error::{EngineError, EngineResult};
pub use crate::gateway::{MemoryGateway, StepGateway};
pub use crate::layout::{
    AxisSpacing, Layout, LayoutOptions, Orientation, Placement, Position, SecondaryBase, layout,
};
pub use crate::present::{GraphNode, RenderableGraph, SelectHandler, present};
pub use crate::stage::{Stage, group, next_sequence_group, next_step_number};
pub use crate::step::{
    ApproverType, NewStep, StepId, StepKind, StepPatch, StepRecord, StepType, decode_steps,
};
pub use crate::workflow::{Workflow, WorkflowId, WorkflowType};
