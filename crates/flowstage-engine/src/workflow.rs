//! Workflow model.

use std::str::FromStr;

use derive_more::{Debug, Display, From, Into};
use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use uuid::Uuid;

/// Unique identifier for a workflow.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Debug, Display, From, Into)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[debug("{_0}")]
#[display("{_0}")]
#[serde(transparent)]
pub struct WorkflowId(Uuid);

impl WorkflowId {
    /// Creates a new random workflow ID.
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a workflow ID from an existing UUID.
    #[inline]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[inline]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for WorkflowId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for WorkflowId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// What a workflow is used for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, StrumDisplay, EnumIter, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WorkflowType {
    /// Collects sign-offs.
    #[default]
    Approval,
    /// Fans out notifications.
    Notification,
    /// Runs automated actions.
    Automation,
    /// Anything else.
    Custom,
}

/// A workflow owning an ordered set of steps.
///
/// Steps are not embedded here; they are listed through the
/// [`StepGateway`](crate::gateway::StepGateway) by workflow ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Workflow {
    /// Unique workflow identifier.
    pub id: WorkflowId,
    /// Display name.
    pub name: String,
    /// Description of the workflow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Workflow category.
    #[serde(default)]
    pub workflow_type: WorkflowType,
    /// Kind of entity the workflow applies to (e.g. "purchase_order").
    #[serde(default)]
    pub entity_type: String,
    /// Event that starts the workflow (e.g. "on_create").
    #[serde(default)]
    pub trigger_event: String,
    /// Whether the workflow is active.
    #[serde(default)]
    pub is_active: bool,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Workflow {
    /// Creates an inactive workflow with a fresh ID.
    pub fn new(name: impl Into<String>, workflow_type: WorkflowType) -> Self {
        Self {
            id: WorkflowId::new(),
            name: name.into(),
            description: None,
            workflow_type,
            entity_type: String::new(),
            trigger_event: String::new(),
            is_active: false,
            created_at: Some(Timestamp::now()),
            updated_at: None,
        }
    }
}
