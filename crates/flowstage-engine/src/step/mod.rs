//! Step record model.
//!
//! A [`StepRecord`] is one unit of work in a workflow. Its behavioral payload
//! is a [`StepKind`] tagged by `step_type`, so attributes such as the approver
//! type or the condition expression only exist on the variants they belong to.

mod lenient;
mod new_step;
mod patch;

use derive_builder::Builder;
use derive_more::{Debug, Display, From, Into};
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

use crate::error::EngineResult;

pub use new_step::NewStep;
pub use patch::StepPatch;

/// Opaque unique identifier of a step, assigned by the persistence gateway.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Debug, Display, From, Into)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[debug("{_0}")]
#[display("{_0}")]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    /// Creates a step ID from any string-like value.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for StepId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Discriminant of [`StepKind`], without the variant payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, StrumDisplay, EnumIter, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StepType {
    /// Someone has to sign off.
    Approval,
    /// Someone is informed.
    Notification,
    /// A boolean expression gates the flow.
    Condition,
    /// An automated action runs.
    Action,
    /// The flow waits.
    Delay,
}

impl StepType {
    /// Returns the icon name the drawing surface shows for this type.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Approval => "user-check",
            Self::Notification => "bell",
            Self::Condition => "git-branch",
            Self::Action => "zap",
            Self::Delay => "clock",
        }
    }
}

/// Who is asked to approve an approval step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, StrumDisplay, EnumIter, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApproverType {
    /// A specific user.
    #[default]
    User,
    /// Anyone holding a role.
    Role,
    /// Anyone in a department.
    Department,
    /// The requester's manager.
    Manager,
    /// Resolved by custom logic outside the engine.
    Custom,
}

/// Behavioral payload of a step, keyed by `step_type`.
///
/// Decoding never fails on the payload: a missing or unrecognized
/// `step_type` yields [`StepKind::Action`], and malformed attributes fall
/// back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "step_type", rename_all = "snake_case")]
pub enum StepKind {
    /// Approval step.
    Approval {
        /// Who approves.
        approver_type: ApproverType,
    },
    /// Notification step.
    Notification,
    /// Conditional step.
    Condition {
        /// Boolean expression, opaque to the engine.
        condition_expression: String,
    },
    /// Automated action step.
    Action,
    /// Delay step.
    Delay,
}

impl StepKind {
    /// Creates an approval payload.
    pub fn approval(approver_type: ApproverType) -> Self {
        Self::Approval { approver_type }
    }

    /// Creates a condition payload.
    pub fn condition(expression: impl Into<String>) -> Self {
        Self::Condition {
            condition_expression: expression.into(),
        }
    }

    /// Returns the discriminant of this payload.
    pub const fn step_type(&self) -> StepType {
        match self {
            Self::Approval { .. } => StepType::Approval,
            Self::Notification => StepType::Notification,
            Self::Condition { .. } => StepType::Condition,
            Self::Action => StepType::Action,
            Self::Delay => StepType::Delay,
        }
    }
}

/// Wire shape of [`StepKind`] before the tag is resolved.
#[derive(Deserialize)]
struct RawStepKind {
    #[serde(default, deserialize_with = "lenient::variant")]
    step_type: Option<StepType>,
    #[serde(default, deserialize_with = "lenient::variant_or_default")]
    approver_type: ApproverType,
    #[serde(default, deserialize_with = "lenient::text")]
    condition_expression: String,
}

impl<'de> Deserialize<'de> for StepKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawStepKind::deserialize(deserializer)?;
        Ok(match raw.step_type.unwrap_or(StepType::Action) {
            StepType::Approval => Self::approval(raw.approver_type),
            StepType::Condition => Self::condition(raw.condition_expression),
            step_type => Self::from(step_type),
        })
    }
}

impl From<StepType> for StepKind {
    /// Creates a payload with default attributes for the given type.
    fn from(step_type: StepType) -> Self {
        match step_type {
            StepType::Approval => Self::approval(ApproverType::default()),
            StepType::Notification => Self::Notification,
            StepType::Condition => Self::condition(String::new()),
            StepType::Action => Self::Action,
            StepType::Delay => Self::Delay,
        }
    }
}

/// One unit of work in a workflow.
///
/// Every attribute except `id` is decoded leniently: a record with a missing
/// or malformed `sequence_group` lands in group `0` and a null `step_name`
/// reads as empty, instead of the record being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[builder(
    name = "StepRecordBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with")
)]
pub struct StepRecord {
    /// Unique step identifier.
    pub id: StepId,
    /// Display label, possibly empty while the user is still typing.
    #[serde(default, deserialize_with = "lenient::text")]
    #[builder(default)]
    pub step_name: String,
    /// Behavioral payload tagged by `step_type`.
    #[serde(flatten)]
    pub kind: StepKind,
    /// Position within the stage.
    #[serde(default, deserialize_with = "lenient::ordering_key")]
    #[cfg_attr(feature = "schema", schemars(with = "i64"))]
    #[builder(default)]
    pub step_number: i64,
    /// Stage the step belongs to.
    #[serde(default, deserialize_with = "lenient::ordering_key")]
    #[cfg_attr(feature = "schema", schemars(with = "i64"))]
    #[builder(default)]
    pub sequence_group: i64,
    /// Whether the step is laid out beside its stage siblings.
    #[serde(default, deserialize_with = "lenient::flag")]
    #[cfg_attr(feature = "schema", schemars(with = "bool"))]
    #[builder(default)]
    pub is_parallel: bool,
    /// Whether the step must complete for the workflow to proceed.
    #[serde(default = "default_required", deserialize_with = "lenient::required_flag")]
    #[cfg_attr(feature = "schema", schemars(with = "bool"))]
    #[builder(default = "true")]
    pub is_required: bool,
    /// Whether the step escalates when left pending.
    #[serde(default, deserialize_with = "lenient::flag")]
    #[cfg_attr(feature = "schema", schemars(with = "bool"))]
    #[builder(default)]
    pub escalation_enabled: bool,
    /// Hours before escalation kicks in.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::hours"
    )]
    #[builder(default)]
    pub escalation_after_hours: Option<u32>,
}

fn default_required() -> bool {
    true
}

impl StepRecord {
    /// Returns a builder for creating a step record.
    pub fn builder() -> StepRecordBuilder {
        StepRecordBuilder::default()
    }

    /// Returns the step type.
    pub const fn step_type(&self) -> StepType {
        self.kind.step_type()
    }

    /// Returns the approver type for approval steps.
    pub const fn approver_type(&self) -> Option<ApproverType> {
        match &self.kind {
            StepKind::Approval { approver_type } => Some(*approver_type),
            _ => None,
        }
    }

    /// Returns the condition expression for condition steps.
    pub fn condition_expression(&self) -> Option<&str> {
        match &self.kind {
            StepKind::Condition {
                condition_expression,
            } => Some(condition_expression),
            _ => None,
        }
    }

    /// Returns the `(sequence_group, step_number)` ordering key.
    #[inline]
    pub const fn ordering_key(&self) -> (i64, i64) {
        (self.sequence_group, self.step_number)
    }
}

/// Decodes a JSON array of loosely-typed step records.
pub fn decode_steps(value: serde_json::Value) -> EngineResult<Vec<StepRecord>> {
    Ok(serde_json::from_value(value)?)
}
