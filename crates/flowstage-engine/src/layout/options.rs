//! Layout configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::Position;
use crate::error::{EngineError, EngineResult};

/// Default distance between consecutive stages.
pub const DEFAULT_PRIMARY_SPACING: f32 = 300.0;

/// Default distance between fanned-out siblings.
pub const DEFAULT_SECONDARY_SPACING: f32 = 150.0;

/// Distances applied per layout unit along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpacing {
    /// Distance between consecutive stages.
    pub primary: f32,
    /// Distance between parallel steps within a stage.
    pub secondary: f32,
}

impl AxisSpacing {
    /// One unit per step on both axes; positions come out in spacing units.
    pub const UNIT: Self = Self::new(1.0, 1.0);

    /// Creates a new spacing.
    pub const fn new(primary: f32, secondary: f32) -> Self {
        Self { primary, secondary }
    }
}

impl Default for AxisSpacing {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_SPACING, DEFAULT_SECONDARY_SPACING)
    }
}

/// Which screen axis stages advance along.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    /// Stages advance along x, siblings fan out along y.
    #[default]
    LeftToRight,
    /// Stages advance along y, siblings fan out along x.
    TopToBottom,
}

impl Orientation {
    /// Maps primary/secondary offsets to an `(x, y)` position.
    pub const fn place(self, primary: f32, secondary: f32) -> Position {
        match self {
            Self::LeftToRight => Position::new(primary, secondary),
            Self::TopToBottom => Position::new(secondary, primary),
        }
    }
}

/// Where each stage starts on the secondary axis.
///
/// With [`Aligned`](Self::Aligned) a fanned-out stage can share secondary
/// offsets with its neighbours; only [`Cumulative`](Self::Cumulative)
/// guarantees that stages never overlap on the secondary axis.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SecondaryBase {
    /// Every stage starts at secondary offset zero.
    #[default]
    Aligned,
    /// Stage `i` starts after the secondary space consumed by stages `0..i`,
    /// counting `max(1, len)` units per stage.
    Cumulative,
}

/// Configuration for the layout engine.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct LayoutOptions {
    /// Per-axis spacing.
    #[builder(default)]
    pub spacing: AxisSpacing,

    /// Axis assignment.
    #[builder(default)]
    pub orientation: Orientation,

    /// Secondary-axis base per stage.
    #[builder(default)]
    pub secondary_base: SecondaryBase,

    /// Position of the first step of the first stage.
    #[builder(default)]
    pub origin: Position,
}

impl LayoutOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(spacing) = self.spacing {
            check_spacing(spacing)?;
        }
        if let Some(origin) = self.origin
            && !(origin.x.is_finite() && origin.y.is_finite())
        {
            return Err("origin must be finite".into());
        }
        Ok(())
    }
}

impl LayoutOptions {
    /// Returns a builder for layout options.
    pub fn builder() -> LayoutOptionsBuilder {
        LayoutOptionsBuilder::default()
    }

    /// Creates options with the given spacing and defaults elsewhere.
    pub fn with_spacing(spacing: AxisSpacing) -> Self {
        Self {
            spacing,
            ..Self::default()
        }
    }

    /// Validates options that did not go through the builder.
    pub fn validate(&self) -> EngineResult<()> {
        check_spacing(self.spacing).map_err(EngineError::InvalidLayout)?;
        if !(self.origin.x.is_finite() && self.origin.y.is_finite()) {
            return Err(EngineError::InvalidLayout("origin must be finite".into()));
        }
        Ok(())
    }
}

impl From<LayoutOptionsBuilderError> for EngineError {
    fn from(error: LayoutOptionsBuilderError) -> Self {
        EngineError::InvalidLayout(error.to_string())
    }
}

fn check_spacing(spacing: AxisSpacing) -> Result<(), String> {
    let valid = |value: f32| value.is_finite() && value > 0.0;
    if !valid(spacing.primary) {
        return Err(format!(
            "primary spacing must be finite and positive, got {}",
            spacing.primary
        ));
    }
    if !valid(spacing.secondary) {
        return Err(format!(
            "secondary spacing must be finite and positive, got {}",
            spacing.secondary
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_default_options() {
        let options = LayoutOptions::default();
        assert_eq!(options.spacing.primary, DEFAULT_PRIMARY_SPACING);
        assert_eq!(options.spacing.secondary, DEFAULT_SECONDARY_SPACING);
        assert_eq!(options.orientation, Orientation::LeftToRight);
        assert_eq!(options.secondary_base, SecondaryBase::Aligned);
        assert_eq!(options.origin, Position::default());
        assert!(options.validate().is_ok());
        assert_eq!(
            LayoutOptions::builder().build().expect("builder failed"),
            options
        );
    }

    #[test]
    fn test_builder_applies_values() {
        let options = LayoutOptions::builder()
            .spacing(AxisSpacing::new(200.0, 80.0))
            .orientation(Orientation::TopToBottom)
            .build()
            .expect("builder failed");

        assert_eq!(options.spacing, AxisSpacing::new(200.0, 80.0));
        assert_eq!(options.orientation, Orientation::TopToBottom);
        assert_eq!(options.origin, Position::default());
    }

    #[test]
    fn test_builder_rejects_bad_spacing() {
        let zero = LayoutOptions::builder()
            .spacing(AxisSpacing::new(0.0, 1.0))
            .build();
        assert!(zero.is_err());

        let nan = LayoutOptions::builder()
            .spacing(AxisSpacing::new(1.0, f32::NAN))
            .build();
        assert!(nan.is_err());

        let error: EngineError = nan.unwrap_err().into();
        assert!(matches!(error, EngineError::InvalidLayout(_)));
    }

    #[test]
    fn test_validate_deserialized_options() {
        let options: LayoutOptions = serde_json::from_str(
            r#"{ "spacing": { "primary": -5.0, "secondary": 10.0 } }"#,
        )
        .expect("deserialization failed");
        assert_eq!(options.orientation, Orientation::LeftToRight);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_orientation_place() {
        assert_eq!(
            Orientation::LeftToRight.place(3.0, 1.0),
            Position::new(3.0, 1.0)
        );
        assert_eq!(
            Orientation::TopToBottom.place(3.0, 1.0),
            Position::new(1.0, 3.0)
        );
        assert_eq!(
            Orientation::from_str("top_to_bottom").ok(),
            Some(Orientation::TopToBottom)
        );
    }
}
