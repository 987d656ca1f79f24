//! Layout configuration.

use anyhow::Context;
use clap::Args;
use flowstage_engine::layout::{
    AxisSpacing, DEFAULT_PRIMARY_SPACING, DEFAULT_SECONDARY_SPACING, LayoutOptions, Orientation,
    SecondaryBase,
};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Layout configuration.
///
/// # Environment Variables
///
/// - `FLOWSTAGE_PRIMARY_SPACING` - Distance between stages (default: 300)
/// - `FLOWSTAGE_SECONDARY_SPACING` - Distance between parallel steps (default: 150)
/// - `FLOWSTAGE_ORIENTATION` - `left_to_right` or `top_to_bottom`
/// - `FLOWSTAGE_SECONDARY_BASE` - `aligned` or `cumulative`
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct LayoutConfig {
    /// Distance between consecutive stages.
    #[arg(long, global = true, env = "FLOWSTAGE_PRIMARY_SPACING", default_value_t = DEFAULT_PRIMARY_SPACING)]
    pub primary_spacing: f32,

    /// Distance between parallel steps within a stage.
    #[arg(long, global = true, env = "FLOWSTAGE_SECONDARY_SPACING", default_value_t = DEFAULT_SECONDARY_SPACING)]
    pub secondary_spacing: f32,

    /// Axis along which stages advance.
    #[arg(long, global = true, env = "FLOWSTAGE_ORIENTATION", default_value_t = Orientation::LeftToRight)]
    pub orientation: Orientation,

    /// Where each stage starts on the secondary axis.
    #[arg(long, global = true, env = "FLOWSTAGE_SECONDARY_BASE", default_value_t = SecondaryBase::Aligned)]
    pub secondary_base: SecondaryBase,
}

impl LayoutConfig {
    /// Builds validated layout options.
    pub fn to_options(&self) -> anyhow::Result<LayoutOptions> {
        LayoutOptions::builder()
            .spacing(AxisSpacing::new(self.primary_spacing, self.secondary_spacing))
            .orientation(self.orientation)
            .secondary_base(self.secondary_base)
            .build()
            .context("invalid layout configuration")
    }

    /// Logs the layout configuration.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            primary_spacing = self.primary_spacing,
            secondary_spacing = self.secondary_spacing,
            orientation = %self.orientation,
            secondary_base = %self.secondary_base,
            "Layout configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(primary_spacing: f32) -> LayoutConfig {
        LayoutConfig {
            primary_spacing,
            secondary_spacing: 50.0,
            orientation: Orientation::TopToBottom,
            secondary_base: SecondaryBase::Cumulative,
        }
    }

    #[test]
    fn test_to_options() {
        let options = config(120.0).to_options().expect("invalid config");
        assert_eq!(options.spacing, AxisSpacing::new(120.0, 50.0));
        assert_eq!(options.orientation, Orientation::TopToBottom);
        assert_eq!(options.secondary_base, SecondaryBase::Cumulative);
    }

    #[test]
    fn test_to_options_rejects_zero_spacing() {
        assert!(config(0.0).to_options().is_err());
    }
}
