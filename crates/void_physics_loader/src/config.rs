//! Loader configuration

use crate::error::{LoaderError, Result};
use serde::{Deserialize, Serialize};

/// Ratio PhysicsEditor exports use unless told otherwise
pub const PIXEL_TO_METER_RATIO_DEFAULT: f32 = 32.0;

/// Loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Document pixels per physics unit, applied to every coordinate and radius
    pub pixel_to_meter_ratio: f32,

    /// Log every fixture's material and filter values at debug level
    pub log_fixtures: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            pixel_to_meter_ratio: PIXEL_TO_METER_RATIO_DEFAULT,
            log_fixtures: true,
        }
    }
}

impl LoaderConfig {
    /// Set the pixel-to-meter ratio
    pub fn with_ratio(mut self, ratio: f32) -> Self {
        self.pixel_to_meter_ratio = ratio;
        self
    }

    /// Toggle per-fixture logging
    pub fn with_fixture_logging(mut self, enabled: bool) -> Self {
        self.log_fixtures = enabled;
        self
    }

    /// Read a configuration from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Convert a document value to physics units
    pub fn to_physics(&self, pixels: f32) -> f32 {
        pixels / self.pixel_to_meter_ratio
    }

    /// Convert a physics value back to document pixels
    pub fn to_pixels(&self, meters: f32) -> f32 {
        meters * self.pixel_to_meter_ratio
    }

    /// Reject ratios that would produce infinities or flip the document
    pub fn validate(&self) -> Result<()> {
        if !self.pixel_to_meter_ratio.is_finite() || self.pixel_to_meter_ratio <= 0.0 {
            return Err(LoaderError::InvalidConfig(format!(
                "pixel_to_meter_ratio must be positive and finite, got {}",
                self.pixel_to_meter_ratio
            )));
        }
        Ok(())
    }
}
