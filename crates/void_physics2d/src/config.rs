//! Physics configuration

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};

/// Physics world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 in Y)
    pub gravity: [f32; 2],

    /// Fixed timestep for physics simulation
    pub timestep: f32,

    /// Maximum number of substeps per frame
    pub max_substeps: u32,

    /// Solver iterations for velocity
    pub velocity_iterations: usize,

    /// Enable sleeping for inactive bodies
    pub sleeping_enabled: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81],
            timestep: 1.0 / 60.0,
            max_substeps: 4,
            velocity_iterations: 4,
            sleeping_enabled: true,
        }
    }
}

impl PhysicsConfig {
    /// Set gravity
    pub fn with_gravity(mut self, x: f32, y: f32) -> Self {
        self.gravity = [x, y];
        self
    }

    /// Set timestep
    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.timestep.is_nan() || self.timestep <= 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "timestep must be positive, got {}",
                self.timestep
            )));
        }
        if self.velocity_iterations == 0 {
            return Err(PhysicsError::InvalidConfig(
                "velocity_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
