//! # Kernel Configuration
//!
//! ## Configuration Categories
//!
//! - **Physics Config**: gravity, terminal velocity, contact tolerances
//! - **Scene Config**: fixed timestep, substep clamp, kill plane
//!
//! The floor and ceiling slope thresholds are deliberately absent: they are
//! fixed constants in [`crate::physics::body_state`] and not tunable.

use serde::{Serialize, Deserialize};

use crate::config::{Config, ConfigError};

/// # Physics Configuration
///
/// Constants consumed by the spherical body state machine every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in units per second squared
    pub gravity: f32,
    /// Magnitude of the most negative vertical velocity a falling body may reach
    pub terminal_velocity: f32,
    /// Extra length of the ground probe beyond the body radius
    pub ground_probe_epsilon: f32,
    /// Separation kept between a body and the surface it was clamped against
    pub skin_width: f32,
    /// Additional sweeps spent sliding along a wall after the first contact
    pub max_resolve_iterations: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8 * 2.0,
            terminal_velocity: 100.0,
            ground_probe_epsilon: 0.1,
            skin_width: 1e-4,
            max_resolve_iterations: 1,
        }
    }
}

impl PhysicsConfig {
    /// Reject values the integrator cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gravity.is_finite() && self.gravity >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "physics.gravity",
                reason: format!("must be finite and non-negative, got {}", self.gravity),
            });
        }
        if !(self.terminal_velocity.is_finite() && self.terminal_velocity > 0.0) {
            return Err(ConfigError::Invalid {
                field: "physics.terminal_velocity",
                reason: format!("must be finite and positive, got {}", self.terminal_velocity),
            });
        }
        if !(self.ground_probe_epsilon > 0.0) {
            return Err(ConfigError::Invalid {
                field: "physics.ground_probe_epsilon",
                reason: format!("must be positive, got {}", self.ground_probe_epsilon),
            });
        }
        if !(self.skin_width >= 0.0 && self.skin_width < self.ground_probe_epsilon) {
            return Err(ConfigError::Invalid {
                field: "physics.skin_width",
                reason: format!(
                    "must be in [0, ground_probe_epsilon), got {}",
                    self.skin_width
                ),
            });
        }
        Ok(())
    }
}

/// # Scene Configuration
///
/// Settings for the tick driver in [`crate::scene::SceneManager`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Length of one physics tick in seconds
    pub fixed_timestep: f32,
    /// Most ticks run for a single frame before time is dropped
    pub max_substeps: u32,
    /// Bodies whose center drops below this height are despawned
    pub kill_plane_z: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 5,
            kill_plane_z: -1000.0,
        }
    }
}

impl SceneConfig {
    /// Reject values the tick driver cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(ConfigError::Invalid {
                field: "scene.fixed_timestep",
                reason: format!("must be finite and positive, got {}", self.fixed_timestep),
            });
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::Invalid {
                field: "scene.max_substeps",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Top-level kernel configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Physics tunables
    pub physics: PhysicsConfig,
    /// Tick driver settings
    pub scene: SceneConfig,
}

impl KernelConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        self.scene.validate()
    }
}

impl Config for KernelConfig {}
