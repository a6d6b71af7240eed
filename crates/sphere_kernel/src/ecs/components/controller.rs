//! Controller component
//!
//! Marks a spherical body as driven by the per-tick [`TickInput`]
//! snapshot, with the speeds the input is scaled by.
//!
//! [`TickInput`]: crate::input::TickInput

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::foundation::math::Vec3;

/// Component for input-driven bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerComponent {
    /// Horizontal speed at full stick deflection
    pub move_speed: f32,

    /// Upward velocity given by a jump
    pub jump_speed: f32,

    /// Where a reset puts the body back
    pub spawn_point: Vec3,
}

impl Component for ControllerComponent {}

impl Default for ControllerComponent {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_speed: 8.0,
            spawn_point: Vec3::zeros(),
        }
    }
}

impl ControllerComponent {
    /// Controller respawning at `spawn_point` with default speeds
    pub fn at(spawn_point: Vec3) -> Self {
        Self {
            spawn_point,
            ..Default::default()
        }
    }
}
