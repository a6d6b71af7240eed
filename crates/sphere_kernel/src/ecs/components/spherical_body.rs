//! Spherical body component
//!
//! Velocity, radius and contact state of a sphere moved by the physics pass.
//! Every entity carrying one also carries a
//! [`TransformComponent`](super::TransformComponent) holding its center.

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::foundation::math::Vec3;

/// Contact state of a spherical body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BodyState {
    /// Resting on (or walking along) a floor-like surface
    Grounded,
    /// Airborne under gravity
    #[default]
    Falling,
}

impl BodyState {
    /// Whether the body is resting on a floor
    pub fn is_grounded(self) -> bool {
        matches!(self, Self::Grounded)
    }
}

/// Component for spheres integrated against the terrain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphericalBody {
    /// Linear velocity in units per second
    pub velocity: Vec3,

    /// Sphere radius, always positive
    pub radius: f32,

    /// Current contact state
    pub state: BodyState,
}

impl Component for SphericalBody {}

impl SphericalBody {
    /// Create a falling body at rest
    pub fn new(radius: f32) -> Self {
        debug_assert!(radius > 0.0, "sphere radius must be positive, got {radius}");
        Self {
            velocity: Vec3::zeros(),
            radius,
            state: BodyState::Falling,
        }
    }

    /// Create a body resting on the ground
    pub fn grounded(radius: f32) -> Self {
        Self {
            state: BodyState::Grounded,
            ..Self::new(radius)
        }
    }

    /// Builder pattern: Set velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder pattern: Set state
    pub fn with_state(mut self, state: BodyState) -> Self {
        self.state = state;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_body_falls_from_rest() {
        let body = SphericalBody::new(0.5);
        assert_eq!(body.state, BodyState::Falling);
        assert_eq!(body.velocity, Vec3::zeros());
        assert!(SphericalBody::grounded(0.5).state.is_grounded());
    }

    #[test]
    fn test_state_round_trips_through_ron() {
        let body = SphericalBody::grounded(0.25).with_velocity(Vec3::new(1.0, 0.0, 0.0));
        let text = ron::to_string(&body).unwrap();
        let back: SphericalBody = ron::from_str(&text).unwrap();
        assert_eq!(back, body);
    }
}
