//! ECS Systems
//!
//! Systems that run once per tick, in this order: input, then bodies.

pub mod controller_system;
pub mod spherical_body_system;

pub use controller_system::ControllerSystem;
pub use spherical_body_system::{BodyPassStats, SphericalBodySystem};
