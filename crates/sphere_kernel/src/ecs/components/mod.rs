//! ECS Components module
//!
//! Plain data rows stored per entity in the world's component tables

pub mod controller;
pub mod spherical_body;
pub mod transform;

pub use controller::ControllerComponent;
pub use spherical_body::{BodyState, SphericalBody};
pub use transform::TransformComponent;
