//! Physics module for collision detection and response
//!
//! Geometry queries against static triangle meshes, the terrain aggregator
//! that lifts them over every terrain piece, and the Grounded/Falling state
//! machine that moves spherical bodies through the terrain.

pub mod body_state;
pub mod collision;
pub mod terrain;

#[cfg(test)]
mod tests;

pub use body_state::{
    classify_contact, step, step_falling, step_grounded, BodySnapshot, ContactKind, StepContext,
    StepOutcome, CEILING_THRESHOLD, FLOOR_THRESHOLD,
};
pub use collision::{Aabb, ClosestPoint, Ray, Segment, Sphere, SurfaceHit, Triangle, TriangleMesh};
pub use terrain::{Terrain, TerrainClosest, TerrainHit};
