//! Narrow-phase collision geometry
//!
//! # Module Organization
//!
//! - [`primitives`] - Basic geometric primitives (segments, rays, spheres, triangles)
//!   and their per-triangle tests
//! - [`mesh`] - Immutable world-space triangle meshes and the queries lifted
//!   over all of their triangles
//!
//! # Key Types
//!
//! - [`TriangleMesh`] - One static terrain piece
//! - [`SurfaceHit`], [`ClosestPoint`] - Query results
//! - [`Segment`], [`Ray`], [`Sphere`], [`Triangle`] - Primitive geometric types

pub mod primitives;
pub mod mesh;

pub use primitives::{Aabb, ClosestPoint, Ray, Segment, Sphere, SurfaceHit, Triangle};
pub use mesh::TriangleMesh;
