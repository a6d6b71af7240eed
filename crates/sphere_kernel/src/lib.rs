//! # Sphere Kernel
//!
//! Collision and integration kernel for spherical bodies moving through a
//! level of static triangle-mesh terrain.
//!
//! ## Features
//!
//! - **Geometry Queries**: closest point, segment, ray and swept-sphere tests
//!   against triangle meshes
//! - **Terrain Aggregation**: every terrain piece treated as one surface
//! - **Body State Machine**: Grounded/Falling integration without tunneling
//! - **ECS Storage**: generational entity handles with sparse component tables
//! - **Scene Context**: fixed-step tick driver with deferred despawns and events
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sphere_kernel::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut scene = SceneManager::new();
//!     let level = LevelDescription::named("pad")
//!         .with_terrain(TerrainPieceDescription::floor(0.0, [-10.0, -10.0], [10.0, 10.0]))
//!         .with_body(BodyDescription::at(Vec3::new(0.0, 0.0, 5.0), 0.5));
//!     scene.load_level(&level)?;
//!
//!     for _ in 0..120 {
//!         for event in scene.tick(1.0 / 60.0, &TickInput::idle()) {
//!             println!("{:?}", event);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod scene;

/// Common imports for kernel users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::{KernelConfig, PhysicsConfig, SceneConfig},
        ecs::{
            components::{BodyState, ControllerComponent, SphericalBody, TransformComponent},
            Entity, World,
        },
        events::{BodyEvent, BodyEventHandler, BodyEventKind, BodyEventType},
        foundation::math::{Mat4, Vec2, Vec3},
        input::TickInput,
        physics::{ContactKind, Ray, Segment, Terrain, TerrainClosest, TerrainHit, TriangleMesh},
        scene::{
            BodyDescription, LevelDescription, SceneError, SceneManager, SceneStats,
            TerrainPieceDescription,
        },
    };
}
