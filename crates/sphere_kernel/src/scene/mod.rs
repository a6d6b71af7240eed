//! Scene management
//!
//! The [`SceneManager`] is the context object for one running level. It
//! owns the world, the terrain, the configuration and the event queue, and
//! drives the fixed tick:
//!
//! ```text
//! TickInput ──> ControllerSystem ──> SphericalBodySystem ──> CommandBuffer::apply
//!                                          │                        │
//!                                     Terrain queries          despawns/spawns
//!                                                                   │
//!                                      EventQueue::dispatch <───────┘
//! ```
//!
//! Level data enters through [`LevelDescription`]; transforms leave through
//! [`SceneManager::transforms`].

mod level;
mod scene_manager;

pub use level::{BodyDescription, LevelDescription, TerrainPieceDescription};
pub use scene_manager::{SceneManager, SceneStats};

use crate::config::ConfigError;

/// Scene loading and spawning errors
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Level or kernel configuration could not be read or is out of range
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A terrain position buffer cannot be turned into vertices
    #[error("Terrain piece {piece}: position buffer of {len} floats is not a whole number of finite vertices")]
    InvalidTerrainBuffer {
        /// Index of the piece in the level
        piece: usize,
        /// Number of floats in its buffer
        len: usize,
    },

    /// A body radius is zero, negative or not finite
    #[error("Invalid body radius {radius}")]
    InvalidRadius {
        /// Offending radius
        radius: f32,
    },
}

pub(crate) fn validate_radius(radius: f32) -> Result<(), SceneError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidRadius { radius })
    }
}
