//! Level description
//!
//! The in-memory contract with whatever decodes level assets: one flat
//! world-space position buffer per terrain piece plus the bodies to spawn.
//! It is also a [`Config`], so small levels can live in `.ron` or `.toml`
//! files next to the demo.

use serde::{Deserialize, Serialize};

use super::SceneError;
use crate::config::Config;
use crate::ecs::components::{BodyState, ControllerComponent, SphericalBody, TransformComponent};
use crate::foundation::math::{Mat4, Vec3};

const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

fn identity() -> [f32; 16] {
    IDENTITY
}

/// One static terrain piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainPieceDescription {
    /// Flat `x, y, z` vertex positions, three vertices per triangle
    pub positions: Vec<f32>,
    /// Column-major model matrix baked into the positions at load time
    #[serde(default = "identity")]
    pub model: [f32; 16],
}

impl TerrainPieceDescription {
    /// Piece whose positions are already in world space
    pub fn world_space(positions: Vec<f32>) -> Self {
        Self {
            positions,
            model: IDENTITY,
        }
    }

    /// Builder pattern: Set the model matrix
    pub fn with_model(mut self, model: &Mat4) -> Self {
        self.model.copy_from_slice(model.as_slice());
        self
    }

    /// Model matrix as a `Mat4`
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_column_slice(&self.model)
    }

    /// Axis-aligned horizontal quad at height `z`, normals facing up
    pub fn floor(z: f32, min: [f32; 2], max: [f32; 2]) -> Self {
        let [x0, y0] = min;
        let [x1, y1] = max;
        Self::world_space(vec![
            x0, y0, z, x1, y0, z, x1, y1, z,
            x0, y0, z, x1, y1, z, x0, y1, z,
        ])
    }

    pub(crate) fn validate(&self, piece: usize) -> Result<(), SceneError> {
        let len = self.positions.len();
        if len % 3 != 0 || self.positions.iter().any(|v| !v.is_finite()) {
            return Err(SceneError::InvalidTerrainBuffer { piece, len });
        }
        if self.model.iter().any(|v| !v.is_finite()) {
            return Err(SceneError::InvalidTerrainBuffer { piece, len });
        }
        Ok(())
    }
}

/// One body to spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDescription {
    /// Sphere center
    pub position: Vec3,
    /// Sphere radius
    pub radius: f32,
    /// Initial velocity
    #[serde(default)]
    pub velocity: Vec3,
    /// Initial contact state
    #[serde(default)]
    pub state: BodyState,
    /// Present for input-driven bodies
    #[serde(default)]
    pub controller: Option<ControllerComponent>,
}

impl BodyDescription {
    /// Falling body at rest
    pub fn at(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            radius,
            velocity: Vec3::zeros(),
            state: BodyState::Falling,
            controller: None,
        }
    }

    /// Builder pattern: Drive this body from input, respawning where it starts
    pub fn controlled(mut self) -> Self {
        self.controller = Some(ControllerComponent::at(self.position));
        self
    }

    /// Builder pattern: Set velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Components for this body
    pub fn components(&self) -> (TransformComponent, SphericalBody) {
        (
            TransformComponent::from_position(self.position),
            SphericalBody {
                velocity: self.velocity,
                radius: self.radius,
                state: self.state,
            },
        )
    }
}

/// Everything needed to populate a scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDescription {
    /// Display name for logs
    pub name: String,
    /// Static terrain pieces
    pub terrain: Vec<TerrainPieceDescription>,
    /// Bodies to spawn after the terrain is built
    pub bodies: Vec<BodyDescription>,
}

impl Config for LevelDescription {}

impl LevelDescription {
    /// Empty level called `name`
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder pattern: Add a terrain piece
    pub fn with_terrain(mut self, piece: TerrainPieceDescription) -> Self {
        self.terrain.push(piece);
        self
    }

    /// Builder pattern: Add a body
    pub fn with_body(mut self, body: BodyDescription) -> Self {
        self.bodies.push(body);
        self
    }

    /// Check every piece and body before anything is built
    pub fn validate(&self) -> Result<(), SceneError> {
        for (index, piece) in self.terrain.iter().enumerate() {
            piece.validate(index)?;
        }
        for body in &self.bodies {
            super::validate_radius(body.radius)?;
        }
        Ok(())
    }
}
