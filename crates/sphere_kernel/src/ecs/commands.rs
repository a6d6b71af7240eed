//! Deferred structural changes
//!
//! Systems never add or remove entities while they iterate a table. They
//! record the change here and the scene applies the whole buffer once the
//! pass is over, so every table sees the change at the same tick boundary.

use std::collections::HashSet;

use super::components::{ControllerComponent, SphericalBody, TransformComponent};
use super::{Entity, World};
use crate::physics::terrain::Terrain;

/// A structural change waiting for the end of the pass
#[derive(Debug, Clone)]
pub enum Command {
    /// Remove an entity from the world and the terrain
    Despawn(Entity),
    /// Create a new body
    SpawnBody {
        /// Initial transform
        transform: TransformComponent,
        /// Initial body
        body: SphericalBody,
        /// Optional input driver
        controller: Option<ControllerComponent>,
    },
}

/// Ordered list of pending structural changes
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<Command>,
    despawning: HashSet<Entity>,
}

/// What [`CommandBuffer::apply`] did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedCommands {
    /// Entities that were alive and are now gone
    pub despawned: Vec<Entity>,
    /// Entities created by the buffer
    pub spawned: Vec<Entity>,
}

impl CommandBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue removal of `entity`; queuing it twice is harmless
    pub fn despawn(&mut self, entity: Entity) {
        if self.despawning.insert(entity) {
            self.commands.push(Command::Despawn(entity));
        }
    }

    /// Queue creation of a body
    pub fn spawn_body(
        &mut self,
        transform: TransformComponent,
        body: SphericalBody,
        controller: Option<ControllerComponent>,
    ) {
        self.commands.push(Command::SpawnBody {
            transform,
            body,
            controller,
        });
    }

    /// Whether `entity` will be removed when the buffer is applied
    pub fn is_despawn_pending(&self, entity: Entity) -> bool {
        self.despawning.contains(&entity)
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Apply every queued command in order and empty the buffer
    pub fn apply(&mut self, world: &mut World, terrain: &mut Terrain) -> AppliedCommands {
        let mut applied = AppliedCommands::default();

        for command in self.commands.drain(..) {
            match command {
                Command::Despawn(entity) => {
                    terrain.remove(entity);
                    if world.despawn(entity) {
                        applied.despawned.push(entity);
                    }
                }
                Command::SpawnBody {
                    transform,
                    body,
                    controller,
                } => {
                    let entity = match controller {
                        Some(controller) => world.spawn_controlled_body(transform, body, controller),
                        None => world.spawn_body(transform, body),
                    };
                    applied.spawned.push(entity);
                }
            }
        }
        self.despawning.clear();

        if !applied.despawned.is_empty() || !applied.spawned.is_empty() {
            log::debug!(
                "applied commands: {} despawned, {} spawned",
                applied.despawned.len(),
                applied.spawned.len()
            );
        }
        applied
    }

    /// Drop every queued command without applying it
    pub fn clear(&mut self) {
        self.commands.clear();
        self.despawning.clear();
    }
}
