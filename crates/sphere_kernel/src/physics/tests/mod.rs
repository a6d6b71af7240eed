//! Whole-tick physics scenarios
//!
//! These drive the input system, the body system and the command buffer
//! together, the same way the scene manager does, against small hand-built
//! terrains.

mod scenarios;

use crate::core::PhysicsConfig;
use crate::ecs::systems::{ControllerSystem, SphericalBodySystem};
use crate::ecs::{CommandBuffer, Entity, World};
use crate::events::{BodyEvent, EventQueue};
use crate::foundation::math::Vec3;
use crate::input::TickInput;
use super::body_state::StepContext;
use super::collision::TriangleMesh;
use super::terrain::Terrain;

pub(super) struct Harness {
    pub world: World,
    pub terrain: Terrain,
    pub config: PhysicsConfig,
    pub commands: CommandBuffer,
    pub events: EventQueue,
    pub system: SphericalBodySystem,
    pub dt: f32,
    pub tick: u64,
}

impl Harness {
    pub fn new(dt: f32) -> Self {
        Self {
            world: World::new(),
            terrain: Terrain::new(),
            config: PhysicsConfig::default(),
            commands: CommandBuffer::new(),
            events: EventQueue::new(),
            system: SphericalBodySystem::new(-1000.0),
            dt,
            tick: 0,
        }
    }

    /// Horizontal upward-facing quad at height `z`
    pub fn add_floor(&mut self, z: f32, min: (f32, f32), max: (f32, f32)) -> Entity {
        let (x0, y0) = min;
        let (x1, y1) = max;
        let positions = [
            x0, y0, z, x1, y0, z, x1, y1, z,
            x0, y0, z, x1, y1, z, x0, y1, z,
        ];
        let piece = self.world.create_entity();
        self.terrain.insert(
            piece,
            TriangleMesh::from_positions(&positions, &crate::foundation::math::Mat4::identity()),
        );
        piece
    }

    pub fn step(&mut self, input: &TickInput) -> Vec<BodyEvent> {
        ControllerSystem::run(&mut self.world, input, self.tick, &mut self.events);

        let ctx = StepContext {
            terrain: &self.terrain,
            config: &self.config,
            dt: self.dt,
        };
        self.system
            .run(&mut self.world, &ctx, self.tick, &mut self.commands, &mut self.events);
        self.commands.apply(&mut self.world, &mut self.terrain);
        self.world.assert_consistent();

        self.tick += 1;
        self.events.dispatch()
    }

    pub fn position(&self, entity: Entity) -> Vec3 {
        self.world
            .transform(entity)
            .map(|t| t.position)
            .unwrap_or_else(|| panic!("{entity} has no transform"))
    }
}
