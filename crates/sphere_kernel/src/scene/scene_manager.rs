//! # Scene Manager
//!
//! Owns every piece of per-level state and runs the fixed-order tick. There
//! are no globals: systems get the world, the terrain and the config passed
//! in explicitly.

use std::path::Path;

use super::{validate_radius, LevelDescription, SceneError};
use crate::config::Config;
use crate::core::KernelConfig;
use crate::ecs::components::{ControllerComponent, SphericalBody, TransformComponent};
use crate::ecs::systems::{ControllerSystem, SphericalBodySystem};
use crate::ecs::{CommandBuffer, Entity, World};
use crate::events::{BodyEvent, BodyEventHandler, BodyEventType, EventQueue};
use crate::foundation::math::Mat4;
use crate::foundation::time::{FixedTimestep, Stopwatch};
use crate::input::TickInput;
use crate::physics::body_state::StepContext;
use crate::physics::collision::{Ray, TriangleMesh};
use crate::physics::terrain::{Terrain, TerrainHit};

/// Counters describing the scene after the last tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// Ticks run since the last reset
    pub tick_count: u64,

    /// Live spherical bodies
    pub body_count: usize,

    /// Terrain pieces
    pub terrain_piece_count: usize,

    /// Triangles across all terrain pieces
    pub triangle_count: usize,

    /// Wall time of the last tick (microseconds)
    pub last_tick_us: u64,

    /// Events delivered since the scene was created
    pub events_dispatched: u64,
}

/// Context object for one running level
#[derive(Debug)]
pub struct SceneManager {
    world: World,
    terrain: Terrain,
    config: KernelConfig,
    commands: CommandBuffer,
    events: EventQueue,
    body_system: SphericalBodySystem,
    timestep: FixedTimestep,
    stats: SceneStats,
    level_name: Option<String>,
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneManager {
    /// Create an empty scene with default configuration
    pub fn new() -> Self {
        Self::build(KernelConfig::default())
    }

    /// Create an empty scene with custom configuration
    pub fn with_config(config: KernelConfig) -> Result<Self, SceneError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create an empty scene configured from a `.toml` or `.ron` file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        Self::with_config(KernelConfig::load_from_file(path)?)
    }

    fn build(config: KernelConfig) -> Self {
        let scene = &config.scene;
        Self {
            world: World::new(),
            terrain: Terrain::new(),
            commands: CommandBuffer::new(),
            events: EventQueue::new(),
            body_system: SphericalBodySystem::new(scene.kill_plane_z),
            timestep: FixedTimestep::new(scene.fixed_timestep, scene.max_substeps),
            stats: SceneStats::default(),
            level_name: None,
            config,
        }
    }

    /// Register a handler for one event type
    pub fn register_handler(&mut self, event_type: BodyEventType, handler: Box<dyn BodyEventHandler>) {
        self.events.register_handler(event_type, handler);
    }

    /// Register a handler, built by `make`, for every event type
    pub fn register_for_all<H>(&mut self, make: impl FnMut() -> H)
    where
        H: BodyEventHandler + 'static,
    {
        self.events.register_for_all(make);
    }

    /// Build terrain and spawn bodies from a level description
    ///
    /// The whole description is validated first, so a bad level leaves the
    /// scene untouched. Returns the terrain piece entities followed by the
    /// body entities, in description order.
    pub fn load_level(&mut self, level: &LevelDescription) -> Result<Vec<Entity>, SceneError> {
        level.validate()?;

        let mut entities = Vec::with_capacity(level.terrain.len() + level.bodies.len());
        for piece in &level.terrain {
            entities.push(self.add_terrain_piece(&piece.positions, &piece.model_matrix()));
        }
        for description in &level.bodies {
            let (transform, body) = description.components();
            let entity = match &description.controller {
                Some(controller) => self.world.spawn_controlled_body(transform, body, controller.clone()),
                None => self.world.spawn_body(transform, body),
            };
            entities.push(entity);
        }

        self.level_name = Some(level.name.clone());
        self.refresh_counts();
        log::info!(
            "Loaded level '{}': {} terrain pieces ({} triangles), {} bodies",
            level.name,
            level.terrain.len(),
            self.stats.triangle_count,
            level.bodies.len()
        );
        Ok(entities)
    }

    /// Load a level from a `.toml` or `.ron` file
    pub fn load_level_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<Entity>, SceneError> {
        let level = LevelDescription::load_from_file(path)?;
        self.load_level(&level)
    }

    /// Build one terrain piece from a flat position buffer
    pub fn add_terrain_piece(&mut self, positions: &[f32], model: &Mat4) -> Entity {
        let piece = self.world.create_entity();
        let mesh = TriangleMesh::from_positions(positions, model);
        log::debug!("terrain piece {}: {} triangles", piece, mesh.len());
        self.terrain.insert(piece, mesh);
        self.refresh_counts();
        piece
    }

    /// Spawn a physics-driven sphere
    pub fn spawn_body(&mut self, transform: TransformComponent, body: SphericalBody) -> Result<Entity, SceneError> {
        validate_radius(body.radius)?;
        let entity = self.world.spawn_body(transform, body);
        self.refresh_counts();
        Ok(entity)
    }

    /// Spawn a sphere that follows tick input
    pub fn spawn_controlled_body(
        &mut self,
        transform: TransformComponent,
        body: SphericalBody,
        controller: ControllerComponent,
    ) -> Result<Entity, SceneError> {
        validate_radius(body.radius)?;
        let entity = self.world.spawn_controlled_body(transform, body, controller);
        self.refresh_counts();
        Ok(entity)
    }

    /// Queue removal of a body or terrain piece at the end of the next tick
    pub fn despawn(&mut self, entity: Entity) {
        self.commands.despawn(entity);
    }

    /// Tear down every entity and terrain piece
    ///
    /// Handles from before the reset never resolve again. Registered handlers
    /// and the configuration are kept.
    pub fn reset(&mut self) {
        self.world.clear();
        self.terrain.clear();
        self.commands.clear();
        self.events.clear();
        self.timestep.reset();
        self.level_name = None;
        self.stats = SceneStats {
            events_dispatched: self.stats.events_dispatched,
            ..SceneStats::default()
        };
        log::info!("Scene reset");
    }

    /// Run exactly one tick of `dt` seconds
    ///
    /// Returns the events raised during the tick, after handlers saw them.
    pub fn tick(&mut self, dt: f32, input: &TickInput) -> Vec<BodyEvent> {
        let stopwatch = Stopwatch::start_new();
        let tick = self.stats.tick_count;

        ControllerSystem::run(&mut self.world, input, tick, &mut self.events);

        let ctx = StepContext {
            terrain: &self.terrain,
            config: &self.config.physics,
            dt,
        };
        self.body_system
            .run(&mut self.world, &ctx, tick, &mut self.commands, &mut self.events);

        self.commands.apply(&mut self.world, &mut self.terrain);
        if cfg!(debug_assertions) {
            self.world.assert_consistent();
        }

        let events = self.events.dispatch();

        self.stats.tick_count += 1;
        self.stats.events_dispatched = self.events.dispatched_count();
        self.refresh_counts();
        self.stats.last_tick_us = stopwatch.elapsed_micros();
        log::trace!("tick {} done in {}us", tick, self.stats.last_tick_us);
        events
    }

    /// Feed variable frame time, running as many fixed ticks as are owed
    ///
    /// Jump and reset are edge-triggered, so they only reach the first of the
    /// ticks run for this frame. Returns the number of ticks run.
    pub fn advance(&mut self, frame_dt: f32, input: &TickInput) -> u32 {
        let ticks = self.timestep.accumulate(frame_dt);
        let step = self.timestep.step();
        let held = TickInput::moving(input.move_axis);

        for index in 0..ticks {
            let input = if index == 0 { input } else { &held };
            self.tick(step, input);
        }
        ticks
    }

    /// Transforms for the renderer
    pub fn transforms(&self) -> impl Iterator<Item = (Entity, &TransformComponent)> {
        self.world.transforms()
    }

    /// Nearest terrain hit along `ray`, for picking
    pub fn raycast(&self, ray: &Ray) -> TerrainHit {
        self.terrain.intersect_ray(ray)
    }

    /// Entity and component tables
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Static terrain
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Active configuration
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Name of the loaded level, if any
    pub fn level_name(&self) -> Option<&str> {
        self.level_name.as_deref()
    }

    /// Counters after the last tick
    pub fn stats(&self) -> &SceneStats {
        &self.stats
    }

    /// Fraction of a tick waiting in the accumulator, for render interpolation
    pub fn interpolation_alpha(&self) -> f32 {
        self.timestep.alpha()
    }

    fn refresh_counts(&mut self) {
        self.stats.body_count = self.world.body_count();
        self.stats.terrain_piece_count = self.terrain.piece_count();
        self.stats.triangle_count = self.terrain.triangle_count();
    }
}
