//! Spherical body integration system
//!
//! Tick driver for the body state machine. For every body it reads the
//! transform and body rows, runs the transition for the body's state and
//! writes the outcome back. Transitions become [`BodyEvent`]s; bodies that
//! drop below the kill plane are queued for despawn rather than removed
//! while the tables are being iterated.

use crate::ecs::commands::CommandBuffer;
use crate::ecs::World;
use crate::events::{BodyEvent, BodyEventKind, EventQueue};
use crate::physics::body_state::{self, BodySnapshot, StepContext};

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyPassStats {
    /// Bodies stepped
    pub stepped: usize,
    /// Bodies skipped because their despawn was already queued
    pub skipped: usize,
    /// Bodies caught by the kill plane
    pub killed: usize,
}

/// Advances every spherical body by one tick
#[derive(Debug, Clone)]
pub struct SphericalBodySystem {
    kill_plane_z: f32,
    last_run: BodyPassStats,
}

impl SphericalBodySystem {
    /// Create the system with the height below which bodies are removed
    pub fn new(kill_plane_z: f32) -> Self {
        Self {
            kill_plane_z,
            last_run: BodyPassStats::default(),
        }
    }

    /// Change the kill plane height
    pub fn set_kill_plane(&mut self, kill_plane_z: f32) {
        self.kill_plane_z = kill_plane_z;
    }

    /// Counters from the most recent run
    pub fn last_run(&self) -> BodyPassStats {
        self.last_run
    }

    /// Step every body once
    ///
    /// # Panics
    /// When a body has no transform; the world never lets that happen.
    pub fn run(
        &mut self,
        world: &mut World,
        ctx: &StepContext<'_>,
        tick: u64,
        commands: &mut CommandBuffer,
        events: &mut EventQueue,
    ) {
        let mut stats = BodyPassStats::default();
        let tables = world.physics_tables();

        for (entity, body) in tables.bodies.iter_mut() {
            if commands.is_despawn_pending(entity) {
                stats.skipped += 1;
                continue;
            }

            let Some(transform) = tables.transforms.get_mut(entity) else {
                panic!("spherical body {entity} has no transform");
            };

            let snapshot = BodySnapshot {
                position: transform.position,
                velocity: body.velocity,
                radius: body.radius,
                state: body.state,
            };
            let outcome = body_state::step(ctx, &snapshot);

            if outcome.state != snapshot.state {
                log::debug!("body {} {:?} -> {:?}", entity, snapshot.state, outcome.state);
            }
            log::trace!(
                "body {} pos={:?} vel={:?} contact={:?}",
                entity,
                outcome.position,
                outcome.velocity,
                outcome.contact
            );

            transform.position = outcome.position;
            body.velocity = outcome.velocity;
            body.state = outcome.state;
            stats.stepped += 1;

            if let Some(kind) = outcome.event {
                events.send(BodyEvent { entity, tick, kind });
            }

            if outcome.position.z < self.kill_plane_z {
                log::info!("body {} fell below kill plane at z={:.1}", entity, outcome.position.z);
                commands.despawn(entity);
                events.send(BodyEvent {
                    entity,
                    tick,
                    kind: BodyEventKind::FellOutOfWorld { z: outcome.position.z },
                });
                stats.killed += 1;
            }
        }

        self.last_run = stats;
    }
}
