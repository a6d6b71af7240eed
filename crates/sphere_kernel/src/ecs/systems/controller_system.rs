//! Input application system
//!
//! Turns the tick's [`TickInput`] into velocity and state changes on bodies
//! that carry a [`ControllerComponent`](crate::ecs::components::ControllerComponent).
//! Runs before the physics pass.

use crate::ecs::components::BodyState;
use crate::ecs::World;
use crate::events::{BodyEvent, BodyEventKind, EventQueue};
use crate::foundation::math::Vec3;
use crate::input::TickInput;

/// Applies the per-tick input snapshot to controlled bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerSystem;

impl ControllerSystem {
    /// Apply `input` to every controlled body
    ///
    /// Reset wins over everything else: the body is put back on its spawn
    /// point, at rest and falling. Otherwise the move axis sets the
    /// horizontal velocity and a jump is honoured only from the ground.
    pub fn run(world: &mut World, input: &TickInput, tick: u64, events: &mut EventQueue) {
        let axis = input.clamped_axis();
        let tables = world.physics_tables();

        for (entity, controller) in tables.controllers.iter() {
            let (Some(body), Some(transform)) =
                (tables.bodies.get_mut(entity), tables.transforms.get_mut(entity))
            else {
                continue;
            };

            if input.reset {
                transform.position = controller.spawn_point;
                body.velocity = Vec3::zeros();
                body.state = BodyState::Falling;
                log::debug!("body {} reset to {:?}", entity, controller.spawn_point);
                continue;
            }

            body.velocity.x = axis.x * controller.move_speed;
            body.velocity.y = axis.y * controller.move_speed;

            if input.jump && body.state.is_grounded() {
                body.velocity.z = controller.jump_speed;
                body.state = BodyState::Falling;
                events.send(BodyEvent {
                    entity,
                    tick,
                    kind: BodyEventKind::Jumped,
                });
            }
        }
    }
}
