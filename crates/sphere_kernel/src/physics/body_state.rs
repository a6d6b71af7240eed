//! Spherical body state machine
//!
//! Two states, [`BodyState::Grounded`] and [`BodyState::Falling`], each with
//! one pure transition function. A transition reads an immutable view of the
//! terrain plus a snapshot of the body and returns the new position, velocity
//! and state; it never touches the component tables itself.
//!
//! Contacts are classified by the dot product of the contact normal with the
//! world up vector. The thresholds are fixed: `>= 0.5` is a floor (slopes up
//! to 60 degrees), `< -0.1` is a ceiling, anything else is a wall.

use crate::core::PhysicsConfig;
use crate::ecs::components::BodyState;
use crate::events::BodyEventKind;
use crate::foundation::math::{horizontal, up, Vec3};
use super::collision::Segment;
use super::terrain::Terrain;

/// Minimum `normal · up` of a floor-like surface (inclusive)
pub const FLOOR_THRESHOLD: f32 = 0.5;

/// `normal · up` below which a surface is ceiling-like (exclusive)
pub const CEILING_THRESHOLD: f32 = -0.1;

/// Whether `normal` faces up enough to stand on
#[inline]
pub fn is_floor_like(normal: &Vec3) -> bool {
    normal.dot(&up()) >= FLOOR_THRESHOLD
}

/// Whether `normal` faces down enough to bump a head on
#[inline]
pub fn is_ceiling_like(normal: &Vec3) -> bool {
    normal.dot(&up()) < CEILING_THRESHOLD
}

/// How a contact is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    /// Floor-like normal met while moving down: stop and ground
    Floor,
    /// Ceiling-like normal met while moving up: kill vertical velocity
    Ceiling,
    /// Anything else: slide along the surface
    Wall,
}

/// Classify a contact from its normal and the body velocity at impact
pub fn classify_contact(normal: &Vec3, velocity: &Vec3) -> ContactKind {
    if is_floor_like(normal) && velocity.z <= 0.0 {
        ContactKind::Floor
    } else if is_ceiling_like(normal) && velocity.z > 0.0 {
        ContactKind::Ceiling
    } else {
        ContactKind::Wall
    }
}

/// Immutable inputs shared by every body during one tick
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Static terrain
    pub terrain: &'a Terrain,
    /// Integrator tunables
    pub config: &'a PhysicsConfig,
    /// Tick length in seconds
    pub dt: f32,
}

/// The parts of a body a transition reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    /// Sphere center
    pub position: Vec3,
    /// Linear velocity
    pub velocity: Vec3,
    /// Sphere radius
    pub radius: f32,
    /// Contact state
    pub state: BodyState,
}

/// Result of one transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// New sphere center
    pub position: Vec3,
    /// New velocity
    pub velocity: Vec3,
    /// New contact state
    pub state: BodyState,
    /// Last contact resolved during the step
    pub contact: Option<ContactKind>,
    /// State transition worth telling the outside world about
    pub event: Option<BodyEventKind>,
}

impl StepOutcome {
    fn unchanged(body: &BodySnapshot) -> Self {
        Self {
            position: body.position,
            velocity: body.velocity,
            state: body.state,
            contact: None,
            event: None,
        }
    }
}

/// Advance one body by one tick, dispatching on its state
pub fn step(ctx: &StepContext<'_>, body: &BodySnapshot) -> StepOutcome {
    match body.state {
        BodyState::Grounded => step_grounded(ctx, body),
        BodyState::Falling => step_falling(ctx, body),
    }
}

/// Grounded transition
///
/// Moves horizontally with the sphere lifted by the probe epsilon so the
/// floor it rests on is not swept against. Floor-like contacts never block
/// the move; the earliest wall or ceiling contact clamps it. Then probes
/// straight down by `radius + epsilon`: a floor-like hit snaps the body to
/// rest exactly `radius` above it, anything else starts a fall.
pub fn step_grounded(ctx: &StepContext<'_>, body: &BodySnapshot) -> StepOutcome {
    let config = ctx.config;
    let mut out = StepOutcome::unchanged(body);

    let displacement = horizontal(&body.velocity) * ctx.dt;
    if displacement.norm_squared() > 0.0 {
        let lift = up() * config.ground_probe_epsilon;
        let motion = Segment::new(body.position + lift, body.position + lift + displacement);
        let hit = ctx
            .terrain
            .sweep_sphere_where(body.radius, &motion, |contact| !is_floor_like(&contact.normal));

        if hit.hit {
            let push = horizontal(&hit.normal).try_normalize(f32::EPSILON);
            out.position += displacement * hit.t;
            match push {
                Some(n) => {
                    out.position += n * config.skin_width;
                    remove_into_normal(&mut out.velocity, &n);
                }
                None => {
                    out.velocity.x = 0.0;
                    out.velocity.y = 0.0;
                }
            }
            out.contact = Some(ContactKind::Wall);
            log::trace!("grounded move clamped at t={:.4} normal={:?}", hit.t, hit.normal);
        } else {
            out.position += displacement;
        }
    }

    let probe_length = body.radius + config.ground_probe_epsilon;
    let probe = Segment::new(out.position, out.position - up() * probe_length);
    let ground = ctx.terrain.intersect_segment(&probe);

    if ground.hit && is_floor_like(&ground.normal) {
        out.position.z = ground.point.z + body.radius;
        out.velocity.z = 0.0;
        out.state = BodyState::Grounded;
        out.contact.get_or_insert(ContactKind::Floor);
    } else {
        out.state = BodyState::Falling;
        out.event = Some(BodyEventKind::LeftGround);
        log::debug!("ground lost at {:?}", out.position);
    }

    out
}

/// Falling transition
///
/// Integrates gravity, then sweeps the sphere along its motion. A hit clamps
/// the center to the contact point offset by `radius` (plus skin) along the
/// contact normal and the remaining motion continues as a slide for up to
/// `max_resolve_iterations` more sweeps. When the last sweep reports nothing
/// a closest-point check at the end position catches any residual overlap.
pub fn step_falling(ctx: &StepContext<'_>, body: &BodySnapshot) -> StepOutcome {
    let config = ctx.config;
    let mut out = StepOutcome::unchanged(body);

    out.velocity.z = (out.velocity.z - config.gravity * ctx.dt).max(-config.terminal_velocity);

    let mut remaining = out.velocity * ctx.dt;
    let mut last_sweep_hit = false;

    for _ in 0..=config.max_resolve_iterations {
        if remaining.norm_squared() <= 0.0 {
            break;
        }

        let motion = Segment::new(out.position, out.position + remaining);
        let hit = ctx.terrain.sweep_sphere(body.radius, &motion);
        if !hit.hit {
            out.position = motion.end;
            last_sweep_hit = false;
            break;
        }

        last_sweep_hit = true;
        out.position = hit.point + hit.normal * (body.radius + config.skin_width);
        remaining *= 1.0 - hit.t;

        let kind = classify_contact(&hit.normal, &out.velocity);
        resolve_contact(&mut out, kind, &hit.normal);
        log::trace!("falling contact {:?} at t={:.4} normal={:?}", kind, hit.t, hit.normal);

        if out.state.is_grounded() {
            return out;
        }

        remove_into_normal(&mut remaining, &hit.normal);
        if kind == ContactKind::Ceiling {
            remaining.z = 0.0;
        }
    }

    if !last_sweep_hit {
        let closest = ctx.terrain.closest_point(&out.position);
        if closest.distance < body.radius {
            let normal = (out.position - closest.point)
                .try_normalize(f32::EPSILON)
                .unwrap_or(closest.normal);
            out.position = closest.point + normal * (body.radius + config.skin_width);

            let kind = classify_contact(&normal, &out.velocity);
            resolve_contact(&mut out, kind, &normal);
            log::trace!("falling overlap {:?} depth={:.5}", kind, body.radius - closest.distance);
        }
    }

    out
}

/// Apply the velocity response and state change for one contact
fn resolve_contact(out: &mut StepOutcome, kind: ContactKind, normal: &Vec3) {
    out.contact = Some(kind);
    match kind {
        ContactKind::Floor => {
            let impact_speed = (-out.velocity.dot(normal)).max(0.0);
            out.velocity = Vec3::zeros();
            out.state = BodyState::Grounded;
            out.event = Some(BodyEventKind::Landed { impact_speed });
            log::debug!("landed at {:?} with impact speed {:.3}", out.position, impact_speed);
        }
        ContactKind::Ceiling => {
            out.velocity.z = 0.0;
            out.event = Some(BodyEventKind::HitCeiling);
        }
        ContactKind::Wall => remove_into_normal(&mut out.velocity, normal),
    }
}

/// Drop the component of `v` that points into a surface with normal `n`
fn remove_into_normal(v: &mut Vec3, n: &Vec3) {
    let into = v.dot(n);
    if into < 0.0 {
        *v -= n * into;
    }
}
