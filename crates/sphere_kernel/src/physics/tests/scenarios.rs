use approx::assert_relative_eq;

use super::Harness;
use crate::ecs::components::{BodyState, ControllerComponent, SphericalBody, TransformComponent};
use crate::events::BodyEventKind;
use crate::foundation::math::{Vec2, Vec3};
use crate::input::TickInput;
use crate::physics::collision::TriangleMesh;

const DT: f32 = 1.0 / 60.0;

fn single_triangle_floor(harness: &mut Harness) {
    let piece = harness.world.create_entity();
    harness.terrain.insert(
        piece,
        TriangleMesh::from_vertices(&[
            Vec3::new(-10.0, -10.0, 0.0),
            Vec3::new(10.0, -10.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
        ]),
    );
}

#[test]
fn test_resting_sphere_stays_put() {
    let mut harness = Harness::new(DT);
    single_triangle_floor(&mut harness);

    let start = Vec3::new(0.0, 0.0, 0.5);
    let body = harness.world.spawn_body(
        TransformComponent::from_position(start),
        SphericalBody::grounded(0.5),
    );

    let events = harness.step(&TickInput::idle());
    assert!(events.is_empty());
    assert_eq!(harness.position(body), start);
    assert_eq!(harness.world.body(body).map(|b| b.state), Some(BodyState::Grounded));

    for _ in 0..600 {
        harness.step(&TickInput::idle());
    }
    assert_eq!(harness.position(body), start);
}

#[test]
fn test_fall_from_height_lands_exactly_once() {
    let mut harness = Harness::new(DT);
    single_triangle_floor(&mut harness);

    let body = harness.world.spawn_body(
        TransformComponent::from_position(Vec3::new(0.0, 0.0, 5.0)),
        SphericalBody::new(0.5),
    );

    let mut landings = 0;
    let mut left_ground = 0;
    let mut previous = BodyState::Falling;
    let mut transitions = 0;

    for _ in 0..600 {
        for event in harness.step(&TickInput::idle()) {
            match event.kind {
                BodyEventKind::Landed { .. } => landings += 1,
                BodyEventKind::LeftGround => left_ground += 1,
                other => panic!("unexpected event {other:?}"),
            }
        }
        let state = harness.world.body(body).map_or(previous, |b| b.state);
        if state != previous {
            transitions += 1;
            previous = state;
        }
        assert!(harness.position(body).z >= 0.5 - 1e-4);
    }

    assert_eq!(landings, 1);
    assert_eq!(left_ground, 0);
    assert_eq!(transitions, 1);
    assert_eq!(harness.world.body(body).map(|b| b.state), Some(BodyState::Grounded));
    assert_relative_eq!(harness.position(body).z, 0.5);
}

#[test]
fn test_fast_fall_does_not_tunnel_through_thin_floor() {
    let mut harness = Harness::new(1.0 / 30.0);
    single_triangle_floor(&mut harness);

    let body = harness.world.spawn_body(
        TransformComponent::from_position(Vec3::new(5.0, -5.0, 40.0)),
        SphericalBody::new(0.5).with_velocity(Vec3::new(0.0, 0.0, -100.0)),
    );

    let mut landed = false;
    for _ in 0..60 {
        for event in harness.step(&TickInput::idle()) {
            if let BodyEventKind::Landed { impact_speed } = event.kind {
                assert_relative_eq!(impact_speed, 100.0, epsilon = 1e-3);
                landed = true;
            }
        }
        assert!(harness.position(body).z > 0.0);
    }

    assert!(landed);
    assert_relative_eq!(harness.position(body).z, 0.5);
}

#[test]
fn test_walking_off_a_ledge_falls_to_the_floor_below() {
    let mut harness = Harness::new(DT);
    harness.add_floor(0.0, (-10.0, -10.0), (0.0, 10.0));
    harness.add_floor(-5.0, (-10.0, -10.0), (30.0, 10.0));

    let body = harness.world.spawn_controlled_body(
        TransformComponent::from_position(Vec3::new(-3.0, 0.0, 0.5)),
        SphericalBody::grounded(0.5),
        ControllerComponent {
            move_speed: 5.0,
            jump_speed: 8.0,
            spawn_point: Vec3::new(-3.0, 0.0, 0.5),
        },
    );

    let walk = TickInput::moving(Vec2::new(1.0, 0.0));
    let mut left_ground = false;
    let mut landed = false;
    for _ in 0..240 {
        for event in harness.step(&walk) {
            match event.kind {
                BodyEventKind::LeftGround => left_ground = true,
                BodyEventKind::Landed { .. } => landed = true,
                _ => {}
            }
        }
    }

    assert!(left_ground);
    assert!(landed);
    let position = harness.position(body);
    assert!(position.x > 0.5);
    assert_relative_eq!(position.z, -4.5, epsilon = 1e-5);
    assert_eq!(harness.world.body(body).map(|b| b.state), Some(BodyState::Grounded));
}

#[test]
fn test_jump_leaves_and_returns_to_the_ground() {
    let mut harness = Harness::new(DT);
    harness.add_floor(0.0, (-10.0, -10.0), (10.0, 10.0));

    let body = harness.world.spawn_controlled_body(
        TransformComponent::from_position(Vec3::new(0.0, 0.0, 0.5)),
        SphericalBody::grounded(0.5),
        ControllerComponent::at(Vec3::new(0.0, 0.0, 0.5)),
    );

    let events = harness.step(&TickInput::idle().with_jump());
    assert!(events.iter().any(|e| e.kind == BodyEventKind::Jumped));
    assert!(harness.position(body).z > 0.5);

    // A second press mid-air does nothing
    let events = harness.step(&TickInput::idle().with_jump());
    assert!(events.iter().all(|e| e.kind != BodyEventKind::Jumped));

    let mut landed = 0;
    for _ in 0..120 {
        landed += harness
            .step(&TickInput::idle())
            .iter()
            .filter(|e| matches!(e.kind, BodyEventKind::Landed { .. }))
            .count();
    }
    assert_eq!(landed, 1);
    assert_relative_eq!(harness.position(body).z, 0.5);
}

#[test]
fn test_despawned_bodies_vanish_from_every_table() {
    let mut harness = Harness::new(DT);
    harness.system.set_kill_plane(-2.0);
    harness.add_floor(0.0, (-10.0, -10.0), (10.0, 10.0));

    let resting = harness.world.spawn_body(
        TransformComponent::from_position(Vec3::new(0.0, 0.0, 0.5)),
        SphericalBody::grounded(0.5),
    );
    let lost = harness.world.spawn_body(
        TransformComponent::from_position(Vec3::new(50.0, 0.0, 0.0)),
        SphericalBody::new(0.5),
    );
    let removed = harness.world.spawn_body(
        TransformComponent::from_position(Vec3::new(3.0, 3.0, 4.0)),
        SphericalBody::new(0.5),
    );

    harness.commands.despawn(removed);
    harness.step(&TickInput::idle());
    assert!(!harness.world.contains(removed));
    assert!(harness.world.body(removed).is_none());
    assert!(harness.world.transform(removed).is_none());

    let mut fell_at = None;
    for tick in 0..120 {
        let events = harness.step(&TickInput::idle());
        if events
            .iter()
            .any(|e| e.entity == lost && matches!(e.kind, BodyEventKind::FellOutOfWorld { .. }))
        {
            assert!(fell_at.is_none(), "reported twice");
            fell_at = Some(tick);
            assert!(!harness.world.contains(lost));
        }
        assert!(events.iter().all(|e| e.entity != removed));
    }

    assert!(fell_at.is_some());
    assert!(harness.world.body(lost).is_none());
    assert!(harness.world.transform(lost).is_none());
    assert_eq!(harness.world.body_count(), 1);
    assert_eq!(harness.position(resting), Vec3::new(0.0, 0.0, 0.5));
}
