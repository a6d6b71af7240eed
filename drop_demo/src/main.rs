//! Drop demo application
//!
//! Headless driver for the sphere kernel. Loads a level (or builds one),
//! drops a handful of random spheres, walks a controlled sphere over a ramp
//! and off a ledge, and logs every state transition.
//!
//! ```text
//! drop_demo [LEVEL.ron|LEVEL.toml] [--config KERNEL.toml] [--frames N] [--seed N]
//! drop_demo --help
//! ```

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sphere_kernel::foundation::logging;
use sphere_kernel::prelude::*;

/// Demo errors
#[derive(thiserror::Error, Debug)]
enum DemoError {
    /// Scene could not be configured or loaded
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Headless sphere kernel driver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Options {
    /// Level file (.ron or .toml); a built-in ramp level is used when omitted
    level: Option<PathBuf>,

    /// Kernel configuration file (.ron or .toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of variable-length frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u32,

    /// Seed for body placement and frame timing
    #[arg(short, long, default_value_t = 0x5eed)]
    seed: u64,
}

/// Logs every body event; never consumes
struct EventLogger;

impl BodyEventHandler for EventLogger {
    fn on_event(&mut self, event: &BodyEvent) -> bool {
        match event.kind {
            BodyEventKind::Landed { impact_speed } => {
                log::info!("[tick {}] {} landed at {:.2} u/s", event.tick, event.entity, impact_speed);
            }
            BodyEventKind::LeftGround => log::info!("[tick {}] {} left the ground", event.tick, event.entity),
            BodyEventKind::HitCeiling => log::info!("[tick {}] {} hit a ceiling", event.tick, event.entity),
            BodyEventKind::Jumped => log::info!("[tick {}] {} jumped", event.tick, event.entity),
            BodyEventKind::FellOutOfWorld { z } => {
                log::warn!("[tick {}] {} fell out of the world at z={:.1}", event.tick, event.entity, z);
            }
        }
        false
    }
}

/// Floor, a 30 degree ramp and a raised platform ending in a ledge
fn built_in_level() -> LevelDescription {
    let rise = 6.0 * 30f32.to_radians().tan();
    let ramp = TerrainPieceDescription::world_space(vec![
        0.0, -3.0, 0.0, 6.0, -3.0, rise, 6.0, 3.0, rise,
        0.0, -3.0, 0.0, 6.0, 3.0, rise, 0.0, 3.0, 0.0,
    ])
    .with_model(&Mat4::new_translation(&Vec3::new(5.0, 0.0, 0.0)));

    LevelDescription::named("built-in ramp")
        .with_terrain(TerrainPieceDescription::floor(0.0, [-20.0, -20.0], [20.0, 20.0]))
        .with_terrain(ramp)
        .with_terrain(TerrainPieceDescription::floor(rise, [11.0, -3.0], [16.0, 3.0]))
        .with_body(BodyDescription::at(Vec3::new(-5.0, 0.0, 0.5), 0.5).controlled())
}

fn scatter_bodies(scene: &mut SceneManager, rng: &mut StdRng, count: usize) -> Result<(), DemoError> {
    for _ in 0..count {
        let position = Vec3::new(
            rng.gen_range(-15.0..15.0),
            rng.gen_range(-15.0..15.0),
            rng.gen_range(5.0..15.0),
        );
        let radius = rng.gen_range(0.25..0.75);
        scene.spawn_body(TransformComponent::from_position(position), SphericalBody::new(radius))?;
    }
    Ok(())
}

/// Scripted input: walk toward +X, jump once, reset near the end
fn scripted_input(frame: u32, frames: u32) -> TickInput {
    let walk = TickInput::moving(Vec2::new(1.0, 0.0));
    match frame {
        60 => walk.with_jump(),
        f if f + 60 == frames => TickInput::idle().with_reset(),
        f if f + 60 > frames => TickInput::idle(),
        _ => walk,
    }
}

fn run(options: &Options) -> Result<(), DemoError> {
    let mut scene = match &options.config {
        Some(path) => SceneManager::from_config_file(path)?,
        None => SceneManager::new(),
    };
    scene.register_for_all(|| EventLogger);

    match &options.level {
        Some(path) => {
            log::info!("Loading level from {}", path.display());
            scene.load_level_file(path)?;
        }
        None => {
            scene.load_level(&built_in_level())?;
        }
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    scatter_bodies(&mut scene, &mut rng, 8)?;

    let mut ticks = 0;
    for frame in 0..options.frames {
        let frame_dt = rng.gen_range(0.010..0.024);
        ticks += scene.advance(frame_dt, &scripted_input(frame, options.frames));
    }

    for (entity, transform) in scene.transforms() {
        let state = scene.world().body(entity).map(|body| body.state);
        log::info!("{} at {:?} {:?}", entity, transform.position, state);
    }

    let stats = scene.stats();
    log::info!(
        "{} frames, {} ticks, {} bodies, {} terrain pieces ({} triangles), {} events, last tick {}us",
        options.frames,
        ticks,
        stats.body_count,
        stats.terrain_piece_count,
        stats.triangle_count,
        stats.events_dispatched,
        stats.last_tick_us
    );
    Ok(())
}

fn main() {
    logging::init();
    log::info!("Starting sphere kernel drop demo");

    let options = Options::parse();
    if let Err(e) = run(&options) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
