//! Grapplehook headless demo.
//!
//! Builds a tiny scene (a ground slab and a tower), spawns a first-person
//! player looking at the tower and runs the grapple systems for a fixed
//! number of frames, pressing the trigger on the requested frames.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --press 10 --press 200
//! cargo run -- --write-config grapple.ini
//! ```

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use clap::Parser;
use glam::Vec3;
use log::{debug, info, warn};
use std::path::PathBuf;

use grapplehook::components::aim::{Aim, GunTip};
use grapplehook::components::fpscontroller::FirstPersonController;
use grapplehook::components::grapple::Grapple;
use grapplehook::components::rope::GrappleRope;
use grapplehook::components::worldposition::WorldPosition;
use grapplehook::events::grapple::{
    GrappleAbortEvent, grapple_abort_observer, grapple_event_logger,
};
use grapplehook::resources::anchorquery::{AnchorQuerySource, SolidBox, StaticColliders};
use grapplehook::resources::grappleconfig::GrappleConfig;
use grapplehook::resources::input::InputState;
use grapplehook::resources::worldtime::WorldTime;
use grapplehook::systems::grapple::add_grapple_systems;
use grapplehook::systems::time::update_world_time;

const GROUND_LAYER: u8 = 0;
const GRAPPLEABLE_LAYER: u8 = 1;

/// Grapplehook headless demo
#[derive(Parser)]
#[command(version, about = "Runs the grappling hook against a demo scene without a window.")]
struct Cli {
    /// Grapple configuration file. Defaults are used if it can't be loaded.
    #[arg(long, value_name = "PATH", default_value = "./grapple.ini")]
    config: PathBuf,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 240)]
    frames: u32,

    /// Unscaled frame delta in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Frame on which the grapple trigger is pressed. Can be repeated.
    #[arg(long = "press", value_name = "FRAME")]
    presses: Vec<u32>,

    /// Frame on which the attempt in flight is aborted.
    #[arg(long, value_name = "FRAME")]
    abort_at: Option<u32>,

    /// Write the default configuration to PATH and exit.
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

fn demo_scene() -> StaticColliders {
    StaticColliders::new()
        .with_box(SolidBox::new(
            Vec3::new(-200.0, -1.0, -200.0),
            Vec3::new(200.0, 0.0, 200.0),
            GROUND_LAYER,
        ))
        .with_box(SolidBox::new(
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(14.0, 20.0, 14.0),
            GRAPPLEABLE_LAYER,
        ))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Early-exit: write default config and quit
    if let Some(path) = cli.write_config {
        if let Err(e) = GrappleConfig::with_path(path.clone()).save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Grapple config written to {}", path.display());
        return;
    }

    let mut config = GrappleConfig::with_path(cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }

    let presses = if cli.presses.is_empty() {
        vec![10]
    } else {
        cli.presses
    };

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputState::default());
    world.insert_resource(config);
    let scene = demo_scene();
    info!("Demo scene has {} colliders", scene.boxes().len());
    world.insert_resource(AnchorQuerySource::new(scene));

    world.spawn(Observer::new(grapple_abort_observer));
    world.spawn(Observer::new(grapple_event_logger));
    world.flush();

    let player = world
        .spawn((
            WorldPosition::new(0.0, 1.0, 0.0),
            Aim::new(Vec3::new(0.0, 0.6, 0.0), Vec3::new(1.0, 0.0, 1.0)),
            GunTip::new(Vec3::new(0.3, 0.4, 0.3)),
            FirstPersonController::new(),
            Grapple::new(),
            GrappleRope::new(),
        ))
        .id();

    let mut update = Schedule::default();
    add_grapple_systems(&mut update);

    info!(
        "Simulating {} frames at dt={}s, trigger on frames {:?}",
        cli.frames, cli.dt, presses
    );

    for frame in 0..cli.frames {
        world
            .resource_mut::<InputState>()
            .grapple
            .update(presses.contains(&frame));

        if cli.abort_at == Some(frame) {
            world.trigger(GrappleAbortEvent { entity: player });
        }

        update_world_time(&mut world, cli.dt);
        update.run(&mut world);

        if let (Some(pos), Some(grapple)) = (
            world.get::<WorldPosition>(player),
            world.get::<Grapple>(player),
        ) {
            debug!(
                "frame {:>4}: pos={:?} phase={:?} cooldown={:.3}",
                frame,
                pos.pos,
                grapple.phase(),
                grapple.cooldown_remaining()
            );
        }
    }

    match world.get::<WorldPosition>(player) {
        Some(pos) => println!("Final player position: {:?}", pos.pos),
        None => eprintln!("Player entity vanished"),
    }
}
