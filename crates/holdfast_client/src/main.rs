use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use holdfast_simulation::{FixedSet, PlayerTuning, SimulationPlugin, FIXED_STEP};

mod camera;
mod input;
mod rendering;

use camera::FirstPersonCameraPlugin;
use input::InputMappingPlugin;
use rendering::RenderingSyncPlugin;

/// Tuning рядом с бинарником; нет файла → дефолты
const TUNING_PATH: &str = "holdfast.toml";

fn main() {
    holdfast_simulation::init_logger();
    let tuning = load_tuning();

    App::new()
        // Bevy defaults (rendering, input, time, etc.)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "HOLDFAST - Player Controller".to_string(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        // Simulation (ECS logic), тела двигает Rapier
        .add_plugins(SimulationPlugin::rapier())
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        // Один шаг Rapier'а = один FIXED_STEP
        .insert_resource(TimestepMode::Fixed {
            dt: FIXED_STEP.as_secs_f32(),
            substeps: 1,
        })
        // Grab/joint правят velocity до шага Rapier'а
        .configure_sets(FixedUpdate, FixedSet::Integrate.before(PhysicsSet::SyncBackend))
        // Keyboard/mouse → ViewerInput
        .add_plugins(InputMappingPlugin)
        // Camera follows viewer + fatigue effects
        .add_plugins(FirstPersonCameraPlugin)
        // Meshes, highlight, crosshair
        .add_plugins(RenderingSyncPlugin)
        .insert_resource(tuning)
        .add_systems(Startup, rendering::setup_scene)
        .run();
}

fn load_tuning() -> PlayerTuning {
    if !std::path::Path::new(TUNING_PATH).exists() {
        return PlayerTuning::default();
    }

    match PlayerTuning::load(TUNING_PATH) {
        Ok(tuning) => tuning,
        Err(err) => {
            holdfast_simulation::log_error(&format!("{}: {}, using defaults", TUNING_PATH, err));
            PlayerTuning::default()
        }
    }
}
