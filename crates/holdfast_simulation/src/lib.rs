//! HOLDFAST Simulation Core
//!
//! First-person player controller на Bevy 0.16:
//! stamina, movement, grab/throw через spring joint, interaction targeting.
//!
//! Рендер и устройства ввода живут в клиенте, здесь только ECS логика.
//! Физика динамических тел: свой headless integrator или bevy_rapier3d.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

// Публичные модули
pub mod camera;
pub mod config;
pub mod effects;
pub mod grab;
pub mod input;
pub mod interaction;
pub mod logger;
pub mod movement;
pub mod physics;
pub mod player;
pub mod shared;
pub mod stamina;

// Re-export для удобства
pub use camera::{LookConfig, LookPlugin, Viewer};
pub use config::{PlayerTuning, TuningError};
pub use effects::{BreathingAnchor, EffectsPlugin, FatigueEffects, FatigueEffectsConfig};
pub use grab::{
    GrabEnded, GrabExit, GrabPhase, GrabPlugin, GrabRejected, GrabRejection, GrabStarted, GrabbableConfig,
    GrabbableEntity, Grabber, GrabberConfig,
};
pub use input::{InputPlugin, ViewerInput};
pub use interaction::{
    Crosshair, CrosshairChanged, CrosshairCursor, FocusGained, FocusLost, Interactable, Interacted, InteractionFocus,
    InteractionKind, InteractionPlugin,
};
pub use logger::*;
pub use movement::{CharacterCapsule, Jumped, Landed, MovementConfig, MovementController, MovementPlugin};
pub use physics::{BodyShape, PhysicsBackend, PhysicsBody, PhysicsPlugin, QueryLayers, SurfaceTag};
pub use player::{spawn_grabbable, spawn_interactable, spawn_player, Player};
pub use stamina::{FatigueEntered, FatigueExited, Fatigued, Stamina, StaminaChanged, StaminaConfig, StaminaPlugin};

/// Шаг FixedUpdate (50Hz): grab joint, velocity history, интеграция тел
pub const FIXED_STEP: Duration = Duration::from_millis(20);

/// Порядок покадровых подсистем (Update)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Look,
    Movement,
    Stamina,
    Interaction,
    Effects,
}

/// Порядок физических подсистем (FixedUpdate)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedSet {
    /// Rapier → PhysicsBody
    PhysicsSync,
    /// Команды grabber'а, anchor, spring joint
    Grab,
    /// Интеграция тел (headless) или PhysicsBody → Rapier
    Integrate,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationPlugin {
    pub backend: PhysicsBackend,
}

impl SimulationPlugin {
    pub fn headless() -> Self {
        Self {
            backend: PhysicsBackend::Headless,
        }
    }

    pub fn rapier() -> Self {
        Self {
            backend: PhysicsBackend::Rapier,
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Backend до PhysicsPlugin: init_resource не перезапишет
            .insert_resource(self.backend)
            .insert_resource(Time::<Fixed>::from_duration(FIXED_STEP))
            .configure_sets(
                Update,
                (
                    FrameSet::Look,
                    FrameSet::Movement,
                    FrameSet::Stamina,
                    FrameSet::Interaction,
                    FrameSet::Effects,
                )
                    .chain(),
            )
            .configure_sets(
                FixedUpdate,
                (FixedSet::PhysicsSync, FixedSet::Grab, FixedSet::Integrate).chain(),
            )
            .add_plugins((
                InputPlugin,
                LookPlugin,
                PhysicsPlugin,
                StaminaPlugin,
                MovementPlugin,
                GrabPlugin,
                InteractionPlugin,
                EffectsPlugin,
            ));
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную: каждый `update()` = ровно один `FIXED_STEP`
/// (первый update имеет delta 0, FixedUpdate в нём не запускается).
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FIXED_STEP))
        .add_plugins(SimulationPlugin::headless());

    app
}
