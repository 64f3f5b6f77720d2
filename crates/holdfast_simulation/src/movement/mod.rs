//! Movement domain - first-person контроллер персонажа
//!
//! Содержит:
//! - MovementController (config + state: скорость, прыжок, coyote, crouch)
//! - MoveFrame/step - чистая логика кадра, тестируется без App
//! - Jumped/Landed events
//! - CharacterCapsule + Rapier character controller (клиент)
//!
//! Stamina тянется каждый кадр (can_run, try_consume_jump, speed_multiplier).

pub mod components;
pub mod controller;
pub mod events;
pub mod rapier_character;
pub mod systems;


use bevy::prelude::*;

pub use components::{CharacterCapsule, MovementConfig, MovementController, MovementState};
pub use controller::{MoveFrame, MoveOutcome};
pub use events::{Jumped, Landed};
pub use rapier_character::{
    capsule_collider, drive_rapier_character, rapier_character_bundle, read_rapier_grounding, resize_rapier_capsules,
};
pub use systems::{drive_movement, ground_detection, integrate_character, sync_character_capsule, sync_viewer_height};

use crate::physics::PhysicsBackend;
use crate::FrameSet;

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Jumped>()
            .add_event::<Landed>()
            .register_type::<MovementController>()
            .register_type::<CharacterCapsule>();

        app.add_systems(
            Update,
            (
                (
                    ground_detection.run_if(resource_equals(PhysicsBackend::Headless)),
                    read_rapier_grounding.run_if(resource_equals(PhysicsBackend::Rapier)),
                ),
                drive_movement,
                (
                    integrate_character.run_if(resource_equals(PhysicsBackend::Headless)),
                    drive_rapier_character.run_if(resource_equals(PhysicsBackend::Rapier)),
                ),
                sync_viewer_height,
                sync_character_capsule,
                resize_rapier_capsules.run_if(resource_equals(PhysicsBackend::Rapier)),
            )
                .chain() // Последовательное выполнение
                .in_set(FrameSet::Movement),
        );
    }
}
