//! Player и spawn helpers для мира
//!
//! Игрок собирается из подсистем: stamina, movement, viewer, grabber,
//! interaction focus, fatigue effects. Breathing anchor - отдельная entity,
//! камера клиента крепится к ней как к локальному offset'у.

use bevy::prelude::*;

use crate::camera::Viewer;
use crate::config::PlayerTuning;
use crate::effects::{BreathingAnchor, FatigueEffects};
use crate::grab::{GrabbableConfig, GrabbableEntity, Grabber};
use crate::input::ViewerInput;
use crate::interaction::{Crosshair, Interactable, InteractionFocus, InteractionKind};
use crate::movement::{CharacterCapsule, MovementController};
use crate::physics::{BodyShape, PhysicsBody, QueryLayers};
use crate::shared::collision_layers::{
    COLLISION_LAYER_ACTORS, COLLISION_LAYER_GRABBABLES, COLLISION_LAYER_INTERACTABLES,
};
use crate::stamina::Stamina;

/// Marker component для player-controlled entity
///
/// Input и crosshair состояние добавляются автоматически (Required Components).
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(ViewerInput, Crosshair)]
pub struct Player;

/// Spawn игрока (Transform на уровне ступней)
pub fn spawn_player(commands: &mut Commands, position: Vec3, tuning: &PlayerTuning) -> Entity {
    let anchor = commands.spawn((BreathingAnchor, Transform::IDENTITY)).id();

    commands
        .spawn((
            Player,
            Transform::from_translation(position),
            Stamina::new(tuning.stamina),
            MovementController::new(tuning.movement),
            CharacterCapsule::new(&tuning.movement),
            Viewer::new(tuning.look, tuning.movement.camera_standing_height),
            Grabber::new(tuning.grabber),
            InteractionFocus::new(tuning.interaction),
            FatigueEffects::new(tuning.fatigue_effects, Some(anchor)),
            QueryLayers(COLLISION_LAYER_ACTORS),
        ))
        .id()
}

/// Spawn объекта, который можно взять (масса из `config.weight`)
pub fn spawn_grabbable(commands: &mut Commands, position: Vec3, shape: BodyShape, config: GrabbableConfig) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            PhysicsBody::with_mass(config.weight),
            shape,
            QueryLayers(COLLISION_LAYER_GRABBABLES),
            GrabbableEntity::new(config),
            Interactable::new(InteractionKind::Grab),
        ))
        .id()
}

/// Spawn статичного interactable (кнопка, табличка)
pub fn spawn_interactable(commands: &mut Commands, position: Vec3, shape: BodyShape, kind: InteractionKind) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            shape,
            QueryLayers(COLLISION_LAYER_INTERACTABLES),
            Interactable::new(kind),
        ))
        .id()
}
