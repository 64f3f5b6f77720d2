//! Персонаж под bevy_rapier3d
//!
//! Kinematic капсула + `KinematicCharacterController`: скорость контроллера
//! уходит в `translation`, Rapier двигает тело с учётом стен и ящиков и
//! сообщает grounded. Капсула пересобирается при crouch blend'е.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{CharacterCapsule, MovementController};
use crate::shared::collision_layers::actor_groups;

/// Rapier компоненты для капсулы персонажа (Transform на уровне ступней)
pub fn rapier_character_bundle(capsule: &CharacterCapsule) -> impl Bundle {
    (
        RigidBody::KinematicPositionBased,
        capsule_collider(capsule),
        KinematicCharacterController {
            custom_shape: Some(capsule_shape(capsule)),
            filter_groups: Some(actor_groups()),
            snap_to_ground: Some(CharacterLength::Absolute(0.2)),
            ..default()
        },
        actor_groups(),
    )
}

/// Collider для контактов с динамикой: капсула, поднятая над ступнями
pub fn capsule_collider(capsule: &CharacterCapsule) -> Collider {
    Collider::compound(vec![(
        capsule.center_offset(),
        Quat::IDENTITY,
        Collider::capsule_y(capsule.half_segment(), capsule.radius),
    )])
}

/// Shape для shape-cast'ов character controller'а
pub fn capsule_shape(capsule: &CharacterCapsule) -> (Collider, Vec3, Quat) {
    (
        Collider::capsule_y(capsule.half_segment(), capsule.radius),
        capsule.center_offset(),
        Quat::IDENTITY,
    )
}

/// Система: скорость контроллера → желаемое смещение
///
/// Смещения копятся до ближайшего fixed step'а (Rapier сбрасывает
/// `translation` в None, когда применил его).
pub fn drive_rapier_character(
    mut query: Query<(&MovementController, &mut KinematicCharacterController)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    for (controller, mut character) in query.iter_mut() {
        let step = controller.state.velocity() * delta;
        character.translation = Some(character.translation.unwrap_or(Vec3::ZERO) + step);
    }
}

/// Система: grounded из результата последнего шага Rapier'а
pub fn read_rapier_grounding(mut query: Query<(&KinematicCharacterControllerOutput, &mut MovementController)>) {
    for (output, mut controller) in query.iter_mut() {
        controller.state.grounded = output.grounded;
    }
}

/// Система: crouch blend поменял высоту → новый collider и shape
pub fn resize_rapier_capsules(
    mut query: Query<
        (&CharacterCapsule, &mut Collider, &mut KinematicCharacterController),
        Changed<CharacterCapsule>,
    >,
) {
    for (capsule, mut collider, mut character) in query.iter_mut() {
        *collider = capsule_collider(capsule);
        character.custom_shape = Some(capsule_shape(capsule));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::MovementConfig;

    #[test]
    fn test_capsule_shape_sits_on_feet() {
        let capsule = CharacterCapsule::new(&MovementConfig::default());
        let (_, offset, _) = capsule_shape(&capsule);

        assert_eq!(offset, Vec3::Y * 1.0);
        // 2m капсула радиусом 0.4 → цилиндр 1.2m
        assert!((capsule.half_segment() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_translation_accumulates_until_consumed() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(crate::FIXED_STEP))
            .add_systems(Update, drive_rapier_character);

        let mut controller = MovementController::default();
        controller.state.horizontal_velocity = Vec3::new(1.0, 0.0, 0.0);
        let entity = app
            .world_mut()
            .spawn((controller, KinematicCharacterController::default()))
            .id();

        // Первый update с delta 0
        app.update();
        app.update();
        app.update();

        let translation = app
            .world()
            .get::<KinematicCharacterController>(entity)
            .unwrap()
            .translation
            .unwrap();
        assert!((translation.x - 0.04).abs() < 1e-5, "translation = {:?}", translation);
    }
}
