//! Movement systems (frame step)
//!
//! ground_detection → drive_movement → integrate_character → sync_viewer_height
//! → sync_character_capsule

use bevy::prelude::*;

use super::components::{CharacterCapsule, MovementController};
use super::controller::MoveFrame;
use super::events::{Jumped, Landed};
use crate::camera::Viewer;
use crate::input::ViewerInput;
use crate::logger;
use crate::physics::GroundLevel;
use crate::stamina::Stamina;

/// Допуск над полом, внутри которого персонаж считается стоящим
const GROUND_TOLERANCE: f32 = 0.01;

/// Система ground detection через простую Y-проверку
///
/// Плоский пол на `GroundLevel`, Transform персонажа - на уровне ступней.
/// Scene raycast'ы под ногами - забота клиента (step assist, slopes).
pub fn ground_detection(mut query: Query<(&Transform, &mut MovementController)>, ground: Res<GroundLevel>) {
    for (transform, mut controller) in query.iter_mut() {
        controller.state.grounded = transform.translation.y <= ground.0 + GROUND_TOLERANCE;
    }
}

/// Система: input + stamina → скорость персонажа
pub fn drive_movement(
    mut query: Query<(Entity, &ViewerInput, &Viewer, &mut MovementController, &mut Stamina)>,
    mut jumped: EventWriter<Jumped>,
    mut landed: EventWriter<Landed>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    for (entity, input, viewer, mut controller, mut stamina) in query.iter_mut() {
        let (forward, right) = viewer.flat_basis();
        let frame = MoveFrame {
            move_input: input.move_input,
            run: input.run,
            jump_pressed: input.jump_pressed,
            jump_held: input.jump_held,
            crouch_pressed: input.crouch_pressed,
            forward,
            right,
            delta,
        };

        let cost = stamina.current_jump_cost();
        let outcome = controller.step(&frame, &mut stamina);

        if outcome.jumped {
            jumped.write(Jumped {
                entity,
                stamina_cost: cost,
            });
            logger::log(&format!("{:?} jumped (cost {:.1}, stamina {:.1})", entity, cost, stamina.current()));
        }
        if outcome.landed {
            landed.write(Landed { entity });
        }
    }
}

/// Система интеграции velocity → Transform персонажа
///
/// Пол не даёт провалиться: ниже `GroundLevel` не опускаемся.
pub fn integrate_character(
    mut query: Query<(&MovementController, &mut Transform)>,
    ground: Res<GroundLevel>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (controller, mut transform) in query.iter_mut() {
        transform.translation += controller.state.velocity() * delta;

        if transform.translation.y < ground.0 {
            transform.translation.y = ground.0;
        }
    }
}

/// Высота глаз viewer'а следует за camera mount высотой (crouch blend)
pub fn sync_viewer_height(mut query: Query<(&MovementController, &mut Viewer)>) {
    for (controller, mut viewer) in query.iter_mut() {
        viewer.eye_height = controller.state.camera_height;
    }
}

/// Порог, ниже которого капсула не пересобирается
const CAPSULE_HEIGHT_EPSILON: f32 = 1e-3;

/// Высота капсулы следует за crouch blend'ом
pub fn sync_character_capsule(mut query: Query<(&MovementController, &mut CharacterCapsule)>) {
    for (controller, mut capsule) in query.iter_mut() {
        let height = controller.state.current_height;
        if (capsule.height - height).abs() > CAPSULE_HEIGHT_EPSILON {
            capsule.height = height;
        }
    }
}
