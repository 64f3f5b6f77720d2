use bevy::prelude::*;
use holdfast_simulation::{FatigueEffects, FrameSet, Player, Viewer};

pub struct FirstPersonCameraPlugin;

impl Plugin for FirstPersonCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, follow_viewer.after(FrameSet::Effects));
    }
}

/// Камера в глазах игрока
#[derive(Component, Default)]
pub struct FirstPersonCamera;

/// Камера = глаза viewer'а, затем локальный offset breathing anchor'а
fn follow_viewer(
    players: Query<(&Transform, &Viewer, &FatigueEffects), With<Player>>,
    anchors: Query<&Transform, (Without<Player>, Without<FirstPersonCamera>)>,
    mut cameras: Query<(&mut Transform, &mut Projection), (With<FirstPersonCamera>, Without<Player>)>,
) {
    let Ok((body, viewer, effects)) = players.single() else {
        return;
    };
    let Ok((mut camera_transform, mut projection)) = cameras.single_mut() else {
        return;
    };

    let eyes = Transform::from_translation(viewer.origin(body)).with_rotation(viewer.rotation());
    let breathing = effects
        .anchor
        .filter(|_| !effects.is_disabled())
        .and_then(|anchor| anchors.get(anchor).ok())
        .copied()
        .unwrap_or(Transform::IDENTITY);

    *camera_transform = eyes * breathing;

    if let Projection::Perspective(perspective) = projection.as_mut() {
        let fov = effects.current_fov().to_radians();
        if perspective.fov != fov {
            perspective.fov = fov;
        }
    }
}
