//! Viewer (first-person взгляд)
//!
//! Yaw/pitch храним отдельно от Transform персонажа: тело поворачивается
//! только по yaw, pitch - у камеры. Откуда смотрим (origin) и куда
//! (forward) - общий вход для movement, targeting и grab anchor'а.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::input::ViewerInput;
use crate::FrameSet;

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    /// Градусов на единицу mouse delta
    pub sensitivity: f32,
    /// Предел pitch вверх/вниз (градусы)
    pub max_look_angle: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.1,
            max_look_angle: 90.0,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Viewer {
    pub config: LookConfig,
    /// Радианы, 0 = смотрим в -Z
    pub yaw: f32,
    /// Радианы, вверх +
    pub pitch: f32,
    /// Высота глаз над Transform персонажа (следует за crouch)
    pub eye_height: f32,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(LookConfig::default(), 1.7)
    }
}

impl Viewer {
    pub fn new(config: LookConfig, eye_height: f32) -> Self {
        Self {
            config,
            yaw: 0.0,
            pitch: 0.0,
            eye_height,
        }
    }

    /// Применить mouse delta (pitch зажат в ±max_look_angle)
    pub fn look(&mut self, delta: Vec2) {
        let sensitivity = self.config.sensitivity.to_radians();
        let limit = self.config.max_look_angle.to_radians();

        self.yaw -= delta.x * sensitivity;
        self.pitch = (self.pitch + delta.y * sensitivity).clamp(-limit, limit);
    }

    /// Поворот камеры (yaw, затем pitch)
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Поворот тела (только yaw)
    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    pub fn origin(&self, body: &Transform) -> Vec3 {
        body.translation + Vec3::Y * self.eye_height
    }

    pub fn forward(&self) -> Dir3 {
        self.rotation() * Dir3::NEG_Z
    }

    /// Горизонтальный базис (forward, right) для движения
    pub fn flat_basis(&self) -> (Vec3, Vec3) {
        let rotation = self.body_rotation();
        (rotation * Vec3::NEG_Z, rotation * Vec3::X)
    }
}

/// Система: mouse delta → yaw/pitch, тело поворачивается по yaw
pub fn apply_look(mut query: Query<(&ViewerInput, &mut Viewer, &mut Transform)>) {
    for (input, mut viewer, mut transform) in query.iter_mut() {
        if input.look_delta != Vec2::ZERO {
            viewer.look(input.look_delta);
        }
        transform.rotation = viewer.body_rotation();
    }
}

pub struct LookPlugin;

impl Plugin for LookPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Viewer>()
            .add_systems(Update, apply_look.in_set(FrameSet::Look));
    }
}
