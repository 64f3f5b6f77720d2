//! Movement компоненты: тюнинг и состояние контроллера

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Скорость сглаживания при разгоне (1/s)
    pub acceleration_rate: f32,
    /// Скорость сглаживания при торможении (1/s)
    pub deceleration_rate: f32,
    pub crouch_speed: f32,
    /// Назад не быстрее lerp(walk, run, multiplier)
    pub backward_speed_multiplier: f32,

    /// Начальная вертикальная скорость прыжка (m/s)
    pub min_jump_force: f32,
    /// Вертикальная скорость при полном удержании
    pub max_jump_force: f32,
    /// Сколько удержание влияет на прыжок (s)
    pub jump_hold_duration: f32,
    /// Гравитация на подъёме (m/s²)
    pub gravity: f32,
    /// Гравитация при падении (m/s²)
    pub fall_gravity: f32,
    /// Окно прыжка после схода с края (s)
    pub coyote_time: f32,
    /// Прижимающая скорость на земле (m/s)
    pub ground_stick_velocity: f32,

    pub standing_height: f32,
    pub crouch_height: f32,
    /// Радиус капсулы персонажа (m)
    pub capsule_radius: f32,
    /// Скорость экспоненциального blend'а высоты капсулы и камеры (1/s)
    pub height_blend_speed: f32,
    pub camera_standing_height: f32,
    pub camera_crouch_height: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 1.9,
            run_speed: 7.5,
            acceleration_rate: 4.25,
            deceleration_rate: 8.0,
            crouch_speed: 1.5,
            backward_speed_multiplier: 0.6,
            min_jump_force: 2.0,
            max_jump_force: 4.25,
            jump_hold_duration: 0.3,
            gravity: -9.81,
            fall_gravity: -13.25,
            coyote_time: 0.2,
            ground_stick_velocity: -2.0,
            standing_height: 2.0,
            crouch_height: 1.0,
            capsule_radius: 0.4,
            height_blend_speed: 8.0,
            camera_standing_height: 1.7,
            camera_crouch_height: 0.8,
        }
    }
}

impl MovementConfig {
    /// Потолок скорости при движении назад
    pub fn max_backward_speed(&self) -> f32 {
        crate::shared::lerp(self.walk_speed, self.run_speed, self.backward_speed_multiplier)
    }
}

/// Состояние контроллера между кадрами
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct MovementState {
    /// Горизонтальная скорость в мире (y = 0)
    pub horizontal_velocity: Vec3,
    pub vertical_velocity: f32,
    pub grounded: bool,
    pub crouching: bool,
    pub jumping: bool,
    /// Прыжок ещё «держится» (удержание продлевает подъём)
    pub jump_held: bool,
    pub coyote_timer: f32,
    pub jump_hold_timer: f32,
    /// Скорость, захваченная при отрыве; не пересчитывается до приземления
    pub locked_speed: f32,
    /// Сглаженная скорость
    pub current_speed: f32,
    /// Последняя вычисленная скорость подъёма (lerp(min, max, progress))
    pub launch_velocity: f32,
    pub current_height: f32,
    pub camera_height: f32,
    pub target_camera_height: f32,
}

impl MovementState {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            horizontal_velocity: Vec3::ZERO,
            vertical_velocity: 0.0,
            grounded: false,
            crouching: false,
            jumping: false,
            jump_held: false,
            coyote_timer: 0.0,
            jump_hold_timer: 0.0,
            locked_speed: config.walk_speed,
            current_speed: config.walk_speed,
            launch_velocity: 0.0,
            current_height: config.standing_height,
            camera_height: config.camera_standing_height,
            target_camera_height: config.camera_standing_height,
        }
    }

    /// Полная скорость персонажа за кадр
    pub fn velocity(&self) -> Vec3 {
        self.horizontal_velocity + Vec3::Y * self.vertical_velocity
    }
}

/// First-person контроллер движения
///
/// Читает `ViewerInput` + `Stamina`, пишет скорость персонажа.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct MovementController {
    pub config: MovementConfig,
    pub state: MovementState,
}

impl Default for MovementController {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}

impl MovementController {
    pub fn new(config: MovementConfig) -> Self {
        Self {
            state: MovementState::new(&config),
            config,
        }
    }
}

/// Капсула персонажа (Transform на уровне ступней)
///
/// Высота следует за `MovementState::current_height`; Rapier backend
/// пересобирает по ней collider и shape character controller'а.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CharacterCapsule {
    pub height: f32,
    pub radius: f32,
}

impl CharacterCapsule {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            height: config.standing_height,
            radius: config.capsule_radius,
        }
    }

    /// Половина цилиндрической части (`capsule_y`)
    pub fn half_segment(&self) -> f32 {
        (self.height * 0.5 - self.radius).max(0.0)
    }

    /// Центр капсулы относительно ступней
    pub fn center_offset(&self) -> Vec3 {
        Vec3::Y * self.height * 0.5
    }
}
