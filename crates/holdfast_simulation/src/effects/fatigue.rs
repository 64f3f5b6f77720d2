//! Fatigue effects: FOV сужается, «дыхание» качает breathing anchor
//!
//! Только данные: рендер применяет `current_fov()` к камере и
//! Transform anchor'а как локальный offset камеры.
//! Нет anchor'а → эффект выключен до конца жизни актора (error в лог).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::logger;
use crate::shared::{blend_factor, lerp};
use crate::stamina::StaminaChanged;

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct FatigueEffectsConfig {
    /// Доля stamina, ниже которой эффект начинается
    pub effect_start_threshold: f32,
    /// Доля stamina, на которой эффект максимален
    pub fatigue_threshold: f32,
    pub default_fov: f32,
    pub fatigue_fov: f32,
    pub fov_change_speed: f32,
    /// Скорость цикла дыхания (rad/s аргумента синуса)
    pub breathing_speed: f32,
    pub max_breathing_intensity: f32,
    /// Амплитуда поворота (градусы, XYZ)
    pub breathing_rotation: [f32; 3],
    /// Амплитуда смещения (m)
    pub breathing_position: [f32; 3],
    /// Скорость плавного включения/выключения дыхания
    pub transition_speed: f32,
}

impl Default for FatigueEffectsConfig {
    fn default() -> Self {
        Self {
            effect_start_threshold: 0.25,
            fatigue_threshold: 0.1,
            default_fov: 60.0,
            fatigue_fov: 55.0,
            fov_change_speed: 3.0,
            breathing_speed: 3.0,
            max_breathing_intensity: 2.0,
            breathing_rotation: [1.0, 0.3, 0.5],
            breathing_position: [0.0, 0.15, 0.0],
            transition_speed: 2.0,
        }
    }
}

/// Вес ниже этого считается нулём
const WEIGHT_EPSILON: f32 = 0.001;

/// Ключи кривой дыхания: (time, value, tangent)
const BREATHING_KEYS: [(f32, f32, f32); 4] = [(0.0, 0.0, 2.0), (0.3, 1.0, 0.0), (0.7, 1.0, 0.0), (1.0, 0.0, -2.0)];

/// Кубический Hermite по ключам, t зажат в [0, 1]
pub fn breathing_curve(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);

    for pair in BREATHING_KEYS.windows(2) {
        let (t0, v0, m0) = pair[0];
        let (t1, v1, m1) = pair[1];
        if t > t1 {
            continue;
        }

        let span = t1 - t0;
        let s = (t - t0) / span;
        let s2 = s * s;
        let s3 = s2 * s;

        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        return h00 * v0 + h10 * span * m0 + h01 * v1 + h11 * span * m1;
    }

    0.0
}

/// Что сделать с anchor'ом в этом кадре
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreathingPose {
    /// Offset от позы покоя
    Offset { position: Vec3, rotation: Quat },
    /// Вернуть позу покоя
    Rest,
}

/// Маркер entity-anchor'а (камера крепится к нему)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct BreathingAnchor;

#[derive(Component, Debug, Clone)]
pub struct FatigueEffects {
    pub config: FatigueEffectsConfig,
    pub anchor: Option<Entity>,
    intensity: f32,
    target_fov: f32,
    current_fov: f32,
    breathing_active: bool,
    weight: f32,
    timer: f32,
    rest_pose: Transform,
    disabled: bool,
}

impl FatigueEffects {
    pub fn new(config: FatigueEffectsConfig, anchor: Option<Entity>) -> Self {
        Self {
            config,
            anchor,
            intensity: 0.0,
            target_fov: config.default_fov,
            current_fov: config.default_fov,
            breathing_active: false,
            weight: 0.0,
            timer: 0.0,
            rest_pose: Transform::IDENTITY,
            disabled: false,
        }
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn target_fov(&self) -> f32 {
        self.target_fov
    }

    pub fn current_fov(&self) -> f32 {
        self.current_fov
    }

    pub fn transition_weight(&self) -> f32 {
        self.weight
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Отказ от эффекта до конца жизни актора
    pub fn disable(&mut self) {
        self.disabled = true;
        self.breathing_active = false;
        self.intensity = 0.0;
    }

    /// Реакция на процент stamina
    pub fn on_stamina_percentage(&mut self, percentage: f32) {
        let config = &self.config;

        if percentage <= config.effect_start_threshold {
            let range = config.effect_start_threshold - config.fatigue_threshold;
            let raw = if range > 0.0 {
                1.0 - (percentage - config.fatigue_threshold) / range
            } else {
                1.0
            };
            self.intensity = raw.clamp(0.0, 1.0).powf(0.7);
            self.breathing_active = true;
            self.target_fov = lerp(config.default_fov, config.fatigue_fov, self.intensity);
        } else {
            self.intensity = 0.0;
            self.breathing_active = false;
            self.target_fov = config.default_fov;
        }
    }

    /// Кадр: вес перехода, фаза дыхания, FOV
    pub fn advance(&mut self, delta: f32) -> BreathingPose {
        let target_weight = if self.breathing_active { 1.0 } else { 0.0 };
        self.weight = lerp(self.weight, target_weight, blend_factor(self.config.transition_speed, delta));
        self.current_fov = lerp(
            self.current_fov,
            self.target_fov,
            blend_factor(self.config.fov_change_speed, delta),
        );

        if self.weight <= WEIGHT_EPSILON {
            self.timer = 0.0;
            return BreathingPose::Rest;
        }

        self.timer += delta * self.config.breathing_speed;
        let progress = breathing_curve((self.timer.sin() + 1.0) * 0.5);
        let scaled = self.intensity * self.config.max_breathing_intensity * self.weight;

        let amount = progress * scaled;
        let position = Vec3::from_array(self.config.breathing_position) * amount;
        let euler = Vec3::from_array(self.config.breathing_rotation) * amount;
        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            euler.y.to_radians(),
            euler.x.to_radians(),
            euler.z.to_radians(),
        );

        BreathingPose::Offset { position, rotation }
    }
}

/// Система: проверка anchor'а при появлении компонента
pub fn validate_fatigue_anchors(
    mut query: Query<(Entity, &mut FatigueEffects), Added<FatigueEffects>>,
    anchors: Query<&Transform, Without<FatigueEffects>>,
) {
    for (entity, mut effects) in query.iter_mut() {
        let rest_pose = effects.anchor.and_then(|anchor| anchors.get(anchor).ok().copied());

        match rest_pose {
            Some(pose) => effects.rest_pose = pose,
            None => {
                effects.disable();
                logger::log_error(&format!(
                    "{:?}: breathing anchor is missing, fatigue effects disabled",
                    entity
                ));
            }
        }
    }
}

/// Система: StaminaChanged → интенсивность и целевой FOV
pub fn react_to_stamina(mut events: EventReader<StaminaChanged>, mut query: Query<&mut FatigueEffects>) {
    for event in events.read() {
        let Ok(mut effects) = query.get_mut(event.entity) else {
            continue;
        };
        if effects.is_disabled() {
            continue;
        }
        effects.on_stamina_percentage(event.percentage);
    }
}

/// Система: анимация anchor'а и FOV
pub fn animate_fatigue_effects(
    mut query: Query<(Entity, &mut FatigueEffects)>,
    mut anchors: Query<&mut Transform, Without<FatigueEffects>>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (entity, mut effects) in query.iter_mut() {
        if effects.is_disabled() {
            continue;
        }

        let anchor = match effects.anchor {
            Some(anchor) => anchors.get_mut(anchor).ok(),
            None => None,
        };
        let Some(mut anchor) = anchor else {
            effects.disable();
            logger::log_error(&format!("{:?}: breathing anchor was removed, fatigue effects disabled", entity));
            continue;
        };

        let rest = effects.rest_pose;
        match effects.advance(delta) {
            BreathingPose::Offset { position, rotation } => {
                anchor.translation = rest.translation + position;
                anchor.rotation = rest.rotation * rotation;
            }
            BreathingPose::Rest => {
                if anchor.translation != rest.translation || anchor.rotation != rest.rotation {
                    anchor.translation = rest.translation;
                    anchor.rotation = rest.rotation;
                }
            }
        }
    }
}
