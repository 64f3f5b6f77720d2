//! Player tuning: все конфиги подсистем в одном TOML
//!
//! ```toml
//! [stamina]
//! max_stamina = 120.0
//!
//! [grabber]
//! track_view_rotation = false
//! ```
//!
//! Отсутствующие секции/поля берут значения по умолчанию.

use std::path::Path;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::LookConfig;
use crate::effects::FatigueEffectsConfig;
use crate::grab::{GrabbableConfig, GrabberConfig};
use crate::interaction::InteractionConfig;
use crate::movement::MovementConfig;
use crate::stamina::StaminaConfig;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub stamina: StaminaConfig,
    pub movement: MovementConfig,
    pub look: LookConfig,
    pub grabber: GrabberConfig,
    pub interaction: InteractionConfig,
    pub fatigue_effects: FatigueEffectsConfig,
    /// Дефолт для объектов, заспавненных без своего конфига
    pub grabbable: GrabbableConfig,
}

impl PlayerTuning {
    pub fn from_toml_str(source: &str) -> Result<Self, TuningError> {
        let tuning: PlayerTuning = toml::from_str(source)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let stamina = &self.stamina;
        positive("stamina.max_stamina", stamina.max_stamina)?;
        non_negative("stamina.run_drain_per_second", stamina.run_drain_per_second)?;
        non_negative("stamina.base_jump_cost", stamina.base_jump_cost)?;
        at_least("stamina.jump_multiplier_factor", stamina.jump_multiplier_factor, 1.0)?;
        non_negative("stamina.regen_delay", stamina.regen_delay)?;
        non_negative("stamina.fatigue_threshold", stamina.fatigue_threshold)?;
        if stamina.fatigue_threshold * 2.0 >= stamina.max_stamina {
            return Err(invalid(
                "stamina.fatigue_threshold",
                "twice the threshold must stay below max_stamina",
            ));
        }
        unit_interval("stamina.fatigue_movement_penalty", stamina.fatigue_movement_penalty)?;

        let movement = &self.movement;
        positive("movement.walk_speed", movement.walk_speed)?;
        at_least("movement.run_speed", movement.run_speed, movement.walk_speed)?;
        positive("movement.crouch_speed", movement.crouch_speed)?;
        unit_interval("movement.backward_speed_multiplier", movement.backward_speed_multiplier)?;
        positive("movement.min_jump_force", movement.min_jump_force)?;
        at_least("movement.max_jump_force", movement.max_jump_force, movement.min_jump_force)?;
        non_negative("movement.jump_hold_duration", movement.jump_hold_duration)?;
        non_negative("movement.coyote_time", movement.coyote_time)?;
        if movement.gravity >= 0.0 || movement.fall_gravity >= 0.0 {
            return Err(invalid("movement.gravity", "gravity must point down (negative)"));
        }
        positive("movement.crouch_height", movement.crouch_height)?;
        at_least("movement.standing_height", movement.standing_height, movement.crouch_height)?;
        positive("movement.capsule_radius", movement.capsule_radius)?;
        at_least("movement.crouch_height", movement.crouch_height, movement.capsule_radius * 2.0)?;

        positive("look.sensitivity", self.look.sensitivity)?;
        if !(0.0..=90.0).contains(&self.look.max_look_angle) {
            return Err(invalid("look.max_look_angle", "expected degrees in [0, 90]"));
        }

        let grabber = &self.grabber;
        positive("grabber.grab_range", grabber.grab_range)?;
        positive("grabber.min_grab_distance", grabber.min_grab_distance)?;
        at_least(
            "grabber.max_grab_distance",
            grabber.max_grab_distance,
            grabber.min_grab_distance,
        )?;

        positive("interaction.interaction_range", self.interaction.interaction_range)?;

        let effects = &self.fatigue_effects;
        if effects.fatigue_threshold >= effects.effect_start_threshold {
            return Err(invalid(
                "fatigue_effects.fatigue_threshold",
                "must be below effect_start_threshold",
            ));
        }

        let grabbable = &self.grabbable;
        positive("grabbable.weight", grabbable.weight)?;
        non_negative("grabbable.spring_force", grabbable.spring_force)?;
        non_negative("grabbable.spring_damping", grabbable.spring_damping)?;
        if grabbable.velocity_samples < 2 {
            return Err(invalid("grabbable.velocity_samples", "need at least 2 samples"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("expected > 0, got {}", value)))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("expected >= 0, got {}", value)))
    }
}

fn at_least(field: &'static str, value: f32, min: f32) -> Result<(), TuningError> {
    if value >= min {
        Ok(())
    } else {
        Err(invalid(field, format!("expected >= {}, got {}", min, value)))
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("expected value in [0, 1], got {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PlayerTuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let tuning = PlayerTuning::from_toml_str(
            r#"
            [stamina]
            max_stamina = 150.0

            [grabber]
            track_view_rotation = false
            "#,
        )
        .unwrap();

        assert_eq!(tuning.stamina.max_stamina, 150.0);
        assert_eq!(tuning.stamina.base_jump_cost, 20.0);
        assert!(!tuning.grabber.track_view_rotation);
        assert_eq!(tuning.movement, MovementConfig::default());
    }

    #[test]
    fn test_invalid_value_reported_with_field() {
        let err = PlayerTuning::from_toml_str("[grabber]\nmin_grab_distance = 4.0\n").unwrap_err();
        match err {
            TuningError::Invalid { field, .. } => assert_eq!(field, "grabber.max_grab_distance"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_capsule_must_fit_crouch_height() {
        let err = PlayerTuning::from_toml_str("[movement]\ncapsule_radius = 0.6\n").unwrap_err();
        match err {
            TuningError::Invalid { field, .. } => assert_eq!(field, "movement.crouch_height"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_error() {
        let err = PlayerTuning::from_toml_str("[stamina\nmax_stamina = 1").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PlayerTuning::load("/definitely/not/here/holdfast.toml").unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
    }
}
