//! Stamina feedback channel (UI, fatigue effects, звук)

use bevy::prelude::*;

/// Значение stamina изменилось
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct StaminaChanged {
    pub entity: Entity,
    pub value: f32,
    /// value / max, в [0, 1]
    pub percentage: f32,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatigueEntered {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatigueExited {
    pub entity: Entity,
}
