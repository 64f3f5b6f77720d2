//! Stamina module
//!
//! Ресурс выносливости с гистерезисом fatigue. Movement тянет его каждый
//! кадр (can_run, try_consume_jump, speed_multiplier), эффекты получают
//! изменения через events.

pub mod components;
pub mod events;
pub mod systems;

#[cfg(test)]
mod stamina_tests;

use bevy::prelude::*;

pub use components::{Fatigued, Stamina, StaminaConfig, StaminaSignal};
pub use events::{FatigueEntered, FatigueExited, StaminaChanged};
pub use systems::{publish_stamina_signals, tick_stamina};

use crate::FrameSet;

pub struct StaminaPlugin;

impl Plugin for StaminaPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<StaminaChanged>()
            .add_event::<FatigueEntered>()
            .add_event::<FatigueExited>()
            .register_type::<Fatigued>();

        app.add_systems(
            Update,
            (tick_stamina, publish_stamina_signals)
                .chain()
                .in_set(FrameSet::Stamina),
        );
    }
}
