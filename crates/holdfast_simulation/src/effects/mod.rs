//! Camera feel effects, которые зависят от геймплея (fatigue)

pub mod fatigue;

use bevy::prelude::*;

pub use fatigue::{
    animate_fatigue_effects, breathing_curve, react_to_stamina, validate_fatigue_anchors, BreathingAnchor,
    BreathingPose, FatigueEffects, FatigueEffectsConfig,
};

use crate::FrameSet;

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<BreathingAnchor>();

        app.add_systems(
            Update,
            (validate_fatigue_anchors, react_to_stamina, animate_fatigue_effects)
                .chain()
                .in_set(FrameSet::Effects),
        );
    }
}
