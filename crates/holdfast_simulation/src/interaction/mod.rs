//! Interaction targeting module
//!
//! Луч из глаз ищет доступный interactable, фокус меняется с
//! enter/exit уведомлениями (events + `Highlighted` marker). Нажатие
//! диспетчеризуется по `InteractionKind`: Grab уходит в очередь grabber'а.

pub mod components;
pub mod events;
pub mod systems;

use bevy::prelude::*;

pub use components::{
    Crosshair, CrosshairCursor, Highlighted, Interactable, InteractionConfig, InteractionFocus, InteractionKind,
};
pub use events::{CrosshairChanged, FocusGained, FocusLost, Interacted};
pub use systems::{confirm_grab_interactions, handle_interact_input, scan_interaction_focus, update_crosshair};

use crate::FrameSet;

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FocusGained>()
            .add_event::<FocusLost>()
            .add_event::<Interacted>()
            .add_event::<CrosshairChanged>()
            .register_type::<Interactable>()
            .register_type::<Highlighted>()
            .register_type::<Crosshair>();

        app.add_systems(
            Update,
            (
                confirm_grab_interactions,
                scan_interaction_focus,
                handle_interact_input,
                update_crosshair,
            )
                .chain()
                .in_set(FrameSet::Interaction),
        );
    }
}
