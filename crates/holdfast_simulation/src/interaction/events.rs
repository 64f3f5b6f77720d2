//! Interaction events (crosshair UI, outline, звук)

use bevy::prelude::*;

use super::components::{CrosshairCursor, InteractionKind};

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusGained {
    pub viewer: Entity,
    pub target: Entity,
    pub kind: InteractionKind,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusLost {
    pub viewer: Entity,
    pub target: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interacted {
    pub viewer: Entity,
    pub target: Entity,
    pub kind: InteractionKind,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrosshairChanged {
    pub viewer: Entity,
    pub cursor: CrosshairCursor,
}
