//! Movement events (footsteps, landing shake и прочие внешние потребители)

use bevy::prelude::*;

/// Прыжок состоялся (stamina списана)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct Jumped {
    pub entity: Entity,
    /// Во сколько обошёлся прыжок
    pub stamina_cost: f32,
}

/// Приземление после прыжка
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landed {
    pub entity: Entity,
}
