//! Grab events

use bevy::prelude::*;

use super::components::GrabRejection;

/// Как закончился захват
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabExit {
    /// Игрок отпустил кнопку
    Released,
    /// Бросок вперёд (вторичное действие)
    Thrown,
    /// Safety valve или пропавший holder
    ForcedRelease,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct GrabStarted {
    pub grabber: Entity,
    pub target: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct GrabRejected {
    pub grabber: Entity,
    pub target: Entity,
    pub reason: GrabRejection,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct GrabEnded {
    pub grabber: Entity,
    pub target: Entity,
    pub exit: GrabExit,
    /// Скорость, с которой объект ушёл
    pub velocity: Vec3,
}
