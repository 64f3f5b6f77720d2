//! Shared - cross-cutting helpers
//!
//! Содержит:
//! - Скалярную математику сглаживания (lerp, move_towards)
//! - Collision layer константы для raycast/Rapier фильтров

pub mod collision_layers;
pub mod math;

pub use collision_layers::*;
pub use math::*;
