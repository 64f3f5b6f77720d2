//! Collision Layers Constants
//!
//! Centralised битовые маски для raycast фильтров (и Rapier `CollisionGroups` в клиенте).
//!
//! ## Архитектура:
//! - **Layer (membership):** На каком слое находится объект (`QueryLayers` компонент)
//! - **Mask (filter):** Какие слои видит запрос (`InteractionConfig::layer_mask`)
//!
//! ## Layers:
//! - Layer 1 (0b1 = 1): Environment (стены, пол, статичные пропсы)
//! - Layer 2 (0b10 = 2): Actors (player, NPC)
//! - Layer 3 (0b100 = 4): Interactables (кнопки, таблички)
//! - Layer 4 (0b1000 = 8): Grabbables (ящики, бочки - всё что можно взять)

use bevy_rapier3d::prelude::{CollisionGroups, Group};

/// Layer 1: Environment
pub const COLLISION_LAYER_ENVIRONMENT: u32 = 0b1;

/// Layer 2: Actors
pub const COLLISION_LAYER_ACTORS: u32 = 0b10;

/// Layer 3: Interactables (не физические)
pub const COLLISION_LAYER_INTERACTABLES: u32 = 0b100;

/// Layer 4: Grabbables (dynamic bodies)
pub const COLLISION_LAYER_GRABBABLES: u32 = 0b1000;

/// Mask: interaction raycast видит окружение (чтобы стены закрывали цели)
/// + интерактивные объекты + grabbables. Actors не видит (свой capsule).
pub const COLLISION_MASK_INTERACTION: u32 =
    COLLISION_LAYER_ENVIRONMENT | COLLISION_LAYER_INTERACTABLES | COLLISION_LAYER_GRABBABLES;

/// Mask: grabbables сталкиваются со всем
pub const COLLISION_MASK_GRABBABLES: u32 = COLLISION_LAYER_ENVIRONMENT
    | COLLISION_LAYER_ACTORS
    | COLLISION_LAYER_INTERACTABLES
    | COLLISION_LAYER_GRABBABLES;

/// Mask: actors упираются в окружение, других actors и grabbables
pub const COLLISION_MASK_ACTORS: u32 =
    COLLISION_LAYER_ENVIRONMENT | COLLISION_LAYER_ACTORS | COLLISION_LAYER_GRABBABLES;

/// Битовая маска → Rapier `Group` (лишние биты отбрасываются)
pub fn group(bits: u32) -> Group {
    Group::from_bits_truncate(bits)
}

/// `CollisionGroups` для Rapier коллайдера grabbable объекта
pub fn grabbable_groups() -> CollisionGroups {
    CollisionGroups::new(group(COLLISION_LAYER_GRABBABLES), group(COLLISION_MASK_GRABBABLES))
}

/// `CollisionGroups` для капсулы персонажа
pub fn actor_groups() -> CollisionGroups {
    CollisionGroups::new(group(COLLISION_LAYER_ACTORS), group(COLLISION_MASK_ACTORS))
}

/// `CollisionGroups` для sensor'а кнопки/таблички (виден только запросам)
pub fn interactable_groups() -> CollisionGroups {
    CollisionGroups::new(group(COLLISION_LAYER_INTERACTABLES), group(COLLISION_MASK_INTERACTION))
}

/// `CollisionGroups` для статичного окружения
pub fn environment_groups() -> CollisionGroups {
    CollisionGroups::new(group(COLLISION_LAYER_ENVIRONMENT), Group::ALL)
}

/// Получить название слоя для debug логов
pub fn get_layer_name(layer_bits: u32) -> &'static str {
    match layer_bits {
        COLLISION_LAYER_ENVIRONMENT => "Environment",
        COLLISION_LAYER_ACTORS => "Actors",
        COLLISION_LAYER_INTERACTABLES => "Interactables",
        COLLISION_LAYER_GRABBABLES => "Grabbables",
        _ => "Unknown",
    }
}
