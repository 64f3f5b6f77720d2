//! Interaction компоненты: capability объекта, фокус и прицел игрока

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::grab::GrabbableEntity;
use crate::shared::collision_layers::COLLISION_MASK_INTERACTION;

/// Что произойдёт при взаимодействии (dispatch по тегу, не по типу)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum InteractionKind {
    #[default]
    None,
    /// Кнопки, рычаги
    Interact,
    /// Осмотр (таблички, записки)
    Examine,
    /// Можно взять в руки (нужен `GrabbableEntity`)
    Grab,
}

/// Interactable capability
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Interactable {
    pub kind: InteractionKind,
    /// Выключенный объект не фокусируется
    pub enabled: bool,
    focused: bool,
    interaction_count: u32,
}

impl Interactable {
    pub fn new(kind: InteractionKind) -> Self {
        Self {
            kind,
            enabled: true,
            focused: false,
            interaction_count: 0,
        }
    }

    /// Доступен ли объект прямо сейчас (захваченный grabbable - нет)
    pub fn can_interact(&self, grabbable: Option<&GrabbableEntity>) -> bool {
        self.enabled && grabbable.is_none_or(GrabbableEntity::can_interact)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn interaction_count(&self) -> u32 {
        self.interaction_count
    }

    pub fn on_focus(&mut self) {
        self.focused = true;
    }

    pub fn on_lose_focus(&mut self) {
        self.focused = false;
    }

    pub fn on_interact(&mut self) {
        self.interaction_count += 1;
    }
}

/// Outline marker на объекте в фокусе (рендер подсвечивает)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Highlighted;

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub interaction_range: f32,
    /// Биты слоёв, которые видит луч (`shared::collision_layers`)
    pub layer_mask: u32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            interaction_range: 3.0,
            layer_mask: COLLISION_MASK_INTERACTION,
        }
    }
}

/// Текущая цель взгляда игрока
#[derive(Component, Debug, Clone, Default)]
pub struct InteractionFocus {
    pub config: InteractionConfig,
    target: Option<Entity>,
    kind: InteractionKind,
    /// Точка попадания луча в цель (для старта захвата)
    hit_point: Vec3,
}

impl InteractionFocus {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            ..default()
        }
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn kind(&self) -> InteractionKind {
        self.kind
    }

    pub fn hit_point(&self) -> Vec3 {
        self.hit_point
    }

    pub(crate) fn set(&mut self, target: Entity, kind: InteractionKind, hit_point: Vec3) {
        self.target = Some(target);
        self.kind = kind;
        self.hit_point = hit_point;
    }

    pub(crate) fn clear(&mut self) -> Option<Entity> {
        self.kind = InteractionKind::None;
        self.target.take()
    }
}

/// Какой курсор показывать
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum CrosshairCursor {
    #[default]
    Hidden,
    Interact,
    Examine,
    /// Открытая ладонь
    Grab,
    /// Сжатая ладонь (держим объект)
    GrabHold,
}

impl CrosshairCursor {
    pub fn resolve(kind: InteractionKind, holding: bool) -> Self {
        if holding {
            return CrosshairCursor::GrabHold;
        }
        match kind {
            InteractionKind::None => CrosshairCursor::Hidden,
            InteractionKind::Interact => CrosshairCursor::Interact,
            InteractionKind::Examine => CrosshairCursor::Examine,
            InteractionKind::Grab => CrosshairCursor::Grab,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Crosshair {
    pub cursor: CrosshairCursor,
}
