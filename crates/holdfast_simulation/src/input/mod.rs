//! Viewer input (уже без привязки к устройствам)
//!
//! Клиент заполняет `ViewerInput` из клавиатуры/мыши, headless тесты -
//! напрямую. Edge-поля (`*_pressed`, `*_released`) живут один кадр:
//! `clear_input_edges` сбрасывает их в `Last`.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ViewerInput {
    /// WASD: x - strafe (вправо +), y - вперёд (+)
    pub move_input: Vec2,
    pub run: bool,
    pub jump_pressed: bool,
    pub jump_held: bool,
    pub crouch_pressed: bool,
    /// Mouse delta (x - yaw, y - pitch, вверх +)
    pub look_delta: Vec2,
    /// Прокрутка колеса (дистанция удержания)
    pub scroll: f32,
    pub interact_pressed: bool,
    pub interact_released: bool,
    /// Вторичное действие: бросок вперёд удерживаемого объекта
    pub secondary_pressed: bool,
}

impl ViewerInput {
    fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.crouch_pressed = false;
        self.look_delta = Vec2::ZERO;
        self.scroll = 0.0;
        self.interact_pressed = false;
        self.interact_released = false;
        self.secondary_pressed = false;
    }
}

/// Система: сброс однокадровых полей
pub fn clear_input_edges(mut query: Query<&mut ViewerInput>) {
    for mut input in query.iter_mut() {
        input.clear_edges();
    }
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<ViewerInput>()
            .add_systems(Last, clear_input_edges);
    }
}
