use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use holdfast_simulation::{FrameSet, Player, ViewerInput};

pub struct InputMappingPlugin;

impl Plugin for InputMappingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CursorCapture>().add_systems(
            Update,
            (toggle_cursor_lock, map_player_input)
                .chain()
                .before(FrameSet::Look),
        );
    }
}

/// Клик, захвативший курсор в этом кадре, не считается interact'ом
#[derive(Resource, Debug, Default)]
pub struct CursorCapture {
    pub locked_this_frame: bool,
}

/// Клик по окну захватывает курсор, Escape отпускает
fn toggle_cursor_lock(
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut capture: ResMut<CursorCapture>,
) {
    capture.locked_this_frame = false;

    let Ok(mut window) = windows.single_mut() else {
        return;
    };

    if keys.just_pressed(KeyCode::Escape) {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    } else if mouse_buttons.just_pressed(MouseButton::Left) && window.cursor_options.grab_mode == CursorGrabMode::None {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
        capture.locked_this_frame = true;
    }
}

/// Keyboard/mouse → ViewerInput игрока
///
/// Edge поля OR-ятся: сброс делает симуляция в `Last`.
fn map_player_input(
    mut players: Query<&mut ViewerInput, With<Player>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    keys: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    capture: Res<CursorCapture>,
) {
    let Ok(mut input) = players.single_mut() else {
        return;
    };

    // Без захваченного курсора игрок стоит
    let captured = windows
        .single()
        .is_ok_and(|window| window.cursor_options.grab_mode != CursorGrabMode::None);
    if !captured {
        *input = ViewerInput::default();
        return;
    }

    let mut move_input = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        move_input.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        move_input.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        move_input.x += 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        move_input.x -= 1.0;
    }
    input.move_input = move_input.clamp_length_max(1.0);
    input.run = keys.pressed(KeyCode::ShiftLeft);

    input.jump_pressed |= keys.just_pressed(KeyCode::Space);
    input.jump_held = keys.pressed(KeyCode::Space);
    input.crouch_pressed |= keys.just_pressed(KeyCode::KeyC) || keys.just_pressed(KeyCode::ControlLeft);

    // Экранный Y вниз, pitch вверх +
    input.look_delta += Vec2::new(mouse_motion.delta.x, -mouse_motion.delta.y);
    input.scroll += mouse_scroll.delta.y;

    // Клик захвата курсора (и его отпускание) не доходит до interact
    let click = !capture.locked_this_frame;
    input.interact_pressed |= keys.just_pressed(KeyCode::KeyE) || (click && mouse_buttons.just_pressed(MouseButton::Left));
    input.interact_released |= keys.just_released(KeyCode::KeyE) || mouse_buttons.just_released(MouseButton::Left);
    input.secondary_pressed |= mouse_buttons.just_pressed(MouseButton::Right);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_app() -> (App, Entity) {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<AccumulatedMouseMotion>()
            .init_resource::<AccumulatedMouseScroll>()
            .init_resource::<CursorCapture>()
            .add_systems(Update, (toggle_cursor_lock, map_player_input).chain());

        app.world_mut().spawn((Window::default(), PrimaryWindow));
        let player = app.world_mut().spawn(Player).id();
        (app, player)
    }

    fn click(app: &mut App) {
        let mut buttons = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
        buttons.clear();
        buttons.release(MouseButton::Left);
        buttons.clear();
        buttons.press(MouseButton::Left);
    }

    #[test]
    fn test_capture_click_does_not_interact() {
        let (mut app, player) = input_app();

        click(&mut app);
        app.update();

        let mut windows = app.world_mut().query::<&Window>();
        let window = windows.single(app.world()).unwrap();
        assert_eq!(window.cursor_options.grab_mode, CursorGrabMode::Locked);
        assert!(!app.world().get::<ViewerInput>(player).unwrap().interact_pressed);

        // Следующий клик уже по захваченному курсору
        click(&mut app);
        app.update();
        assert!(app.world().get::<ViewerInput>(player).unwrap().interact_pressed);
    }
}
