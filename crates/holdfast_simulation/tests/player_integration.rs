//! Player flow integration test
//!
//! Stamina + movement + fatigue effects через headless App:
//! спринт до усталости, восстановление, прыжок с приземлением,
//! отсутствующий breathing anchor.

mod common;

use bevy::prelude::*;
use common::*;
use holdfast_simulation::*;

fn breathing_anchor(app: &App, player: Entity) -> Entity {
    app.world()
        .get::<FatigueEffects>(player)
        .unwrap()
        .anchor
        .expect("player spawned with anchor")
}

#[test]
fn test_sprint_into_fatigue_and_recover() {
    let mut app = create_headless_app();
    let player = spawn_test_player(&mut app, Vec3::ZERO);
    let anchor = breathing_anchor(&app, player);
    app.update();

    let mut entered = 0;
    for _ in 0..320 {
        with_input(&mut app, player, |input| {
            input.move_input = Vec2::Y;
            input.run = true;
        });
        app.update();
        entered += read_events::<FatigueEntered>(&app).len();
    }

    assert!(entered > 0);
    let stamina = app.world().get::<Stamina>(player).unwrap();
    assert!(stamina.is_fatigued());
    assert!(stamina.current() <= 10.0 + 1e-3);
    assert!(!stamina.can_run());
    assert!(app.world().get::<Fatigued>(player).is_some());

    // Бежали вперёд (-Z)
    let position = app.world().get::<Transform>(player).unwrap().translation;
    assert!(position.z < -10.0, "player at {:?}", position);

    // Эффекты: FOV сужается, anchor «дышит»
    let mut max_offset: f32 = 0.0;
    for _ in 0..50 {
        with_input(&mut app, player, |input| {
            input.move_input = Vec2::ZERO;
            input.run = false;
        });
        app.update();
        let anchor_transform = app.world().get::<Transform>(anchor).unwrap();
        max_offset = max_offset.max(anchor_transform.translation.y.abs());
    }
    let effects = app.world().get::<FatigueEffects>(player).unwrap();
    assert!(effects.intensity() > 0.8, "intensity {}", effects.intensity());
    assert!(effects.current_fov() < 58.0, "fov {}", effects.current_fov());
    assert!(max_offset > 0.0);

    // Задержка регенерации + медленная регенерация до 2 × threshold
    let mut exited = 0;
    for _ in 0..200 {
        app.update();
        exited += read_events::<FatigueExited>(&app).len();
    }
    assert!(exited > 0);
    let stamina = app.world().get::<Stamina>(player).unwrap();
    assert!(!stamina.is_fatigued());
    assert!(stamina.current() > 20.0);
    assert!(app.world().get::<Fatigued>(player).is_none());
}

#[test]
fn test_jump_costs_stamina_and_lands() {
    let mut app = create_headless_app();
    let player = spawn_test_player(&mut app, Vec3::ZERO);
    run_frames(&mut app, 3);

    with_input(&mut app, player, |input| {
        input.jump_pressed = true;
        input.jump_held = true;
    });
    app.update();

    let jumped = read_events::<Jumped>(&app);
    assert_eq!(jumped.len(), 1);
    assert_eq!(jumped[0].stamina_cost, 20.0);

    let stamina = app.world().get::<Stamina>(player).unwrap();
    assert!((stamina.current() - 80.0).abs() < 1e-4);
    assert!((stamina.jump_multiplier() - 1.5).abs() < 1e-6);

    let mut peak: f32 = 0.0;
    let mut landed = false;
    for _ in 0..100 {
        with_input(&mut app, player, |input| input.jump_held = true);
        app.update();
        peak = peak.max(app.world().get::<Transform>(player).unwrap().translation.y);
        landed |= !read_events::<Landed>(&app).is_empty();
    }

    assert!(peak > 0.5, "peak {}", peak);
    assert!(landed);
    let controller = app.world().get::<MovementController>(player).unwrap();
    assert!(controller.state.grounded);
    assert!(!controller.state.jumping);
    assert_eq!(app.world().get::<Transform>(player).unwrap().translation.y, 0.0);
}

#[test]
fn test_missing_anchor_disables_effects() {
    let mut app = create_headless_app();
    let player = spawn_test_player(&mut app, Vec3::ZERO);
    let anchor = breathing_anchor(&app, player);
    app.world_mut().despawn(anchor);

    app.update();
    assert!(app.world().get::<FatigueEffects>(player).unwrap().is_disabled());

    // Усталость больше не влияет на эффекты
    app.world_mut().get_mut::<Stamina>(player).unwrap().consume(95.0);
    run_frames(&mut app, 10);

    let effects = app.world().get::<FatigueEffects>(player).unwrap();
    assert_eq!(effects.intensity(), 0.0);
    assert_eq!(effects.current_fov(), FatigueEffectsConfig::default().default_fov);
    // Сама stamina работает как обычно
    assert!(app.world().get::<Fatigued>(player).is_some());
}

#[test]
fn test_anchor_removed_during_play() {
    let mut app = create_headless_app();
    let player = spawn_test_player(&mut app, Vec3::ZERO);
    let anchor = breathing_anchor(&app, player);
    run_frames(&mut app, 2);
    assert!(!app.world().get::<FatigueEffects>(player).unwrap().is_disabled());

    app.world_mut().despawn(anchor);
    app.update();
    assert!(app.world().get::<FatigueEffects>(player).unwrap().is_disabled());
}

#[test]
fn test_player_from_tuning_file() {
    let tuning = PlayerTuning::from_toml_str(
        r#"
        [stamina]
        max_stamina = 150.0

        [movement]
        walk_speed = 2.5
        "#,
    )
    .unwrap();

    let mut app = create_headless_app();
    let player = spawn_player(&mut app.world_mut().commands(), Vec3::ZERO, &tuning);
    app.world_mut().flush();
    app.update();

    let stamina = app.world().get::<Stamina>(player).unwrap();
    assert_eq!(stamina.max(), 150.0);
    assert_eq!(stamina.current(), 150.0);
    let controller = app.world().get::<MovementController>(player).unwrap();
    assert_eq!(controller.config.walk_speed, 2.5);
    assert_eq!(controller.state.current_speed, 2.5);
}

#[test]
fn test_crouch_shrinks_character_capsule() {
    let mut app = create_headless_app();
    let player = spawn_test_player(&mut app, Vec3::ZERO);
    run_frames(&mut app, 3);
    assert_eq!(app.world().get::<CharacterCapsule>(player).unwrap().height, 2.0);

    with_input(&mut app, player, |input| input.crouch_pressed = true);
    run_frames(&mut app, 100);

    let capsule = *app.world().get::<CharacterCapsule>(player).unwrap();
    assert!((capsule.height - 1.0).abs() < 0.01, "height = {}", capsule.height);
    assert!((capsule.half_segment() - 0.1).abs() < 0.01);

    // Встаём обратно
    with_input(&mut app, player, |input| input.crouch_pressed = true);
    run_frames(&mut app, 100);
    let capsule = app.world().get::<CharacterCapsule>(player).unwrap();
    assert!((capsule.height - 2.0).abs() < 0.01, "height = {}", capsule.height);
}
