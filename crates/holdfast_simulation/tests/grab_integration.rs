//! Grab / throw integration test
//!
//! Полный цикл через headless App:
//! - Фокус → interact → захват в fixed step
//! - Пружина тянет объект к anchor'у перед глазами
//! - Release / forward throw / safety valve / потеря holder'а
//! - Повторный захват чужого объекта отклоняется без побочных эффектов

mod common;

use bevy::prelude::*;
use common::*;
use holdfast_simulation::physics::CollisionMode;
use holdfast_simulation::*;

#[test]
fn test_grab_hold_and_release() {
    let mut app = create_headless_app();
    let (player, crate_entity) = spawn_crate_scene(&mut app);

    grab_crate(&mut app, player, crate_entity);

    let started = read_events::<GrabStarted>(&app);
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].grabber, player);
    assert_eq!(started[0].target, crate_entity);

    let grabbable = app.world().get::<GrabbableEntity>(crate_entity).unwrap();
    assert_eq!(grabbable.phase(), GrabPhase::Held);
    assert_eq!(grabbable.held_by(), Some(player));
    assert!(grabbable.joint().is_some());

    let body = app.world().get::<PhysicsBody>(crate_entity).unwrap();
    assert!(!body.gravity_enabled);
    assert_eq!(body.collision_mode, CollisionMode::Continuous);

    let grabber = app.world().get::<Grabber>(player).unwrap();
    assert_eq!(grabber.held(), Some(crate_entity));
    let grab_distance = grabber.grab_distance();
    assert!(grab_distance > 1.5 && grab_distance < 2.0, "distance {}", grab_distance);

    // Поднимаем взгляд: объект должен прийти к anchor'у на уровне глаз
    look_at(&mut app, player, Vec3::new(0.0, 1.7, -5.0));
    run_frames(&mut app, 150);

    let anchor = Vec3::new(0.0, 1.7, -grab_distance);
    let position = app.world().get::<Transform>(crate_entity).unwrap().translation;
    assert!(position.distance(anchor) < 0.05, "crate at {:?}, anchor {:?}", position, anchor);

    // Пока держим, фокус заморожен и курсор показывает удержание
    let focus = app.world().get::<InteractionFocus>(player).unwrap();
    assert_eq!(focus.target(), Some(crate_entity));
    assert_eq!(
        app.world().get::<Crosshair>(player).unwrap().cursor,
        CrosshairCursor::GrabHold
    );

    with_input(&mut app, player, |input| input.interact_released = true);
    app.update();
    app.update();

    let ended = read_events::<GrabEnded>(&app);
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].exit, GrabExit::Released);
    // Объект покоился → скорость отпускания почти нулевая
    assert!(ended[0].velocity.length() < 0.5, "velocity {:?}", ended[0].velocity);

    let grabbable = app.world().get::<GrabbableEntity>(crate_entity).unwrap();
    assert_eq!(grabbable.phase(), GrabPhase::Released);
    assert!(grabbable.held_by().is_none());
    assert!(grabbable.joint().is_none());

    let body = app.world().get::<PhysicsBody>(crate_entity).unwrap();
    assert!(body.gravity_enabled);
    assert_eq!(body.collision_mode, CollisionMode::Discrete);
    assert!(!app.world().get::<Grabber>(player).unwrap().is_busy());

    // Гравитация вернулась: ящик падает на пол
    run_frames(&mut app, 100);
    let position = app.world().get::<Transform>(crate_entity).unwrap().translation;
    assert!((position.y - CRATE_HALF_EXTENTS.y).abs() < 1e-3, "crate y {}", position.y);
}

#[test]
fn test_release_carries_swing_velocity() {
    let mut app = create_headless_app();
    let (player, crate_entity) = spawn_crate_scene(&mut app);

    grab_crate(&mut app, player, crate_entity);
    look_at(&mut app, player, Vec3::new(0.0, 1.7, -5.0));
    run_frames(&mut app, 100);

    // Резкий поворот взгляда вправо и отпускание в движении
    let mut yaw = app.world().get::<Viewer>(player).unwrap().yaw;
    for _ in 0..6 {
        yaw -= 0.08;
        app.world_mut().get_mut::<Viewer>(player).unwrap().yaw = yaw;
        app.update();
    }
    with_input(&mut app, player, |input| input.interact_released = true);
    app.update();
    app.update();

    let ended = read_events::<GrabEnded>(&app);
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].exit, GrabExit::Released);
    // Взгляд ушёл вправо (+X) → объект летит вправо
    assert!(ended[0].velocity.x > 1.0, "velocity {:?}", ended[0].velocity);
}

#[test]
fn test_forward_throw() {
    let mut app = create_headless_app();
    let (player, crate_entity) = spawn_crate_scene(&mut app);

    grab_crate(&mut app, player, crate_entity);
    look_at(&mut app, player, Vec3::new(0.0, 1.7, -5.0));
    run_frames(&mut app, 50);

    with_input(&mut app, player, |input| input.secondary_pressed = true);
    app.update();
    app.update();

    let ended = read_events::<GrabEnded>(&app);
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].exit, GrabExit::Thrown);

    let forward = *app.world().get::<Viewer>(player).unwrap().forward();
    let expected = forward * 10.0 / 5.0_f32.sqrt();
    assert!(ended[0].velocity.distance(expected) < 1e-4, "velocity {:?}", ended[0].velocity);

    let grabbable = app.world().get::<GrabbableEntity>(crate_entity).unwrap();
    assert_eq!(grabbable.phase(), GrabPhase::Thrown);
    assert!(grabbable.can_interact());

    let start_z = app.world().get::<Transform>(crate_entity).unwrap().translation.z;
    run_frames(&mut app, 10);
    let z = app.world().get::<Transform>(crate_entity).unwrap().translation.z;
    assert!(z < start_z - 0.5, "crate did not fly forward: {} → {}", start_z, z);
}

#[test]
fn test_safety_valve_force_releases() {
    let mut app = create_headless_app();
    let (player, crate_entity) = spawn_crate_scene(&mut app);

    grab_crate(&mut app, player, crate_entity);
    run_frames(&mut app, 5);

    // Что-то утащило объект далеко от anchor'а (> 1.5 × max_grab_distance)
    app.world_mut()
        .get_mut::<Transform>(crate_entity)
        .unwrap()
        .translation = Vec3::new(0.0, 1.0, -12.0);
    app.update();

    let ended = read_events::<GrabEnded>(&app);
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].exit, GrabExit::ForcedRelease);
    assert_eq!(ended[0].grabber, player);

    assert!(!app.world().get::<Grabber>(player).unwrap().is_holding());
    let grabbable = app.world().get::<GrabbableEntity>(crate_entity).unwrap();
    assert_eq!(grabbable.phase(), GrabPhase::Released);
    assert!(app.world().get::<PhysicsBody>(crate_entity).unwrap().gravity_enabled);
}

#[test]
fn test_second_grabber_rejected() {
    let mut app = create_headless_app();
    let (player, crate_entity) = spawn_crate_scene(&mut app);
    let rival = spawn_test_player(&mut app, Vec3::new(1.0, 0.0, 0.0));

    grab_crate(&mut app, player, crate_entity);
    assert_eq!(
        app.world().get::<GrabbableEntity>(crate_entity).unwrap().held_by(),
        Some(player)
    );

    // Фокус соперника объект не получит (он уже держится), запрос идёт напрямую
    let hit_point = app.world().get::<Transform>(crate_entity).unwrap().translation;
    app.world_mut()
        .get_mut::<Grabber>(rival)
        .unwrap()
        .request_grab(crate_entity, hit_point);
    app.update();

    let rejected = read_events::<GrabRejected>(&app);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].grabber, rival);
    assert_eq!(rejected[0].reason, GrabRejection::AlreadyHeld { holder: player });

    assert!(!app.world().get::<Grabber>(rival).unwrap().is_busy());
    let grabbable = app.world().get::<GrabbableEntity>(crate_entity).unwrap();
    assert_eq!(grabbable.held_by(), Some(player));
    assert_eq!(grabbable.phase(), GrabPhase::Held);
}

#[test]
fn test_out_of_range_request_rejected() {
    let mut app = create_headless_app();
    let player = spawn_test_player(&mut app, Vec3::new(0.0, 0.0, 6.0));
    let crate_entity = spawn_test_crate(&mut app, CRATE_POSITION);
    app.update();

    app.world_mut()
        .get_mut::<Grabber>(player)
        .unwrap()
        .request_grab(crate_entity, CRATE_POSITION);
    app.update();

    let rejected = read_events::<GrabRejected>(&app);
    assert_eq!(rejected.len(), 1);
    assert!(matches!(rejected[0].reason, GrabRejection::OutOfRange { .. }));

    let grabbable = app.world().get::<GrabbableEntity>(crate_entity).unwrap();
    assert_eq!(grabbable.phase(), GrabPhase::Idle);
    assert!(app.world().get::<PhysicsBody>(crate_entity).unwrap().gravity_enabled);
}

#[test]
fn test_despawned_holder_releases_object() {
    let mut app = create_headless_app();
    let (player, crate_entity) = spawn_crate_scene(&mut app);

    grab_crate(&mut app, player, crate_entity);
    app.world_mut().despawn(player);
    app.update();

    let ended = read_events::<GrabEnded>(&app);
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].exit, GrabExit::ForcedRelease);

    let grabbable = app.world().get::<GrabbableEntity>(crate_entity).unwrap();
    assert!(grabbable.held_by().is_none());
    assert!(app.world().get::<PhysicsBody>(crate_entity).unwrap().gravity_enabled);
}

#[test]
fn test_scroll_moves_anchor() {
    let mut app = create_headless_app();
    let (player, crate_entity) = spawn_crate_scene(&mut app);

    grab_crate(&mut app, player, crate_entity);
    let before = app.world().get::<Grabber>(player).unwrap().grab_distance();

    with_input(&mut app, player, |input| input.scroll = 3.0);
    app.update();
    let after = app.world().get::<Grabber>(player).unwrap().grab_distance();
    assert!(after > before);
    assert!(after <= GrabberConfig::default().max_grab_distance);

    with_input(&mut app, player, |input| input.scroll = -100.0);
    app.update();
    let clamped = app.world().get::<Grabber>(player).unwrap().grab_distance();
    assert_eq!(clamped, GrabberConfig::default().min_grab_distance);
}
