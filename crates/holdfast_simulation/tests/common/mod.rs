//! Общие helpers для headless integration тестов

#![allow(dead_code)]

use bevy::prelude::*;
use holdfast_simulation::*;

/// Ящик на полу в 1.5m перед игроком
pub const CRATE_POSITION: Vec3 = Vec3::new(0.0, 0.25, -1.5);
pub const CRATE_HALF_EXTENTS: Vec3 = Vec3::splat(0.25);

pub fn spawn_test_player(app: &mut App, position: Vec3) -> Entity {
    let tuning = PlayerTuning::default();
    let player = spawn_player(&mut app.world_mut().commands(), position, &tuning);
    app.world_mut().flush();
    player
}

pub fn spawn_test_crate(app: &mut App, position: Vec3) -> Entity {
    let shape = BodyShape::Cuboid {
        half_extents: CRATE_HALF_EXTENTS,
    };
    let entity = spawn_grabbable(
        &mut app.world_mut().commands(),
        position,
        shape,
        GrabbableConfig::default(),
    );
    app.world_mut().flush();
    entity
}

/// Игрок в начале координат + ящик перед ним
pub fn spawn_crate_scene(app: &mut App) -> (Entity, Entity) {
    let player = spawn_test_player(app, Vec3::ZERO);
    let crate_entity = spawn_test_crate(app, CRATE_POSITION);
    (player, crate_entity)
}

/// Повернуть взгляд viewer'а на точку
pub fn look_at(app: &mut App, viewer: Entity, point: Vec3) {
    let body = *app.world().get::<Transform>(viewer).expect("viewer transform");
    let mut viewer = app.world_mut().get_mut::<Viewer>(viewer).expect("viewer");

    let direction = (point - viewer.origin(&body)).normalize();
    viewer.yaw = (-direction.x).atan2(-direction.z);
    viewer.pitch = direction.y.clamp(-1.0, 1.0).asin();
}

/// Input на один кадр (edge поля сбросятся в Last)
pub fn with_input(app: &mut App, player: Entity, apply: impl FnOnce(&mut ViewerInput)) {
    let mut input = app.world_mut().get_mut::<ViewerInput>(player).expect("viewer input");
    apply(&mut input);
}

pub fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// События, доступные в текущем буфере
pub fn read_events<E: Event + Clone>(app: &App) -> Vec<E> {
    let events = app.world().resource::<Events<E>>();
    events.get_cursor().read(events).cloned().collect()
}

/// Навести взгляд, нажать interact и дождаться fixed step с захватом
pub fn grab_crate(app: &mut App, player: Entity, crate_entity: Entity) {
    let target = app.world().get::<Transform>(crate_entity).expect("crate").translation;
    look_at(app, player, target);
    // Кадр фокуса
    app.update();
    with_input(app, player, |input| input.interact_pressed = true);
    // Запрос уходит в очередь grabber'а
    app.update();
    // FixedUpdate исполняет Start
    app.update();
}

/// Тот же App, но тела, коллизии, raycast и grab joint считает Rapier
pub fn create_rapier_app() -> App {
    use bevy::time::TimeUpdateStrategy;
    use bevy_rapier3d::prelude::{NoUserData, PhysicsSet, RapierPhysicsPlugin, TimestepMode};

    init_logger();
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, TransformPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(FIXED_STEP))
        .add_plugins(SimulationPlugin::rapier())
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        .insert_resource(TimestepMode::Fixed {
            dt: FIXED_STEP.as_secs_f32(),
            substeps: 1,
        })
        .configure_sets(FixedUpdate, FixedSet::Integrate.before(PhysicsSet::SyncBackend));

    app
}

/// Пол 20x20m, верх на y = 0
pub fn spawn_rapier_floor(app: &mut App) -> Entity {
    use bevy_rapier3d::prelude::{Collider, RigidBody};
    use holdfast_simulation::shared::collision_layers::environment_groups;

    app.world_mut()
        .spawn((
            Transform::from_xyz(0.0, -0.1, 0.0),
            RigidBody::Fixed,
            Collider::cuboid(10.0, 0.1, 10.0),
            environment_groups(),
        ))
        .id()
}

/// Стена из одного collider'а (без `BodyShape`)
pub fn spawn_rapier_wall(app: &mut App, center: Vec3, half_extents: Vec3) -> Entity {
    use bevy_rapier3d::prelude::{Collider, RigidBody};
    use holdfast_simulation::shared::collision_layers::environment_groups;

    app.world_mut()
        .spawn((
            Transform::from_translation(center),
            RigidBody::Fixed,
            Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
            environment_groups(),
        ))
        .id()
}

/// Игрок с kinematic капсулой
pub fn spawn_rapier_player(app: &mut App, position: Vec3) -> Entity {
    use holdfast_simulation::movement::rapier_character_bundle;

    let player = spawn_test_player(app, position);
    let capsule = *app.world().get::<CharacterCapsule>(player).expect("capsule");
    app.world_mut()
        .entity_mut(player)
        .insert(rapier_character_bundle(&capsule));
    player
}

/// Ящик, который видит только Rapier (форма задана одним `Collider`)
pub fn spawn_rapier_crate(app: &mut App, position: Vec3) -> Entity {
    use bevy_rapier3d::prelude::{Ccd, Collider, ColliderMassProperties, GravityScale, RigidBody, Velocity};
    use holdfast_simulation::shared::collision_layers::{grabbable_groups, COLLISION_LAYER_GRABBABLES};

    let config = GrabbableConfig::default();
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            PhysicsBody::with_mass(config.weight),
            QueryLayers(COLLISION_LAYER_GRABBABLES),
            GrabbableEntity::new(config),
            Interactable::new(InteractionKind::Grab),
            RigidBody::Dynamic,
            Collider::cuboid(CRATE_HALF_EXTENTS.x, CRATE_HALF_EXTENTS.y, CRATE_HALF_EXTENTS.z),
            ColliderMassProperties::Mass(config.weight),
            Velocity::default(),
            GravityScale(1.0),
            Ccd::disabled(),
            grabbable_groups(),
        ))
        .id()
}
