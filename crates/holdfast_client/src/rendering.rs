use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use holdfast_simulation::interaction::Highlighted;
use holdfast_simulation::movement::rapier_character_bundle;
use holdfast_simulation::shared::collision_layers::{environment_groups, grabbable_groups, interactable_groups};
use holdfast_simulation::{
    spawn_grabbable, spawn_interactable, spawn_player, BodyShape, CharacterCapsule, CrosshairChanged, CrosshairCursor,
    GrabbableConfig, InteractionKind, Player, PlayerTuning, Stamina,
};

use crate::camera::FirstPersonCamera;

pub struct RenderingSyncPlugin;

impl Plugin for RenderingSyncPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (apply_highlight, clear_highlight, update_crosshair_text, update_stamina_text),
        );
    }
}

/// Материал объекта без подсветки
#[derive(Component)]
pub struct BaseMaterial(pub Handle<StandardMaterial>);

#[derive(Resource)]
pub struct HighlightMaterial(pub Handle<StandardMaterial>);

#[derive(Component)]
pub struct CrosshairText;

#[derive(Component)]
pub struct StaminaText;

/// Пол, стены, ящики разной массы, кнопка и табличка
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    tuning: Res<PlayerTuning>,
) {
    // Ground (20x20m), верх коллайдера на y = 0
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::splat(10.0)))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.35, 0.3))),
        Transform::IDENTITY,
    ));
    commands.spawn((
        Transform::from_xyz(0.0, -0.1, 0.0),
        RigidBody::Fixed,
        Collider::cuboid(10.0, 0.1, 10.0),
        environment_groups(),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_4)),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 0.3,
        affects_lightmapped_meshes: false,
    });

    commands.insert_resource(HighlightMaterial(materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.8, 0.3),
        emissive: LinearRgba::rgb(0.4, 0.3, 0.05),
        ..default()
    })));

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: tuning.fatigue_effects.default_fov.to_radians(),
            ..default()
        }),
        FirstPersonCamera,
    ));

    // Kinematic капсула: стены и ящики останавливают игрока
    let player = spawn_player(&mut commands, Vec3::new(0.0, 0.0, 4.0), &tuning);
    commands
        .entity(player)
        .insert(rapier_character_bundle(&CharacterCapsule::new(&tuning.movement)));

    // Стена (environment: перекрывает луч интеракции)
    let wall_material = materials.add(Color::srgb(0.5, 0.5, 0.55));
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(6.0, 3.0, 0.2))),
        MeshMaterial3d(wall_material),
        Transform::from_xyz(0.0, 1.5, -4.0),
        RigidBody::Fixed,
        Collider::cuboid(3.0, 1.5, 0.1),
        environment_groups(),
    ));

    // Ящики: лёгкий, стандартный, тяжёлый
    for (x, weight, half) in [(-1.5, 2.0, 0.2), (0.0, tuning.grabbable.weight, 0.25), (1.5, 20.0, 0.35)] {
        let config = GrabbableConfig { weight, ..tuning.grabbable };
        let material = materials.add(Color::srgb(0.6, 0.4, 0.2));
        let entity = spawn_grabbable(
            &mut commands,
            Vec3::new(x, half, 0.0),
            BodyShape::Cuboid {
                half_extents: Vec3::splat(half),
            },
            config,
        );
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cuboid::new(half * 2.0, half * 2.0, half * 2.0))),
            MeshMaterial3d(material.clone()),
            BaseMaterial(material),
            RigidBody::Dynamic,
            Collider::cuboid(half, half, half),
            ColliderMassProperties::Mass(weight),
            Velocity::default(),
            GravityScale(1.0),
            Ccd::disabled(),
            grabbable_groups(),
        ));
    }

    // Кнопка и табличка: sensor'ы, видимые только лучу интеракции
    for (position, kind, color) in [
        (Vec3::new(-2.0, 1.2, -3.85), InteractionKind::Interact, Color::srgb(0.8, 0.2, 0.2)),
        (Vec3::new(2.0, 1.5, -3.85), InteractionKind::Examine, Color::srgb(0.2, 0.4, 0.8)),
    ] {
        let material = materials.add(color);
        let entity = spawn_interactable(&mut commands, position, BodyShape::Sphere { radius: 0.15 }, kind);
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(0.15))),
            MeshMaterial3d(material.clone()),
            BaseMaterial(material),
            Collider::ball(0.15),
            Sensor,
            interactable_groups(),
        ));
    }

    // HUD
    commands.spawn((
        Text::new(""),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            top: Val::Percent(50.0),
            ..default()
        },
        CrosshairText,
    ));
    commands.spawn((
        Text::new(""),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            bottom: Val::Px(12.0),
            ..default()
        },
        StaminaText,
    ));
}

fn apply_highlight(
    highlight: Option<Res<HighlightMaterial>>,
    mut query: Query<&mut MeshMaterial3d<StandardMaterial>, Added<Highlighted>>,
) {
    let Some(highlight) = highlight else {
        return;
    };
    for mut material in query.iter_mut() {
        material.0 = highlight.0.clone();
    }
}

fn clear_highlight(
    mut removed: RemovedComponents<Highlighted>,
    mut query: Query<(&BaseMaterial, &mut MeshMaterial3d<StandardMaterial>)>,
) {
    for entity in removed.read() {
        if let Ok((base, mut material)) = query.get_mut(entity) {
            material.0 = base.0.clone();
        }
    }
}

fn update_crosshair_text(mut events: EventReader<CrosshairChanged>, mut query: Query<&mut Text, With<CrosshairText>>) {
    let Some(event) = events.read().last() else {
        return;
    };
    let Ok(mut text) = query.single_mut() else {
        return;
    };

    let glyph = match event.cursor {
        CrosshairCursor::Hidden => "",
        CrosshairCursor::Interact => "[E]",
        CrosshairCursor::Examine => "?",
        CrosshairCursor::Grab => "o",
        CrosshairCursor::GrabHold => "(o)",
    };
    text.0 = glyph.to_string();
    holdfast_simulation::log(&format!("crosshair → {:?}", event.cursor));
}

fn update_stamina_text(
    players: Query<&Stamina, (With<Player>, Changed<Stamina>)>,
    mut query: Query<&mut Text, (With<StaminaText>, Without<CrosshairText>)>,
) {
    let Ok(stamina) = players.single() else {
        return;
    };
    let Ok(mut text) = query.single_mut() else {
        return;
    };

    let suffix = if stamina.is_fatigued() { " (fatigued)" } else { "" };
    text.0 = format!("Stamina {:.0}/{:.0}{}", stamina.current(), stamina.max(), suffix);
}
