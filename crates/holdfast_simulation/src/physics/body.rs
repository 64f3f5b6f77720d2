//! Физические компоненты динамических объектов (ящики, пропсы)
//!
//! Velocity храним сами (как в kinematic контроллере): headless backend
//! интегрирует её напрямую, Rapier backend зеркалит в `Velocity`.

use bevy::prelude::*;

/// Режим обнаружения коллизий
///
/// `Continuous` включается на время удержания (быстрое движение за камерой
/// не должно проходить сквозь стены). В Rapier это `Ccd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum CollisionMode {
    #[default]
    Discrete,
    Continuous,
}

/// Физическое тело объекта
///
/// Инвариант: mass > 0 (делим на sqrt(mass) при захвате и броске)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    /// Линейная скорость (m/s)
    pub velocity: Vec3,
    /// Угловая скорость (rad/s, scaled axis)
    pub angular_velocity: Vec3,
    /// Масса (kg)
    pub mass: f32,
    /// Участвует ли тело в мировой гравитации
    pub gravity_enabled: bool,
    pub collision_mode: CollisionMode,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: 1.0,
            gravity_enabled: true,
            collision_mode: CollisionMode::Discrete,
        }
    }
}

impl PhysicsBody {
    pub fn with_mass(mass: f32) -> Self {
        Self {
            mass,
            ..default()
        }
    }
}

/// Простая геометрия для raycast и headless ground contact
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum BodyShape {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

impl BodyShape {
    /// Полувысота фигуры по мировой оси Y с учётом поворота
    pub fn vertical_extent(&self, rotation: Quat) -> f32 {
        match *self {
            BodyShape::Sphere { radius } => radius,
            BodyShape::Cuboid { half_extents } => {
                let x = rotation * Vec3::X;
                let y = rotation * Vec3::Y;
                let z = rotation * Vec3::Z;
                x.y.abs() * half_extents.x + y.y.abs() * half_extents.y + z.y.abs() * half_extents.z
            }
        }
    }
}

/// Membership слоёв для raycast фильтра (биты из `shared::collision_layers`)
///
/// Нет компонента → объект считается окружением.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct QueryLayers(pub u32);

/// Тег поверхности, возвращается raycast'ом (footsteps, decals и т.п.)
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct SurfaceTag(pub String);

/// Глобальные настройки физики
#[derive(Resource, Debug, Clone, Copy)]
pub struct PhysicsSettings {
    /// Мировая гравитация для динамических тел (m/s²)
    pub gravity: Vec3,
    /// Затухание горизонтальной скорости при контакте с полом (1/s)
    pub ground_friction: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            ground_friction: 6.0,
        }
    }
}

/// Высота плоского пола (headless ground detection stub)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct GroundLevel(pub f32);

/// Кто двигает динамические тела
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhysicsBackend {
    /// Встроенная интеграция (тесты, headless симуляция)
    #[default]
    Headless,
    /// bevy_rapier3d в fixed schedule (клиент)
    Rapier,
}
