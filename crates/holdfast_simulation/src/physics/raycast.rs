//! Forward raycast по сцене
//!
//! `SceneRaycaster` - seam между targeting'ом и физическим движком:
//! - `ShapeRaycaster` (headless): луч против `BodyShape` (сфера, OBB)
//! - `RapierRaycaster`: query pipeline bevy_rapier3d, видит любой collider
//! - `BackendRaycaster`: выбирает одно из двух по `PhysicsBackend`

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{CollisionGroups, Group, QueryFilter, ReadRapierContext};

use super::body::{BodyShape, PhysicsBackend, QueryLayers, SurfaceTag};
use crate::shared::collision_layers::{group, COLLISION_LAYER_ENVIRONMENT};

/// Фильтр запроса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RayFilter {
    /// Какие слои видит луч
    pub mask: u32,
    /// Игнорировать эту entity (сам viewer, удерживаемый объект)
    pub exclude: Option<Entity>,
}

impl RayFilter {
    pub fn new(mask: u32) -> Self {
        Self {
            mask,
            exclude: None,
        }
    }

    fn accepts(&self, entity: Entity, layers: Option<&QueryLayers>) -> bool {
        if self.exclude == Some(entity) {
            return false;
        }
        let membership = layers.map_or(COLLISION_LAYER_ENVIRONMENT, |l| l.0);
        group(self.mask).intersects(group(membership))
    }
}

/// Ближайшее попадание
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec3,
    pub distance: f32,
    pub surface: Option<String>,
}

pub trait SceneRaycaster {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        filter: &RayFilter,
    ) -> Option<RayHit>;
}

/// Raycast по всем entity с `BodyShape`
#[derive(SystemParam)]
pub struct ShapeRaycaster<'w, 's> {
    shapes: Query<
        'w,
        's,
        (
            Entity,
            &'static Transform,
            &'static BodyShape,
            Option<&'static QueryLayers>,
            Option<&'static SurfaceTag>,
        ),
    >,
}

impl SceneRaycaster for ShapeRaycaster<'_, '_> {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        filter: &RayFilter,
    ) -> Option<RayHit> {
        let mut nearest: Option<RayHit> = None;

        for (entity, transform, shape, layers, surface) in self.shapes.iter() {
            if !filter.accepts(entity, layers) {
                continue;
            }

            let Some(distance) = intersect_shape(origin, *direction, transform, shape) else {
                continue;
            };

            if distance > max_distance {
                continue;
            }

            if nearest.as_ref().is_none_or(|hit| distance < hit.distance) {
                nearest = Some(RayHit {
                    entity,
                    point: origin + *direction * distance,
                    distance,
                    surface: surface.map(|s| s.0.clone()),
                });
            }
        }

        nearest
    }
}

/// Raycast через Rapier query pipeline
///
/// Membership цели берётся из `CollisionGroups` collider'а, sensor'ы
/// (кнопки, таблички) тоже попадают. Нет Rapier контекста → промах.
#[derive(SystemParam)]
pub struct RapierRaycaster<'w, 's> {
    context: ReadRapierContext<'w, 's>,
    surfaces: Query<'w, 's, &'static SurfaceTag>,
}

impl SceneRaycaster for RapierRaycaster<'_, '_> {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        filter: &RayFilter,
    ) -> Option<RayHit> {
        let context = self.context.single().ok()?;

        let mut query = QueryFilter::new().groups(CollisionGroups::new(Group::ALL, group(filter.mask)));
        if let Some(excluded) = filter.exclude {
            query = query.exclude_rigid_body(excluded).exclude_collider(excluded);
        }

        let (entity, distance) = context.cast_ray(origin, *direction, max_distance, true, query)?;

        Some(RayHit {
            entity,
            point: origin + *direction * distance,
            distance,
            surface: self.surfaces.get(entity).ok().map(|s| s.0.clone()),
        })
    }
}

/// Raycaster активного backend'а
#[derive(SystemParam)]
pub struct BackendRaycaster<'w, 's> {
    backend: Res<'w, PhysicsBackend>,
    shapes: ShapeRaycaster<'w, 's>,
    rapier: RapierRaycaster<'w, 's>,
}

impl SceneRaycaster for BackendRaycaster<'_, '_> {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        filter: &RayFilter,
    ) -> Option<RayHit> {
        match *self.backend {
            PhysicsBackend::Headless => self.shapes.cast_ray(origin, direction, max_distance, filter),
            PhysicsBackend::Rapier => self.rapier.cast_ray(origin, direction, max_distance, filter),
        }
    }
}

/// Расстояние до входа луча в фигуру
///
/// Луч, начинающийся внутри фигуры, её не видит.
pub fn intersect_shape(origin: Vec3, direction: Vec3, transform: &Transform, shape: &BodyShape) -> Option<f32> {
    match *shape {
        BodyShape::Sphere { radius } => {
            let radius = radius * transform.scale.max_element();
            intersect_sphere(origin, direction, transform.translation, radius)
        }
        BodyShape::Cuboid { half_extents } => {
            // В локальное пространство коробки
            let inverse = transform.rotation.inverse();
            let local_origin = inverse * (origin - transform.translation);
            let local_direction = inverse * direction;
            intersect_aabb(local_origin, local_direction, half_extents * transform.scale)
        }
    }
}

fn intersect_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_origin = origin - center;
    let b = to_origin.dot(direction);
    let c = to_origin.length_squared() - radius * radius;

    if c < 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    (t >= 0.0).then_some(t)
}

/// Slab метод
fn intersect_aabb(origin: Vec3, direction: Vec3, half_extents: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        let h = half_extents[axis];

        if d.abs() < 1e-8 {
            // Параллельно slab'у: либо внутри по этой оси, либо промах
            if o < -h || o > h {
                return None;
            }
            continue;
        }

        let mut t1 = (-h - o) / d;
        let mut t2 = (h - o) / d;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        t_near = t_near.max(t1);
        t_far = t_far.min(t2);

        if t_near > t_far {
            return None;
        }
    }

    (t_near >= 0.0).then_some(t_near)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_hit_distance() {
        let transform = Transform::from_xyz(0.0, 0.0, -5.0);
        let shape = BodyShape::Sphere { radius: 1.0 };

        let distance = intersect_shape(Vec3::ZERO, Vec3::NEG_Z, &transform, &shape);
        assert!((distance.unwrap() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_miss_and_behind() {
        let transform = Transform::from_xyz(0.0, 3.0, -5.0);
        let shape = BodyShape::Sphere { radius: 1.0 };
        assert!(intersect_shape(Vec3::ZERO, Vec3::NEG_Z, &transform, &shape).is_none());

        let behind = Transform::from_xyz(0.0, 0.0, 5.0);
        assert!(intersect_shape(Vec3::ZERO, Vec3::NEG_Z, &behind, &shape).is_none());
    }

    #[test]
    fn test_rotated_cuboid_hit() {
        // Коробка 1×1×1, повёрнута на 45° вокруг Y: ближний угол на z = -3 + sqrt(0.5)
        let transform = Transform::from_xyz(0.0, 0.0, -3.0)
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_4));
        let shape = BodyShape::Cuboid {
            half_extents: Vec3::splat(0.5),
        };

        let distance = intersect_shape(Vec3::ZERO, Vec3::NEG_Z, &transform, &shape).unwrap();
        let expected = 3.0 - 0.5_f32.sqrt();
        assert!((distance - expected).abs() < 1e-4, "distance = {}", distance);
    }

    #[test]
    fn test_origin_inside_cuboid_is_ignored() {
        let shape = BodyShape::Cuboid {
            half_extents: Vec3::splat(1.0),
        };
        assert!(intersect_shape(Vec3::ZERO, Vec3::X, &Transform::default(), &shape).is_none());
    }

    #[test]
    fn test_filter_layers_and_exclude() {
        use crate::shared::collision_layers::*;

        let entity = Entity::from_raw(7);
        let filter = RayFilter::new(COLLISION_MASK_INTERACTION);

        assert!(filter.accepts(entity, Some(&QueryLayers(COLLISION_LAYER_GRABBABLES))));
        assert!(!filter.accepts(entity, Some(&QueryLayers(COLLISION_LAYER_ACTORS))));
        // Без компонента - окружение, маска interaction его видит
        assert!(filter.accepts(entity, None));

        let excluding = RayFilter {
            exclude: Some(entity),
            ..filter
        };
        assert!(!excluding.accepts(entity, None));
    }
}
