//! Headless интеграция динамических тел (без Rapier)
//!
//! gravity → velocity → Transform → ground rest. Работает в FixedUpdate
//! только при `PhysicsBackend::Headless`.

use bevy::prelude::*;

use super::body::{BodyShape, GroundLevel, PhysicsBody, PhysicsSettings};

/// Гравитация для тел с `gravity_enabled`
pub fn apply_body_gravity(
    mut query: Query<&mut PhysicsBody>,
    settings: Res<PhysicsSettings>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for mut body in query.iter_mut() {
        if body.gravity_enabled {
            body.velocity += settings.gravity * delta;
        }
    }
}

/// position += velocity × dt, rotation += angular_velocity × dt
pub fn integrate_bodies(mut query: Query<(&PhysicsBody, &mut Transform)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (body, mut transform) in query.iter_mut() {
        transform.translation += body.velocity * delta;

        if body.angular_velocity != Vec3::ZERO {
            transform.rotation = (Quat::from_scaled_axis(body.angular_velocity * delta) * transform.rotation).normalize();
        }
    }
}

/// Тело не проваливается ниже пола; на полу гасится падение и трение
pub fn resolve_ground_contact(
    mut query: Query<(&mut PhysicsBody, &mut Transform, Option<&BodyShape>)>,
    ground: Res<GroundLevel>,
    settings: Res<PhysicsSettings>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let friction = (1.0 - settings.ground_friction * delta).clamp(0.0, 1.0);

    for (mut body, mut transform, shape) in query.iter_mut() {
        let extent = shape.map_or(0.0, |s| s.vertical_extent(transform.rotation));
        let bottom = transform.translation.y - extent;

        if bottom > ground.0 {
            continue;
        }

        transform.translation.y = ground.0 + extent;
        if body.velocity.y < 0.0 {
            body.velocity.y = 0.0;
        }
        body.velocity.x *= friction;
        body.velocity.z *= friction;
        body.angular_velocity *= friction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_logic() {
        // Логика напрямую, без schedule
        let settings = PhysicsSettings::default();
        let mut body = PhysicsBody::with_mass(5.0);
        let delta = 0.02;

        if body.gravity_enabled {
            body.velocity += settings.gravity * delta;
        }

        assert!((body.velocity.y + 0.1962).abs() < 1e-4);
    }

    #[test]
    fn test_disabled_gravity_keeps_velocity() {
        let settings = PhysicsSettings::default();
        let mut body = PhysicsBody {
            gravity_enabled: false,
            ..default()
        };

        if body.gravity_enabled {
            body.velocity += settings.gravity * 0.02;
        }

        assert_eq!(body.velocity, Vec3::ZERO);
    }
}
