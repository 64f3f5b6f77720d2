//! Синхронизация PhysicsBody ↔ bevy_rapier3d
//!
//! Rapier шагает тела в FixedUpdate после `FixedSet::Integrate`. Мы:
//! 1. В начале FixedUpdate забираем посчитанную Rapier'ом velocity
//! 2. Grab/joint системы правят PhysicsBody
//! 3. В конце FixedUpdate отдаём velocity + gravity scale + CCD обратно

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::body::{CollisionMode, PhysicsBody};

pub fn pull_rapier_velocities(mut query: Query<(&mut PhysicsBody, &Velocity)>) {
    for (mut body, velocity) in query.iter_mut() {
        body.velocity = velocity.linvel;
        body.angular_velocity = velocity.angvel;
    }
}

pub fn push_rapier_state(
    mut query: Query<(
        &PhysicsBody,
        &mut Velocity,
        Option<&mut GravityScale>,
        Option<&mut Ccd>,
    )>,
) {
    for (body, mut velocity, gravity_scale, ccd) in query.iter_mut() {
        velocity.linvel = body.velocity;
        velocity.angvel = body.angular_velocity;

        if let Some(mut gravity_scale) = gravity_scale {
            let scale = if body.gravity_enabled { 1.0 } else { 0.0 };
            if gravity_scale.0 != scale {
                gravity_scale.0 = scale;
            }
        }

        if let Some(mut ccd) = ccd {
            let enabled = body.collision_mode == CollisionMode::Continuous;
            if ccd.enabled != enabled {
                ccd.enabled = enabled;
            }
        }
    }
}
