//! Physics module
//!
//! Динамические тела (PhysicsBody), spring joint, raycast и два backend'а:
//! - Headless: своя интеграция velocity → Transform (тесты, сервер)
//! - Rapier: velocity зеркалится в bevy_rapier3d, коллизии и grab joint
//!   считает Rapier

pub mod body;
pub mod integration;
pub mod joint;
pub mod rapier_bridge;
pub mod rapier_joint;
pub mod raycast;

use bevy::prelude::*;

pub use body::{
    BodyShape, CollisionMode, GroundLevel, PhysicsBackend, PhysicsBody, PhysicsSettings, QueryLayers, SurfaceTag,
};
pub use integration::{apply_body_gravity, integrate_bodies, resolve_ground_contact};
pub use joint::{JointMotion, SpringJoint};
pub use rapier_bridge::{pull_rapier_velocities, push_rapier_state};
pub use rapier_joint::{despawn_orphaned_grab_anchors, sync_rapier_grab_joints, RapierGrabAnchor, RapierGrabLink};
pub use raycast::{BackendRaycaster, RapierRaycaster, RayFilter, RayHit, SceneRaycaster, ShapeRaycaster};

use crate::FixedSet;

/// Plugin физики динамических тел
///
/// Grab системы живут между `FixedSet::PhysicsSync` и `FixedSet::Integrate`.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PhysicsSettings>()
            .init_resource::<GroundLevel>()
            .init_resource::<PhysicsBackend>()
            .register_type::<PhysicsBody>()
            .register_type::<BodyShape>()
            .register_type::<QueryLayers>()
            .register_type::<SurfaceTag>();

        app.add_systems(
            FixedUpdate,
            pull_rapier_velocities
                .in_set(FixedSet::PhysicsSync)
                .run_if(resource_equals(PhysicsBackend::Rapier)),
        );

        app.add_systems(
            FixedUpdate,
            (
                (apply_body_gravity, integrate_bodies, resolve_ground_contact)
                    .chain()
                    .run_if(resource_equals(PhysicsBackend::Headless)),
                (push_rapier_state, sync_rapier_grab_joints, despawn_orphaned_grab_anchors)
                    .run_if(resource_equals(PhysicsBackend::Rapier)),
            )
                .in_set(FixedSet::Integrate),
        );
    }
}
