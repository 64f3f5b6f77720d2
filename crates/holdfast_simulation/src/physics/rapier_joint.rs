//! Grab joint под bevy_rapier3d
//!
//! Пока объект удерживается, его `SpringJoint` живёт в Rapier как
//! `ImpulseJoint` к kinematic anchor телу: Limited оси = position motor
//! (ForceBased) + limits, Locked оси = locked axes. Солвер Rapier'а
//! решает joint вместе с контактами, поворот не телепортируется.
//!
//! Anchor тело создаётся на старте удержания и удаляется вместе с joint'ом.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{
    GenericJoint, GenericJointBuilder, ImpulseJoint, JointAxesMask, JointAxis, MotorModel, RigidBody, TypedJoint,
};

use super::joint::{JointMotion, SpringJoint};
use crate::grab::GrabbableEntity;
use crate::logger;

const LINEAR_AXES: [(JointAxis, JointAxesMask); 3] = [
    (JointAxis::LinX, JointAxesMask::LIN_X),
    (JointAxis::LinY, JointAxesMask::LIN_Y),
    (JointAxis::LinZ, JointAxesMask::LIN_Z),
];

const ANGULAR_AXES: [(JointAxis, JointAxesMask); 3] = [
    (JointAxis::AngX, JointAxesMask::ANG_X),
    (JointAxis::AngY, JointAxesMask::ANG_Y),
    (JointAxis::AngZ, JointAxesMask::ANG_Z),
];

/// Связь удерживаемого тела с его anchor телом
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RapierGrabLink {
    pub anchor: Entity,
}

/// Kinematic тело, к которому прикреплён grab joint
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RapierGrabAnchor {
    pub body: Entity,
}

impl SpringJoint {
    /// Описание joint'а для Rapier (anchor = первое тело, объект = второе)
    ///
    /// Anchor тело стоит в `target` без поворота, поворот объекта задаёт
    /// `local_basis1`.
    pub fn to_rapier(&self) -> GenericJoint {
        let mut locked = JointAxesMask::empty();
        for (motion, (_, mask)) in self.linear.iter().zip(LINEAR_AXES).chain(self.angular.iter().zip(ANGULAR_AXES)) {
            if *motion == JointMotion::Locked {
                locked |= mask;
            }
        }

        let mut builder = GenericJointBuilder::new(locked).local_basis1(self.target_basis());

        for (motion, (axis, _)) in self.linear.iter().zip(LINEAR_AXES) {
            if let JointMotion::Limited { limit } = *motion {
                builder = builder
                    .limits(axis, [-limit, limit])
                    .motor_model(axis, MotorModel::ForceBased)
                    .motor_position(axis, 0.0, self.stiffness, self.damping);
            }
        }
        for (motion, (axis, _)) in self.angular.iter().zip(ANGULAR_AXES) {
            if let JointMotion::Limited { limit } = *motion {
                builder = builder.limits(axis, [-limit, limit]);
            }
        }

        builder.build()
    }

    /// Целевой поворот объекта
    pub fn target_basis(&self) -> Quat {
        self.target_rotation * self.rotation_offset
    }
}

/// Система: GrabbableEntity.joint() ↔ ImpulseJoint + anchor тело
///
/// Появился joint → spawn anchor'а и ImpulseJoint; joint есть →
/// anchor и basis следуют за target; joint пропал → всё удаляется.
pub fn sync_rapier_grab_joints(
    mut commands: Commands,
    mut grabbables: Query<(Entity, &GrabbableEntity, Option<&RapierGrabLink>, Option<&mut ImpulseJoint>)>,
    mut anchors: Query<&mut Transform, With<RapierGrabAnchor>>,
) {
    for (entity, grabbable, link, impulse_joint) in grabbables.iter_mut() {
        match (grabbable.joint(), link) {
            (Some(joint), None) => {
                let anchor = commands
                    .spawn((
                        RapierGrabAnchor { body: entity },
                        RigidBody::KinematicPositionBased,
                        Transform::from_translation(joint.target),
                    ))
                    .id();
                commands.entity(entity).try_insert((
                    RapierGrabLink { anchor },
                    ImpulseJoint::new(anchor, TypedJoint::GenericJoint(joint.to_rapier())),
                ));
                logger::log(&format!("{:?} attached to grab anchor {:?}", entity, anchor));
            }
            (Some(joint), Some(link)) => {
                if let Ok(mut anchor_transform) = anchors.get_mut(link.anchor) {
                    if anchor_transform.translation != joint.target {
                        anchor_transform.translation = joint.target;
                    }
                }

                let Some(mut impulse_joint) = impulse_joint else {
                    continue;
                };
                let basis = joint.target_basis();
                let current: &GenericJoint = impulse_joint.data.as_ref();
                if current.local_basis1() != basis {
                    let generic: &mut GenericJoint = impulse_joint.data.as_mut();
                    generic.set_local_basis1(basis);
                }
            }
            (None, Some(link)) => {
                commands.entity(link.anchor).try_despawn();
                commands
                    .entity(entity)
                    .try_remove::<(RapierGrabLink, ImpulseJoint)>();
            }
            (None, None) => {}
        }
    }
}

/// Система: anchor, чьё тело исчезло из мира
pub fn despawn_orphaned_grab_anchors(
    mut commands: Commands,
    anchors: Query<(Entity, &RapierGrabAnchor)>,
    bodies: Query<(), With<GrabbableEntity>>,
) {
    for (anchor, link) in anchors.iter() {
        if bodies.get(link.body).is_err() {
            commands.entity(anchor).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_maps_to_motors_and_limits() {
        let joint = SpringJoint::spring(Vec3::new(0.0, 1.5, -2.0), 400.0, 20.0, 0.5);
        let rapier = joint.to_rapier();

        assert_eq!(rapier.locked_axes(), JointAxesMask::ANG_X | JointAxesMask::ANG_Y | JointAxesMask::ANG_Z);

        let limits = rapier.limits(JointAxis::LinY).unwrap();
        assert_eq!((limits.min, limits.max), (-0.5, 0.5));

        let motor = rapier.motor(JointAxis::LinZ).unwrap();
        assert_eq!(motor.stiffness, 400.0);
        assert_eq!(motor.damping, 20.0);
        assert_eq!(motor.target_pos, 0.0);
        assert!(matches!(rapier.motor_model(JointAxis::LinX), Some(MotorModel::ForceBased)));
    }

    #[test]
    fn test_locked_linear_axis_and_basis() {
        let mut joint = SpringJoint::spring(Vec3::ZERO, 100.0, 10.0, 1.0);
        joint.linear[1] = JointMotion::Locked;
        joint.angular[2] = JointMotion::Free;
        joint.target_rotation = Quat::from_rotation_y(1.0);
        joint.rotation_offset = Quat::from_rotation_x(0.5);

        let rapier = joint.to_rapier();

        assert!(rapier.locked_axes().contains(JointAxesMask::LIN_Y));
        assert!(!rapier.locked_axes().contains(JointAxesMask::ANG_Z));
        assert!(rapier.limits(JointAxis::LinY).is_none());
        assert!(rapier.local_basis1().angle_between(joint.target_basis()) < 1e-5);
    }
}
