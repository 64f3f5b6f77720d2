//! Spring-damped joint между телом и целевой точкой (anchor)
//!
//! Аналог configurable joint'а: по каждой линейной/угловой оси
//! `Locked | Limited | Free`. Limited ось тянется пружиной к target и
//! жёстко останавливается на `limit`. Angular Locked = поворот тела
//! приравнивается к `target_rotation * rotation_offset`.
//!
//! Joint не знает про grab: владелец (GrabbableEntity) создаёт и
//! уничтожает его сам, solve вызывается из fixed step.

use bevy::prelude::*;

use super::body::PhysicsBody;

/// Свобода по одной оси
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum JointMotion {
    Locked,
    /// Пружина внутри `limit` (m), жёсткий упор снаружи
    Limited { limit: f32 },
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SpringJoint {
    /// Мировая позиция anchor'а
    pub target: Vec3,
    /// Мировой поворот anchor'а (для angular Locked)
    pub target_rotation: Quat,
    pub stiffness: f32,
    pub damping: f32,
    /// Линейные оси X/Y/Z (мировые)
    pub linear: [JointMotion; 3],
    /// Угловые оси (Locked на всех трёх = полная фиксация поворота)
    pub angular: [JointMotion; 3],
    /// Поворот тела относительно anchor'а, захвачен при создании joint'а
    pub rotation_offset: Quat,
}

impl SpringJoint {
    /// Joint с пружиной по всем линейным осям и заблокированным поворотом
    pub fn spring(target: Vec3, stiffness: f32, damping: f32, limit: f32) -> Self {
        Self {
            target,
            target_rotation: Quat::IDENTITY,
            stiffness,
            damping,
            linear: [JointMotion::Limited { limit }; 3],
            angular: [JointMotion::Locked; 3],
            rotation_offset: Quat::IDENTITY,
        }
    }

    /// Один шаг солвера
    ///
    /// Пишет только velocity (и позицию/поворот для Locked и упора),
    /// интеграцию делает backend. dt ≤ 0 → no-op.
    pub fn solve(&self, body: &mut PhysicsBody, transform: &mut Transform, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let mass = body.mass.max(f32::EPSILON);

        for axis in 0..3 {
            let offset = self.target[axis] - transform.translation[axis];

            match self.linear[axis] {
                JointMotion::Free => {}
                JointMotion::Locked => {
                    transform.translation[axis] = self.target[axis];
                    body.velocity[axis] = 0.0;
                }
                JointMotion::Limited { limit } => {
                    // Semi-implicit: демпфирование в знаменателе, не взрывается на больших c
                    let spring = self.stiffness * offset / mass;
                    let damping = self.damping / mass;
                    body.velocity[axis] = (body.velocity[axis] + spring * dt) / (1.0 + damping * dt);

                    if offset.abs() > limit {
                        // Упор: возвращаем на границу, гасим скорость наружу
                        transform.translation[axis] = self.target[axis] - offset.signum() * limit;
                        if body.velocity[axis] * offset < 0.0 {
                            body.velocity[axis] = 0.0;
                        }
                    }
                }
            }
        }

        if self.angular.iter().all(|m| *m == JointMotion::Locked) {
            transform.rotation = self.target_rotation * self.rotation_offset;
            body.angular_velocity = Vec3::ZERO;
        } else {
            for axis in 0..3 {
                if self.angular[axis] == JointMotion::Locked {
                    body.angular_velocity[axis] = 0.0;
                }
            }
        }
    }
}
