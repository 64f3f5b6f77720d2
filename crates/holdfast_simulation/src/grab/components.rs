//! Grab компоненты: захватываемый объект и тот, кто захватывает
//!
//! Архитектура:
//! - `GrabbableEntity` владеет joint'ом эксклюзивно, пока удерживается.
//!   Joint и holder живут в одном `ActiveHold`, поэтому
//!   «joint есть ⇔ holder есть» держится по построению.
//! - `Grabber` (игрок) копит команды из Update, fixed step их исполняет.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::history::VelocityHistory;
use crate::physics::{CollisionMode, PhysicsBody, SpringJoint};

/// Тюнинг захватываемого объекта
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabbableConfig {
    /// Масса объекта (kg), идёт в PhysicsBody
    pub weight: f32,
    pub spring_force: f32,
    pub spring_damping: f32,
    /// Множитель средней скорости при отпускании
    pub throw_force_multiplier: f32,
    /// Сила броска вперёд (делится на sqrt(mass))
    pub forward_throw_force: f32,
    /// Размер ring buffer'а позиций
    pub velocity_samples: usize,
    /// Предел Limited осей joint'а (m)
    pub linear_limit: f32,
}

impl Default for GrabbableConfig {
    fn default() -> Self {
        Self {
            weight: 5.0,
            spring_force: 2000.0,
            spring_damping: 50.0,
            throw_force_multiplier: 2.0,
            forward_throw_force: 10.0,
            velocity_samples: 5,
            linear_limit: 0.5,
        }
    }
}

/// Фаза state machine захвата
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum GrabPhase {
    #[default]
    Idle,
    Held,
    /// Отпущен (вручную или safety valve), можно брать снова
    Released,
    /// Брошен вперёд, можно брать снова
    Thrown,
}

/// Почему захват отклонён (no-op для объекта)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrabRejection {
    AlreadyHeld { holder: Entity },
    OutOfRange { distance: f32, range: f32 },
}

/// Параметры попытки захвата
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabRequest {
    pub holder: Entity,
    /// Стартовая позиция anchor'а
    pub anchor: Vec3,
    /// Поворот взгляда holder'а в момент захвата
    pub view_rotation: Quat,
    /// Расстояние от глаз holder'а до точки попадания
    pub reach: f32,
    pub grab_range: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveHold {
    holder: Entity,
    joint: SpringJoint,
    /// Режим коллизий до захвата
    restore_collision: CollisionMode,
}

/// Объект, который можно взять
#[derive(Component, Debug, Clone)]
pub struct GrabbableEntity {
    pub config: GrabbableConfig,
    phase: GrabPhase,
    hold: Option<ActiveHold>,
    /// Поворот объекта относительно взгляда, захвачен при старте
    anchor_offset_rotation: Quat,
    history: VelocityHistory,
}

impl Default for GrabbableEntity {
    fn default() -> Self {
        Self::new(GrabbableConfig::default())
    }
}

impl GrabbableEntity {
    pub fn new(config: GrabbableConfig) -> Self {
        Self {
            config,
            phase: GrabPhase::Idle,
            hold: None,
            anchor_offset_rotation: Quat::IDENTITY,
            history: VelocityHistory::new(config.velocity_samples),
        }
    }

    pub fn phase(&self) -> GrabPhase {
        self.phase
    }

    pub fn held_by(&self) -> Option<Entity> {
        self.hold.map(|hold| hold.holder)
    }

    pub fn joint(&self) -> Option<&SpringJoint> {
        self.hold.as_ref().map(|hold| &hold.joint)
    }

    pub fn anchor_offset_rotation(&self) -> Quat {
        self.anchor_offset_rotation
    }

    pub fn history(&self) -> &VelocityHistory {
        &self.history
    }

    /// Свободен ли объект для захвата
    pub fn can_interact(&self) -> bool {
        self.hold.is_none()
    }

    /// Idle/Released/Thrown → Held
    ///
    /// Отклонение ничего не меняет ни в объекте, ни в теле.
    pub fn start_grab(
        &mut self,
        request: &GrabRequest,
        body: &mut PhysicsBody,
        body_rotation: Quat,
    ) -> Result<(), GrabRejection> {
        if let Some(hold) = self.hold {
            return Err(GrabRejection::AlreadyHeld { holder: hold.holder });
        }
        if request.reach > request.grab_range {
            return Err(GrabRejection::OutOfRange {
                distance: request.reach,
                range: request.grab_range,
            });
        }

        // Тяжёлые объекты тянутся мягче
        let mass_scale = 1.0 / body.mass.max(f32::EPSILON).sqrt();
        let mut joint = SpringJoint::spring(
            request.anchor,
            self.config.spring_force * mass_scale,
            self.config.spring_damping * mass_scale,
            self.config.linear_limit,
        );
        joint.target_rotation = request.view_rotation;
        joint.rotation_offset = request.view_rotation.inverse() * body_rotation;

        self.anchor_offset_rotation = joint.rotation_offset;
        self.history.clear();
        self.hold = Some(ActiveHold {
            holder: request.holder,
            joint,
            restore_collision: body.collision_mode,
        });
        self.phase = GrabPhase::Held;

        body.gravity_enabled = false;
        body.collision_mode = CollisionMode::Continuous;

        Ok(())
    }

    /// Позиция за fixed tick (только пока Held)
    pub fn record_sample(&mut self, position: Vec3) {
        if self.hold.is_some() {
            self.history.push(position);
        }
    }

    /// Новая цель joint'а; поворот - только при слежении за взглядом
    pub fn set_anchor(&mut self, anchor: Vec3, view_rotation: Option<Quat>) {
        if let Some(hold) = self.hold.as_mut() {
            hold.joint.target = anchor;
            if let Some(rotation) = view_rotation {
                hold.joint.target_rotation = rotation;
            }
        }
    }

    /// Объект дальше 1.5 × max_grab_distance от anchor'а
    pub fn exceeds_safety_limit(&self, position: Vec3, max_grab_distance: f32) -> bool {
        self.hold
            .is_some_and(|hold| position.distance(hold.joint.target) > max_grab_distance * 1.5)
    }

    /// Шаг joint'а (no-op если не Held)
    pub fn solve_joint(&self, body: &mut PhysicsBody, transform: &mut Transform, delta: f32) {
        if let Some(hold) = self.hold.as_ref() {
            hold.joint.solve(body, transform, delta);
        }
    }

    /// Held → Released: скорость из истории × multiplier
    ///
    /// Возвращает итоговую скорость, None если объект не удерживался.
    pub fn end_grab(&mut self, body: &mut PhysicsBody, fixed_step: f32) -> Option<Vec3> {
        self.hold?;

        let average = self.history.average_velocity(fixed_step);
        self.detach(body);

        let velocity = average * self.config.throw_force_multiplier;
        body.velocity = velocity;
        body.angular_velocity = Vec3::ZERO;
        self.phase = GrabPhase::Released;

        Some(velocity)
    }

    /// Held → Thrown: бросок вдоль взгляда, накопленный импульс игнорируется
    pub fn forward_throw(&mut self, body: &mut PhysicsBody, forward: Vec3) -> Option<Vec3> {
        self.hold?;

        self.detach(body);

        let velocity = forward.normalize_or_zero() * self.config.forward_throw_force / body.mass.max(f32::EPSILON).sqrt();
        body.velocity = velocity;
        self.phase = GrabPhase::Thrown;

        Some(velocity)
    }

    /// Общий detach: joint уничтожается ровно здесь
    fn detach(&mut self, body: &mut PhysicsBody) {
        if let Some(hold) = self.hold.take() {
            body.gravity_enabled = true;
            body.collision_mode = hold.restore_collision;
        }
    }
}

/// Тюнинг grabber'а (игрока)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabberConfig {
    /// Дальше этого (от глаз до точки попадания) не берём
    pub grab_range: f32,
    pub min_grab_distance: f32,
    pub max_grab_distance: f32,
    /// Метров на единицу прокрутки
    pub scroll_sensitivity: f32,
    /// Объект поворачивается вместе со взглядом
    pub track_view_rotation: bool,
}

impl Default for GrabberConfig {
    fn default() -> Self {
        Self {
            grab_range: 3.0,
            min_grab_distance: 1.0,
            max_grab_distance: 3.0,
            scroll_sensitivity: 0.1,
            track_view_rotation: true,
        }
    }
}

/// Отложенная команда (Update → FixedUpdate)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrabCommand {
    Start { target: Entity, hit_point: Vec3 },
    Release,
    ForwardThrow,
}

/// Тот, кто берёт объекты (игрок)
#[derive(Component, Debug, Clone)]
pub struct Grabber {
    pub config: GrabberConfig,
    held: Option<Entity>,
    /// Текущая дистанция anchor'а от глаз
    grab_distance: f32,
    pending: Vec<GrabCommand>,
}

impl Default for Grabber {
    fn default() -> Self {
        Self::new(GrabberConfig::default())
    }
}

impl Grabber {
    pub fn new(config: GrabberConfig) -> Self {
        Self {
            config,
            held: None,
            grab_distance: config.max_grab_distance,
            pending: Vec::new(),
        }
    }

    pub fn held(&self) -> Option<Entity> {
        self.held
    }

    pub fn is_holding(&self) -> bool {
        self.held.is_some()
    }

    /// Держит объект или уже попросил взять
    pub fn is_busy(&self) -> bool {
        self.held.is_some()
            || self
                .pending
                .iter()
                .any(|command| matches!(command, GrabCommand::Start { .. }))
    }

    pub fn grab_distance(&self) -> f32 {
        self.grab_distance
    }

    pub fn request_grab(&mut self, target: Entity, hit_point: Vec3) {
        self.pending.push(GrabCommand::Start { target, hit_point });
    }

    pub fn request_release(&mut self) {
        self.pending.push(GrabCommand::Release);
    }

    pub fn request_forward_throw(&mut self) {
        self.pending.push(GrabCommand::ForwardThrow);
    }

    pub fn take_commands(&mut self) -> Vec<GrabCommand> {
        std::mem::take(&mut self.pending)
    }

    /// Прокрутка меняет дистанцию в [min, max]
    pub fn scroll(&mut self, delta: f32) {
        if delta == 0.0 {
            return;
        }
        self.grab_distance = (self.grab_distance + delta * self.config.scroll_sensitivity)
            .clamp(self.config.min_grab_distance, self.config.max_grab_distance);
    }

    pub(crate) fn attach(&mut self, target: Entity, reach: f32) {
        self.held = Some(target);
        self.grab_distance = reach.clamp(self.config.min_grab_distance, self.config.max_grab_distance);
    }

    pub(crate) fn clear_held(&mut self) {
        self.held = None;
    }
}
