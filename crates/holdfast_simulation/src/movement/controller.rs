//! Логика контроллера за один кадр (без ECS)
//!
//! Порядок внутри шага: скорость → прыжок/гравитация → crouch.
//! Отклонённые действия (прыжок вне coyote окна, без stamina, crouch в
//! воздухе) - тихие no-op.

use bevy::prelude::*;

use super::components::MovementController;
use crate::shared::{blend_factor, lerp};
use crate::stamina::Stamina;

/// Входные данные одного кадра
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveFrame {
    pub move_input: Vec2,
    pub run: bool,
    pub jump_pressed: bool,
    pub jump_held: bool,
    pub crouch_pressed: bool,
    /// Горизонтальный forward viewer'а (нормализован)
    pub forward: Vec3,
    /// Горизонтальный right viewer'а (нормализован)
    pub right: Vec3,
    pub delta: f32,
}

/// Что случилось за кадр (для events)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub jumped: bool,
    pub landed: bool,
}

/// Порог input'а, ниже которого бег не тратит stamina
const RUN_INPUT_DEADZONE: f32 = 0.1;

impl MovementController {
    /// Один кадр контроллера. `state.grounded` должен быть уже обновлён.
    pub fn step(&mut self, frame: &MoveFrame, stamina: &mut Stamina) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();

        self.update_speed(frame, stamina);
        self.update_jump_and_gravity(frame, stamina, &mut outcome);
        self.update_crouch(frame);

        outcome
    }

    fn update_speed(&mut self, frame: &MoveFrame, stamina: &mut Stamina) {
        let config = self.config;
        let state = &mut self.state;

        let target_speed = if state.jumping {
            state.locked_speed
        } else {
            let can_run = frame.run && stamina.can_run();
            let base = if state.crouching {
                config.crouch_speed
            } else if can_run {
                config.run_speed
            } else {
                config.walk_speed
            };
            let target = base * stamina.speed_multiplier();
            state.locked_speed = target;

            if can_run && frame.move_input.length() > RUN_INPUT_DEADZONE {
                stamina.consume_running(frame.delta);
            }
            target
        };

        let rate = if target_speed > state.current_speed {
            config.acceleration_rate
        } else {
            config.deceleration_rate
        };
        state.current_speed = lerp(state.current_speed, target_speed, blend_factor(rate, frame.delta));

        let direction =
            (frame.forward * frame.move_input.y + frame.right * frame.move_input.x).normalize_or_zero();

        let speed = if frame.move_input.y < 0.0 {
            state.current_speed.min(config.max_backward_speed())
        } else {
            state.current_speed
        };

        state.horizontal_velocity = direction * speed;
    }

    fn update_jump_and_gravity(&mut self, frame: &MoveFrame, stamina: &mut Stamina, outcome: &mut MoveOutcome) {
        let config = self.config;
        let state = &mut self.state;

        if state.grounded {
            state.coyote_timer = config.coyote_time;
            // Приземление: только на земле и не на подъёме
            if state.jumping && state.vertical_velocity <= 0.0 {
                state.jumping = false;
                state.jump_held = false;
                state.current_speed = config.walk_speed;
                outcome.landed = true;
            }
        } else {
            state.coyote_timer -= frame.delta;
        }

        if frame.jump_pressed {
            if state.crouching {
                // Прыжок из crouch сначала поднимает
                state.crouching = false;
                state.target_camera_height = config.camera_standing_height;
            } else if !state.jumping && state.coyote_timer > 0.0 && stamina.try_consume_jump() {
                state.vertical_velocity = config.min_jump_force;
                state.launch_velocity = config.min_jump_force;
                state.coyote_timer = 0.0;
                state.jumping = true;
                state.jump_held = true;
                state.jump_hold_timer = 0.0;
                state.locked_speed = state.current_speed;
                outcome.jumped = true;
            }
        }

        if state.jumping && state.jump_held {
            if frame.jump_held && state.jump_hold_timer < config.jump_hold_duration {
                state.jump_hold_timer += frame.delta;
                let progress = if config.jump_hold_duration > 0.0 {
                    state.jump_hold_timer / config.jump_hold_duration
                } else {
                    1.0
                };
                state.launch_velocity = lerp(config.min_jump_force, config.max_jump_force, progress);
                state.vertical_velocity = state.launch_velocity;
            } else {
                // Отпустили (или время вышло): подъём заморожен
                state.jump_held = false;
            }
        }

        if !state.grounded {
            let gravity = if state.vertical_velocity < 0.0 {
                config.fall_gravity
            } else {
                config.gravity
            };
            state.vertical_velocity += gravity * frame.delta;
        } else if !state.jumping {
            state.vertical_velocity = config.ground_stick_velocity;
        }
    }

    fn update_crouch(&mut self, frame: &MoveFrame) {
        let config = self.config;
        let state = &mut self.state;

        if frame.crouch_pressed && !state.jumping && state.grounded {
            state.crouching = !state.crouching;
            state.target_camera_height = if state.crouching {
                config.camera_crouch_height
            } else {
                config.camera_standing_height
            };
        }

        let target_height = if state.crouching {
            config.crouch_height
        } else {
            config.standing_height
        };
        let blend = blend_factor(config.height_blend_speed, frame.delta);
        state.current_height = lerp(state.current_height, target_height, blend);
        state.camera_height = lerp(state.camera_height, state.target_camera_height, blend);
    }
}

impl MoveFrame {
    /// Кадр без input'а (только гравитация и сглаживание)
    pub fn idle(forward: Vec3, right: Vec3, delta: f32) -> Self {
        Self {
            move_input: Vec2::ZERO,
            run: false,
            jump_pressed: false,
            jump_held: false,
            crouch_pressed: false,
            forward,
            right,
            delta,
        }
    }
}
