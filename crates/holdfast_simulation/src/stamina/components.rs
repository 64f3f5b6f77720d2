//! Stamina компоненты: ресурс, конфиг, fatigue marker

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::move_towards;

/// Тюнинг stamina (значения по умолчанию - боевой баланс)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct StaminaConfig {
    pub max_stamina: f32,
    /// Расход при беге (units/s)
    pub run_drain_per_second: f32,
    pub base_jump_cost: f32,
    /// Во сколько раз дорожает следующий прыжок
    pub jump_multiplier_factor: f32,
    /// Пауза после прыжка до начала сброса multiplier'а (s)
    pub jump_cooldown_time: f32,
    /// Скорость сброса multiplier'а к 1 (units/s)
    pub jump_multiplier_reset_rate: f32,
    /// Пауза после расхода до начала regen (s)
    pub regen_delay: f32,
    pub normal_regen_rate: f32,
    pub fatigue_regen_rate: f32,
    /// Множитель скорости движения в fatigue
    pub fatigue_movement_penalty: f32,
    /// Вход в fatigue при current ≤ threshold, выход при current > 2 × threshold
    pub fatigue_threshold: f32,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            max_stamina: 100.0,
            run_drain_per_second: 15.0,
            base_jump_cost: 20.0,
            jump_multiplier_factor: 1.5,
            jump_cooldown_time: 1.0,
            jump_multiplier_reset_rate: 0.5,
            regen_delay: 1.0,
            normal_regen_rate: 20.0,
            fatigue_regen_rate: 5.0,
            fatigue_movement_penalty: 0.5,
            fatigue_threshold: 10.0,
        }
    }
}

/// Что произошло со stamina с прошлого publish
///
/// Копятся в компоненте, системы `publish_stamina_signals` превращают их
/// в Bevy events (ресурс не знает про World).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StaminaSignal {
    Changed(f32),
    FatigueEntered,
    FatigueExited,
}

/// Выносливость игрока
///
/// Инварианты:
/// - 0 ≤ current ≤ max
/// - jump_multiplier ≥ 1
/// - fatigued меняется только на пересечении порогов (гистерезис)
#[derive(Component, Debug, Clone)]
pub struct Stamina {
    config: StaminaConfig,
    current: f32,
    fatigued: bool,
    jump_multiplier: f32,
    /// Локальные часы ресурса (сумма tick dt)
    clock: f32,
    last_consume_at: Option<f32>,
    last_jump_at: Option<f32>,
    signals: Vec<StaminaSignal>,
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(StaminaConfig::default())
    }
}

impl Stamina {
    /// Полный ресурс при spawn
    pub fn new(config: StaminaConfig) -> Self {
        Self {
            config,
            current: config.max_stamina,
            fatigued: false,
            jump_multiplier: 1.0,
            clock: 0.0,
            last_consume_at: None,
            last_jump_at: None,
            signals: Vec::new(),
        }
    }

    pub fn config(&self) -> &StaminaConfig {
        &self.config
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.config.max_stamina
    }

    pub fn percentage(&self) -> f32 {
        if self.config.max_stamina <= 0.0 {
            return 0.0;
        }
        self.current / self.config.max_stamina
    }

    pub fn is_fatigued(&self) -> bool {
        self.fatigued
    }

    pub fn jump_multiplier(&self) -> f32 {
        self.jump_multiplier
    }

    /// Passive tick: сброс jump multiplier'а + regen
    pub fn tick(&mut self, delta: f32) {
        if delta <= 0.0 {
            return;
        }
        self.clock += delta;

        let jump_cooled_down = self
            .last_jump_at
            .is_none_or(|at| self.clock - at > self.config.jump_cooldown_time);
        if jump_cooled_down {
            self.jump_multiplier =
                move_towards(self.jump_multiplier, 1.0, self.config.jump_multiplier_reset_rate * delta);
        }

        let regen_blocked = self
            .last_consume_at
            .is_some_and(|at| self.clock - at < self.config.regen_delay);
        if regen_blocked {
            return;
        }

        let rate = if self.fatigued {
            self.config.fatigue_regen_rate
        } else {
            self.config.normal_regen_rate
        };
        self.modify(rate * delta);
    }

    pub fn can_run(&self) -> bool {
        !self.fatigued && self.current > self.config.fatigue_threshold
    }

    pub fn current_jump_cost(&self) -> f32 {
        self.config.base_jump_cost * self.jump_multiplier
    }

    pub fn can_jump(&self) -> bool {
        !self.fatigued && self.current >= self.current_jump_cost()
    }

    /// Расход при беге за кадр
    pub fn consume_running(&mut self, delta: f32) {
        if delta <= 0.0 {
            return;
        }
        self.modify(-self.config.run_drain_per_second * delta);
    }

    /// Прыжок: списать cost, удорожить следующий. Иначе false без эффекта.
    pub fn try_consume_jump(&mut self) -> bool {
        if !self.can_jump() {
            return false;
        }

        let cost = self.current_jump_cost();
        self.modify(-cost);
        self.jump_multiplier *= self.config.jump_multiplier_factor;
        self.last_jump_at = Some(self.clock);
        true
    }

    /// Произвольный расход (clamp в [0, max]), помечает использование
    pub fn consume(&mut self, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        self.modify(-amount);
    }

    /// Множитель скорости движения (penalty в fatigue)
    pub fn speed_multiplier(&self) -> f32 {
        if self.fatigued {
            self.config.fatigue_movement_penalty
        } else {
            1.0
        }
    }

    /// Забрать накопленные сигналы
    pub fn drain_signals(&mut self) -> Vec<StaminaSignal> {
        std::mem::take(&mut self.signals)
    }

    fn modify(&mut self, amount: f32) {
        if amount < 0.0 {
            self.last_consume_at = Some(self.clock);
        }

        let next = (self.current + amount).clamp(0.0, self.config.max_stamina);
        if next != self.current {
            self.current = next;
            self.signals.push(StaminaSignal::Changed(next));
        }

        self.update_fatigue();
    }

    fn update_fatigue(&mut self) {
        let threshold = self.config.fatigue_threshold;

        if !self.fatigued && self.current <= threshold {
            self.fatigued = true;
            self.signals.push(StaminaSignal::FatigueEntered);
        } else if self.fatigued && self.current > threshold * 2.0 {
            self.fatigued = false;
            self.signals.push(StaminaSignal::FatigueExited);
        }
    }
}

/// Fatigue marker (movement debuff)
///
/// Вставляется/снимается системой публикации сигналов на пересечении
/// порогов гистерезиса. Для внешних потребителей (UI, звук дыхания).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Fatigued {
    /// Movement speed multiplier (0.5 = half speed)
    pub movement_penalty: f32,
}
