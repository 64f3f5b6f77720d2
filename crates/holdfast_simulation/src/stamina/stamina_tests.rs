//! Tests for stamina resource logic.

use super::components::{Stamina, StaminaConfig, StaminaSignal};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_consecutive_jump_costs() {
    let mut stamina = Stamina::default();

    // Первый прыжок: 20 → 80, multiplier 1.5
    assert!(stamina.try_consume_jump());
    assert!(approx(stamina.current(), 80.0));
    assert!(approx(stamina.jump_multiplier(), 1.5));

    // Второй: 30 → 50, multiplier 2.25
    assert!(approx(stamina.current_jump_cost(), 30.0));
    assert!(stamina.try_consume_jump());
    assert!(approx(stamina.current(), 50.0));
    assert!(approx(stamina.jump_multiplier(), 2.25));
}

#[test]
fn test_jump_rejected_without_effect() {
    let mut stamina = Stamina::default();
    stamina.consume(85.0); // 15 < 20

    let before = stamina.current();
    assert!(!stamina.can_jump());
    assert!(!stamina.try_consume_jump());
    assert_eq!(stamina.current(), before);
    assert_eq!(stamina.jump_multiplier(), 1.0);
}

#[test]
fn test_jump_rejected_while_fatigued() {
    let config = StaminaConfig {
        base_jump_cost: 1.0,
        ..Default::default()
    };
    let mut stamina = Stamina::new(config);
    stamina.consume(95.0); // 5 ≤ 10 → fatigue

    assert!(stamina.is_fatigued());
    // Хватает на прыжок, но fatigue запрещает
    assert!(stamina.current() >= stamina.current_jump_cost());
    assert!(!stamina.try_consume_jump());
}

#[test]
fn test_fatigue_hysteresis_no_chatter() {
    let mut stamina = Stamina::default();
    stamina.consume(90.0); // ровно 10 → вход
    assert!(stamina.is_fatigued());

    // Regen после задержки: 5/s в fatigue. 1s delay + 1.5s → 17.5, всё ещё fatigued
    for _ in 0..125 {
        stamina.tick(0.02);
    }
    assert!(stamina.current() > 10.0 && stamina.current() <= 20.0);
    assert!(stamina.is_fatigued());

    // Ещё 1s → 22.5 > 20 → выход
    for _ in 0..50 {
        stamina.tick(0.02);
    }
    assert!(!stamina.is_fatigued());

    let signals = stamina.drain_signals();
    let entered = signals.iter().filter(|s| **s == StaminaSignal::FatigueEntered).count();
    let exited = signals.iter().filter(|s| **s == StaminaSignal::FatigueExited).count();
    assert_eq!(entered, 1);
    assert_eq!(exited, 1);
}

#[test]
fn test_between_thresholds_keeps_state() {
    let mut stamina = Stamina::default();
    stamina.consume(85.0); // 15: между 10 и 20, fatigue не было
    assert!(!stamina.is_fatigued());
    assert!(stamina.can_run());
}

#[test]
fn test_regen_delay() {
    let mut stamina = Stamina::default();
    stamina.consume(50.0);

    // 0.5s: regen заблокирован
    for _ in 0..25 {
        stamina.tick(0.02);
    }
    assert_eq!(stamina.current(), 50.0);

    // После 1s задержки идёт normal regen 20/s
    for _ in 0..50 {
        stamina.tick(0.02);
    }
    assert!(stamina.current() > 50.0);
    assert!(stamina.current() < 62.0);
}

#[test]
fn test_jump_multiplier_decays_after_cooldown() {
    let mut stamina = Stamina::default();
    assert!(stamina.try_consume_jump());

    // Внутри 1s cooldown multiplier не трогаем
    for _ in 0..45 {
        stamina.tick(0.02);
    }
    assert!(approx(stamina.jump_multiplier(), 1.5));

    // 0.5/s → до 1.0 за 1s
    for _ in 0..60 {
        stamina.tick(0.02);
    }
    assert!(approx(stamina.jump_multiplier(), 1.0));
}

#[test]
fn test_running_drain_and_clamp() {
    let mut stamina = Stamina::default();
    stamina.consume_running(1.0);
    assert!(approx(stamina.current(), 85.0));

    stamina.consume(500.0);
    assert_eq!(stamina.current(), 0.0);
    assert!(!stamina.can_run());
}

#[test]
fn test_changed_signal_only_on_actual_change() {
    let mut stamina = Stamina::default();

    // Полная stamina: regen ничего не меняет
    stamina.tick(0.5);
    assert!(stamina.drain_signals().is_empty());

    stamina.consume(10.0);
    assert_eq!(stamina.drain_signals(), vec![StaminaSignal::Changed(90.0)]);
}

#[test]
fn test_speed_multiplier_follows_fatigue() {
    let mut stamina = Stamina::default();
    assert_eq!(stamina.speed_multiplier(), 1.0);

    stamina.consume(95.0);
    assert_eq!(stamina.speed_multiplier(), 0.5);
}
