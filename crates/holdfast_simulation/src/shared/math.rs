//! Скалярные helpers для сглаживания (frame-rate зависимые lerp'ы контроллера)

/// Линейная интерполяция, `t` зажат в [0, 1]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Сдвиг `current` к `target` не более чем на `max_delta`
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Фактор сглаживания за кадр: `rate × dt`, зажатый в [0, 1]
///
/// dt ≤ 0 → 0 (никакого движения, без деления)
pub fn blend_factor(rate: f32, delta: f32) -> f32 {
    if delta <= 0.0 {
        return 0.0;
    }
    (rate * delta).clamp(0.0, 1.0)
}
