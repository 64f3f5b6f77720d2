//! Ring buffer позиций удерживаемого объекта (для скорости броска)

use std::collections::VecDeque;

use bevy::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct VelocityHistory {
    samples: VecDeque<Vec3>,
    capacity: usize,
}

impl VelocityHistory {
    /// capacity < 2 не даёт скорости никогда, поднимаем до 2
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Новая позиция вытесняет самую старую
    pub fn push(&mut self, position: Vec3) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(position);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// (newest - oldest) / ((len - 1) × step)
    ///
    /// Меньше двух сэмплов или step ≤ 0 → ноль.
    pub fn average_velocity(&self, step: f32) -> Vec3 {
        let (Some(oldest), Some(newest)) = (self.samples.front(), self.samples.back()) else {
            return Vec3::ZERO;
        };

        let len = self.samples.len();
        if len < 2 || step <= 0.0 {
            return Vec3::ZERO;
        }

        (*newest - *oldest) / ((len - 1) as f32 * step)
    }
}
