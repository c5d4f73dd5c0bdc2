//! Eased interpolation of a single numeric field over a number of ticks

use serde::{Deserialize, Serialize};

/// Easing curve applied to normalized progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    /// Fast start, gentle landing (quadratic)
    #[default]
    QuadOut,
}

impl Ease {
    /// Map progress `t` in [0, 1] to eased progress in [0, 1]
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// Moves a value from `from` to `to` across `duration` ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    from: f32,
    to: f32,
    elapsed: u32,
    duration: u32,
    ease: Ease,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: u32, ease: Ease) -> Self {
        Self {
            from,
            to,
            elapsed: 0,
            duration,
            ease,
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Current interpolated value
    pub fn value(&self) -> f32 {
        if self.duration == 0 {
            return self.to;
        }
        let t = self.elapsed as f32 / self.duration as f32;
        self.from + (self.to - self.from) * self.ease.sample(t)
    }

    /// Advance one tick and return the new value
    pub fn step(&mut self) -> f32 {
        if self.elapsed < self.duration {
            self.elapsed += 1;
        }
        self.value()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}
