//! Center Siege - hold the center of the screen against radial waves
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, collisions, scoring)
//! - `session`: Session lifecycle and the collaborators it drives
//! - `renderer`: Drawing surface abstraction and the WebGPU implementation
//! - `platform`: Browser/headless platform glue
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{Host, Session};
pub use tuning::Tuning;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Nominal display refresh used to convert ticks to wall-clock time
    pub const FRAMES_PER_SECOND: f32 = 60.0;
    /// Milliseconds covered by one nominal tick
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Size of the play field in screen units, read once at startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Screen center; the player sits here and enemies aim here
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True when a circle lies entirely outside the viewport on any side
    pub fn circle_fully_outside(&self, pos: Vec2, radius: f32) -> bool {
        pos.x + radius < 0.0
            || pos.x - radius > self.width
            || pos.y + radius < 0.0
            || pos.y - radius > self.height
    }
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Unit vector for an angle, scaled to `speed`
#[inline]
pub fn velocity_from_angle(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos() * speed, angle.sin() * speed)
}
