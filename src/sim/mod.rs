//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform dependencies:
//! - One tick per displayed frame, velocities in units per tick
//! - Randomness only through an injected RNG
//! - Removal during a pass is mark-then-compact, never in-place

pub mod collision;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod tween;

pub use collision::{HitOutcome, circles_touch, hit_outcome};
pub use spawner::spawn_enemy;
pub use state::{Color, Enemy, GameEvent, GamePhase, GameState, Particle, Player, Projectile};
pub use tick::{advance, fire, tick};
pub use tween::{Ease, Tween};
