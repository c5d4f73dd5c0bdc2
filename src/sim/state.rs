//! Game state and core simulation types
//!
//! Entities are plain records with a per-type `update` that advances them by
//! one tick. Drawing lives in the renderer and never mutates state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tween::{Ease, Tween};
use crate::Viewport;
use crate::tuning::Tuning;

/// Radii are never allowed to reach zero
pub const RADIUS_FLOOR: f32 = 0.01;

/// sRGB-encoded color, components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from hue in degrees, saturation and lightness in [0, 1]
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = lightness - c / 2.0;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Self::rgb(r + m, g + m, b + m)
    }

    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No session has been started
    #[default]
    Idle,
    /// Loop and spawner active
    Running,
    /// An enemy reached the player
    Ended,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Score changed to the contained value
    ScoreChanged(u64),
    /// A projectile hit an enemy that survived (and is now shrinking)
    EnemyShrunk { pos: Vec2 },
    /// A projectile hit an enemy that was destroyed
    EnemyDestroyed { pos: Vec2 },
    /// An enemy touched the player
    PlayerHit,
}

/// The stationary player at the screen center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// A shot fired from the center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
}

impl Projectile {
    pub fn update(&mut self) {
        self.pos += self.vel;
    }
}

/// An incoming enemy. Its heading is fixed at spawn time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Active radius animation after a non-lethal hit
    #[serde(default)]
    pub shrink: Option<Tween>,
}

impl Enemy {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, color: Color) -> Self {
        Self {
            pos,
            vel,
            radius,
            color,
            shrink: None,
        }
    }

    /// Integrate position; radius is owned by the shrink animation
    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    /// Start easing the radius from its current value down to `target`.
    /// Restarting mid-animation continues from wherever the radius is now.
    pub fn shrink_to(&mut self, target: f32, ticks: u32) {
        debug_assert!(target > 0.0, "shrink target must stay positive");
        let target = target.max(RADIUS_FLOOR);
        self.shrink = Some(Tween::new(self.radius, target, ticks, Ease::QuadOut));
    }

    /// Advance the shrink animation by one tick
    pub fn animate(&mut self) {
        if let Some(tween) = &mut self.shrink {
            self.radius = tween.step().max(RADIUS_FLOOR);
            if tween.is_finished() {
                self.shrink = None;
            }
        }
    }
}

/// A fading fragment from an enemy hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// 1.0 at birth, only ever decreases
    pub alpha: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, color: Color) -> Self {
        Self {
            pos,
            vel,
            radius,
            color,
            alpha: 1.0,
        }
    }

    /// Damp velocity, integrate, fade
    pub fn update(&mut self, friction: f32, fade: f32) {
        self.vel *= friction;
        self.pos += self.vel;
        self.alpha -= fade;
    }

    pub fn is_faded(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// Complete state of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub viewport: Viewport,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Never decreases within a session
    pub score: u64,
    /// Ticks simulated in this session
    pub time_ticks: u64,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
}

impl GameState {
    pub fn new(viewport: Viewport, tuning: Tuning) -> Self {
        let player = Player {
            pos: viewport.center(),
            radius: tuning.player_radius,
            color: Color::WHITE,
        };
        Self {
            viewport,
            tuning,
            phase: GamePhase::Idle,
            score: 0,
            time_ticks: 0,
            player,
            projectiles: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
        }
    }

    /// Fresh player, empty collections, zero score
    pub fn reset(&mut self) {
        self.player = Player {
            pos: self.viewport.center(),
            radius: self.tuning.player_radius,
            color: Color::WHITE,
        };
        self.projectiles.clear();
        self.enemies.clear();
        self.particles.clear();
        self.score = 0;
        self.time_ticks = 0;
    }

    /// Add points; returns the new total
    pub fn award(&mut self, points: u64) -> u64 {
        self.score = self.score.saturating_add(points);
        self.score
    }
}
