//! Rendering
//!
//! The game draws through the [`Surface`] trait: filled circles plus a
//! translucent full-screen rectangle that fades the previous frame and
//! leaves motion trails. [`CanvasRenderer`] is the WebGPU implementation.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{CanvasRenderer, RenderError};

use glam::Vec2;

use crate::sim::{Color, GameState};

/// Axis-aligned rectangle in screen units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }
}

/// Something the frame can be painted onto. Drawing never fails; a surface
/// that cannot draw simply drops the call.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32);
}

/// Paint one frame: fade overlay, player, particles, projectiles, enemies
pub fn draw_frame(state: &GameState, surface: &mut impl Surface) {
    let vp = state.viewport;
    surface.fill_rect(
        Rect::new(Vec2::ZERO, Vec2::new(vp.width, vp.height)),
        Color::BLACK,
        state.tuning.trail_fade,
    );

    let player = &state.player;
    surface.draw_circle(player.pos, player.radius, player.color, 1.0);

    for particle in &state.particles {
        surface.draw_circle(
            particle.pos,
            particle.radius,
            particle.color,
            particle.alpha.clamp(0.0, 1.0),
        );
    }
    for projectile in &state.projectiles {
        surface.draw_circle(projectile.pos, projectile.radius, projectile.color, 1.0);
    }
    for enemy in &state.enemies {
        surface.draw_circle(enemy.pos, enemy.radius, enemy.color, 1.0);
    }
}
