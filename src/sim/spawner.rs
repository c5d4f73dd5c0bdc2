//! Enemy spawn geometry
//!
//! Enemies appear just beyond one of the four screen edges and head straight
//! for the screen center. The timing of spawns is owned by the session.

use glam::Vec2;
use rand::Rng;

use super::state::{Color, Enemy};
use crate::tuning::Tuning;
use crate::{Viewport, angle_between, velocity_from_angle};

/// Which edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Create one enemy outside the viewport, aimed at its center.
///
/// Half of spawns use the left/right edges (random height), half use the
/// top/bottom edges (random width). The enemy sits a full radius beyond the
/// chosen edge so it is never visible on the frame it appears.
pub fn spawn_enemy<R: Rng>(rng: &mut R, viewport: Viewport, tuning: &Tuning) -> Enemy {
    let radius = rng.random_range(tuning.enemy_radius_min..tuning.enemy_radius_max);

    let edge = if rng.random_bool(0.5) {
        if rng.random_bool(0.5) { Edge::Left } else { Edge::Right }
    } else if rng.random_bool(0.5) {
        Edge::Top
    } else {
        Edge::Bottom
    };

    let pos = match edge {
        Edge::Left => Vec2::new(-radius, rng.random::<f32>() * viewport.height),
        Edge::Right => Vec2::new(
            viewport.width + radius,
            rng.random::<f32>() * viewport.height,
        ),
        Edge::Top => Vec2::new(rng.random::<f32>() * viewport.width, -radius),
        Edge::Bottom => Vec2::new(
            rng.random::<f32>() * viewport.width,
            viewport.height + radius,
        ),
    };

    let hue = rng.random::<f32>() * 360.0;
    let color = Color::from_hsl(hue, tuning.enemy_saturation, tuning.enemy_lightness);

    let angle = angle_between(pos, viewport.center());
    let vel = velocity_from_angle(angle, tuning.enemy_speed);

    log::debug!(
        "Spawned enemy r={:.1} at ({:.0}, {:.0}) from {:?}",
        radius,
        pos.x,
        pos.y,
        edge
    );

    Enemy::new(pos, vel, radius, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Distance of the circle center beyond the nearest edge it is outside of
    fn outside_margin(vp: Viewport, enemy: &Enemy) -> f32 {
        let p = enemy.pos;
        [-p.x, p.x - vp.width, -p.y, p.y - vp.height]
            .into_iter()
            .fold(f32::MIN, f32::max)
    }

    #[test]
    fn test_spawn_aims_at_center() {
        let vp = Viewport::new(800.0, 600.0);
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);

        for _ in 0..50 {
            let enemy = spawn_enemy(&mut rng, vp, &tuning);
            assert!((enemy.vel.length() - 1.0).abs() < 1e-4);
            let to_center = (vp.center() - enemy.pos).normalize();
            assert!(enemy.vel.normalize().dot(to_center) > 0.9999);
            assert!(enemy.shrink.is_none());
        }
    }

    #[test]
    fn test_spawn_uses_all_edges() {
        let vp = Viewport::new(800.0, 600.0);
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let (mut left, mut right, mut top, mut bottom) = (0, 0, 0, 0);

        for _ in 0..400 {
            let e = spawn_enemy(&mut rng, vp, &tuning);
            if e.pos.x < 0.0 {
                left += 1;
            } else if e.pos.x > vp.width {
                right += 1;
            } else if e.pos.y < 0.0 {
                top += 1;
            } else {
                bottom += 1;
            }
        }
        for count in [left, right, top, bottom] {
            assert!(count > 50, "edge distribution too skewed: {count}");
        }
    }

    proptest! {
        #[test]
        fn prop_spawn_outside_by_radius(seed in any::<u64>(), w in 100.0f32..2000.0, h in 100.0f32..2000.0) {
            let vp = Viewport::new(w, h);
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let enemy = spawn_enemy(&mut rng, vp, &tuning);

            prop_assert!(enemy.radius >= 5.0 && enemy.radius < 30.0);
            // Exactly one radius beyond the chosen edge
            prop_assert!((outside_margin(vp, &enemy) - enemy.radius).abs() < 1e-3);
            prop_assert!(vp.circle_fully_outside(enemy.pos, enemy.radius * 0.999));
        }
    }
}
