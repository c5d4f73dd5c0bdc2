//! Collision detection and scoring
//!
//! Circles collide when the gap between their edges drops below a small
//! epsilon, so grazing contact counts. Entities removed during the pass are
//! only marked; the collections are compacted once the pass is finished.

use glam::Vec2;
use rand::Rng;

use super::state::{Color, GameEvent, GamePhase, GameState, Particle};
use crate::distance;

/// True when `distance - ra - rb < epsilon`
#[inline]
pub fn circles_touch(a: Vec2, ra: f32, b: Vec2, rb: f32, epsilon: f32) -> bool {
    distance(a, b) - ra - rb < epsilon
}

/// Result of resolving one projectile/enemy contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Enemy survives and eases down by one shrink step
    Shrink,
    /// Enemy would fall to or below the minimum radius
    Destroy,
}

/// Decide what a hit does to an enemy of the given radius
pub fn hit_outcome(radius: f32, shrink_step: f32, min_radius: f32) -> HitOutcome {
    if radius - shrink_step > min_radius {
        HitOutcome::Shrink
    } else {
        HitOutcome::Destroy
    }
}

/// Scatter `ceil(2 * radius)` particles from `origin` in the enemy's color
fn burst<R: Rng>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    origin: Vec2,
    enemy_radius: f32,
    color: Color,
    max_radius: f32,
    spread: f32,
) {
    let count = (enemy_radius * 2.0).ceil() as usize;
    particles.reserve(count);
    for _ in 0..count {
        // Second factor biases speeds toward zero
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * (rng.random::<f32>() * spread),
            (rng.random::<f32>() - 0.5) * (rng.random::<f32>() * spread),
        );
        let radius = rng.random::<f32>() * max_radius;
        particles.push(Particle::new(origin, vel, radius, color));
    }
}

/// Run the per-frame collision pass.
///
/// 1. Any enemy touching the player ends the session; nothing is scored
///    that frame.
/// 2. Every touching (enemy, projectile) pair is resolved once, in
///    collection order. A destroyed enemy takes no further hits.
///
/// Returns the events produced, in order.
pub fn resolve<R: Rng>(state: &mut GameState, rng: &mut R) -> Vec<GameEvent> {
    let mut events = Vec::new();

    let epsilon = state.tuning.hit_epsilon;
    let player = &state.player;
    if state
        .enemies
        .iter()
        .any(|e| circles_touch(player.pos, player.radius, e.pos, e.radius, epsilon))
    {
        log::debug!("Enemy reached the player at tick {}", state.time_ticks);
        state.phase = GamePhase::Ended;
        events.push(GameEvent::PlayerHit);
        return events;
    }

    let GameState {
        tuning,
        score,
        projectiles,
        enemies,
        particles,
        ..
    } = state;

    let mut spent = vec![false; projectiles.len()];
    let mut destroyed = vec![false; enemies.len()];

    for (ei, enemy) in enemies.iter_mut().enumerate() {
        for (pi, projectile) in projectiles.iter().enumerate() {
            if !circles_touch(projectile.pos, projectile.radius, enemy.pos, enemy.radius, epsilon) {
                continue;
            }
            spent[pi] = true;

            burst(
                particles,
                rng,
                projectile.pos,
                enemy.radius,
                enemy.color,
                tuning.particle_max_radius,
                tuning.particle_spread,
            );

            match hit_outcome(enemy.radius, tuning.shrink_step, tuning.min_enemy_radius) {
                HitOutcome::Shrink => {
                    *score = score.saturating_add(tuning.score_shrink);
                    enemy.shrink_to(enemy.radius - tuning.shrink_step, tuning.shrink_ticks);
                    events.push(GameEvent::EnemyShrunk { pos: enemy.pos });
                    events.push(GameEvent::ScoreChanged(*score));
                }
                HitOutcome::Destroy => {
                    *score = score.saturating_add(tuning.score_destroy);
                    destroyed[ei] = true;
                    events.push(GameEvent::EnemyDestroyed { pos: enemy.pos });
                    events.push(GameEvent::ScoreChanged(*score));
                    break;
                }
            }
        }
    }

    let mut spent_iter = spent.iter();
    projectiles.retain(|_| !spent_iter.next().copied().unwrap_or(false));
    let mut destroyed_iter = destroyed.iter();
    enemies.retain(|_| !destroyed_iter.next().copied().unwrap_or(false));

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::sim::state::{Enemy, Projectile};
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running_state() -> GameState {
        let mut state = GameState::new(Viewport::new(800.0, 600.0), Tuning::default());
        state.phase = GamePhase::Running;
        state
    }

    fn enemy_at(pos: Vec2, radius: f32) -> Enemy {
        Enemy::new(pos, Vec2::ZERO, radius, Color::from_hsl(200.0, 0.5, 0.5))
    }

    fn projectile_at(pos: Vec2) -> Projectile {
        Projectile {
            pos,
            vel: Vec2::ZERO,
            radius: 5.0,
            color: Color::WHITE,
        }
    }

    #[test]
    fn test_hit_outcome_branching() {
        assert_eq!(hit_outcome(20.0, 10.0, 5.0), HitOutcome::Shrink);
        assert_eq!(hit_outcome(12.0, 10.0, 5.0), HitOutcome::Destroy);
        // Exactly at the floor is not "above" it
        assert_eq!(hit_outcome(15.0, 10.0, 5.0), HitOutcome::Destroy);
        assert_eq!(hit_outcome(15.5, 10.0, 5.0), HitOutcome::Shrink);
    }

    #[test]
    fn test_shrinking_hit() {
        let mut state = running_state();
        let mut rng = Pcg32::seed_from_u64(1);
        state.enemies.push(enemy_at(Vec2::new(100.0, 100.0), 20.0));
        // Gap between edges is 0.5: inside epsilon
        state.projectiles.push(projectile_at(Vec2::new(125.5, 100.0)));

        let events = resolve(&mut state, &mut rng);

        assert_eq!(state.score, 100);
        assert_eq!(state.enemies.len(), 1);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.particles.len(), 40);
        // Radius is eased, not snapped
        assert_eq!(state.enemies[0].radius, 20.0);
        let target = state.enemies[0].shrink.map(|t| t.target());
        assert_eq!(target, Some(10.0));
        assert_eq!(events.last(), Some(&GameEvent::ScoreChanged(100)));
    }

    #[test]
    fn test_destroying_hit() {
        let mut state = running_state();
        let mut rng = Pcg32::seed_from_u64(2);
        state.enemies.push(enemy_at(Vec2::new(100.0, 100.0), 12.0));
        state.projectiles.push(projectile_at(Vec2::new(110.0, 100.0)));

        let events = resolve(&mut state, &mut rng);

        assert_eq!(state.score, 250);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.particles.len(), 24);
        assert!(matches!(events[0], GameEvent::EnemyDestroyed { .. }));
    }

    #[test]
    fn test_particles_take_enemy_color_and_projectile_origin() {
        let mut state = running_state();
        let mut rng = Pcg32::seed_from_u64(3);
        let enemy = enemy_at(Vec2::new(300.0, 100.0), 7.3);
        let color = enemy.color;
        state.enemies.push(enemy);
        state.projectiles.push(projectile_at(Vec2::new(310.0, 100.0)));

        resolve(&mut state, &mut rng);

        assert_eq!(state.particles.len(), 15);
        for p in &state.particles {
            assert_eq!(p.color, color);
            assert_eq!(p.pos, Vec2::new(310.0, 100.0));
            assert_eq!(p.alpha, 1.0);
            assert!(p.radius >= 0.0 && p.radius < 2.0);
            assert!(p.vel.x.abs() <= 2.0 && p.vel.y.abs() <= 2.0);
        }
    }

    #[test]
    fn test_removal_keeps_unrelated_entities() {
        let mut state = running_state();
        let mut rng = Pcg32::seed_from_u64(4);
        // Three small enemies, the middle one is hit
        state.enemies.push(enemy_at(Vec2::new(50.0, 50.0), 8.0));
        state.enemies.push(enemy_at(Vec2::new(200.0, 50.0), 8.0));
        state.enemies.push(enemy_at(Vec2::new(350.0, 50.0), 8.0));
        state.projectiles.push(projectile_at(Vec2::new(600.0, 500.0)));
        state.projectiles.push(projectile_at(Vec2::new(210.0, 50.0)));
        state.projectiles.push(projectile_at(Vec2::new(700.0, 500.0)));

        resolve(&mut state, &mut rng);

        assert_eq!(state.score, 250);
        let xs: Vec<f32> = state.enemies.iter().map(|e| e.pos.x).collect();
        assert_eq!(xs, vec![50.0, 350.0]);
        let pxs: Vec<f32> = state.projectiles.iter().map(|p| p.pos.x).collect();
        assert_eq!(pxs, vec![600.0, 700.0]);
    }

    #[test]
    fn test_destroyed_enemy_absorbs_no_more_hits() {
        let mut state = running_state();
        let mut rng = Pcg32::seed_from_u64(5);
        state.enemies.push(enemy_at(Vec2::new(100.0, 100.0), 10.0));
        state.projectiles.push(projectile_at(Vec2::new(100.0, 110.0)));
        state.projectiles.push(projectile_at(Vec2::new(100.0, 90.0)));

        resolve(&mut state, &mut rng);

        // Only the first projectile is consumed; the second flies on
        assert_eq!(state.score, 250);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos.y, 90.0);
    }

    #[test]
    fn test_player_contact_ends_without_scoring() {
        let mut state = running_state();
        let mut rng = Pcg32::seed_from_u64(6);
        let center = state.player.pos;
        state.enemies.push(enemy_at(center + Vec2::new(30.5, 0.0), 20.0));
        // A hit elsewhere in the same frame is not scored
        state.enemies.push(enemy_at(Vec2::new(50.0, 50.0), 20.0));
        state.projectiles.push(projectile_at(Vec2::new(50.0, 70.0)));

        let events = resolve(&mut state, &mut rng);

        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(events, vec![GameEvent::PlayerHit]);
        assert_eq!(state.score, 0);
        assert!(state.particles.is_empty());
    }

    proptest! {
        #[test]
        fn prop_epsilon_boundary(
            ra in 0.5f32..40.0,
            rb in 0.5f32..40.0,
            gap in -20.0f32..20.0,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let a = Vec2::new(400.0, 300.0);
            let d = (ra + rb + gap).max(0.0);
            let b = a + Vec2::new(angle.cos(), angle.sin()) * d;
            let measured = distance(a, b) - ra - rb;
            prop_assert_eq!(circles_touch(a, ra, b, rb, 1.0), measured < 1.0);
            if measured >= 1.0 {
                prop_assert!(!circles_touch(a, ra, b, rb, 1.0));
            }
        }

        #[test]
        fn prop_one_resolution_per_pair(seed in any::<u64>(), gap in -4.0f32..0.99) {
            let mut state = running_state();
            let mut rng = Pcg32::seed_from_u64(seed);
            state.enemies.push(enemy_at(Vec2::new(100.0, 100.0), 25.0));
            state.projectiles.push(projectile_at(Vec2::new(130.0 + gap, 100.0)));

            let events = resolve(&mut state, &mut rng);
            let hits = events
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemyShrunk { .. } | GameEvent::EnemyDestroyed { .. }))
                .count();
            prop_assert_eq!(hits, 1);
            prop_assert_eq!(state.score, 100);
        }
    }
}
