//! Per-frame simulation tick
//!
//! One call advances every entity by one tick, hands the state to the
//! presenter, then runs the collision pass. Velocities are in units per
//! tick, so the tick rate is the display refresh rate.

use glam::Vec2;
use rand::Rng;

use super::collision;
use super::state::{Color, GameEvent, GamePhase, GameState, Projectile};
use crate::{angle_between, velocity_from_angle};

/// Fire a projectile from the center toward `target`.
///
/// Returns `false` (and does nothing) unless the session is running.
pub fn fire(state: &mut GameState, target: Vec2) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }
    let origin = state.viewport.center();
    let angle = angle_between(origin, target);
    state.projectiles.push(Projectile {
        pos: origin,
        vel: velocity_from_angle(angle, state.tuning.projectile_speed),
        radius: state.tuning.projectile_radius,
        color: Color::WHITE,
    });
    true
}

/// Integrate all entities and prune the ones that are done.
///
/// Faded particles and projectiles that left the screen are removed in the
/// same tick they become eligible.
pub fn advance(state: &mut GameState) {
    let friction = state.tuning.particle_friction;
    let fade = state.tuning.particle_fade;
    for particle in &mut state.particles {
        particle.update(friction, fade);
    }
    state.particles.retain(|p| !p.is_faded());

    for projectile in &mut state.projectiles {
        projectile.update();
    }
    let viewport = state.viewport;
    state
        .projectiles
        .retain(|p| !viewport.circle_fully_outside(p.pos, p.radius));

    for enemy in &mut state.enemies {
        enemy.update();
        enemy.animate();
    }
}

/// Advance the game state by one frame.
///
/// `present` sees the state after movement and before collisions, which is
/// the order a frame is drawn in. Nothing happens unless the session is
/// running.
pub fn tick<R: Rng>(
    state: &mut GameState,
    rng: &mut R,
    present: impl FnOnce(&GameState),
) -> Vec<GameEvent> {
    if state.phase != GamePhase::Running {
        return Vec::new();
    }

    state.time_ticks += 1;
    advance(state);
    present(state);
    collision::resolve(state, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::sim::spawner::spawn_enemy;
    use crate::sim::state::{Enemy, Particle};
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running_state() -> GameState {
        let mut state = GameState::new(Viewport::new(800.0, 600.0), Tuning::default());
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_fire_toward_click() {
        let mut state = running_state();
        let click = Vec2::new(10.0, 20.0);
        assert!(fire(&mut state, click));

        let theta = (20.0f32 - 300.0).atan2(10.0 - 400.0);
        let p = &state.projectiles[0];
        assert_eq!(p.pos, Vec2::new(400.0, 300.0));
        assert!((p.vel.x - theta.cos() * 4.0).abs() < 1e-5);
        assert!((p.vel.y - theta.sin() * 4.0).abs() < 1e-5);
        assert_eq!(p.radius, 5.0);
    }

    #[test]
    fn test_fire_ignored_when_not_running() {
        let mut state = running_state();
        state.phase = GamePhase::Ended;
        assert!(!fire(&mut state, Vec2::ZERO));
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_projectile_pruned_once_fully_outside() {
        let mut state = running_state();
        state.projectiles.push(Projectile {
            pos: Vec2::new(4.0, 300.0),
            vel: Vec2::new(-4.0, 0.0),
            radius: 5.0,
            color: Color::WHITE,
        });

        // x = 0: still overlapping the left edge
        advance(&mut state);
        assert_eq!(state.projectiles.len(), 1);
        // x = -4: edge at +1
        advance(&mut state);
        assert_eq!(state.projectiles.len(), 1);
        // x = -8: fully outside
        advance(&mut state);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_projectile_leaving_bottom_is_pruned() {
        // Bottom edge uses the viewport height, not its width
        let mut state = running_state();
        state.projectiles.push(Projectile {
            pos: Vec2::new(400.0, 598.0),
            vel: Vec2::new(0.0, 4.0),
            radius: 5.0,
            color: Color::WHITE,
        });
        for _ in 0..3 {
            advance(&mut state);
        }
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_particle_removed_in_tick_it_fades() {
        let mut state = running_state();
        let mut p = Particle::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 1.0, Color::WHITE);
        p.alpha = 0.015;
        state.particles.push(p);

        advance(&mut state);
        assert_eq!(state.particles.len(), 1);
        advance(&mut state);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_tick_inert_unless_running() {
        let mut state = running_state();
        state.phase = GamePhase::Idle;
        let mut rng = Pcg32::seed_from_u64(1);
        let mut presented = false;
        let events = tick(&mut state, &mut rng, |_| presented = true);
        assert!(events.is_empty());
        assert!(!presented);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_present_sees_moved_state_before_collisions() {
        let mut state = running_state();
        let mut rng = Pcg32::seed_from_u64(1);
        state.enemies.push(Enemy::new(
            Vec2::new(100.0, 100.0),
            Vec2::new(1.0, 0.0),
            12.0,
            Color::WHITE,
        ));
        state.projectiles.push(Projectile {
            pos: Vec2::new(110.0, 100.0),
            vel: Vec2::ZERO,
            radius: 5.0,
            color: Color::WHITE,
        });

        let mut seen = None;
        let events = tick(&mut state, &mut rng, |s| {
            seen = Some((s.enemies.len(), s.enemies[0].pos.x));
        });

        assert_eq!(seen, Some((1, 101.0)));
        assert!(state.enemies.is_empty());
        assert!(events.contains(&GameEvent::ScoreChanged(250)));
    }

    #[test]
    fn test_end_to_end_first_hit() {
        // 800x600 viewport, fire toward the top-left, an enemy of radius 20
        // sits on the projectile's path
        let mut state = running_state();
        let mut rng = Pcg32::seed_from_u64(9);
        let click = Vec2::new(0.0, 0.0);
        fire(&mut state, click);

        let dir = (click - state.viewport.center()).normalize();
        let enemy_pos = state.viewport.center() + dir * 150.0;
        state
            .enemies
            .push(Enemy::new(enemy_pos, Vec2::ZERO, 20.0, Color::WHITE));

        let mut score_events = Vec::new();
        for _ in 0..60 {
            let events = tick(&mut state, &mut rng, |_| {});
            score_events.extend(
                events
                    .into_iter()
                    .filter(|e| matches!(e, GameEvent::ScoreChanged(_))),
            );
            if !score_events.is_empty() {
                break;
            }
        }

        assert_eq!(score_events, vec![GameEvent::ScoreChanged(100)]);
        assert_eq!(state.score, 100);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.enemies[0].radius, 20.0);

        tick(&mut state, &mut rng, |_| {});
        let r = state.enemies[0].radius;
        assert!(r < 20.0 && r > 10.0, "radius should ease toward 10, got {r}");

        for _ in 0..40 {
            tick(&mut state, &mut rng, |_| {});
        }
        assert_eq!(state.enemies[0].radius, 10.0);
    }

    #[test]
    fn test_enemy_walks_into_player() {
        let mut state = running_state();
        let mut rng = Pcg32::seed_from_u64(3);
        let enemy = spawn_enemy(&mut rng, state.viewport, &state.tuning);
        state.enemies.push(enemy);

        let mut ended_at = None;
        for i in 0..2000 {
            let events = tick(&mut state, &mut rng, |_| {});
            if events.contains(&GameEvent::PlayerHit) {
                ended_at = Some(i);
                break;
            }
        }
        assert!(ended_at.is_some());
        assert_eq!(state.phase, GamePhase::Ended);

        // Further ticks are no-ops
        let before = state.time_ticks;
        assert!(tick(&mut state, &mut rng, |_| {}).is_empty());
        assert_eq!(state.time_ticks, before);
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_over_random_play(seed in any::<u64>(), shots in proptest::collection::vec((0.0f32..800.0, 0.0f32..600.0), 1..20)) {
            let mut state = running_state();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut last_score = 0;
            let mut shots = shots.into_iter();

            for frame in 0..600u32 {
                if frame % 60 == 0 {
                    let enemy = spawn_enemy(&mut rng, state.viewport, &state.tuning);
                    state.enemies.push(enemy);
                }
                if frame % 15 == 0 {
                    if let Some((x, y)) = shots.next() {
                        fire(&mut state, Vec2::new(x, y));
                    }
                }

                let fade = state.tuning.particle_fade;
                let surviving: Vec<f32> = state
                    .particles
                    .iter()
                    .map(|p| p.alpha)
                    .filter(|a| a - fade > 0.0)
                    .collect();
                tick(&mut state, &mut rng, |_| {});

                for enemy in &state.enemies {
                    prop_assert!(enemy.radius > 0.0);
                    // Spawns start at or above the floor and a shrink never targets below it
                    prop_assert!(enemy.radius >= state.tuning.min_enemy_radius);
                }
                for p in &state.particles {
                    prop_assert!(p.alpha > 0.0);
                }
                // Old particles keep their order ahead of new bursts and only fade
                prop_assert!(state.particles.len() >= surviving.len());
                for (old, new) in surviving.iter().zip(&state.particles) {
                    prop_assert!(new.alpha < *old);
                }
                for p in &state.projectiles {
                    prop_assert!(!state.viewport.circle_fully_outside(p.pos, p.radius));
                }
                prop_assert!(state.score >= last_score);
                last_score = state.score;

                if state.phase == GamePhase::Ended {
                    break;
                }
            }
        }
    }
}
