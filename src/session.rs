//! Session lifecycle
//!
//! The session owns the game state and drives the outside world through a
//! small set of collaborator traits: a scheduler for frames and the spawn
//! interval, a HUD for score and overlay, and an audio sink. Everything runs
//! on one thread; the host calls back into the session when a frame or the
//! spawn interval fires.
//!
//! Timer callbacks carry a [`TimerToken`] minted by the session. Tokens from
//! a stopped loop or interval no longer match and are ignored, so a late
//! event can never touch an ended session.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::Viewport;
use crate::renderer::{self, Surface};
use crate::sim::{self, GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;

/// Identifies one scheduled frame or interval, as issued by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Rebuild a token from an id a host stored elsewhere
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Host-side id returned by the scheduler (rAF id, interval id, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

/// Clock/scheduler collaborator
pub trait Scheduler {
    /// Arrange for `Session::on_frame(token, ..)` on the next display refresh
    fn request_frame(&mut self, token: TimerToken) -> TimerHandle;
    fn cancel_frame(&mut self, handle: TimerHandle);
    /// Arrange for `Session::on_spawn_timer(token)` every `period_ms`
    fn set_interval(&mut self, token: TimerToken, period_ms: u32) -> TimerHandle;
    fn clear_interval(&mut self, handle: TimerHandle);
}

/// Score display and end-of-game overlay
pub trait Hud {
    fn set_score(&mut self, score: u64);
    fn show_end_overlay(&mut self, final_score: u64);
    fn hide_overlay(&mut self);
}

/// One-shot clips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Projectile hit an enemy
    Hit,
    /// Enemy reached the player
    GameOver,
}

/// Fire-and-forget audio output
pub trait AudioSink {
    fn play_background_loop(&mut self);
    fn pause_background_loop(&mut self);
    fn toggle_background_loop(&mut self);
    fn play(&mut self, effect: SoundEffect);
}

/// Everything a session needs from its environment
pub trait Host: Scheduler + Hud + AudioSink {}

impl<T: Scheduler + Hud + AudioSink> Host for T {}

/// A scheduled callback the session is waiting on
#[derive(Debug, Clone, Copy)]
struct Pending {
    token: TimerToken,
    handle: TimerHandle,
}

/// One player's run from start to game over, restartable
pub struct Session {
    state: GameState,
    rng: Pcg32,
    frame: Option<Pending>,
    spawner: Option<Pending>,
    next_token: u64,
}

impl Session {
    pub fn new(viewport: Viewport, tuning: Tuning, seed: u64) -> Self {
        Self {
            state: GameState::new(viewport, tuning),
            rng: Pcg32::seed_from_u64(seed),
            frame: None,
            spawner: None,
            next_token: 1,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    fn mint_token(&mut self) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        token
    }

    /// Start (or restart) a session with a full reset
    pub fn start(&mut self, host: &mut impl Host) {
        // Never leave a previous loop or interval running alongside the new one
        self.stop(host);

        self.state.reset();
        self.state.phase = GamePhase::Running;

        host.hide_overlay();
        host.set_score(0);
        host.play_background_loop();

        let frame_token = self.mint_token();
        let handle = host.request_frame(frame_token);
        self.frame = Some(Pending {
            token: frame_token,
            handle,
        });

        let spawn_token = self.mint_token();
        let handle = host.set_interval(spawn_token, self.state.tuning.spawn_period_ms);
        self.spawner = Some(Pending {
            token: spawn_token,
            handle,
        });

        log::info!(
            "Session started ({}x{})",
            self.state.viewport.width,
            self.state.viewport.height
        );
    }

    /// Cancel the frame loop and spawn interval. Safe to call repeatedly.
    pub fn stop(&mut self, host: &mut impl Host) {
        if let Some(pending) = self.frame.take() {
            host.cancel_frame(pending.handle);
        }
        if let Some(pending) = self.spawner.take() {
            host.clear_interval(pending.handle);
        }
    }

    /// Pointer click: shoot toward `point` (screen units)
    pub fn fire(&mut self, point: Vec2) -> bool {
        sim::fire(&mut self.state, point)
    }

    pub fn toggle_music(&mut self, host: &mut impl Host) {
        host.toggle_background_loop();
    }

    /// Spawn interval fired
    pub fn on_spawn_timer(&mut self, token: TimerToken) {
        let live = self.spawner.is_some_and(|p| p.token == token);
        if !live || self.state.phase != GamePhase::Running {
            log::debug!("Ignoring stale spawn timer {:?}", token);
            return;
        }
        let enemy = sim::spawn_enemy(&mut self.rng, self.state.viewport, &self.state.tuning);
        self.state.enemies.push(enemy);
    }

    /// Display refresh fired: run one full tick, draw it, schedule the next.
    /// A second callback for the same token is ignored, so two ticks can
    /// never overlap.
    pub fn on_frame(&mut self, token: TimerToken, host: &mut impl Host, surface: &mut impl Surface) {
        match self.frame {
            Some(pending) if pending.token == token => self.frame = None,
            _ => {
                log::debug!("Ignoring stale frame {:?}", token);
                return;
            }
        }

        let events = sim::tick(&mut self.state, &mut self.rng, |state| {
            renderer::draw_frame(state, surface);
        });

        let mut ended = false;
        for event in events {
            match event {
                GameEvent::ScoreChanged(score) => host.set_score(score),
                GameEvent::EnemyShrunk { .. } | GameEvent::EnemyDestroyed { .. } => {
                    host.play(SoundEffect::Hit)
                }
                GameEvent::PlayerHit => ended = true,
            }
        }

        if ended || self.state.phase == GamePhase::Ended {
            self.end(host);
        } else {
            let next = self.mint_token();
            let handle = host.request_frame(next);
            self.frame = Some(Pending {
                token: next,
                handle,
            });
        }
    }

    fn end(&mut self, host: &mut impl Host) {
        self.stop(host);
        self.state.phase = GamePhase::Ended;

        host.set_score(self.state.score);
        host.show_end_overlay(self.state.score);
        host.pause_background_loop();
        host.play(SoundEffect::GameOver);

        log::info!(
            "Game over after {} ticks, final score {}",
            self.state.time_ticks,
            self.state.score
        );
    }
}
