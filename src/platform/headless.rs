//! Deterministic host with a virtual clock
//!
//! Frames only run when the caller asks for one, and the spawn interval
//! fires off a microsecond clock that advances one nominal frame per
//! [`HeadlessHost::run_frame`]. Every collaborator call is recorded so
//! tests can assert on what the session asked of the outside world.

use glam::Vec2;

use crate::renderer::{Rect, Surface};
use crate::session::{AudioSink, Hud, Scheduler, Session, SoundEffect, TimerHandle, TimerToken};
use crate::sim::Color;

/// One nominal 60 Hz frame, rounded up so 60 frames cover a full second
pub const FRAME_US: u64 = 16_667;

/// A collaborator call made by the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostCall {
    RequestFrame(TimerToken),
    CancelFrame(TimerHandle),
    SetInterval { token: TimerToken, period_ms: u32 },
    ClearInterval(TimerHandle),
    SetScore(u64),
    ShowEndOverlay(u64),
    HideOverlay,
    PlayBackgroundLoop,
    PauseBackgroundLoop,
    ToggleBackgroundLoop,
    Play(SoundEffect),
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    handle: TimerHandle,
    token: TimerToken,
    period_us: u64,
    next_due_us: u64,
}

#[derive(Debug, Default)]
pub struct HeadlessHost {
    now_us: u64,
    next_handle: i32,
    frames: Vec<(TimerHandle, TimerToken)>,
    intervals: Vec<Interval>,
    calls: Vec<HostCall>,
    music_playing: bool,
    spawns_delivered: usize,
    last_frame_token: Option<TimerToken>,
    last_interval_token: Option<TimerToken>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_handle(&mut self) -> TimerHandle {
        self.next_handle += 1;
        TimerHandle(self.next_handle)
    }

    /// Virtual time since the host was created
    pub fn now_ms(&self) -> u64 {
        self.now_us / 1000
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn active_intervals(&self) -> usize {
        self.intervals.len()
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    /// Spawn-interval callbacks delivered so far
    pub fn spawn_count(&self) -> usize {
        self.spawns_delivered
    }

    pub fn last_frame_token(&self) -> Option<TimerToken> {
        self.last_frame_token
    }

    pub fn last_interval_token(&self) -> Option<TimerToken> {
        self.last_interval_token
    }

    /// Deliver the pending frame callback, then let one frame of virtual
    /// time pass. Returns false when no frame was requested.
    pub fn run_frame(&mut self, session: &mut Session, surface: &mut impl Surface) -> bool {
        let due = std::mem::take(&mut self.frames);
        if due.is_empty() {
            return false;
        }
        for (_, token) in due {
            session.on_frame(token, self, surface);
        }
        self.advance_us(FRAME_US, session);
        true
    }

    /// Let wall-clock time pass without any display refresh
    pub fn advance_ms(&mut self, ms: u64, session: &mut Session) {
        self.advance_us(ms * 1000, session);
    }

    fn advance_us(&mut self, us: u64, session: &mut Session) {
        self.now_us += us;

        let mut fired = Vec::new();
        for interval in &mut self.intervals {
            while interval.next_due_us <= self.now_us {
                fired.push(interval.token);
                interval.next_due_us += interval.period_us;
            }
        }
        for token in fired {
            self.spawns_delivered += 1;
            session.on_spawn_timer(token);
        }
    }
}

impl Scheduler for HeadlessHost {
    fn request_frame(&mut self, token: TimerToken) -> TimerHandle {
        let handle = self.next_handle();
        self.frames.push((handle, token));
        self.last_frame_token = Some(token);
        self.calls.push(HostCall::RequestFrame(token));
        handle
    }

    fn cancel_frame(&mut self, handle: TimerHandle) {
        self.frames.retain(|(h, _)| *h != handle);
        self.calls.push(HostCall::CancelFrame(handle));
    }

    fn set_interval(&mut self, token: TimerToken, period_ms: u32) -> TimerHandle {
        let handle = self.next_handle();
        let period_us = u64::from(period_ms.max(1)) * 1000;
        self.intervals.push(Interval {
            handle,
            token,
            period_us,
            next_due_us: self.now_us + period_us,
        });
        self.last_interval_token = Some(token);
        self.calls.push(HostCall::SetInterval { token, period_ms });
        handle
    }

    fn clear_interval(&mut self, handle: TimerHandle) {
        self.intervals.retain(|i| i.handle != handle);
        self.calls.push(HostCall::ClearInterval(handle));
    }
}

impl Hud for HeadlessHost {
    fn set_score(&mut self, score: u64) {
        self.calls.push(HostCall::SetScore(score));
    }

    fn show_end_overlay(&mut self, final_score: u64) {
        self.calls.push(HostCall::ShowEndOverlay(final_score));
    }

    fn hide_overlay(&mut self) {
        self.calls.push(HostCall::HideOverlay);
    }
}

impl AudioSink for HeadlessHost {
    fn play_background_loop(&mut self) {
        self.music_playing = true;
        self.calls.push(HostCall::PlayBackgroundLoop);
    }

    fn pause_background_loop(&mut self) {
        self.music_playing = false;
        self.calls.push(HostCall::PauseBackgroundLoop);
    }

    fn toggle_background_loop(&mut self) {
        self.music_playing = !self.music_playing;
        self.calls.push(HostCall::ToggleBackgroundLoop);
    }

    fn play(&mut self, effect: SoundEffect) {
        self.calls.push(HostCall::Play(effect));
    }
}

/// Discards everything drawn
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn fill_rect(&mut self, _rect: Rect, _color: Color, _alpha: f32) {}
    fn draw_circle(&mut self, _center: Vec2, _radius: f32, _color: Color, _alpha: f32) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleDraw {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
    pub alpha: f32,
}

/// Keeps every draw call, in order
#[derive(Debug, Default)]
pub struct RecordingSurface {
    rects: Vec<(Rect, f32)>,
    circles: Vec<CircleDraw>,
}

impl RecordingSurface {
    pub fn rects(&self) -> &[(Rect, f32)] {
        &self.rects
    }

    pub fn circles(&self) -> &[CircleDraw] {
        &self.circles
    }

    pub fn clear(&mut self) {
        self.rects.clear();
        self.circles.clear();
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, _color: Color, alpha: f32) {
        self.rects.push((rect, alpha));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32) {
        self.circles.push(CircleDraw {
            center,
            radius,
            color,
            alpha,
        });
    }
}
