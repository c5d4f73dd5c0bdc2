//! Audio system using Web Audio API
//!
//! Procedurally generated sound, no asset files. The background loop is a
//! low drone that runs through its own music bus so it can be paused and
//! resumed without tearing down the oscillators.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::session::{AudioSink, SoundEffect};
use crate::tuning::AudioLevels;

/// Drone voices: (frequency Hz, waveform, relative level)
const DRONE_VOICES: [(f32, OscillatorType, f32); 2] = [
    (55.0, OscillatorType::Sine, 1.0),
    (82.5, OscillatorType::Triangle, 0.5),
];
const LFO_HZ: f32 = 0.25;
const MUSIC_GAIN: f32 = 0.15;
/// Seconds for the music bus to fade in or out
const MUSIC_FADE: f64 = 0.3;

/// Oscillators feeding the music bus, started once and left running
struct Drone {
    bus: GainNode,
    _voices: Vec<OscillatorNode>,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    levels: AudioLevels,
    drone: Option<Drone>,
    music_on: bool,
}

impl AudioManager {
    pub fn new(levels: AudioLevels) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            levels,
            drone: None,
            music_on: false,
        }
    }

    /// Resume audio context (required after user gesture)
    fn resume(ctx: &AudioContext) {
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
    }

    fn sfx_volume(&self) -> f32 {
        self.levels.master * self.levels.sfx
    }

    fn music_volume(&self) -> f32 {
        self.levels.master * self.levels.music * MUSIC_GAIN
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn build_drone(ctx: &AudioContext) -> Option<Drone> {
        let bus = ctx.create_gain().ok()?;
        bus.gain().set_value(0.0);
        bus.connect_with_audio_node(&ctx.destination()).ok()?;

        let mut voices = Vec::with_capacity(DRONE_VOICES.len() + 1);
        for (freq, osc_type, level) in DRONE_VOICES {
            let osc = ctx.create_oscillator().ok()?;
            let voice_gain = ctx.create_gain().ok()?;
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            voice_gain.gain().set_value(level);
            osc.connect_with_audio_node(&voice_gain).ok()?;
            voice_gain.connect_with_audio_node(&bus).ok()?;
            voices.push(osc);
        }

        // Slow wobble on the first voice's pitch
        let lfo = ctx.create_oscillator().ok()?;
        let depth = ctx.create_gain().ok()?;
        lfo.frequency().set_value(LFO_HZ);
        depth.gain().set_value(2.0);
        lfo.connect_with_audio_node(&depth).ok()?;
        if let Some(first) = voices.first() {
            depth.connect_with_audio_param(&first.frequency()).ok()?;
        }
        voices.push(lfo);

        for osc in &voices {
            osc.start().ok()?;
        }

        Some(Drone {
            bus,
            _voices: voices,
        })
    }

    fn fade_music(&self, target: f32) {
        let (Some(ctx), Some(drone)) = (&self.ctx, &self.drone) else {
            return;
        };
        let t = ctx.current_time();
        let gain = drone.bus.gain();
        gain.cancel_scheduled_values(t).ok();
        gain.set_value_at_time(gain.value(), t).ok();
        gain.linear_ramp_to_value_at_time(target, t + MUSIC_FADE).ok();
    }

    /// Hit - short falling zap
    fn play_hit(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, 880.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(880.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(110.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Game over - sad descending tones
    fn play_game_over(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}

impl AudioSink for AudioManager {
    fn play_background_loop(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        Self::resume(ctx);

        if self.drone.is_none() {
            self.drone = Self::build_drone(ctx);
            if self.drone.is_none() {
                log::warn!("Failed to build background loop");
                return;
            }
        }
        self.music_on = true;
        self.fade_music(self.music_volume());
    }

    fn pause_background_loop(&mut self) {
        self.music_on = false;
        self.fade_music(0.0);
    }

    fn toggle_background_loop(&mut self) {
        if self.music_on {
            self.pause_background_loop();
        } else {
            self.play_background_loop();
        }
        log::debug!("Music {}", if self.music_on { "on" } else { "off" });
    }

    fn play(&mut self, effect: SoundEffect) {
        let vol = self.sfx_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        Self::resume(ctx);

        match effect {
            SoundEffect::Hit => Self::play_hit(ctx, vol),
            SoundEffect::GameOver => Self::play_game_over(ctx, vol),
        }
    }
}
