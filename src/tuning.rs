//! Data-driven game balance
//!
//! Every gameplay constant lives here so a page can override them with a
//! JSON document. Missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Output levels for the audio sink (0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioLevels {
    pub master: f32,
    pub sfx: f32,
    pub music: f32,
}

impl Default for AudioLevels {
    fn default() -> Self {
        Self {
            master: 0.8,
            sfx: 1.0,
            music: 0.5,
        }
    }
}

/// Gameplay tuning
///
/// Distances are screen units, speeds are units per tick, durations are
/// ticks unless the name says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    pub player_radius: f32,

    pub projectile_radius: f32,
    pub projectile_speed: f32,

    /// Spawn radius is drawn from `[enemy_radius_min, enemy_radius_max)`
    pub enemy_radius_min: f32,
    pub enemy_radius_max: f32,
    pub enemy_speed: f32,
    /// Wall-clock spawn period
    pub spawn_period_ms: u32,
    pub enemy_saturation: f32,
    pub enemy_lightness: f32,

    /// Contact when `distance - r1 - r2 < hit_epsilon`
    pub hit_epsilon: f32,
    /// Radius removed by one hit
    pub shrink_step: f32,
    /// A hit that would leave the enemy at or below this radius destroys it
    pub min_enemy_radius: f32,
    pub shrink_ticks: u32,
    pub score_shrink: u64,
    pub score_destroy: u64,

    pub particle_friction: f32,
    pub particle_fade: f32,
    pub particle_max_radius: f32,
    /// Upper bound of the random speed factor applied to burst particles
    pub particle_spread: f32,

    /// Alpha of the black overlay painted each frame (motion trails)
    pub trail_fade: f32,

    pub audio: AudioLevels,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_radius: 10.0,

            projectile_radius: 5.0,
            projectile_speed: 4.0,

            enemy_radius_min: 5.0,
            enemy_radius_max: 30.0,
            enemy_speed: 1.0,
            spawn_period_ms: 1000,
            enemy_saturation: 0.5,
            enemy_lightness: 0.5,

            hit_epsilon: 1.0,
            shrink_step: 10.0,
            min_enemy_radius: 5.0,
            shrink_ticks: 30, // 0.5s at 60 Hz
            score_shrink: 100,
            score_destroy: 250,

            particle_friction: 0.99,
            particle_fade: 0.01,
            particle_max_radius: 2.0,
            particle_spread: 4.0,

            trail_fade: 0.1,

            audio: AudioLevels::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Load from an inline `<script id="tuning" type="application/json">`
    /// element, falling back to defaults when absent or invalid
    #[cfg(target_arch = "wasm32")]
    pub fn load_from_page() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("tuning"))
            .and_then(|el| el.text_content());

        match json.as_deref().map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning from page");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Ignoring page tuning: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Reject values the simulation cannot honor
    pub fn validate(&self) -> Result<(), TuningError> {
        let all = [
            ("player_radius", self.player_radius),
            ("projectile_radius", self.projectile_radius),
            ("projectile_speed", self.projectile_speed),
            ("enemy_radius_min", self.enemy_radius_min),
            ("enemy_radius_max", self.enemy_radius_max),
            ("enemy_speed", self.enemy_speed),
            ("enemy_saturation", self.enemy_saturation),
            ("enemy_lightness", self.enemy_lightness),
            ("hit_epsilon", self.hit_epsilon),
            ("shrink_step", self.shrink_step),
            ("min_enemy_radius", self.min_enemy_radius),
            ("particle_friction", self.particle_friction),
            ("particle_fade", self.particle_fade),
            ("particle_max_radius", self.particle_max_radius),
            ("particle_spread", self.particle_spread),
            ("trail_fade", self.trail_fade),
            ("audio.master", self.audio.master),
            ("audio.sfx", self.audio.sfx),
            ("audio.music", self.audio.music),
        ];
        // JSON numbers beyond f32 range arrive as infinity
        for (field, value) in all {
            if !value.is_finite() {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
        }

        let positive = [
            ("player_radius", self.player_radius),
            ("projectile_radius", self.projectile_radius),
            ("projectile_speed", self.projectile_speed),
            ("enemy_radius_min", self.enemy_radius_min),
            ("enemy_speed", self.enemy_speed),
            ("shrink_step", self.shrink_step),
            ("min_enemy_radius", self.min_enemy_radius),
            ("particle_fade", self.particle_fade),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be positive",
                });
            }
        }
        if self.enemy_radius_max <= self.enemy_radius_min {
            return Err(TuningError::Invalid {
                field: "enemy_radius_max",
                reason: "must exceed enemy_radius_min",
            });
        }
        if self.min_enemy_radius >= self.enemy_radius_max {
            return Err(TuningError::Invalid {
                field: "min_enemy_radius",
                reason: "must be below enemy_radius_max",
            });
        }
        for (field, value) in [
            ("particle_max_radius", self.particle_max_radius),
            ("particle_spread", self.particle_spread),
        ] {
            if value < 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must not be negative",
                });
            }
        }
        for (field, value) in [
            ("enemy_saturation", self.enemy_saturation),
            ("enemy_lightness", self.enemy_lightness),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be in [0, 1]",
                });
            }
        }
        if !(self.particle_friction > 0.0 && self.particle_friction <= 1.0) {
            return Err(TuningError::Invalid {
                field: "particle_friction",
                reason: "must be in (0, 1]",
            });
        }
        if self.spawn_period_ms == 0 {
            return Err(TuningError::Invalid {
                field: "spawn_period_ms",
                reason: "must be non-zero",
            });
        }
        if !(0.0..=1.0).contains(&self.trail_fade) {
            return Err(TuningError::Invalid {
                field: "trail_fade",
                reason: "must be in [0, 1]",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "spawn_period_ms": 500, "audio": { "music": 0.0 } }"#)
            .expect("valid tuning");
        assert_eq!(tuning.spawn_period_ms, 500);
        assert_eq!(tuning.audio.music, 0.0);
        assert_eq!(tuning.audio.master, AudioLevels::default().master);
        assert_eq!(tuning.projectile_speed, 4.0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Tuning::from_json(r#"{ "gravity": 9.8 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Json(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Tuning::from_json(r#"{ "enemy_radius_min": 30, "enemy_radius_max": 10 }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "enemy_radius_max",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "particle_friction": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "particle_friction",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "spawn_period_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { .. }));

        let err = Tuning::from_json(r#"{ "enemy_lightness": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "enemy_lightness",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "particle_spread": -1 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "particle_spread",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "min_enemy_radius": 30 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "min_enemy_radius",
                ..
            }
        ));
    }

    #[test]
    fn test_out_of_range_numbers_rejected() {
        // 1e39 overflows f32 and would reach the spawner as infinity
        let err = Tuning::from_json(r#"{ "enemy_radius_max": 1e39 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "enemy_radius_max",
                reason: "must be finite",
            }
        ));

        let err = Tuning::from_json(r#"{ "hit_epsilon": -1e39 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "hit_epsilon",
                ..
            }
        ));
    }
}
