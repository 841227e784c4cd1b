//! Simulation settings and preferences
//!
//! Supplied by the host at start-up (JSON) and adjusted live by the speed
//! slider. Nothing here is persisted between sessions.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SPEED, SPEED_MAX, SPEED_MIN, SPEED_STEP};
use crate::sim::LayoutPolicy;

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Speed multiplier applied to every velocity
    pub speed: f32,
    /// Placement policy for new rounds
    pub layout: LayoutPolicy,
    /// Slow the arena down once only two kinds remain
    pub endgame_slowdown: bool,
    /// Fixed RNG seed; the host picks one when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            layout: LayoutPolicy::GridJittered,
            endgame_slowdown: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings, clamping the speed into the slider range
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.speed = quantize_speed(settings.speed);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Set the speed multiplier (slider semantics). Returns the applied value.
    pub fn set_speed(&mut self, speed: f32) -> f32 {
        self.speed = quantize_speed(speed);
        self.speed
    }
}

/// Snap a speed onto the slider: `[SPEED_MIN, SPEED_MAX]` in `SPEED_STEP` steps
pub fn quantize_speed(speed: f32) -> f32 {
    if !speed.is_finite() {
        return DEFAULT_SPEED;
    }
    let steps = (speed.clamp(SPEED_MIN, SPEED_MAX) / SPEED_STEP).round();
    (steps * SPEED_STEP).clamp(SPEED_MIN, SPEED_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.speed, 1.0);
        assert_eq!(settings.layout, LayoutPolicy::GridJittered);
        assert!(settings.endgame_slowdown);
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_speed_is_clamped_and_stepped() {
        let mut settings = Settings::default();
        assert_eq!(settings.set_speed(9.0), SPEED_MAX);
        assert_eq!(settings.set_speed(0.0), SPEED_MIN);
        assert!((settings.set_speed(2.34) - 2.3).abs() < 1e-5);
        assert_eq!(settings.set_speed(f32::NAN), DEFAULT_SPEED);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "speed": 12.0, "layout": "Uniform", "seed": 99 }"#)
            .unwrap();
        assert_eq!(settings.speed, SPEED_MAX);
        assert_eq!(settings.layout, LayoutPolicy::Uniform);
        assert_eq!(settings.seed, Some(99));
        assert!(settings.endgame_slowdown);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{ speed: fast }").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            seed: Some(7),
            endgame_slowdown: false,
            ..Default::default()
        };
        let parsed = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }
}
