//! Tunables for the backdrop.
//!
//! Fixed at initialisation. The host page may override any subset of fields by
//! putting a JSON object in the canvas element's `data-config` attribute, e.g.
//! `{"effectRadius": 160, "gradient": false}`.

use serde::Deserialize;

use crate::error::ConfigError;

/// Longest accepted resize quiet period; the browser timer takes an `i32`.
const MAX_RESIZE_DEBOUNCE_MS: f64 = 60_000.0;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Per-channel linear interpolation, rounded to the nearest integer.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| {
            let (a, b) = (f64::from(a), f64::from(b));
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Multiply every channel by `factor`, saturating at 255.
    pub fn scale(self, factor: f64) -> Rgb {
        let mul = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
        Rgb::new(mul(self.r), mul(self.g), mul(self.b))
    }

    pub fn to_css(self) -> String {
        format!("rgba({},{},{},1)", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Target number of cells along the shorter viewport dimension.
    pub site_density: u32,
    /// Pointer influence radius in CSS pixels. Also the spatial grid cell size.
    pub effect_radius: f64,
    /// Time constant for intensity approaching its target (ms).
    pub fade_ms: f64,
    /// Time constant for the target decaying back to baseline (ms).
    pub trail_ms: f64,
    pub base_intensity: f64,
    pub target_fps: f64,
    pub cool_color: Rgb,
    pub bright_color: Rgb,
    /// Shade each cell with a linear gradient along the site's angle.
    pub gradient: bool,
    /// Alpha of the black cell outline; 0 disables stroking.
    pub stroke_alpha: f64,
    /// Quiet period before a burst of size changes is applied (ms).
    pub resize_debounce_ms: f64,
    /// Interval of the fallback page size poll (ms).
    pub resize_poll_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_density: 12,
            effect_radius: 200.0,
            fade_ms: 800.0,
            trail_ms: 1500.0,
            base_intensity: 0.03,
            target_fps: 60.0,
            cool_color: Rgb::new(4, 45, 55),
            bright_color: Rgb::new(46, 255, 255),
            gradient: true,
            stroke_alpha: 0.05,
            resize_debounce_ms: 100.0,
            resize_poll_ms: 500,
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange {
                    field,
                    reason: "must be a positive number",
                })
            }
        }

        positive("effectRadius", self.effect_radius)?;
        positive("fadeMs", self.fade_ms)?;
        positive("trailMs", self.trail_ms)?;
        positive("targetFps", self.target_fps)?;
        if !(0.0..1.0).contains(&self.base_intensity) {
            return Err(ConfigError::OutOfRange {
                field: "baseIntensity",
                reason: "must lie in [0, 1)",
            });
        }
        if !(0.0..=1.0).contains(&self.stroke_alpha) {
            return Err(ConfigError::OutOfRange {
                field: "strokeAlpha",
                reason: "must lie in [0, 1]",
            });
        }
        if !(0.0..=MAX_RESIZE_DEBOUNCE_MS).contains(&self.resize_debounce_ms) {
            return Err(ConfigError::OutOfRange {
                field: "resizeDebounceMs",
                reason: "must lie in [0, 60000]",
            });
        }
        if self.resize_poll_ms == 0 {
            return Err(ConfigError::OutOfRange {
                field: "resizePollMs",
                reason: "must be non-zero",
            });
        }
        Ok(())
    }

    /// Shortest allowed gap between two rendered frames (ms).
    pub fn min_frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let config = Config::from_json(r#"{"effectRadius": 120, "gradient": false}"#).unwrap();
        assert_eq!(config.effect_radius, 120.0);
        assert!(!config.gradient);
        assert_eq!(config.fade_ms, 800.0);
        assert_eq!(config.cool_color, Rgb::new(4, 45, 55));
    }

    #[test]
    fn colors_parse_from_objects() {
        let config = Config::from_json(r#"{"brightColor": {"r": 255, "g": 0, "b": 10}}"#).unwrap();
        assert_eq!(config.bright_color, Rgb::new(255, 0, 10));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = Config::from_json(r#"{"baseIntensity": 1.5}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "baseIntensity",
                ..
            }
        ));
        assert!(Config::from_json(r#"{"targetFps": 0}"#).is_err());
    }

    #[test]
    fn debounce_must_fit_a_timer() {
        assert!(Config::from_json(r#"{"resizeDebounceMs": 60000}"#).is_ok());
        let err = Config::from_json(r#"{"resizeDebounceMs": 3e9}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "resizeDebounceMs",
                ..
            }
        ));
        assert!(Config::from_json(r#"{"resizeDebounceMs": -1}"#).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(Config::from_json("{effectRadius"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn color_lerp_rounds_and_scale_saturates() {
        let a = Rgb::new(4, 45, 55);
        let b = Rgb::new(46, 255, 255);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(25, 150, 155));
        assert_eq!(Rgb::new(200, 10, 0).scale(2.0), Rgb::new(255, 20, 0));
        assert_eq!(Rgb::new(46, 255, 255).scale(0.5), Rgb::new(23, 128, 128));
    }
}
