//! Environment-style configuration for the whole engine.
//!
//! Keys are read through an injectable lookup so tests never touch the
//! real process environment. Production code uses the lenient path: an
//! unparseable value keeps its default and warns once. The strict path
//! returns [`ConfigError`] and exists for tests and validation tooling.
//!
//! Recognized keys (all under the `PERCH_` prefix):
//!
//! | Key | Effect | Default |
//! |-----|--------|---------|
//! | `VISUAL_FRAME_RATIO` | visual width as a fraction of the box | 0.62 |
//! | `VISUAL_FRAME_MIN_PX` | visual width floor | 180 |
//! | `VISUAL_FRAME_PADDING_PX` | per-side visual padding | 0 |
//! | `VISUAL_FRAME_CENTER` | `bounds` or `face` | `bounds` |
//! | `VISUAL_FRAME_OFFSET_PX` | fixed visible-frame nudge | 0 |
//! | `VISUAL_FRAME_OFFSET_RATIO` | width-proportional nudge | 0 |
//! | `TOUCH_MAP` | five ascending body-band ratios | `0.1,0.19,0.39,0.53,1` |
//! | `BUBBLE_HEAD_RATIO` | explicit head-anchor ratio override | derived |
//! | `BUBBLE_SYMMETRIC` | commit the narrower side's width | off |

use std::time::Duration;

use perch_geometry::{CenterMode, TouchMap, TouchMapError, VisualFrameOptions, ZoneOptions};
use perch_placement::{BubbleTuning, ContextZoneConstants};

use crate::cursor::POLL_INTERVAL;
use crate::pointer::LATCH;
use crate::throttle::{EPSILON_PX, RESIZE_INTERVAL, RESIZE_MIN_DELTA_PX, UPDATE_INTERVAL};

/// Prefix applied to every recognized environment key.
pub const ENV_PREFIX: &str = "PERCH_";

/// A configuration value that failed strict parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The value is not a finite number.
    InvalidNumber { key: &'static str, value: String },
    /// The value is not a recognized boolean flag.
    InvalidFlag { key: &'static str, value: String },
    /// `VISUAL_FRAME_CENTER` is neither `bounds` nor `face`.
    InvalidCenterMode(String),
    /// `TOUCH_MAP` failed validation.
    InvalidTouchMap(TouchMapError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { key, value } => {
                write!(f, "{ENV_PREFIX}{key}: not a finite number: {value:?}")
            }
            Self::InvalidFlag { key, value } => {
                write!(f, "{ENV_PREFIX}{key}: not a boolean flag: {value:?}")
            }
            Self::InvalidCenterMode(value) => write!(
                f,
                "{ENV_PREFIX}VISUAL_FRAME_CENTER: expected `bounds` or `face`, got {value:?}"
            ),
            Self::InvalidTouchMap(e) => write!(f, "{ENV_PREFIX}TOUCH_MAP: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<TouchMapError> for ConfigError {
    fn from(e: TouchMapError) -> Self {
        Self::InvalidTouchMap(e)
    }
}

/// Everything the coordinator needs, parsed once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub visual: VisualFrameOptions,
    pub zones: ZoneOptions,
    pub bubble: BubbleTuning,
    pub touch_map: TouchMap,
    /// Explicit head-anchor ratio override (`BUBBLE_HEAD_RATIO`).
    pub head_ratio_override: Option<f64>,
    pub context: ContextZoneConstants,
    pub update_interval: Duration,
    pub resize_interval: Duration,
    pub resize_min_delta_px: f64,
    pub latch: Duration,
    pub poll_interval: Duration,
    pub epsilon_px: f64,
    /// The user's global "ignore mouse" toggle (runtime-settable too).
    pub ignore_mouse: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            visual: VisualFrameOptions::default(),
            zones: ZoneOptions::default(),
            bubble: BubbleTuning::default(),
            touch_map: TouchMap::default(),
            head_ratio_override: None,
            context: ContextZoneConstants::default(),
            update_interval: UPDATE_INTERVAL,
            resize_interval: RESIZE_INTERVAL,
            resize_min_delta_px: RESIZE_MIN_DELTA_PX,
            latch: LATCH,
            poll_interval: POLL_INTERVAL,
            epsilon_px: EPSILON_PX,
            ignore_mouse: false,
        }
    }
}

impl EngineConfig {
    /// Read the process environment, keeping defaults for bad values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Lenient parse through an injected lookup. Each bad value keeps its
    /// default and warns; good values still apply.
    #[must_use]
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        // Lenient mode reports per-key and never fails as a whole.
        let _ = cfg.apply(lookup, false);
        cfg
    }

    /// Strict parse through an injected lookup: the first bad value is an
    /// error.
    pub fn try_from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        cfg.apply(lookup, true)?;
        Ok(cfg)
    }

    fn apply(
        &mut self,
        lookup: &dyn Fn(&str) -> Option<String>,
        strict: bool,
    ) -> Result<(), ConfigError> {
        if let Some(v) = get_f64(lookup, "VISUAL_FRAME_RATIO", strict)? {
            self.visual.width_ratio = v;
        }
        if let Some(v) = get_f64(lookup, "VISUAL_FRAME_MIN_PX", strict)? {
            self.visual.min_width_px = v;
        }
        if let Some(v) = get_f64(lookup, "VISUAL_FRAME_PADDING_PX", strict)? {
            self.visual.padding_px = v;
        }
        if let Some(v) = get_center_mode(lookup, strict)? {
            self.visual.center = v;
        }
        if let Some(v) = get_f64(lookup, "VISUAL_FRAME_OFFSET_PX", strict)? {
            self.visual.offset_px = v;
        }
        if let Some(v) = get_f64(lookup, "VISUAL_FRAME_OFFSET_RATIO", strict)? {
            self.visual.offset_ratio = v;
        }
        if let Some(v) = get_touch_map(lookup, strict)? {
            self.touch_map = v;
        }
        if let Some(v) = get_f64(lookup, "BUBBLE_HEAD_RATIO", strict)? {
            self.head_ratio_override = Some(v);
        }
        if let Some(v) = get_flag(lookup, "BUBBLE_SYMMETRIC", strict)? {
            self.bubble.symmetric = v;
        }
        Ok(())
    }
}

fn raw(lookup: &dyn Fn(&str) -> Option<String>, key: &'static str) -> Option<String> {
    lookup(&format!("{ENV_PREFIX}{key}"))
}

fn get_f64(
    lookup: &dyn Fn(&str) -> Option<String>,
    key: &'static str,
    strict: bool,
) -> Result<Option<f64>, ConfigError> {
    let Some(value) = raw(lookup, key) else {
        return Ok(None);
    };
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => lenient_or(
            strict,
            ConfigError::InvalidNumber {
                key,
                value: value.clone(),
            },
        ),
    }
}

fn get_flag(
    lookup: &dyn Fn(&str) -> Option<String>,
    key: &'static str,
    strict: bool,
) -> Result<Option<bool>, ConfigError> {
    let Some(value) = raw(lookup, key) else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" | "" => Ok(Some(false)),
        _ => lenient_or(
            strict,
            ConfigError::InvalidFlag {
                key,
                value: value.clone(),
            },
        ),
    }
}

fn get_center_mode(
    lookup: &dyn Fn(&str) -> Option<String>,
    strict: bool,
) -> Result<Option<CenterMode>, ConfigError> {
    let Some(value) = raw(lookup, "VISUAL_FRAME_CENTER") else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "bounds" => Ok(Some(CenterMode::Bounds)),
        "face" => Ok(Some(CenterMode::Face)),
        _ => lenient_or(strict, ConfigError::InvalidCenterMode(value.clone())),
    }
}

fn get_touch_map(
    lookup: &dyn Fn(&str) -> Option<String>,
    strict: bool,
) -> Result<Option<TouchMap>, ConfigError> {
    let Some(value) = raw(lookup, "TOUCH_MAP") else {
        return Ok(None);
    };
    match TouchMap::parse(&value) {
        Ok(map) => Ok(Some(map)),
        Err(e) => lenient_or(strict, ConfigError::from(e)),
    }
}

fn lenient_or<T>(strict: bool, error: ConfigError) -> Result<Option<T>, ConfigError> {
    if strict {
        Err(error)
    } else {
        tracing::warn!(%error, "ignoring bad config value");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (format!("PERCH_{k}"), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let cfg = EngineConfig::from_lookup(&|_| None);
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.visual.width_ratio, 0.62);
        assert_eq!(cfg.visual.min_width_px, 180.0);
        assert!(!cfg.bubble.symmetric);
    }

    #[test]
    fn recognized_keys_apply() {
        let lookup = lookup_from(&[
            ("VISUAL_FRAME_RATIO", "0.5"),
            ("VISUAL_FRAME_MIN_PX", "200"),
            ("VISUAL_FRAME_PADDING_PX", "4"),
            ("VISUAL_FRAME_CENTER", "face"),
            ("VISUAL_FRAME_OFFSET_PX", "-12"),
            ("VISUAL_FRAME_OFFSET_RATIO", "0.03"),
            ("TOUCH_MAP", "0.12,0.2,0.4,0.6,1"),
            ("BUBBLE_HEAD_RATIO", "0.09"),
            ("BUBBLE_SYMMETRIC", "1"),
        ]);
        let cfg = EngineConfig::try_from_lookup(&lookup).unwrap();
        assert_eq!(cfg.visual.width_ratio, 0.5);
        assert_eq!(cfg.visual.min_width_px, 200.0);
        assert_eq!(cfg.visual.padding_px, 4.0);
        assert_eq!(cfg.visual.center, CenterMode::Face);
        assert_eq!(cfg.visual.offset_px, -12.0);
        assert_eq!(cfg.visual.offset_ratio, 0.03);
        assert_eq!(cfg.touch_map.ratios()[0], 0.12);
        assert_eq!(cfg.head_ratio_override, Some(0.09));
        assert!(cfg.bubble.symmetric);
    }

    #[test]
    fn flag_spellings() {
        for (spelling, expected) in [
            ("1", true),
            ("true", true),
            ("YES", true),
            ("on", true),
            ("0", false),
            ("false", false),
            ("off", false),
        ] {
            let lookup = lookup_from(&[("BUBBLE_SYMMETRIC", spelling)]);
            let cfg = EngineConfig::try_from_lookup(&lookup).unwrap();
            assert_eq!(cfg.bubble.symmetric, expected, "spelling {spelling:?}");
        }
    }

    #[test]
    fn strict_rejects_bad_number() {
        let lookup = lookup_from(&[("VISUAL_FRAME_RATIO", "wide")]);
        assert_eq!(
            EngineConfig::try_from_lookup(&lookup),
            Err(ConfigError::InvalidNumber {
                key: "VISUAL_FRAME_RATIO",
                value: "wide".into()
            })
        );
        let lookup = lookup_from(&[("VISUAL_FRAME_MIN_PX", "inf")]);
        assert!(EngineConfig::try_from_lookup(&lookup).is_err());
    }

    #[test]
    fn strict_rejects_bad_center_mode_and_touch_map() {
        let lookup = lookup_from(&[("VISUAL_FRAME_CENTER", "hips")]);
        assert_eq!(
            EngineConfig::try_from_lookup(&lookup),
            Err(ConfigError::InvalidCenterMode("hips".into()))
        );
        let lookup = lookup_from(&[("TOUCH_MAP", "0.5,0.2,0.6,0.7,1")]);
        assert!(matches!(
            EngineConfig::try_from_lookup(&lookup),
            Err(ConfigError::InvalidTouchMap(_))
        ));
    }

    #[test]
    fn lenient_keeps_defaults_for_bad_values_only() {
        let lookup = lookup_from(&[
            ("VISUAL_FRAME_RATIO", "wide"),
            ("VISUAL_FRAME_MIN_PX", "220"),
        ]);
        let cfg = EngineConfig::from_lookup(&lookup);
        assert_eq!(cfg.visual.width_ratio, 0.62);
        assert_eq!(cfg.visual.min_width_px, 220.0);
    }

    #[test]
    fn errors_render_with_the_prefixed_key() {
        let e = ConfigError::InvalidNumber {
            key: "VISUAL_FRAME_RATIO",
            value: "x".into(),
        };
        assert!(e.to_string().contains("PERCH_VISUAL_FRAME_RATIO"));
    }
}
