//! Vertical body-band ratios for the character model.
//!
//! The touch map carries five ascending breakpoints in `[0, 1]`, measured
//! from the top of the bounding box: head, face, torso, skirt, leg. The
//! bubble engine derives its head anchor from the first breakpoint; hit
//! classification maps a vertical ratio to a [`BodyRegion`].
//!
//! # Invariants
//!
//! 1. Breakpoints are finite, ascending, and within `[0, 1]`.
//! 2. `head_anchor_ratio` is always in `(0, 1]`, override or not.
//! 3. `region_at` is total: every finite ratio maps to a region.

use serde::{Deserialize, Serialize};

/// Number of breakpoints in a touch map.
pub const TOUCH_MAP_LEN: usize = 5;

/// Factor applied to the first breakpoint to derive the head anchor: the
/// anchor sits just above where the head band ends.
const HEAD_ANCHOR_FACTOR: f64 = 0.85;

/// Body region classified by a vertical ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyRegion {
    Head,
    Face,
    Torso,
    Skirt,
    Leg,
}

/// Errors from strict touch-map construction/parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum TouchMapError {
    /// Wrong number of comma-separated entries.
    WrongLength(usize),
    /// An entry failed to parse as a float.
    NotANumber(String),
    /// Entries are out of `[0, 1]` or not ascending.
    NotAscending,
}

impl std::fmt::Display for TouchMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongLength(n) => write!(f, "expected {TOUCH_MAP_LEN} ratios, got {n}"),
            Self::NotANumber(s) => write!(f, "not a number: {s}"),
            Self::NotAscending => write!(f, "ratios must ascend within [0, 1]"),
        }
    }
}

impl std::error::Error for TouchMapError {}

/// Five ascending body-band breakpoints in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchMap([f64; TOUCH_MAP_LEN]);

impl Default for TouchMap {
    fn default() -> Self {
        Self([0.1, 0.19, 0.39, 0.53, 1.0])
    }
}

impl TouchMap {
    /// Build a touch map, validating the breakpoint ordering.
    pub fn new(ratios: [f64; TOUCH_MAP_LEN]) -> Result<Self, TouchMapError> {
        let mut prev = 0.0;
        for &r in &ratios {
            if !r.is_finite() || r < prev || r > 1.0 {
                return Err(TouchMapError::NotAscending);
            }
            prev = r;
        }
        Ok(Self(ratios))
    }

    /// Parse a comma-separated ratio list, e.g. `"0.1,0.19,0.39,0.53,1"`.
    pub fn parse(input: &str) -> Result<Self, TouchMapError> {
        let parts: Vec<&str> = input.split(',').map(str::trim).collect();
        if parts.len() != TOUCH_MAP_LEN {
            return Err(TouchMapError::WrongLength(parts.len()));
        }
        let mut ratios = [0.0; TOUCH_MAP_LEN];
        for (slot, part) in ratios.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f64>()
                .map_err(|_| TouchMapError::NotANumber((*part).to_string()))?;
        }
        Self::new(ratios)
    }

    /// The raw breakpoints.
    #[inline]
    #[must_use]
    pub fn ratios(&self) -> &[f64; TOUCH_MAP_LEN] {
        &self.0
    }

    /// Head-anchor ratio: an explicit override when configured and valid,
    /// otherwise the first breakpoint shrunk by the anchor factor.
    #[must_use]
    pub fn head_anchor_ratio(&self, override_ratio: Option<f64>) -> f64 {
        match override_ratio {
            Some(r) if r.is_finite() && r > 0.0 && r <= 1.0 => r,
            _ => self.0[0] * HEAD_ANCHOR_FACTOR,
        }
    }

    /// Head-anchor y in container pixels for a projected model box.
    #[must_use]
    pub fn head_anchor_y(&self, model_top: f64, model_height: f64, override_ratio: Option<f64>) -> f64 {
        model_top + model_height * self.head_anchor_ratio(override_ratio)
    }

    /// Classify a vertical ratio (0 = top of box) into a body region.
    #[must_use]
    pub fn region_at(&self, ratio: f64) -> BodyRegion {
        let r = crate::sanitize::clamp01(ratio);
        if r < self.0[0] {
            BodyRegion::Head
        } else if r < self.0[1] {
            BodyRegion::Face
        } else if r < self.0[2] {
            BodyRegion::Torso
        } else if r < self.0[3] {
            BodyRegion::Skirt
        } else {
            BodyRegion::Leg
        }
    }
}
