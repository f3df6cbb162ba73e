//! The Zone Partitioner: left/center/right regions around the character.
//!
//! Each tick the container width splits into three adjacent zones. The
//! center zone comes straight from the supplied edges (raw bounding box or
//! visual frame, per call site); the outer zones extend from the center
//! edges outward by a scale-dependent padding and stop at the screen
//! padding band.
//!
//! Partitioning runs twice per frame: once with raw-bounds edges (width
//! budgets and fit scoring) and once with visual-frame edges (what debug
//! overlays draw). Widths are never negative; a character filling the
//! container collapses the outer zones to zero, and callers must treat
//! anything under the usable floor as "no room" rather than divide by it.

use serde::{Deserialize, Serialize};

use crate::sanitize::sanitize;

/// Scale band used for sizing decisions. Rendering may scale beyond this
/// band; sizing math never does.
pub const SIZING_SCALE_MIN: f64 = 0.8;
pub const SIZING_SCALE_MAX: f64 = 1.4;

/// Clamp a raw scale into the sizing band, defaulting non-finite to 1.0.
#[inline]
#[must_use]
pub fn sizing_scale(raw: f64) -> f64 {
    sanitize(raw, 1.0).clamp(SIZING_SCALE_MIN, SIZING_SCALE_MAX)
}

/// Horizontal side of the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The other side.
    #[inline]
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// One horizontal region in container-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Zone {
    pub left: f64,
    pub right: f64,
    pub width: f64,
}

impl Zone {
    /// Build a zone from edges, collapsing inverted spans to zero width.
    #[must_use]
    pub fn from_edges(left: f64, right: f64) -> Self {
        let left = sanitize(left, 0.0);
        let right = sanitize(right, 0.0).max(left);
        Self {
            left,
            right,
            width: right - left,
        }
    }

    /// Whether the zone clears the usable floor.
    #[inline]
    #[must_use]
    pub fn is_usable(&self, min_px: f64) -> bool {
        self.width >= min_px
    }
}

/// Tunables for zone partitioning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneOptions {
    /// Padding between the center zone and the outer zones at scale 1.0.
    pub base_padding_px: f64,
    /// Margin kept clear at both container edges.
    pub screen_padding_px: f64,
    /// Below this width a zone counts as unusable.
    pub usable_min_px: f64,
}

impl Default for ZoneOptions {
    fn default() -> Self {
        Self {
            base_padding_px: 12.0,
            screen_padding_px: 8.0,
            usable_min_px: 24.0,
        }
    }
}

/// The three-way partition for one center-rect source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneSet {
    pub left: Zone,
    pub center: Zone,
    pub right: Zone,
}

impl ZoneSet {
    /// The outer zone on the given side.
    #[inline]
    #[must_use]
    pub fn outer(&self, side: Side) -> &Zone {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Partition the container around the given center edges.
///
/// `scale` affects only the center-to-outer padding and is clamped to the
/// sizing band; `container_width <= 0` collapses everything to zero.
#[must_use]
pub fn partition(
    center_left: f64,
    center_right: f64,
    container_width: f64,
    scale: f64,
    opts: &ZoneOptions,
) -> ZoneSet {
    let container_width = sanitize(container_width, 0.0).max(0.0);
    let pad = opts.screen_padding_px.max(0.0);
    let band_lo = pad.min(container_width);
    let band_hi = (container_width - pad).max(band_lo);

    let center_left = sanitize(center_left, 0.0).clamp(0.0, container_width);
    let center_right = sanitize(center_right, container_width).clamp(0.0, container_width);
    let center = Zone::from_edges(center_left, center_right);

    let bubble_pad = (opts.base_padding_px * sizing_scale(scale)).max(0.0);

    let left = Zone::from_edges(band_lo, (center.left - bubble_pad).clamp(band_lo, band_hi));
    let right = Zone::from_edges((center.right + bubble_pad).clamp(band_lo, band_hi), band_hi);

    ZoneSet {
        left,
        center,
        right,
    }
}
