//! The Coordinate Mapper: character bounds → on-screen visual frame.
//!
//! The visual frame is the character's *perceived* horizontal footprint in
//! container pixels — narrower than the raw bounding box (hair and
//! accessories inflate the box) and optionally nudged sideways for
//! rendering. Two variants are produced per tick:
//!
//! - **base**: ignores the configured offset; feeds availability scoring
//!   so a rendering-only nudge never skews "how much room is left".
//! - **visible**: applies the offset; feeds presentation and overlays.
//!
//! # Invariants
//!
//! 1. `right - left == width` for both variants (left is derived, right is
//!    `left + width`).
//! 2. `width >= min_width_px + 2·padding_px`.
//! 3. The base variant is bit-identical to the zero-offset computation.

use serde::{Deserialize, Serialize};

use crate::rect::{ContainerRect, ModelRect, Projection};
use crate::sanitize::sanitize;

/// Part id sampled when estimating the face extent.
const FACE_PART: &str = "head";

/// Bounds on the face-scan column count.
const FACE_SCAN_MIN_COLUMNS: usize = 24;
const FACE_SCAN_MAX_COLUMNS: usize = 100;

/// Pixels of projected box width per scan column.
const FACE_SCAN_PX_PER_COLUMN: f64 = 10.0;

/// Hit-test capability over the character model, in model coordinates.
///
/// The mapper only samples one horizontal line per frame; implementations
/// should be cheap and side-effect free.
pub trait FaceProbe {
    /// Whether the given model-space point hits the named part.
    fn hit_test(&self, part: &str, x: f64, y: f64) -> bool;
}

/// How the horizontal center of the visual frame is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CenterMode {
    /// Geometric center of the bounding box.
    #[default]
    Bounds,
    /// Scan the face band and average the first/last hit; corrects for
    /// asymmetric hair or accessories skewing the naive center. Falls back
    /// to the geometric center when no column hits.
    Face,
}

/// Tunables for the visual-frame computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualFrameOptions {
    /// Fraction of the projected box width treated as the visual width.
    pub width_ratio: f64,
    /// Floor for the visual width, in container pixels.
    pub min_width_px: f64,
    /// Extra padding added to both sides of the visual width.
    pub padding_px: f64,
    /// Center estimation strategy.
    pub center: CenterMode,
    /// Fixed horizontal offset applied to the visible variant only.
    pub offset_px: f64,
    /// Width-proportional offset applied to the visible variant only.
    pub offset_ratio: f64,
    /// Vertical ratio of the bounding box where the face band is sampled.
    pub face_band_ratio: f64,
}

impl Default for VisualFrameOptions {
    fn default() -> Self {
        Self {
            width_ratio: 0.62,
            min_width_px: 180.0,
            padding_px: 0.0,
            center: CenterMode::Bounds,
            offset_px: 0.0,
            offset_ratio: 0.0,
            face_band_ratio: 0.22,
        }
    }
}

impl VisualFrameOptions {
    /// Set the width fraction.
    #[must_use]
    pub fn width_ratio(mut self, ratio: f64) -> Self {
        self.width_ratio = ratio;
        self
    }

    /// Set the minimum visual width in pixels.
    #[must_use]
    pub fn min_width_px(mut self, px: f64) -> Self {
        self.min_width_px = px;
        self
    }

    /// Set the per-side padding in pixels.
    #[must_use]
    pub fn padding_px(mut self, px: f64) -> Self {
        self.padding_px = px;
        self
    }

    /// Set the center estimation strategy.
    #[must_use]
    pub fn center(mut self, mode: CenterMode) -> Self {
        self.center = mode;
        self
    }

    /// Set the fixed horizontal offset.
    #[must_use]
    pub fn offset_px(mut self, px: f64) -> Self {
        self.offset_px = px;
        self
    }

    /// Set the width-proportional horizontal offset.
    #[must_use]
    pub fn offset_ratio(mut self, ratio: f64) -> Self {
        self.offset_ratio = ratio;
        self
    }
}

/// The character's perceived footprint in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualFrame {
    pub center_x: f64,
    pub left: f64,
    pub right: f64,
    pub width: f64,
}

impl VisualFrame {
    fn at(center_x: f64, width: f64) -> Self {
        let left = center_x - width / 2.0;
        Self {
            center_x,
            left,
            right: left + width,
            width,
        }
    }
}

/// Both visual-frame variants for one frame tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FramePair {
    /// Offset applied; what actually renders.
    pub visible: VisualFrame,
    /// Offset ignored; what availability scoring uses.
    pub base: VisualFrame,
}

/// Compute both visual-frame variants, or `None` when any input is
/// degenerate (not-ready: caller hides dependent UI, nothing errors).
#[must_use]
pub fn compute_frame_pair(
    bounds: ModelRect,
    screen: ModelRect,
    container: ContainerRect,
    opts: &VisualFrameOptions,
    probe: Option<&dyn FaceProbe>,
) -> Option<FramePair> {
    let proj = Projection::new(screen, container)?;
    if bounds.is_degenerate() {
        return None;
    }

    let center_model_x = match (opts.center, probe) {
        (CenterMode::Face, Some(probe)) => {
            face_center_x(bounds, &proj, probe, opts.face_band_ratio)
                .unwrap_or_else(|| bounds.center_x())
        }
        _ => bounds.center_x(),
    };
    let center_x = proj.x(center_model_x);

    let width_view = proj.len_x(bounds.width);
    let width = (sanitize(opts.width_ratio, 0.0).max(0.0) * width_view)
        .max(opts.min_width_px.max(0.0))
        + 2.0 * opts.padding_px.max(0.0);

    let base = VisualFrame::at(center_x, width);
    let offset = sanitize(opts.offset_px + width * opts.offset_ratio, 0.0);
    let visible = VisualFrame::at(center_x + offset, width);

    Some(FramePair { visible, base })
}

/// Estimate the face's horizontal center by scanning one band of sample
/// columns across the box. Returns model-space x, or `None` when nothing
/// hit.
fn face_center_x(
    bounds: ModelRect,
    proj: &Projection,
    probe: &dyn FaceProbe,
    band_ratio: f64,
) -> Option<f64> {
    let columns = ((proj.len_x(bounds.width) / FACE_SCAN_PX_PER_COLUMN).round() as usize)
        .clamp(FACE_SCAN_MIN_COLUMNS, FACE_SCAN_MAX_COLUMNS);
    let y = bounds.y + bounds.height * crate::sanitize::clamp01(band_ratio);

    let mut first_hit = None;
    let mut last_hit = None;
    for column in 0..columns {
        let x = bounds.x + bounds.width * (column as f64 + 0.5) / columns as f64;
        if probe.hit_test(FACE_PART, x, y) {
            if first_hit.is_none() {
                first_hit = Some(x);
            }
            last_hit = Some(x);
        }
    }
    match (first_hit, last_hit) {
        (Some(first), Some(last)) => Some((first + last) / 2.0),
        _ => None,
    }
}
