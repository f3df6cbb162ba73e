//! The Bubble Placement Engine: which side, how wide, and where.
//!
//! Each placement call scores the left and right zones, commits a
//! candidate width to the measurement surface, reads back the rendered
//! box, and derives the final anchored rectangle plus the tail-tip
//! coordinate. Scoring weighs in-container clipping against the distance
//! to the physical monitor edge, so a bubble near the desktop border
//! flips sides before it can render off-screen.
//!
//! # Invariants
//!
//! 1. Idempotent: identical request and surface content yield bit-identical
//!    outcomes.
//! 2. Containment: a placed `x` stays within the padded container band
//!    whenever the container can hold the bubble at all; narrower
//!    containers pin to the left padding edge.
//! 3. A severe head collision commits a narrower width before returning,
//!    and schedules at most one follow-up per call, bounded by the retry
//!    cap and the width floor.
//!
//! # Failure Modes
//!
//! Degenerate containers, empty content, and two unusable zones all
//! produce [`BubbleOutcome::Hidden`]; the engine never errors.

use serde::{Deserialize, Serialize};

use perch_geometry::{Side, ZoneSet, clamp_span, sanitize, sizing_scale};

use crate::measure::BubbleSurface;

/// Zone width below which a side cannot host a bubble.
const USABLE_MIN_PX: f64 = 24.0;

/// Score term that disqualifies an unusable side short of a hard hide.
const UNUSABLE_PENALTY: f64 = 1e6;

/// Weight on missing desktop clearance relative to in-container clipping.
const DESKTOP_CLEARANCE_WEIGHT: f64 = 2.5;

/// Bonus subtracted from sides that fit without clipping.
const ZERO_CLIP_BONUS: f64 = 1.0;

/// Tail-tip inset from the bubble's local top and bottom edges.
const TAIL_INSET_PX: f64 = 8.0;

/// Tunables for bubble sizing and anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubbleTuning {
    /// Target width at scale 1.0, before zone fitting.
    pub base_width_px: f64,
    /// Hard floor for the committed width.
    pub min_width_px: f64,
    /// Hard ceiling for the committed width.
    pub max_width_px: f64,
    /// Padding kept clear at the container edges.
    pub container_padding_px: f64,
    /// Gap between the bubble and the character's zone edge.
    pub zone_gap_px: f64,
    /// Gap between the bubble's bottom edge and the head anchor.
    pub head_gap_px: f64,
    /// Clearance enforced above the head top during overlap correction.
    pub head_safe_gap_px: f64,
    /// Desktop clearance below which a side starts accruing edge cost.
    pub edge_safe_margin_px: f64,
    /// Desktop clearance below which the opposite side is forced.
    pub edge_force_px: f64,
    /// Width multiplier applied per shrink retry.
    pub shrink_factor: f64,
    /// Shrink retries allowed before the bubble stays as placed.
    pub max_shrink_retries: u8,
    /// Commit the narrower of both sides' widths for visual consistency.
    pub symmetric: bool,
}

impl Default for BubbleTuning {
    fn default() -> Self {
        Self {
            base_width_px: 260.0,
            min_width_px: 120.0,
            max_width_px: 420.0,
            container_padding_px: 8.0,
            zone_gap_px: 12.0,
            head_gap_px: 10.0,
            head_safe_gap_px: 16.0,
            edge_safe_margin_px: 48.0,
            edge_force_px: 14.0,
            shrink_factor: 0.85,
            max_shrink_retries: 3,
            symmetric: false,
        }
    }
}

/// Everything one placement call needs, captured for a single frame.
///
/// Budgets and scoring run against `zones` (partitioned from the raw
/// bounding box); `zones_visual` carries the drawn silhouette's partition
/// so the bubble also clears what the user actually sees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubbleRequest {
    pub scale: f64,
    pub zones: ZoneSet,
    pub zones_visual: ZoneSet,
    pub container_width: f64,
    pub container_height: f64,
    /// Left edge of the raw center zone.
    pub center_left: f64,
    /// Right edge of the raw center zone.
    pub center_right: f64,
    /// Container Y the tail should point at.
    pub head_anchor_y: f64,
    /// Container Y of the character's estimated head top.
    pub head_top_y: f64,
    /// Desktop pixels between the window and the monitor edge, per side.
    /// `None` means unknown: no penalty, no forcing.
    pub desktop_free_left: Option<f64>,
    pub desktop_free_right: Option<f64>,
    /// Shrink retry ordinal, 0 on the first call for a given content.
    pub retry: u8,
}

/// Why a placement call produced no bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenReason {
    /// Container dimensions are degenerate; host not ready.
    NotReady,
    /// The surface measured an empty box.
    EmptyContent,
    /// Neither zone clears the usability floor.
    NoUsableSide,
}

impl std::fmt::Display for HiddenReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady => write!(f, "host geometry not ready"),
            Self::EmptyContent => write!(f, "empty bubble content"),
            Self::NoUsableSide => write!(f, "no usable side"),
        }
    }
}

/// A placed bubble, in container pixels except where noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubblePlacement {
    pub side: Side,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    /// Tail-tip Y in the bubble's unscaled local space.
    pub tail_y: f64,
    /// The content still collides with the head after correction.
    pub severe_overlap: bool,
    /// Caller should re-place once with `retry + 1` on the next frame.
    pub retry_scheduled: bool,
}

/// Result of one placement call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BubbleOutcome {
    Placed(BubblePlacement),
    Hidden(HiddenReason),
}

impl BubbleOutcome {
    /// The placement, if one was produced.
    #[inline]
    #[must_use]
    pub fn placed(&self) -> Option<&BubblePlacement> {
        match self {
            Self::Placed(placement) => Some(placement),
            Self::Hidden(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden(_))
    }
}

/// Per-side fit assessment feeding the side decision.
#[derive(Debug, Clone, Copy)]
struct SideBudget {
    side: Side,
    usable_px: f64,
    usable: bool,
    desktop_free: f64,
    score: f64,
}

impl SideBudget {
    fn assess(side: Side, zone_width: f64, desired: f64, free: Option<f64>, t: &BubbleTuning) -> Self {
        let usable_px = (zone_width - t.zone_gap_px).max(0.0);
        let usable = usable_px >= USABLE_MIN_PX;
        let clip = (desired - usable_px).max(0.0);
        // Unknown desktop clearance scores as exactly safe.
        let desktop_free = match free {
            Some(v) => sanitize(v, t.edge_safe_margin_px),
            None => t.edge_safe_margin_px,
        };
        let score = clip
            + (t.edge_safe_margin_px - desktop_free).max(0.0) * DESKTOP_CLEARANCE_WEIGHT
            + if usable { 0.0 } else { UNUSABLE_PENALTY }
            - if clip == 0.0 { ZERO_CLIP_BONUS } else { 0.0 };
        Self {
            side,
            usable_px,
            usable,
            desktop_free,
            score,
        }
    }

    /// Width this side would commit on its own.
    fn predicted(&self, desired: f64) -> f64 {
        desired.min(self.usable_px)
    }
}

/// Place the bubble for one frame.
///
/// The surface must already hold the content to show; `place` commits a
/// width, measures, and derives geometry from the measured box.
pub fn place(
    surface: &mut dyn BubbleSurface,
    req: &BubbleRequest,
    t: &BubbleTuning,
) -> BubbleOutcome {
    let container_w = sanitize(req.container_width, 0.0);
    let container_h = sanitize(req.container_height, 0.0);
    if container_w <= 0.0 || container_h <= 0.0 {
        return BubbleOutcome::Hidden(HiddenReason::NotReady);
    }

    let scale = sizing_scale(req.scale);
    let desired = (t.base_width_px * scale).clamp(t.min_width_px, t.max_width_px);

    let left = SideBudget::assess(
        Side::Left,
        req.zones.left.width,
        desired,
        req.desktop_free_left,
        t,
    );
    let right = SideBudget::assess(
        Side::Right,
        req.zones.right.width,
        desired,
        req.desktop_free_right,
        t,
    );
    if !left.usable && !right.usable {
        return BubbleOutcome::Hidden(HiddenReason::NoUsableSide);
    }

    let side = match forced_side(&left, &right, t) {
        Some(side) => side,
        None => pick_side(&left, &right),
    };
    let chosen = if side == Side::Left { &left } else { &right };

    let mut committed = if t.symmetric && left.usable && right.usable {
        left.predicted(desired).min(right.predicted(desired))
    } else {
        chosen.predicted(desired)
    }
    .max(t.min_width_px);
    // Shrink retries narrow the budget progressively across frames.
    committed = (committed * t.shrink_factor.powi(i32::from(req.retry))).max(t.min_width_px);

    surface.commit_max_width(committed);
    let measured = surface.measure();
    if measured.width <= 0.0 || measured.height <= 0.0 {
        return BubbleOutcome::Hidden(HiddenReason::EmptyContent);
    }

    let (x, y, tail_y, severe) = anchor(req, t, scale, side, measured.width, measured.height);
    let mut placement = BubblePlacement {
        side,
        width: measured.width,
        height: measured.height,
        x,
        y,
        tail_y,
        severe_overlap: severe,
        retry_scheduled: false,
    };

    if severe {
        let shrunk = (committed * t.shrink_factor).max(t.min_width_px);
        if shrunk < committed && req.retry < t.max_shrink_retries {
            // Re-wrap at the narrower budget now; the caller re-places on
            // the next frame with the retry ordinal bumped.
            surface.commit_max_width(shrunk);
            let measured = surface.measure();
            if measured.width > 0.0 && measured.height > 0.0 {
                let (x, y, tail_y, _) =
                    anchor(req, t, scale, side, measured.width, measured.height);
                placement = BubblePlacement {
                    side,
                    width: measured.width,
                    height: measured.height,
                    x,
                    y,
                    tail_y,
                    severe_overlap: true,
                    retry_scheduled: true,
                };
            }
        }
    }

    BubbleOutcome::Placed(placement)
}

/// Hard edge override: a side within forcing distance of the monitor edge
/// loses to the other side whenever that other side is usable at all.
fn forced_side(left: &SideBudget, right: &SideBudget, t: &BubbleTuning) -> Option<Side> {
    match (
        left.desktop_free < t.edge_force_px,
        right.desktop_free < t.edge_force_px,
    ) {
        (true, false) if right.usable => Some(Side::Right),
        (false, true) if left.usable => Some(Side::Left),
        _ => None,
    }
}

/// Lower score wins; exact ties prefer desktop clearance, then in-app
/// width, then left.
fn pick_side(left: &SideBudget, right: &SideBudget) -> Side {
    if left.score != right.score {
        return if left.score < right.score {
            left.side
        } else {
            right.side
        };
    }
    if left.desktop_free != right.desktop_free {
        return if left.desktop_free > right.desktop_free {
            left.side
        } else {
            right.side
        };
    }
    if left.usable_px != right.usable_px {
        return if left.usable_px > right.usable_px {
            left.side
        } else {
            right.side
        };
    }
    Side::Left
}

/// Derive the anchored rectangle and tail from a measured box.
fn anchor(
    req: &BubbleRequest,
    t: &BubbleTuning,
    scale: f64,
    side: Side,
    width: f64,
    height: f64,
) -> (f64, f64, f64, bool) {
    let pad = t.container_padding_px;

    // The bubble clears both the raw center zone and the drawn silhouette.
    let x = match side {
        Side::Left => req.center_left.min(req.zones_visual.center.left) - t.zone_gap_px - width,
        Side::Right => req.center_right.max(req.zones_visual.center.right) + t.zone_gap_px,
    };
    let x = clamp_span(x, pad, req.container_width - width - pad);

    let y_band_hi = req.container_height - height - pad;
    let mut y = clamp_span(req.head_anchor_y - t.head_gap_px - height, pad, y_band_hi);

    let head_limit = sanitize(req.head_top_y, f64::MAX) - t.head_safe_gap_px;
    let mut severe = false;
    if y + height > head_limit {
        y = clamp_span(head_limit - height, pad, y_band_hi);
        severe = y + height > head_limit;
    }

    let local_height = height / scale;
    let tail_y = clamp_span(
        (req.head_anchor_y - y) / scale,
        TAIL_INSET_PX,
        local_height - TAIL_INSET_PX,
    );

    (x, y, tail_y, severe)
}
