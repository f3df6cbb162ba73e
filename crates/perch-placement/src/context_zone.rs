//! The Context-Zone Engine: where the right-click menu region lives.
//!
//! The zone is an invisible rectangle beside the character's upper body.
//! While the window is in passthrough mode the host polls the desktop
//! cursor, so the result carries both the container-relative rectangle
//! (for styling) and a desktop-absolute twin (for that asynchronous
//! hit-testing). Alignment prefers whichever side has monitor room: a
//! window shoved against the desktop edge opens its menu inward.

use serde::{Deserialize, Serialize};

use perch_geometry::{Side, ViewPoint, ViewRect, clamp_span, sanitize};

/// Zone width as a share of the container width.
const WIDTH_SHARE: f64 = 0.28;

/// Zone height as a share of the container height.
const HEIGHT_SHARE: f64 = 0.18;

/// Vertical anchor as a share of the character's height.
const ANCHOR_SHARE: f64 = 0.20;

/// Size and margin bounds for the zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextZoneConstants {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
    /// Clearance kept from every container edge.
    pub margin: f64,
    /// Desktop clearance below which the opposite side is preferred.
    pub edge_threshold: f64,
}

impl Default for ContextZoneConstants {
    fn default() -> Self {
        Self {
            min_width: 160.0,
            max_width: 320.0,
            min_height: 96.0,
            max_height: 200.0,
            margin: 12.0,
            edge_threshold: 48.0,
        }
    }
}

/// Inputs for one zone computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextZoneInput {
    pub container_width: f64,
    pub container_height: f64,
    /// Desktop-absolute position of the container's top-left corner.
    pub container_abs: ViewPoint,
    /// Container Y of the character's top edge.
    pub model_top_y: f64,
    /// Character height in container pixels.
    pub model_height: f64,
    /// Desktop pixels between the window and the monitor edge, per side.
    /// Negative values mean the window juts past that edge; `None` values
    /// compare as equal.
    pub desktop_free_left: Option<f64>,
    pub desktop_free_right: Option<f64>,
}

/// A computed zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextZoneResult {
    pub alignment: Side,
    /// Container-relative rectangle.
    pub rect: ViewRect,
    /// The same rectangle in desktop coordinates, for cursor polling.
    pub rect_abs: ViewRect,
}

/// Compute the context zone, or `None` when the container cannot hold
/// the minimum zone plus margins.
#[must_use]
pub fn compute_context_zone(
    input: &ContextZoneInput,
    c: &ContextZoneConstants,
) -> Option<ContextZoneResult> {
    let container_w = sanitize(input.container_width, 0.0);
    let container_h = sanitize(input.container_height, 0.0);
    if container_w < c.min_width + 2.0 * c.margin || container_h < c.min_height + 2.0 * c.margin {
        return None;
    }

    let width = clamp_span(container_w * WIDTH_SHARE, c.min_width, c.max_width);
    let height = clamp_span(container_h * HEIGHT_SHARE, c.min_height, c.max_height);

    let alignment = decide_alignment(input, c);
    let left = match alignment {
        Side::Left => c.margin,
        Side::Right => container_w - c.margin - width,
    };
    let top = clamp_span(
        sanitize(input.model_top_y, 0.0) + ANCHOR_SHARE * sanitize(input.model_height, 0.0),
        c.margin,
        container_h - height - c.margin,
    );

    let rect = ViewRect::new(left, top, width, height);
    let rect_abs = rect.translated(
        sanitize(input.container_abs.x, 0.0),
        sanitize(input.container_abs.y, 0.0),
    );
    Some(ContextZoneResult {
        alignment,
        rect,
        rect_abs,
    })
}

/// Alignment cascade: off-monitor sides lose outright, then tight sides
/// lose below the edge threshold, then more monitor room wins. Ties and
/// unknown clearances fall to the right.
fn decide_alignment(input: &ContextZoneInput, c: &ContextZoneConstants) -> Side {
    let (free_left, free_right) = match (input.desktop_free_left, input.desktop_free_right) {
        (Some(l), Some(r)) if l.is_finite() && r.is_finite() => (l, r),
        _ => return Side::Right,
    };

    if free_right < 0.0 && free_left >= 0.0 {
        return Side::Left;
    }
    if free_left < 0.0 && free_right >= 0.0 {
        return Side::Right;
    }
    if free_right < c.edge_threshold && free_left >= c.edge_threshold {
        return Side::Left;
    }
    if free_left < c.edge_threshold && free_right >= c.edge_threshold {
        return Side::Right;
    }
    if free_left > free_right {
        Side::Left
    } else {
        Side::Right
    }
}
