//! The Drag-Handle Placement Engine.
//!
//! The handle is the one region of the window that always captures the
//! mouse, so it must track the character's head as the model scales and
//! roams, and it must never leave the visible container. Width follows
//! the character's share of its screen; position follows the projected
//! head with fixed offsets; everything clamps last.

use serde::{Deserialize, Serialize};

use perch_geometry::{ModelRect, clamp01, clamp_span, sanitize};

/// Handle width as a share of the character's projected width.
const WIDTH_SHARE: f64 = 0.65;

/// Width clamp band, in canvas pixels.
const WIDTH_MIN_PX: f64 = 140.0;
const WIDTH_EDGE_RESERVE_PX: f64 = 48.0;

/// Horizontal band the handle's left edge must stay inside.
const LEFT_MARGIN_PX: f64 = 10.0;

/// Vertical band: below the top strut, above the bottom reserve.
const TOP_MIN_PX: f64 = 9.0;
const BOTTOM_RESERVE_PX: f64 = 64.0;

/// Inputs for one handle placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragHandleInput {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Character bounding box, model coordinates.
    pub bounds: ModelRect,
    /// Model-space screen the bounds live on.
    pub screen: ModelRect,
    /// Pixel nudge applied to the projected center X.
    pub offset_x: f64,
    /// Pixel nudge applied to the projected top Y.
    pub offset_y: f64,
}

impl DragHandleInput {
    /// Build an input with the stock offsets.
    #[must_use]
    pub fn new(canvas_width: f64, canvas_height: f64, bounds: ModelRect, screen: ModelRect) -> Self {
        Self {
            canvas_width,
            canvas_height,
            bounds,
            screen,
            offset_x: -48.0,
            offset_y: -96.0,
        }
    }

    #[must_use]
    pub fn offset_x(mut self, px: f64) -> Self {
        self.offset_x = px;
        self
    }

    #[must_use]
    pub fn offset_y(mut self, px: f64) -> Self {
        self.offset_y = px;
        self
    }
}

/// Where the handle goes, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragHandlePosition {
    pub left: f64,
    pub top: f64,
    pub width: f64,
}

/// Compute the handle position, or `None` for a non-positive canvas.
///
/// Total over every other input: degenerate screens fall back through
/// the ratio helpers instead of producing NaN.
#[must_use]
pub fn compute_drag_handle(input: &DragHandleInput) -> Option<DragHandlePosition> {
    let canvas_w = sanitize(input.canvas_width, 0.0);
    let canvas_h = sanitize(input.canvas_height, 0.0);
    if canvas_w <= 0.0 || canvas_h <= 0.0 {
        return None;
    }

    let width_ratio = sanitize(input.bounds.width / input.screen.width, 1.0).clamp(0.05, 1.0);
    let width = clamp_span(
        (canvas_w * width_ratio * WIDTH_SHARE).floor(),
        WIDTH_MIN_PX,
        canvas_w - WIDTH_EDGE_RESERVE_PX,
    );

    let center_x =
        clamp01((input.bounds.center_x() - input.screen.x) / input.screen.width) * canvas_w;
    let top_y = clamp01((input.bounds.y - input.screen.y) / input.screen.height) * canvas_h;

    let left = clamp_span(
        center_x + sanitize(input.offset_x, 0.0),
        LEFT_MARGIN_PX,
        canvas_w - width - LEFT_MARGIN_PX,
    );
    let top = clamp_span(
        top_y + sanitize(input.offset_y, 0.0),
        TOP_MIN_PX,
        canvas_h - BOTTOM_RESERVE_PX,
    );

    Some(DragHandlePosition { left, top, width })
}
