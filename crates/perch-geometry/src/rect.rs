//! Rectangle and point primitives for the two coordinate spaces.
//!
//! Model space belongs to the character renderer; view space is
//! container-local CSS pixels. Distinct types keep the spaces from mixing
//! silently — crossing between them always goes through a [`Projection`].

use serde::{Deserialize, Serialize};

use crate::sanitize::sanitize;

/// Axis-aligned rectangle in the character renderer's internal space.
///
/// The character's bounding box and the renderer viewport both use this
/// shape. Instances are read-only inputs, re-queried every frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ModelRect {
    /// Create a rectangle from origin and size.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal center.
    #[inline]
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    #[inline]
    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Right edge.
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the rectangle cannot be projected: non-finite fields or a
    /// non-positive dimension.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Component-wise closeness, used by the epsilon change gate.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.width - other.width).abs() < epsilon
            && (self.height - other.height).abs() < epsilon
    }
}

/// The DOM bounding rectangle of the hosting element, in desktop pixels.
///
/// Supplied fresh for each computation; window moves and resizes
/// invalidate it, so it is never cached across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    /// Create a container rectangle.
    #[inline]
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A container at the desktop origin, for hosts that only know a size.
    #[inline]
    #[must_use]
    pub const fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// True when the container cannot host any placement.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// A point in pixel space (container-local or desktop-absolute, per call
/// site).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewPoint {
    pub x: f64,
    pub y: f64,
}

impl ViewPoint {
    /// Create a point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle in pixel space (container-local or desktop-absolute, per
/// call site).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewRect {
    /// Create a view rectangle.
    #[inline]
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Point-in-rect test (edges inclusive on the near side).
    #[must_use]
    pub fn contains(&self, point: ViewPoint) -> bool {
        point.x >= self.left
            && point.x < self.right()
            && point.y >= self.top
            && point.y < self.bottom()
    }

    /// The same rectangle shifted by an offset (container-local →
    /// desktop-absolute translation).
    #[inline]
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }
}

/// Model-space → container-pixel projection for one frame tick.
///
/// Built from the renderer viewport and the container rectangle; refuses
/// to exist for degenerate inputs so downstream math never divides by
/// zero.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    screen: ModelRect,
    container_width: f64,
    container_height: f64,
}

impl Projection {
    /// Build a projection, or `None` when either rectangle is degenerate.
    #[must_use]
    pub fn new(screen: ModelRect, container: ContainerRect) -> Option<Self> {
        if screen.is_degenerate() || container.is_degenerate() {
            return None;
        }
        Some(Self {
            screen,
            container_width: container.width,
            container_height: container.height,
        })
    }

    /// Project a model-space x coordinate into container pixels.
    #[inline]
    #[must_use]
    pub fn x(&self, model_x: f64) -> f64 {
        sanitize(
            (model_x - self.screen.x) / self.screen.width * self.container_width,
            0.0,
        )
    }

    /// Project a model-space y coordinate into container pixels.
    #[inline]
    #[must_use]
    pub fn y(&self, model_y: f64) -> f64 {
        sanitize(
            (model_y - self.screen.y) / self.screen.height * self.container_height,
            0.0,
        )
    }

    /// Project a model-space horizontal length into container pixels.
    #[inline]
    #[must_use]
    pub fn len_x(&self, model_len: f64) -> f64 {
        sanitize(model_len / self.screen.width * self.container_width, 0.0)
    }

    /// Project a model-space vertical length into container pixels.
    #[inline]
    #[must_use]
    pub fn len_y(&self, model_len: f64) -> f64 {
        sanitize(model_len / self.screen.height * self.container_height, 0.0)
    }

    /// Project a full model rectangle into container pixels.
    #[must_use]
    pub fn rect(&self, rect: ModelRect) -> ViewRect {
        ViewRect::new(
            self.x(rect.x),
            self.y(rect.y),
            self.len_x(rect.width),
            self.len_y(rect.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> ModelRect {
        ModelRect::new(-100.0, -50.0, 200.0, 100.0)
    }

    #[test]
    fn projection_maps_screen_corners_to_container_corners() {
        let proj = Projection::new(screen(), ContainerRect::sized(400.0, 300.0)).unwrap();
        assert_eq!(proj.x(-100.0), 0.0);
        assert_eq!(proj.x(100.0), 400.0);
        assert_eq!(proj.y(-50.0), 0.0);
        assert_eq!(proj.y(50.0), 300.0);
    }

    #[test]
    fn projection_scales_lengths() {
        let proj = Projection::new(screen(), ContainerRect::sized(400.0, 300.0)).unwrap();
        assert_eq!(proj.len_x(100.0), 200.0);
        assert_eq!(proj.len_y(50.0), 150.0);
    }

    #[test]
    fn projection_refuses_degenerate_inputs() {
        assert!(Projection::new(ModelRect::default(), ContainerRect::sized(400.0, 300.0)).is_none());
        assert!(Projection::new(screen(), ContainerRect::sized(0.0, 300.0)).is_none());
        assert!(
            Projection::new(
                ModelRect::new(f64::NAN, 0.0, 10.0, 10.0),
                ContainerRect::sized(10.0, 10.0)
            )
            .is_none()
        );
    }

    #[test]
    fn rect_projection_preserves_shape() {
        let proj = Projection::new(screen(), ContainerRect::sized(400.0, 300.0)).unwrap();
        let view = proj.rect(ModelRect::new(-50.0, 0.0, 100.0, 25.0));
        assert_eq!(view.left, 100.0);
        assert_eq!(view.top, 150.0);
        assert_eq!(view.width, 200.0);
        assert_eq!(view.height, 75.0);
    }

    #[test]
    fn contains_is_half_open() {
        let rect = ViewRect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(ViewPoint::new(10.0, 10.0)));
        assert!(rect.contains(ViewPoint::new(29.9, 29.9)));
        assert!(!rect.contains(ViewPoint::new(30.0, 15.0)));
        assert!(!rect.contains(ViewPoint::new(15.0, 30.0)));
    }

    #[test]
    fn approx_eq_uses_component_epsilon() {
        let a = ModelRect::new(0.0, 0.0, 100.0, 100.0);
        let b = ModelRect::new(0.4, 0.4, 100.4, 99.6);
        assert!(a.approx_eq(&b, 0.5));
        assert!(!a.approx_eq(&b, 0.3));
    }
}
