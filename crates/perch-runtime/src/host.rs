//! Boundary traits for the two external collaborators.
//!
//! The character runtime and the host window manager are consumed through
//! these seams only. Every host call is best-effort and non-blocking:
//! `None` and `false` results are swallowed at the call site with a
//! fallback, never propagated into the frame loop as errors.

use perch_geometry::{FaceProbe, ModelRect, ViewPoint};
use perch_placement::{BubbleSurface, TextSurface};

/// The character runtime, queried fresh every frame.
pub trait CharacterSource {
    /// Whether a model is loaded and animating.
    fn is_ready(&self) -> bool;

    /// Current bounding box, renderer-internal coordinates.
    fn bounds(&self) -> Option<ModelRect>;

    /// Renderer viewport rectangle, same space as the bounds.
    fn screen(&self) -> Option<ModelRect>;

    /// Whether the given model-space point hits the named part.
    fn hit_test(&self, part: &str, x: f64, y: f64) -> bool;

    /// Current render scale. Sizing math clamps this to its own band.
    fn scale(&self) -> f64 {
        1.0
    }
}

/// Adapter exposing a [`CharacterSource`] as the geometry layer's face
/// probe.
pub struct CharacterFace<'a, C: CharacterSource + ?Sized>(pub &'a C);

impl<C: CharacterSource + ?Sized> FaceProbe for CharacterFace<'_, C> {
    fn hit_test(&self, part: &str, x: f64, y: f64) -> bool {
        self.0.hit_test(part, x, y)
    }
}

/// The host window manager. All methods are fire-and-forget or
/// immediate-best-effort; implementations must never block the frame
/// tick.
pub trait WindowHost {
    /// Ask the host to resize the window. Best-effort; the coordinator
    /// throttles these.
    fn request_resize(&mut self, width: f64, height: f64);

    /// Current desktop cursor position, if the host can answer.
    fn cursor_screen_point(&mut self) -> Option<ViewPoint>;

    /// Current window bounds in desktop coordinates.
    fn window_bounds(&mut self) -> Option<ModelRect>;

    /// Toggle mouse passthrough. Returns whether the host acknowledged.
    fn set_mouse_passthrough(&mut self, enabled: bool) -> bool;

    /// The usable desktop area of the screen the window sits on.
    fn screen_work_area(&mut self) -> Option<ModelRect>;
}

/// A bubble surface whose content the coordinator manages.
///
/// The placement engine only needs commit-then-measure; the coordinator
/// additionally writes the speech text into the surface when a bubble is
/// showing.
pub trait SpeechSurface: BubbleSurface {
    /// Replace the surface content.
    fn set_text(&mut self, text: &str);
}

impl SpeechSurface for TextSurface {
    fn set_text(&mut self, text: &str) {
        TextSurface::set_text(self, text);
    }
}

/// Desktop pixels between the window and the work-area edge, per side.
/// Negative values mean the window juts past that edge.
#[must_use]
pub fn desktop_free_space(window: ModelRect, work_area: ModelRect) -> (f64, f64) {
    let free_left = window.x - work_area.x;
    let free_right = work_area.right() - window.right();
    (free_left, free_right)
}
