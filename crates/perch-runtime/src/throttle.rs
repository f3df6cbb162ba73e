//! Update and resize throttles plus the epsilon change gate.
//!
//! The character's bounding box jitters sub-pixel amounts on every
//! animation frame (breathing, eye tracking). Left unthrottled, that
//! jitter becomes a storm of recomputations and outward window-resize
//! requests. Three gates keep the frame loop calm:
//!
//! - [`UpdateThrottle`]: positional recomputation at most once per
//!   interval, with a `force` escape hatch for settle and resize events.
//! - [`ResizeThrottle`]: outward resize requests only when enough time
//!   passed **and** the requested size moved by a real amount.
//! - [`EpsilonGate`]: per-signal last-value cache that suppresses ticks
//!   where nothing moved past the epsilon.
//!
//! Every decision method takes an explicit `now` so tests drive time
//! deterministically.

use std::time::{Duration, Instant};

use perch_geometry::ModelRect;
use perch_geometry::sanitize;

/// Minimum interval between positional recomputations.
pub const UPDATE_INTERVAL: Duration = Duration::from_millis(32);

/// Minimum interval between outward resize requests.
pub const RESIZE_INTERVAL: Duration = Duration::from_millis(120);

/// Minimum size change, in pixels, worth a resize request.
pub const RESIZE_MIN_DELTA_PX: f64 = 2.0;

/// Default movement epsilon for the change gate.
pub const EPSILON_PX: f64 = 0.5;

/// Time-based gate for positional recomputation.
#[derive(Debug, Clone)]
pub struct UpdateThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl UpdateThrottle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Whether an update may run now. A permitted update (forced or not)
    /// consumes the slot and restarts the interval.
    pub fn allow_at(&mut self, now: Instant, force: bool) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => now.duration_since(last) >= self.interval,
        };
        if force || due {
            self.last = Some(now);
            return true;
        }
        false
    }

    /// Forget the last update, so the next `allow_at` passes.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for UpdateThrottle {
    fn default() -> Self {
        Self::new(UPDATE_INTERVAL)
    }
}

/// The last resize actually sent to the host.
#[derive(Debug, Clone, Copy)]
struct SentResize {
    at: Instant,
    width: f64,
    height: f64,
}

/// Gate for outward window-resize requests.
///
/// A request passes only when the interval elapsed since the last *sent*
/// request and the size differs from the last sent size by at least the
/// delta floor. A settled size is never lost: a suppressed request is
/// simply re-evaluated on a later tick against the same rule.
#[derive(Debug, Clone)]
pub struct ResizeThrottle {
    interval: Duration,
    min_delta_px: f64,
    sent: Option<SentResize>,
}

impl ResizeThrottle {
    #[must_use]
    pub fn new(interval: Duration, min_delta_px: f64) -> Self {
        Self {
            interval,
            min_delta_px,
            sent: None,
        }
    }

    /// Whether to send a resize for the given size now. `true` records the
    /// request as sent; the caller must then actually issue it.
    pub fn request_at(&mut self, now: Instant, width: f64, height: f64) -> bool {
        let width = sanitize(width, 0.0);
        let height = sanitize(height, 0.0);
        if width <= 0.0 || height <= 0.0 {
            return false;
        }
        if let Some(sent) = self.sent {
            let elapsed = now.duration_since(sent.at) >= self.interval;
            let delta = (width - sent.width).abs().max((height - sent.height).abs());
            if !elapsed || delta < self.min_delta_px {
                return false;
            }
        }
        self.sent = Some(SentResize { at: now, width, height });
        true
    }

    /// The last size actually sent, if any.
    #[must_use]
    pub fn last_sent(&self) -> Option<(f64, f64)> {
        self.sent.map(|s| (s.width, s.height))
    }

    pub fn reset(&mut self) {
        self.sent = None;
    }
}

impl Default for ResizeThrottle {
    fn default() -> Self {
        Self::new(RESIZE_INTERVAL, RESIZE_MIN_DELTA_PX)
    }
}

/// Last observed values of the signals that drive recomputation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct GateInputs {
    bounds: ModelRect,
    window: Option<ModelRect>,
    container: (f64, f64),
}

/// Epsilon-based change suppression across ticks.
///
/// Not business state: purely a memo of the previous tick's inputs, reset
/// on teardown and never persisted.
#[derive(Debug, Clone, Default)]
pub struct EpsilonGate {
    last: Option<GateInputs>,
}

impl EpsilonGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current inputs and report whether any of them moved at
    /// least `epsilon` since the previous observation. The first
    /// observation always counts as changed.
    pub fn observe(
        &mut self,
        bounds: ModelRect,
        window: Option<ModelRect>,
        container: (f64, f64),
        epsilon: f64,
    ) -> bool {
        let current = GateInputs {
            bounds,
            window,
            container,
        };
        let changed = match &self.last {
            None => true,
            Some(prev) => {
                !prev.bounds.approx_eq(&bounds, epsilon)
                    || !window_approx_eq(prev.window, window, epsilon)
                    || (prev.container.0 - container.0).abs() >= epsilon
                    || (prev.container.1 - container.1).abs() >= epsilon
            }
        };
        if changed {
            self.last = Some(current);
        }
        changed
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

fn window_approx_eq(a: Option<ModelRect>, b: Option<ModelRect>, epsilon: f64) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.approx_eq(&b, epsilon),
        _ => false,
    }
}
