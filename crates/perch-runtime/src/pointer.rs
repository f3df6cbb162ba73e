//! Pointer activity tracking and the mouse-capture decision.
//!
//! The window spends most of its life in passthrough mode, so "where the
//! pointer is" arrives from two directions: DOM-style enter/leave and
//! down/up events from the embedder while captured, and polled cursor
//! positions while passing through. Both feed the same per-zone activity
//! machine (`idle → hovering → active → idle`).
//!
//! The context zone carries a **latch**: after the pointer leaves it, the
//! zone stays active for a grace period so an open right-click menu does
//! not flicker away the instant the cursor drifts off.
//!
//! # Invariants
//!
//! 1. `should_capture` is a pure function of the tracked state and `now`;
//!    callers push it to the host only when the boolean actually changes.
//! 2. A pressed zone stays `active` until release, even if the pointer
//!    leaves mid-drag.
//! 3. `clear` leaves no latch armed.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Default context-zone latch duration.
pub const LATCH: Duration = Duration::from_millis(1400);

/// The logical regions the pointer can interact with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerZone {
    Model,
    Bubble,
    Handle,
    ContextZone,
}

impl PointerZone {
    const COUNT: usize = 4;

    #[inline]
    fn index(self) -> usize {
        match self {
            Self::Model => 0,
            Self::Bubble => 1,
            Self::Handle => 2,
            Self::ContextZone => 3,
        }
    }
}

/// Per-zone activity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    #[default]
    Idle,
    Hovering,
    Active,
}

/// Tracks pointer presence per zone and derives the capture decision.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    activity: [Activity; PointerZone::COUNT],
    inside: [bool; PointerZone::COUNT],
    pressed: [bool; PointerZone::COUNT],
    latch: Duration,
    latch_until: Option<Instant>,
    ignore_mouse: bool,
}

impl PointerTracker {
    #[must_use]
    pub fn new(latch: Duration, ignore_mouse: bool) -> Self {
        Self {
            activity: [Activity::Idle; PointerZone::COUNT],
            inside: [false; PointerZone::COUNT],
            pressed: [false; PointerZone::COUNT],
            latch,
            latch_until: None,
            ignore_mouse,
        }
    }

    /// The user's global "ignore mouse" toggle. While set, hover over the
    /// character, bubble, and handle no longer captures; the latched
    /// context zone still does.
    pub fn set_ignore_mouse(&mut self, ignore: bool) {
        self.ignore_mouse = ignore;
    }

    #[must_use]
    pub fn ignore_mouse(&self) -> bool {
        self.ignore_mouse
    }

    /// Embedder pointer-enter event.
    pub fn pointer_enter(&mut self, zone: PointerZone, now: Instant) {
        self.set_inside(zone, true, now);
    }

    /// Embedder pointer-leave event.
    pub fn pointer_leave(&mut self, zone: PointerZone, now: Instant) {
        self.set_inside(zone, false, now);
    }

    /// Embedder pointer-down event.
    pub fn pointer_down(&mut self, zone: PointerZone) {
        let i = zone.index();
        self.pressed[i] = true;
        self.activity[i] = Activity::Active;
    }

    /// Embedder pointer-up event.
    pub fn pointer_up(&mut self, zone: PointerZone) {
        let i = zone.index();
        self.pressed[i] = false;
        self.activity[i] = if self.inside[i] {
            Activity::Hovering
        } else {
            Activity::Idle
        };
    }

    /// Presence update, from events or from cursor polling. Leaving the
    /// context zone arms the latch.
    pub fn set_inside(&mut self, zone: PointerZone, inside: bool, now: Instant) {
        let i = zone.index();
        let was_inside = self.inside[i];
        self.inside[i] = inside;

        if inside {
            if self.activity[i] == Activity::Idle {
                self.activity[i] = Activity::Hovering;
            }
        } else if !self.pressed[i] {
            self.activity[i] = Activity::Idle;
        }

        if zone == PointerZone::ContextZone && was_inside && !inside {
            self.latch_until = Some(now + self.latch);
        }
        if zone == PointerZone::ContextZone && inside {
            self.latch_until = None;
        }
    }

    #[must_use]
    pub fn activity(&self, zone: PointerZone) -> Activity {
        self.activity[zone.index()]
    }

    #[must_use]
    pub fn is_inside(&self, zone: PointerZone) -> bool {
        self.inside[zone.index()]
    }

    /// Whether the context zone currently holds capture: pointer inside it
    /// or the leave latch still running.
    #[must_use]
    pub fn context_latched(&self, now: Instant) -> bool {
        self.inside[PointerZone::ContextZone.index()]
            || self.latch_until.is_some_and(|until| now < until)
    }

    /// The capture decision: `true` means the window must receive mouse
    /// input (passthrough off).
    #[must_use]
    pub fn should_capture(&self, now: Instant) -> bool {
        if self.context_latched(now) {
            return true;
        }
        if self.ignore_mouse {
            return false;
        }
        self.inside[PointerZone::Model.index()]
            || self.inside[PointerZone::Bubble.index()]
            || self.inside[PointerZone::Handle.index()]
    }

    /// Drop all tracked state and disarm the latch.
    pub fn clear(&mut self) {
        self.activity = [Activity::Idle; PointerZone::COUNT];
        self.inside = [false; PointerZone::COUNT];
        self.pressed = [false; PointerZone::COUNT];
        self.latch_until = None;
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(LATCH, false)
    }
}
