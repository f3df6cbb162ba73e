//! Cursor polling cadence while the window ignores mouse input.
//!
//! In passthrough mode the window receives no native pointer events, so
//! the coordinator polls the host for the desktop cursor position instead.
//! The poller is a cadence gate, not a loop: the frame tick asks
//! [`CursorPoller::due_at`] and performs the query itself. Disarming takes
//! effect immediately — a disarmed poller never reports due, so there is
//! no polling loop left to leak when passthrough turns off.

use std::time::{Duration, Instant};

/// Default polling interval.
pub const POLL_INTERVAL: Duration = Duration::from_millis(120);

/// Cadence gate for cursor polling.
#[derive(Debug, Clone)]
pub struct CursorPoller {
    interval: Duration,
    armed: bool,
    last: Option<Instant>,
}

impl CursorPoller {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            armed: false,
            last: None,
        }
    }

    /// Start polling. The first `due_at` after arming fires immediately.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Stop polling now. Clears the cadence so a later re-arm starts
    /// fresh.
    pub fn disarm(&mut self) {
        self.armed = false;
        self.last = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether a poll is due. `true` consumes the slot and restarts the
    /// interval; a disarmed poller is never due.
    pub fn due_at(&mut self, now: Instant) -> bool {
        if !self.armed {
            return false;
        }
        let due = match self.last {
            None => true,
            Some(last) => now.duration_since(last) >= self.interval,
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}

impl Default for CursorPoller {
    fn default() -> Self {
        Self::new(POLL_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn disarmed_poller_is_never_due() {
        let now = Instant::now();
        let mut p = CursorPoller::default();
        assert!(!p.due_at(now));
        assert!(!p.due_at(now + ms(10_000)));
    }

    #[test]
    fn armed_poller_fires_immediately_then_on_cadence() {
        let now = Instant::now();
        let mut p = CursorPoller::default();
        p.arm();
        assert!(p.due_at(now));
        assert!(!p.due_at(now + ms(60)));
        assert!(p.due_at(now + ms(120)));
    }

    #[test]
    fn disarm_takes_effect_instantly() {
        let now = Instant::now();
        let mut p = CursorPoller::default();
        p.arm();
        assert!(p.due_at(now));
        p.disarm();
        assert!(!p.due_at(now + ms(500)));
        assert!(!p.is_armed());
    }

    #[test]
    fn rearming_starts_a_fresh_cadence() {
        let now = Instant::now();
        let mut p = CursorPoller::default();
        p.arm();
        assert!(p.due_at(now));
        p.disarm();
        p.arm();
        // No stale `last` from before the disarm.
        assert!(p.due_at(now + ms(1)));
    }
}
