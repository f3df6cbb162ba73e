//! Deterministic frame clock.
//!
//! Every time-sensitive API in the runtime takes an explicit `Instant`,
//! so tests never sleep: they mint instants from a fixed base at a fixed
//! step and drive the coordinator as fast as the CPU allows.

use std::time::{Duration, Instant};

/// Default step between frames, roughly 60fps.
pub const FRAME_STEP: Duration = Duration::from_millis(16);

/// Monotonic instant generator for scripted runs.
#[derive(Debug, Clone)]
pub struct FrameClock {
    base: Instant,
    step: Duration,
    frame: u64,
}

impl FrameClock {
    #[must_use]
    pub fn new(step: Duration) -> Self {
        Self {
            base: Instant::now(),
            step,
            frame: 0,
        }
    }

    /// The instant of an arbitrary frame, without advancing.
    #[must_use]
    pub fn at(&self, frame: u64) -> Instant {
        self.base + self.step * u32::try_from(frame).unwrap_or(u32::MAX)
    }

    /// The current frame's instant; `tick` moves to the next.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.at(self.frame)
    }

    /// Advance one frame and return the new current instant.
    pub fn tick(&mut self) -> Instant {
        self.frame += 1;
        self.now()
    }

    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Jump forward by a wall-clock amount, rounded up to whole frames.
    pub fn skip(&mut self, span: Duration) -> Instant {
        let step_ms = self.step.as_millis().max(1);
        let frames = span.as_millis().div_ceil(step_ms);
        self.frame += u64::try_from(frames).unwrap_or(u64::MAX);
        self.now()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(FRAME_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_evenly_spaced() {
        let mut clock = FrameClock::default();
        let a = clock.now();
        let b = clock.tick();
        let c = clock.tick();
        assert_eq!(b.duration_since(a), FRAME_STEP);
        assert_eq!(c.duration_since(a), FRAME_STEP * 2);
    }

    #[test]
    fn skip_rounds_up_to_whole_frames() {
        let mut clock = FrameClock::default();
        let a = clock.now();
        let b = clock.skip(Duration::from_millis(100));
        // 100ms at 16ms steps lands on frame 7 = 112ms.
        assert_eq!(b.duration_since(a), Duration::from_millis(112));
        assert_eq!(clock.frame(), 7);
    }
}
