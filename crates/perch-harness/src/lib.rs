#![forbid(unsafe_code)]

//! Test harness and scripted fixtures for Perch.
//!
//! # Role in Perch
//! Everything time-sensitive in the runtime takes an explicit `Instant`,
//! so scenario tests can replay whole desktop sessions deterministically:
//! a [`ScriptedCharacter`] animates a bounding box, a [`RecordingHost`]
//! journals every outbound host call, and a [`FrameClock`] mints the
//! instants. No sleeps, no renderer, no window system.
//!
//! # Primary responsibilities
//! - **Fixtures**: scripted character motion, a journaling host, and a
//!   fixed-geometry bubble surface.
//! - **Scenario tests**: the `tests/` directory holds the end-to-end
//!   regressions (storm suppression, capture convergence, retry chains)
//!   that need the full stack assembled.

pub mod character;
pub mod clock;
pub mod host;
pub mod surface;

pub use character::{MotionPattern, ScriptConfig, ScriptedCharacter};
pub use clock::{FRAME_STEP, FrameClock};
pub use host::{HostCall, RecordingHost};
pub use surface::FixedSurface;
