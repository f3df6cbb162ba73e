#![forbid(unsafe_code)]

//! Runtime: frame-update coordination and host convergence.
//!
//! # Role in Perch
//! `perch-runtime` owns everything that lives *across* ticks. The
//! geometry and placement crates are pure per-frame functions; this crate
//! wraps them in the [`Coordinator`], which throttles recomputation,
//! suppresses no-op output, tracks the pointer, and converges the host
//! window's mouse-passthrough flag onto the capture decision.
//!
//! # Primary responsibilities
//! - **Throttling**: update/resize throttles and the epsilon change gate.
//! - **Pointer**: per-zone activity, the context-zone latch, and the
//!   capture decision.
//! - **Cursor polling**: cadence-gated desktop-cursor queries while the
//!   window passes mouse input through.
//! - **Configuration**: environment-derived [`EngineConfig`] with lenient
//!   and strict parsing modes.
//! - **Boundaries**: the [`CharacterSource`] and [`WindowHost`] traits the
//!   embedder implements.
//!
//! # How it fits in the system
//! The embedder drives [`Coordinator::tick`] from its animation loop and
//! forwards pointer events to it; everything else — engines, throttles,
//! host writes — happens inside. The emitted [`FrameSnapshot`] is plain
//! serializable data, so harness tests and debug overlays consume the
//! same record the presentation layer does.

pub mod config;
pub mod coordinator;
pub mod cursor;
pub mod host;
pub mod pointer;
pub mod throttle;

pub use config::{ConfigError, ENV_PREFIX, EngineConfig};
pub use coordinator::{Coordinator, DebugOptions, FrameSnapshot};
pub use cursor::{CursorPoller, POLL_INTERVAL};
pub use host::{CharacterFace, CharacterSource, SpeechSurface, WindowHost, desktop_free_space};
pub use pointer::{Activity, LATCH, PointerTracker, PointerZone};
pub use throttle::{
    EPSILON_PX, EpsilonGate, RESIZE_INTERVAL, RESIZE_MIN_DELTA_PX, ResizeThrottle,
    UPDATE_INTERVAL, UpdateThrottle,
};
