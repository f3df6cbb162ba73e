#![forbid(unsafe_code)]

//! Placement: the bubble, drag-handle, and context-zone engines.
//!
//! # Role in Perch
//! `perch-placement` decides where companion UI goes around the
//! character. Each engine is a pure function from one frame's geometry to
//! an output record; the bubble engine additionally drives a
//! [`BubbleSurface`] through its commit-then-measure contract, because
//! wrapped text height is unknowable before layout.
//!
//! # Primary responsibilities
//! - **Bubble**: side scoring with desktop-edge awareness, width
//!   commitment, head anchoring, overlap correction, shrink retries.
//! - **Drag handle**: the always-interactive strip riding the character's
//!   head.
//! - **Context zone**: the right-click region and its desktop-absolute
//!   twin for cursor polling.
//!
//! # How it fits in the system
//! `perch-runtime` assembles the per-frame requests from `perch-geometry`
//! outputs and host queries, calls these engines in order, and applies
//! epsilon suppression to the results. Every engine is idempotent: the
//! coordinator relies on that to skip no-op host writes.

pub mod bubble;
pub mod context_zone;
pub mod drag_handle;
pub mod measure;

pub use bubble::{
    BubbleOutcome, BubblePlacement, BubbleRequest, BubbleTuning, HiddenReason, place,
};
pub use context_zone::{
    ContextZoneConstants, ContextZoneInput, ContextZoneResult, compute_context_zone,
};
pub use drag_handle::{DragHandleInput, DragHandlePosition, compute_drag_handle};
pub use measure::{BubbleSurface, FontMetrics, Measured, TextSurface};
