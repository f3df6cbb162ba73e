#![forbid(unsafe_code)]

//! Geometry: coordinate mapping, touch bands, and zone partitioning.
//!
//! # Role in Perch
//! `perch-geometry` is the pure math layer. It converts the character
//! runtime's internal coordinates into container-local pixels and carves
//! the container into the regions the placement engines bid on.
//!
//! # Primary responsibilities
//! - **Projection**: model-space → container-pixel mapping for one tick.
//! - **VisualFrame**: the character's perceived on-screen footprint, in a
//!   base (unoffset) and a visible (offset) variant.
//! - **Zones**: left/center/right partition of the container width.
//! - **TouchMap**: vertical body-band ratios (head anchor derivation).
//!
//! # How it fits in the system
//! The runtime (`perch-runtime`) queries the character and the host window
//! each frame and feeds the raw rectangles through this crate; the
//! placement engines (`perch-placement`) consume the resulting frames and
//! zones. Nothing here touches a clock, a window, or global state — every
//! function is a pure mapping from inputs to a small output record.

pub mod rect;
pub mod sanitize;
pub mod touch_map;
pub mod visual_frame;
pub mod zones;

pub use rect::{ContainerRect, ModelRect, Projection, ViewPoint, ViewRect};
pub use sanitize::{clamp01, clamp_span, ratio_or_half, sanitize};
pub use touch_map::{BodyRegion, TouchMap, TouchMapError};
pub use visual_frame::{
    CenterMode, FaceProbe, FramePair, VisualFrame, VisualFrameOptions, compute_frame_pair,
};
pub use zones::{
    SIZING_SCALE_MAX, SIZING_SCALE_MIN, Side, Zone, ZoneOptions, ZoneSet, partition, sizing_scale,
};
