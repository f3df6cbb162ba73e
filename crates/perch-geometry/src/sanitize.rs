//! Float hygiene for values crossing the host boundary.
//!
//! Host queries, divisions by live dimensions, and scripted inputs can all
//! produce NaN or infinities. Nothing non-finite may reach an output
//! record, so every such value passes through one of these helpers first.

/// Replace a non-finite value with a fallback.
#[inline]
#[must_use]
pub fn sanitize(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Clamp into `[0, 1]`, treating non-finite input as 0.
#[inline]
#[must_use]
pub fn clamp01(value: f64) -> f64 {
    sanitize(value, 0.0).clamp(0.0, 1.0)
}

/// Clamp into `[lo, hi]`, pinning to `lo` when the span is inverted.
///
/// Placement clamps run against bands like `[padding, container - size -
/// padding]`; when the content is bigger than the container the band
/// inverts, and pinning to the low edge is the defined behavior.
#[inline]
#[must_use]
pub fn clamp_span(value: f64, lo: f64, hi: f64) -> f64 {
    sanitize(value, lo).max(lo).min(hi.max(lo))
}

/// Safe ratio with the 0.5 fallback used for degenerate denominators.
///
/// A zero or non-finite denominator means "we know nothing about the
/// proportions", and the midpoint is the least-wrong answer for every
/// centering computation that consumes this.
#[inline]
#[must_use]
pub fn ratio_or_half(numerator: f64, denominator: f64) -> f64 {
    if denominator.is_finite() && denominator.abs() > f64::EPSILON {
        sanitize(numerator / denominator, 0.5)
    } else {
        0.5
    }
}
