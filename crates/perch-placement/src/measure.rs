//! The measurement oracle behind bubble sizing.
//!
//! Wrapped text height is unknown until the content is laid out at a
//! concrete width, so the bubble engine works commit-then-measure: it
//! writes a candidate max-width to a [`BubbleSurface`], reads back the
//! rendered box, and only then positions the bubble. The engine never
//! assumes anything about the surface beyond this two-step contract.
//!
//! # Invariants
//!
//! 1. `measure` is deterministic for an identical committed width and
//!    content; the surface holds no other state between calls.
//! 2. Empty content measures `0 × 0` (callers treat this as "hide").

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use perch_geometry::sanitize;

/// A rendered box, in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measured {
    pub width: f64,
    pub height: f64,
}

impl Measured {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };
}

/// Commit-then-measure surface driven by the bubble engine.
pub trait BubbleSurface {
    /// Constrain the surface to the given max width for subsequent layout.
    fn commit_max_width(&mut self, px: f64);

    /// Measure the rendered box under the last committed width.
    fn measure(&self) -> Measured;
}

/// Monospace metrics for [`TextSurface`] layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    /// Pixels per display-width column.
    pub cell_width: f64,
    /// Pixels per wrapped line.
    pub line_height: f64,
    /// Inner padding applied on every edge.
    pub text_pad_px: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            line_height: 20.0,
            text_pad_px: 10.0,
        }
    }
}

/// Reference [`BubbleSurface`] wrapping text greedily at display-width
/// columns. Hosts with a real renderer measure there instead; everything
/// in the engine and the tests runs against this one.
#[derive(Debug, Clone)]
pub struct TextSurface {
    metrics: FontMetrics,
    text: String,
    committed_px: f64,
}

impl TextSurface {
    #[must_use]
    pub fn new(metrics: FontMetrics) -> Self {
        Self {
            metrics,
            text: String::new(),
            committed_px: 0.0,
        }
    }

    /// Replace the surface content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for TextSurface {
    fn default() -> Self {
        Self::new(FontMetrics::default())
    }
}

impl BubbleSurface for TextSurface {
    fn commit_max_width(&mut self, px: f64) {
        self.committed_px = sanitize(px, 0.0).max(0.0);
    }

    fn measure(&self) -> Measured {
        if self.text.is_empty() {
            return Measured::ZERO;
        }
        let pad = self.metrics.text_pad_px.max(0.0);
        let cell = self.metrics.cell_width.max(1.0);
        let budget = (((self.committed_px - 2.0 * pad) / cell).floor() as usize).max(1);

        let lines = wrapped_line_widths(&self.text, budget);
        let max_cols = lines.iter().copied().max().unwrap_or(0);
        Measured {
            width: max_cols as f64 * cell + 2.0 * pad,
            height: lines.len() as f64 * self.metrics.line_height.max(0.0) + 2.0 * pad,
        }
    }
}

/// Greedy word wrap at a column budget. Returns the display width of each
/// produced line; words wider than the budget break at grapheme bounds.
fn wrapped_line_widths(text: &str, budget: usize) -> Vec<usize> {
    let budget = budget.max(1);
    let mut widths = Vec::new();
    for raw_line in text.split('\n') {
        let mut cols = 0usize;
        for word in raw_line.split_word_bounds() {
            let word_cols = word.width();
            if word_cols == 0 {
                continue;
            }
            if cols + word_cols <= budget {
                cols += word_cols;
                continue;
            }
            if word.chars().all(char::is_whitespace) {
                // Break here; the whitespace run is swallowed by the wrap.
                widths.push(cols);
                cols = 0;
                continue;
            }
            if word_cols <= budget {
                widths.push(cols);
                cols = word_cols;
            } else {
                if cols > 0 {
                    widths.push(cols);
                    cols = 0;
                }
                for grapheme in word.graphemes(true) {
                    let grapheme_cols = grapheme.width();
                    if grapheme_cols == 0 {
                        continue;
                    }
                    if cols + grapheme_cols > budget && cols > 0 {
                        widths.push(cols);
                        cols = 0;
                    }
                    cols += grapheme_cols;
                }
            }
        }
        widths.push(cols);
    }
    widths
}
