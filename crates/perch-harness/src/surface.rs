//! Fixed-geometry bubble surface.
//!
//! Wrapping-aware measurement lives in `perch-placement`'s `TextSurface`;
//! this fixture instead renders exactly as wide as committed at a fixed
//! height per committed-width bucket, so placement tests can pin the
//! measured box without reasoning about word wrap.

use perch_placement::{BubbleSurface, Measured};
use perch_runtime::SpeechSurface;

/// Surface measuring `committed × height`, empty text measuring zero.
#[derive(Debug, Clone)]
pub struct FixedSurface {
    height: f64,
    committed: f64,
    text: String,
}

impl FixedSurface {
    #[must_use]
    pub fn with_height(height: f64) -> Self {
        Self {
            height,
            committed: 0.0,
            text: String::new(),
        }
    }

    /// Change the fixed height mid-scenario (e.g. simulate a font bump).
    pub fn set_height(&mut self, height: f64) {
        self.height = height;
    }

    #[must_use]
    pub fn committed(&self) -> f64 {
        self.committed
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl BubbleSurface for FixedSurface {
    fn commit_max_width(&mut self, px: f64) {
        self.committed = px.max(0.0);
    }

    fn measure(&self) -> Measured {
        if self.text.is_empty() {
            return Measured::ZERO;
        }
        Measured {
            width: self.committed,
            height: self.height,
        }
    }
}

impl SpeechSurface for FixedSurface {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}
