//! Scripted character fixtures.
//!
//! A [`ScriptedCharacter`] replays a deterministic motion pattern frame by
//! frame: the test advances it alongside its [`FrameClock`](crate::clock::FrameClock)
//! and the coordinator sees the same kind of bounding-box churn a live
//! renderer produces, without a renderer.

use perch_geometry::ModelRect;
use perch_runtime::CharacterSource;

/// Deterministic per-frame motion applied to the base bounds.
#[derive(Debug, Clone, Copy)]
pub enum MotionPattern {
    /// No movement at all.
    Still,
    /// Sub-pixel vertical breathing: the bounds' top oscillates within
    /// `amplitude` pixels over `period` frames.
    Breathing { amplitude: f64, period: u64 },
    /// Constant drift per frame on both axes.
    Glide { dx: f64, dy: f64 },
    /// The model grows taller by `dh` per frame (e.g. a pose change).
    Grow { dh: f64 },
}

/// Fixture configuration, builder style.
#[derive(Debug, Clone, Copy)]
pub struct ScriptConfig {
    pub base: ModelRect,
    pub screen: ModelRect,
    pub pattern: MotionPattern,
    /// Frames before `is_ready` reports true (model load delay).
    pub ready_after: u64,
    pub scale: f64,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            base: ModelRect::new(300.0, 250.0, 400.0, 500.0),
            screen: ModelRect::new(0.0, 0.0, 1000.0, 1000.0),
            pattern: MotionPattern::Still,
            ready_after: 0,
            scale: 1.0,
        }
    }
}

impl ScriptConfig {
    #[must_use]
    pub fn with_base(mut self, base: ModelRect) -> Self {
        self.base = base;
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: MotionPattern) -> Self {
        self.pattern = pattern;
        self
    }

    #[must_use]
    pub fn with_ready_after(mut self, frames: u64) -> Self {
        self.ready_after = frames;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

/// A character whose pose is a pure function of the frame counter.
#[derive(Debug, Clone)]
pub struct ScriptedCharacter {
    config: ScriptConfig,
    frame: u64,
    /// Parts reported as hit by `hit_test`, with their model-space bands
    /// left to the probe's caller.
    face_parts: Vec<String>,
}

impl ScriptedCharacter {
    #[must_use]
    pub fn new(config: ScriptConfig) -> Self {
        Self {
            config,
            frame: 0,
            face_parts: Vec::new(),
        }
    }

    /// Declare a part name the face probe will report hits for.
    #[must_use]
    pub fn with_face_part(mut self, part: impl Into<String>) -> Self {
        self.face_parts.push(part.into());
        self
    }

    /// Advance to the next frame.
    pub fn advance(&mut self) {
        self.frame += 1;
    }

    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The bounds the pattern produces at an arbitrary frame.
    #[must_use]
    pub fn bounds_at(&self, frame: u64) -> ModelRect {
        let b = self.config.base;
        match self.config.pattern {
            MotionPattern::Still => b,
            MotionPattern::Breathing { amplitude, period } => {
                let period = period.max(1);
                let phase = (frame % period) as f64 / period as f64;
                let offset = amplitude * (phase * std::f64::consts::TAU).sin();
                ModelRect::new(b.x, b.y + offset, b.width, b.height - offset)
            }
            MotionPattern::Glide { dx, dy } => {
                ModelRect::new(b.x + dx * frame as f64, b.y + dy * frame as f64, b.width, b.height)
            }
            MotionPattern::Grow { dh } => {
                ModelRect::new(b.x, b.y, b.width, b.height + dh * frame as f64)
            }
        }
    }
}

impl CharacterSource for ScriptedCharacter {
    fn is_ready(&self) -> bool {
        self.frame >= self.config.ready_after
    }

    fn bounds(&self) -> Option<ModelRect> {
        Some(self.bounds_at(self.frame))
    }

    fn screen(&self) -> Option<ModelRect> {
        Some(self.config.screen)
    }

    fn hit_test(&self, part: &str, x: f64, y: f64) -> bool {
        if !self.face_parts.iter().any(|p| p == part) {
            return false;
        }
        // Hits anywhere inside the current bounds.
        let b = self.bounds_at(self.frame);
        x >= b.x && x < b.right() && y >= b.y && y < b.bottom()
    }

    fn scale(&self) -> f64 {
        self.config.scale
    }
}
