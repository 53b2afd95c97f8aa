use std::result;

use quillwort_outline::{Codepoint, OutlineError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FitError {
    #[error("cannot resolve a batch transform for an empty glyph batch")]
    EmptyBatch,

    #[error("every glyph in the batch has zero {extent}; {policy} has nothing to scale by")]
    DegenerateBatch { policy: &'static str, extent: &'static str },

    #[error("no unique most frequent {coordinate} coordinate in batch (tied: {candidates:?})")]
    AmbiguousMode { coordinate: &'static str, candidates: Vec<i64> },

    #[error("glyph {0} has zero advance width")]
    ZeroAdvance(Codepoint),

    #[error("font ascent ({ascent}) and descent ({descent}) must both be non-zero")]
    ZeroMetric { ascent: f64, descent: f64 },

    #[error("fixed fit target must be positive, got {0}")]
    InvalidFixedTarget(f64),

    #[error("reshape step '{step}' must come after '{requires}'")]
    StepOrder { step: &'static str, requires: &'static str },

    #[error(transparent)]
    Outline(#[from] OutlineError),
}

pub type Result<T> = result::Result<T, FitError>;
