use std::result;

use quillwort_outline::{Codepoint, OutlineError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CarveError {
    #[error("cannot carve: glyph {0} not found")]
    MissingGlyph(Codepoint),

    #[error("relative position must be within 0..=1, got {0}")]
    InvalidPosition(f64),

    #[error(transparent)]
    Outline(OutlineError),
}

impl From<OutlineError> for CarveError {
    fn from(err: OutlineError) -> Self {
        match err {
            OutlineError::MissingGlyph(codepoint) => CarveError::MissingGlyph(codepoint),
            other => CarveError::Outline(other),
        }
    }
}

pub type Result<T> = result::Result<T, CarveError>;
