use std::{error, result};

use quillwort_metrics::FitError;
use thiserror::Error;

/// Boxed error returned by a [`FontLoader`](crate::FontLoader).
pub type LoadError = Box<dyn error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("{font}: invalid range {start:#X}..={stop:#X}")]
    InvalidRange { font: String, start: u32, stop: u32 },

    #[error(
        "{font}: destination ranges {first_start:#X}..={first_stop:#X} and \
         {second_start:#X}..={second_stop:#X} overlap"
    )]
    OverlappingDestination {
        font: String,
        first_start: u32,
        first_stop: u32,
        second_start: u32,
        second_stop: u32,
    },

    #[error("{font}: glyph set has no glyph maps")]
    NoGlyphMaps { font: String },

    #[error("failed to load {font}")]
    Load {
        font: String,
        #[source]
        error: LoadError,
    },

    #[error("{font}: cannot fit glyph batch")]
    Fit {
        font: String,
        #[source]
        error: FitError,
    },
}

pub type Result<T> = result::Result<T, MergeError>;
