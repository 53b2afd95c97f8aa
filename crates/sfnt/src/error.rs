use std::{io, path::PathBuf, result};

use quillwort_metadata::MetadataError;
use quillwort_outline::Codepoint;
use read_fonts::ReadError;
use thiserror::Error;
use write_fonts::{BuilderError, error};

#[derive(Error, Debug)]
pub enum SfntError {
    #[error("failed to read font: {0}")]
    Read(#[from] ReadError),

    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to draw glyph {gid}: {reason}")]
    Draw { gid: u32, reason: String },

    #[error("glyph {codepoint} has a malformed outline: {reason}")]
    MalformedOutline { codepoint: Codepoint, reason: String },

    /// write-fonts errors are not `Send`, so only their message is kept.
    #[error("failed to write font: {0}")]
    Write(String),

    #[error("failed to build font: {0}")]
    Builder(String),

    #[error("invalid metadata: {0}")]
    Metadata(#[from] MetadataError),

    #[error("font has {0} glyphs; at most 65535 fit in a TrueType font")]
    TooManyGlyphs(usize),

    #[error("failed to build cmap table")]
    Cmap,
}

impl From<error::Error> for SfntError {
    fn from(err: error::Error) -> Self {
        SfntError::Write(err.to_string())
    }
}

impl From<BuilderError> for SfntError {
    fn from(err: BuilderError) -> Self {
        SfntError::Builder(err.to_string())
    }
}

pub type Result<T> = result::Result<T, SfntError>;
