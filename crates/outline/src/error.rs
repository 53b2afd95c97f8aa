use std::result;

use thiserror::Error;

use crate::Codepoint;

#[derive(Error, Debug)]
pub enum OutlineError {
    #[error("glyph {0} not found")]
    MissingGlyph(Codepoint),

    #[error(
        "boolean operands of {codepoint} must be axis-aligned rectangles or a single convex \
         contour (got {count} contours)"
    )]
    UnsupportedOperands { codepoint: Codepoint, count: usize },
}

pub type Result<T> = result::Result<T, OutlineError>;
