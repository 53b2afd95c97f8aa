//! Glyph carving: derived letterforms built from boolean outline operations.
//!
//! Each carve draws a cover rectangle over the glyph cell plus an inverted
//! (subtractive) erase rectangle, then intersects them with the glyph's ink.

mod error;
mod forms;
mod weight;

pub use error::{CarveError, Result};
pub use forms::{
    BLACK_DIAMOND, BROKEN_BAR, DIGIT_ZERO, IDEOGRAPHIC_SPACE, LATIN_SMALL_M, MIDDLE_DOT,
    VERTICAL_LINE, WHITE_SQUARE, broken_vline, cut_m, dot_zero, zenkaku_space,
};
pub use weight::stem_weight;
