//! Glyph outlines and the in-memory font model.
//!
//! A [`Font`] maps codepoints to [`Glyph`]s. Each glyph carries an
//! [`Outline`] of closed contours under the nonzero fill rule plus an advance
//! width. Contours drawn with a [`GlyphPen`] become boolean operands that
//! [`Glyph::intersect`] resolves against the glyph's ink.

mod clip;
mod embolden;
mod error;
mod font;
mod glyph;
mod pen;
mod types;

pub use error::{OutlineError, Result};
pub use font::{Font, PasteMode};
pub use glyph::{Glyph, Outline};
pub use kurbo;
pub use pen::{GlyphPen, draw_rectangle};
pub use types::Codepoint;
