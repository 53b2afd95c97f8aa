//! Merging glyphs from several source fonts into one codepoint space.
//!
//! A [`GlyphSet`] names a source font, the [`GlyphMap`] ranges it
//! contributes and one fit/alignment policy for all of them. A [`MergeJob`]
//! opens every source, normalizes each set's glyphs as one batch, then copies
//! them into an accumulator in configured order. Later sets overwrite earlier
//! ones on overlapping destinations.

mod error;
mod glyph_set;
mod job;
mod remap;
mod stock;

pub use error::{LoadError, MergeError, Result};
pub use glyph_set::{GlyphMap, GlyphSet, validate_all};
pub use job::{FontLoader, MergeJob, Normalized, Opened, Remapped, merge_glyph_sets};
pub use remap::{Overlap, merge_layer, normalize, remap_into};
pub use stock::stock_icon_sets;
