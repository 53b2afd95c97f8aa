//! Binary font I/O for the outline model.
//!
//! [`open_font`] reads TrueType or CFF-flavoured OpenType through `skrifa`;
//! [`generate`] writes a TrueType font through `write-fonts`. A loaded
//! [`Font`](quillwort_outline::Font) owns all of its data, so closing one is
//! simply dropping it.

mod error;
mod read;
mod write;

pub use error::{Result, SfntError};
pub use read::{font_from_bytes, open_font};
pub use write::{generate, to_bytes};
