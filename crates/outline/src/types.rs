//! Domain-specific newtypes
//!
//! Codepoints are signed: non-negative values are Unicode scalar values (or
//! private-use slots), negative values identify unencoded glyphs.

use std::fmt::{self, Display, Formatter};

/// A glyph's codepoint within a [`Font`](crate::Font)
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codepoint(pub i32);

impl Codepoint {
    pub const fn new(cp: i32) -> Self {
        Self(cp)
    }

    /// Codepoint for an unencoded glyph, derived from its glyph id.
    pub const fn unencoded(gid: u32) -> Self {
        Self(-(gid as i32))
    }

    pub const fn to_i32(self) -> i32 {
        self.0
    }

    pub const fn is_encoded(self) -> bool {
        self.0 >= 0
    }

    /// Offset this codepoint by `delta` slots.
    pub const fn offset(self, delta: i32) -> Self {
        Self(self.0 + delta)
    }

    /// Convert to a Rust char if valid
    pub fn to_char(self) -> Option<char> {
        u32::try_from(self.0).ok().and_then(char::from_u32)
    }
}

impl From<i32> for Codepoint {
    fn from(cp: i32) -> Self {
        Self(cp)
    }
}

impl From<char> for Codepoint {
    fn from(ch: char) -> Self {
        Self(ch as i32)
    }
}

impl From<Codepoint> for i32 {
    fn from(cp: Codepoint) -> Self {
        cp.0
    }
}

impl Display for Codepoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_encoded() {
            write!(f, "U+{:04X}", self.0)
        } else {
            write!(f, "unencoded#{}", -self.0)
        }
    }
}
