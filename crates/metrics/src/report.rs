use std::fmt::{self, Display, Formatter};

use quillwort_outline::{Font, Glyph};
use serde::Serialize;

/// Metrics of one glyph against its font, for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlyphReport {
    pub ascent: f64,
    pub descent: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub width: f64,
    pub ink_width: f64,
    pub height: f64,
    pub ink_height: f64,
}

impl GlyphReport {
    pub fn new(font: &Font, glyph: &Glyph) -> Self {
        let bbox = glyph.bounding_box();
        let (ascent, descent) = (font.ascent as f64, font.descent as f64);
        Self {
            ascent,
            descent,
            left: bbox.x0,
            right: bbox.x1,
            bottom: bbox.y0,
            top: bbox.y1,
            width: glyph.width,
            ink_width: bbox.width(),
            height: ascent + descent,
            ink_height: bbox.height(),
        }
    }

    /// `(label, value)` pairs for the proportions commonly compared between sources.
    pub fn ratios(&self) -> [(&'static str, f64); 5] {
        [
            ("ascent / descent", self.ascent / self.descent),
            ("ascent / width", self.ascent / self.width),
            ("width / ascent", self.width / self.ascent),
            ("height / width", self.height / self.width),
            ("width / height", self.width / self.height),
        ]
    }
}

impl Display for GlyphReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let fields = [
            ("ascent", self.ascent),
            ("descent", self.descent),
            ("left", self.left),
            ("right", self.right),
            ("bottom", self.bottom),
            ("top", self.top),
            ("width", self.width),
            ("ink width", self.ink_width),
            ("height", self.height),
            ("ink height", self.ink_height),
        ];
        for (label, value) in fields.into_iter().chain(self.ratios()) {
            writeln!(f, "{label:>17}: {value}")?;
        }
        Ok(())
    }
}
