use crate::{FontNaming, FontVersion, NameTable, Os2Table};

/// Everything the emitter needs besides glyphs.
#[derive(Debug, Clone)]
pub struct FontMeta {
    pub naming: FontNaming,
    pub version: FontVersion,
    pub names: NameTable,
    pub os2: Os2Table,
    pub underline_position: i32,
    /// Defaults to em / 20 when unset.
    pub underline_thickness: Option<i32>,
    /// Degrees, negative for a rightward slant.
    pub italic_angle: f64,
}

impl FontMeta {
    pub fn new(naming: FontNaming, version: FontVersion) -> Self {
        Self {
            naming,
            version,
            names: NameTable::new(),
            os2: Os2Table::new(),
            underline_position: 0,
            underline_thickness: None,
            italic_angle: 0.0,
        }
    }

    pub fn with_os2(mut self, os2: Os2Table) -> Self {
        self.os2 = os2;
        self
    }

    pub fn with_names(mut self, names: NameTable) -> Self {
        self.names = names;
        self
    }

    pub fn with_underline(mut self, position: i32, thickness: Option<i32>) -> Self {
        self.underline_position = position;
        self.underline_thickness = thickness;
        self
    }

    /// Italic angle from a skew in radians; positive skew leans right.
    pub fn with_skew(mut self, skew: f64) -> Self {
        self.italic_angle = -skew.to_degrees();
        self
    }

    pub fn underline_thickness_for(&self, em: i32) -> i32 {
        self.underline_thickness.unwrap_or(em / 20)
    }
}
