//! Derived letterforms.
//!
//! Cut geometry is in the design units of the Latin source (2048 units per em)
//! and is applied before that source is reshaped.

use kurbo::Point;
use log::debug;
use quillwort_outline::{Codepoint, Font, PasteMode, draw_rectangle};

use crate::Result;

pub const LATIN_SMALL_M: Codepoint = Codepoint::new(0x6D);
pub const DIGIT_ZERO: Codepoint = Codepoint::new(0x30);
pub const MIDDLE_DOT: Codepoint = Codepoint::new(0xB7);
pub const VERTICAL_LINE: Codepoint = Codepoint::new(0x7C);
pub const BROKEN_BAR: Codepoint = Codepoint::new(0xA6);
pub const IDEOGRAPHIC_SPACE: Codepoint = Codepoint::new(0x3000);
pub const WHITE_SQUARE: Codepoint = Codepoint::new(0x25A1);
pub const BLACK_DIAMOND: Codepoint = Codepoint::new(0x25C6);

/// A cover rectangle and the erase rectangle punched out of it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cut {
    cover_origin: Point,
    cover_size: (f64, f64),
    erase_origin: Point,
    erase_size: (f64, f64),
}

impl Cut {
    fn carve(&self, font: &mut Font, codepoint: Codepoint) -> Result<()> {
        let glyph = font.glyph_mut(codepoint)?;
        {
            let mut pen = glyph.pen();
            let (w, h) = self.cover_size;
            draw_rectangle(&mut pen, self.cover_origin, w, h, false);
            let (w, h) = self.erase_size;
            if w > 0.0 && h > 0.0 {
                draw_rectangle(&mut pen, self.erase_origin, w, h, true);
            }
        }
        glyph.intersect()?;
        Ok(())
    }
}

/// Open a gap of height `cutoff` at the bottom of the center stem of `m`.
pub fn cut_m(font: &mut Font, cutoff: f64) -> Result<()> {
    Cut {
        cover_origin: Point::new(0.0, 0.0),
        cover_size: (1200.0, 1200.0),
        erase_origin: Point::new(500.0, 0.0),
        erase_size: (250.0, cutoff),
    }
    .carve(font, LATIN_SMALL_M)?;
    debug!("cut {LATIN_SMALL_M} stem by {cutoff}");
    Ok(())
}

/// Hollow the center of `0` and drop the middle dot into the hole.
///
/// The dot is unioned onto the carved outline, not combined with it.
pub fn dot_zero(font: &mut Font) -> Result<()> {
    Cut {
        cover_origin: Point::new(0.0, -50.0),
        cover_size: (1200.0, 1600.0),
        erase_origin: Point::new(500.0, 250.0),
        erase_size: (250.0, 900.0),
    }
    .carve(font, DIGIT_ZERO)?;
    font.copy_within(MIDDLE_DOT, DIGIT_ZERO, PasteMode::Merge)?;
    debug!("dotted {DIGIT_ZERO}");
    Ok(())
}

/// Replace `|` with the broken bar, raised so its top sits on the ascent line.
pub fn broken_vline(font: &mut Font) -> Result<()> {
    font.copy_within(BROKEN_BAR, VERTICAL_LINE, PasteMode::Replace)?;
    let ascent = font.ascent as f64;
    let glyph = font.glyph_mut(VERTICAL_LINE)?;
    let top = glyph.bounding_box().y1;
    glyph.translate(0.0, ascent - top);
    debug!("broke {VERTICAL_LINE}, raised by {}", ascent - top);
    Ok(())
}

/// Make the ideographic space visible as the white square clipped to the black diamond.
pub fn zenkaku_space(font: &mut Font) -> Result<()> {
    font.copy_within(WHITE_SQUARE, IDEOGRAPHIC_SPACE, PasteMode::Replace)?;
    font.copy_within(BLACK_DIAMOND, IDEOGRAPHIC_SPACE, PasteMode::Operand)?;
    font.intersect([IDEOGRAPHIC_SPACE])?;
    debug!("visualized {IDEOGRAPHIC_SPACE}");
    Ok(())
}
