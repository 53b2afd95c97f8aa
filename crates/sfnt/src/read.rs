//! Loading fonts into the outline model.

use std::{collections::BTreeMap, fs, mem, path::Path};

use kurbo::BezPath;
use log::debug;
use quillwort_outline::{Codepoint, Font, Glyph, Outline};
use read_fonts::{FontRef, TableProvider};
use skrifa::{
    GlyphId, MetadataProvider,
    instance::{LocationRef, Size},
    outline::{DrawSettings, OutlineGlyphCollection, OutlinePen},
};

use crate::{Result, SfntError};

/// Open a TrueType or CFF-flavoured OpenType font from disk.
pub fn open_font(path: impl AsRef<Path>) -> Result<Font> {
    let path = path.as_ref();
    let data =
        fs::read(path).map_err(|source| SfntError::Io { path: path.to_path_buf(), source })?;
    let font = font_from_bytes(&data)?;
    debug!("Loaded {} glyphs from {}", font.len(), path.display());
    Ok(font)
}

/// Parse a font from memory.
///
/// Every cmap entry becomes its own glyph. Glyphs not reachable through the
/// cmap are keyed by `-(glyph id)`; `.notdef` is skipped.
pub fn font_from_bytes(data: &[u8]) -> Result<Font> {
    let font = FontRef::new(data)?;
    let size = Size::unscaled();
    let location = LocationRef::default();
    let metrics = font.metrics(size, location);
    let advances = font.glyph_metrics(size, location);
    let outlines = font.outline_glyphs();
    let num_glyphs = font.maxp()?.num_glyphs() as u32;

    let mut encodings: BTreeMap<u32, Vec<Codepoint>> = BTreeMap::new();
    for (cp, gid) in font.charmap().mappings() {
        encodings.entry(gid.to_u32()).or_default().push(Codepoint::new(cp as i32));
    }

    let mut result = Font::new(metrics.ascent.round() as i32, -metrics.descent.round() as i32);
    result.em = metrics.units_per_em as i32;

    for gid in 1..num_glyphs {
        let glyph_id = GlyphId::new(gid);
        let width = advances.advance_width(glyph_id).unwrap_or(0.0) as f64;
        let outline = draw(&outlines, glyph_id)?;

        match encodings.get(&gid) {
            Some(codepoints) => {
                for &cp in codepoints {
                    result.insert(Glyph::new(cp, width).with_outline(outline.clone()));
                }
            }
            None => {
                result.insert(Glyph::new(Codepoint::unencoded(gid), width).with_outline(outline));
            }
        }
    }

    Ok(result)
}

fn draw(outlines: &OutlineGlyphCollection, gid: GlyphId) -> Result<Outline> {
    let Some(glyph) = outlines.get(gid) else {
        return Ok(Outline::default());
    };
    let mut pen = ContourPen::default();
    glyph
        .draw(DrawSettings::unhinted(Size::unscaled(), LocationRef::default()), &mut pen)
        .map_err(|e| SfntError::Draw { gid: gid.to_u32(), reason: e.to_string() })?;
    Ok(Outline::new(pen.finish()))
}

/// Collects one `BezPath` per subpath.
#[derive(Default)]
struct ContourPen {
    current: BezPath,
    contours: Vec<BezPath>,
}

impl ContourPen {
    fn flush(&mut self) {
        if !self.current.elements().is_empty() {
            self.contours.push(mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> Vec<BezPath> {
        self.flush();
        self.contours
    }
}

impl OutlinePen for ContourPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        self.current.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.current.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.current.quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.current.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.current.close_path();
        self.flush();
    }
}
