//! Copying glyphs from a source font into an accumulator.

use log::{debug, info};
use quillwort_metrics::{BatchTransform, Envelope};
use quillwort_outline::{Font, Glyph, PasteMode};

use crate::{GlyphMap, GlyphSet, MergeError, Result};

/// What happens when a destination codepoint is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// The incoming glyph replaces the existing one.
    Replace,
    /// The existing glyph is kept.
    Preserve,
}

/// Fit and align every glyph `set` draws from `font` with one batch transform.
///
/// The batch is the deduplicated union of the set's source ranges,
/// restricted to codepoints present in `font`.
pub fn normalize(font: &mut Font, set: &GlyphSet, cell: Envelope) -> Result<BatchTransform> {
    let codepoints: Vec<_> =
        set.source_codepoints().into_iter().filter(|cp| font.contains(*cp)).collect();
    let batch: Vec<&Glyph> = codepoints.iter().filter_map(|cp| font.get(*cp)).collect();

    let transform = BatchTransform::resolve(&batch, set.fit_target, set.valign, cell)
        .map_err(|error| MergeError::Fit { font: set.source.clone(), error })?;

    for cp in &codepoints {
        if let Some(glyph) = font.get_mut(*cp) {
            transform.apply(glyph, cell.width, set.halign);
        }
    }

    info!(
        "{}: {} glyphs, fit {}, halign {:?}, valign {:?}, scale {:.6}, shift {:.3}",
        set.source,
        codepoints.len(),
        set.fit_target,
        set.halign,
        set.valign,
        transform.scale,
        transform.shift,
    );
    Ok(transform)
}

/// Copy every present glyph of `map`'s source range into `accumulator`.
///
/// Absent source codepoints are skipped. Returns the number of glyphs copied.
pub fn remap_into(accumulator: &mut Font, source: &Font, map: &GlyphMap, overlap: Overlap) -> usize {
    debug!("copy {:#x}..={:#x} -> {:#x}..", map.src_start(), map.src_stop(), map.dst_start);

    let mut copied = 0;
    for src in map.sources() {
        let Some(glyph) = source.get(src as i32) else {
            continue;
        };
        let Some(dst) = map.destination(src) else {
            continue;
        };
        if overlap == Overlap::Preserve && accumulator.contains(dst) {
            continue;
        }
        accumulator.paste(dst, glyph, PasteMode::Replace);
        copied += 1;
    }
    copied
}

/// Copy every encoded glyph of `layer` into `accumulator` at the same codepoint.
pub fn merge_layer(accumulator: &mut Font, layer: &Font, overlap: Overlap) -> usize {
    let mut copied = 0;
    for glyph in layer.glyphs().filter(|g| g.codepoint().is_encoded()) {
        let cp = glyph.codepoint();
        if overlap == Overlap::Preserve && accumulator.contains(cp) {
            continue;
        }
        accumulator.paste(cp, glyph, PasteMode::Replace);
        copied += 1;
    }
    copied
}

#[cfg(test)]
mod tests {
    use kurbo::BezPath;
    use quillwort_metrics::{FitPolicy, HAlign, VAlign};
    use quillwort_outline::{Codepoint, Outline};

    use super::*;

    fn boxed(cp: i32, x0: f64, y0: f64, x1: f64, y1: f64) -> Glyph {
        let mut path = BezPath::new();
        path.move_to((x0, y0));
        path.line_to((x0, y1));
        path.line_to((x1, y1));
        path.line_to((x1, y0));
        path.close_path();
        Glyph::new(cp, 1000.0).with_outline(Outline::new(vec![path]))
    }

    fn icons() -> Font {
        let mut font = Font::new(800, 200);
        font.insert(boxed(0xE600, 0.0, 10.0, 800.0, 810.0));
        font.insert(boxed(0xE602, 0.0, 10.0, 1296.0, 610.0));
        font.insert(boxed(0xE603, 0.0, -40.0, 100.0, 60.0));
        font
    }

    #[test]
    fn test_sparse_range_skips_absent() {
        let mut acc = Font::new(864, 216);
        let copied = remap_into(&mut acc, &icons(), &GlyphMap::new(0xE600, 0xE602, 0xE700), Overlap::Replace);
        assert_eq!(copied, 2);
        assert!(acc.contains(0xE700));
        assert!(!acc.contains(0xE701));
        assert!(acc.contains(0xE702));
        assert_eq!(acc.get(0xE702).unwrap().codepoint(), Codepoint::new(0xE702));
    }

    #[test]
    fn test_absent_range_leaves_destination_untouched() {
        let mut acc = Font::new(864, 216);
        acc.insert(boxed(0xF101, 0.0, 0.0, 5.0, 5.0));
        let before = acc.clone();
        let copied = remap_into(&mut acc, &icons(), &GlyphMap::new(0xF000, 0xF0FF, 0xF100), Overlap::Replace);
        assert_eq!(copied, 0);
        assert_eq!(acc, before);
    }

    #[test]
    fn test_preserve_keeps_existing() {
        let mut acc = Font::new(864, 216);
        acc.insert(boxed(0xE600, 0.0, 0.0, 5.0, 5.0));
        let before = acc.get(0xE600).cloned();
        merge_layer(&mut acc, &icons(), Overlap::Preserve);
        assert_eq!(acc.get(0xE600).cloned(), before);
        assert!(acc.contains(0xE603));
    }

    #[test]
    fn test_merge_layer_skips_unencoded() {
        let mut layer = icons();
        layer.insert(boxed(-7, 0.0, 0.0, 5.0, 5.0));
        let mut acc = Font::new(864, 216);
        assert_eq!(merge_layer(&mut acc, &layer, Overlap::Replace), 3);
        assert!(!acc.contains(-7));
    }

    #[test]
    fn test_normalize_uses_union_batch() {
        let mut font = icons();
        let set = GlyphSet::new(
            "icons.ttf",
            vec![GlyphMap::new(0xE600, 0xE601, 0xE700), GlyphMap::new(0xE602, 0xE603, 0xE702)],
        );
        let t = normalize(&mut font, &set, Envelope::new(648.0, 864.0, 216.0)).unwrap();
        // widest ink 1296, most common bottom 10
        assert_eq!(t.scale, 0.5);
        assert_eq!(t.shift, -5.0);
        for glyph in font.glyphs() {
            assert_eq!(glyph.width, 648.0);
        }
        let bbox = font.get(0xE602).unwrap().bounding_box();
        assert_eq!((bbox.x0, bbox.y0, bbox.x1), (0.0, 0.0, 648.0));
    }

    #[test]
    fn test_normalize_reports_font_on_failure() {
        let mut font = icons();
        let set = GlyphSet::new("missing.ttf", vec![GlyphMap::new(0x41, 0x5A, 0x41)])
            .with_fit_target(FitPolicy::MaxHeight)
            .with_align(HAlign::None, VAlign::MaxTop);
        let err = normalize(&mut font, &set, Envelope::new(648.0, 864.0, 216.0)).unwrap_err();
        assert!(matches!(err, MergeError::Fit { ref font, .. } if font == "missing.ttf"));
    }
}
