//! TrueType emission.

use std::{fs, path::Path};

use chrono::Utc;
use kurbo::{BezPath, CubicBez, PathEl, Point};
use log::{debug, info};
use quillwort_metadata::FontMeta;
use quillwort_outline::{Font, Glyph};
use write_fonts::{
    FontBuilder, dump_table,
    tables::{
        cmap::Cmap,
        glyf::{GlyfLocaBuilder, Glyph as WriteGlyph, SimpleGlyph},
        head::{Flags, Head, MacStyle},
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        os2::{Os2, SelectionFlags},
        post::Post,
    },
    types::{FWord, Fixed, GlyphId, LongDateTime, Tag, UfWord, Version16Dot16},
};

use crate::{Result, SfntError};

/// Max distance between a cubic and its quadratic approximation, in font units.
const QUAD_ACCURACY: f64 = 0.5;
const DEFAULT_OS2_VERSION: u16 = 4;
/// Seconds from 1904-01-01 to 1970-01-01.
const MAC_EPOCH_OFFSET: i64 = 2_082_844_800;
const OS2_TAG: Tag = Tag::new(b"OS/2");

/// Serialize `font` and write it to `path`.
pub fn generate(font: &Font, meta: &FontMeta, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let data = to_bytes(font, meta)?;
    fs::write(path, &data).map_err(|source| SfntError::Io { path: path.to_path_buf(), source })?;
    info!("Wrote {} ({} glyphs, {} bytes)", path.display(), font.len(), data.len());
    Ok(())
}

/// Serialize `font` as a TrueType binary.
pub fn to_bytes(font: &Font, meta: &FontMeta) -> Result<Vec<u8>> {
    let order = glyph_order(font);
    let num_glyphs = order.len() + 1;
    let num_glyphs = u16::try_from(num_glyphs).map_err(|_| SfntError::TooManyGlyphs(num_glyphs))?;

    let outlines = std::iter::once(Ok(EmittedGlyph::empty()))
        .chain(order.iter().map(|glyph| EmittedGlyph::new(glyph)))
        .collect::<Result<Vec<_>>>()?;

    let mut glyf_builder = GlyfLocaBuilder::new();
    for glyph in &outlines {
        glyf_builder.add_glyph(&glyph.glyph)?;
    }
    let (glyf, loca, loca_format) = glyf_builder.build();

    let summary = Summary::of(&outlines);
    let version = meta.os2.requested_version()?.unwrap_or(DEFAULT_OS2_VERSION);

    let mut builder = FontBuilder::new();
    builder.add_table(&make_head(font, meta, &summary, loca_format))?;
    builder.add_table(&make_hhea(font, meta, &summary, num_glyphs)?)?;
    builder.add_table(&make_hmtx(&outlines))?;
    builder.add_table(&make_maxp(&outlines, num_glyphs))?;
    builder.add_table(&make_cmap(&order)?)?;
    builder.add_table(&meta.names.to_table(&meta.naming.default_records(&meta.version)))?;
    builder.add_table(&make_post(font, meta, &summary, num_glyphs))?;
    builder.add_table(&glyf)?;
    builder.add_table(&loca)?;

    let os2 = make_os2(font, meta, &order, &summary, version)?;
    let mut os2_data = dump_table(&os2)?;
    os2_data[..2].copy_from_slice(&version.to_be_bytes());
    builder.add_raw(OS2_TAG, os2_data);

    debug!("Emitting {} glyphs with OS/2 version {version}", num_glyphs);
    Ok(builder.build())
}

/// Encoded glyphs by codepoint, then unencoded glyphs by original glyph id.
///
/// `.notdef` is not part of the order; it is always synthesized as glyph 0.
fn glyph_order(font: &Font) -> Vec<&Glyph> {
    let (mut unencoded, encoded): (Vec<&Glyph>, Vec<&Glyph>) =
        font.glyphs().partition(|g| !g.codepoint().is_encoded());
    unencoded.retain(|g| g.is_worth_outputting());
    unencoded.reverse();
    encoded.into_iter().chain(unencoded).collect()
}

struct EmittedGlyph {
    advance: u16,
    glyph: WriteGlyph,
    /// `(x_min, y_min, x_max, y_max)`, `None` when the glyph has no ink.
    bbox: Option<(i16, i16, i16, i16)>,
    points: u16,
    contours: u16,
}

impl EmittedGlyph {
    fn empty() -> Self {
        Self {
            advance: 0,
            glyph: WriteGlyph::Empty,
            bbox: None,
            points: 0,
            contours: 0,
        }
    }

    fn new(source: &Glyph) -> Result<Self> {
        let advance = source.width.round().clamp(0.0, u16::MAX as f64) as u16;
        let contours = source.outline.contours();
        if contours.is_empty() {
            return Ok(Self { advance, ..Self::empty() });
        }

        let mut path = BezPath::new();
        for contour in contours {
            path.extend(to_quadratic(contour).elements().iter().copied());
        }
        let subpaths = path.elements().iter().filter(|el| matches!(el, PathEl::MoveTo(_))).count();
        let points = path
            .elements()
            .iter()
            .map(|el| match el {
                PathEl::MoveTo(_) | PathEl::LineTo(_) => 1,
                PathEl::QuadTo(..) => 2,
                PathEl::CurveTo(..) => 3,
                PathEl::ClosePath => 0,
            })
            .sum::<usize>();

        let simple = SimpleGlyph::from_bezpath(&path).map_err(|e| SfntError::MalformedOutline {
            codepoint: source.codepoint(),
            reason: format!("{e:?}"),
        })?;
        let b = simple.bbox;
        Ok(Self {
            advance,
            bbox: Some((b.x_min, b.y_min, b.x_max, b.y_max)),
            points: points.min(u16::MAX as usize) as u16,
            contours: subpaths.min(u16::MAX as usize) as u16,
            glyph: WriteGlyph::Simple(simple),
        })
    }

    fn left_side_bearing(&self) -> i16 {
        self.bbox.map_or(0, |b| b.0)
    }
}

fn to_quadratic(path: &BezPath) -> BezPath {
    let mut out = BezPath::new();
    let mut last = Point::ZERO;
    for &el in path.elements() {
        match el {
            PathEl::CurveTo(p1, p2, p3) => {
                for (_, _, quad) in CubicBez::new(last, p1, p2, p3).to_quads(QUAD_ACCURACY) {
                    out.quad_to(quad.p1, quad.p2);
                }
                last = p3;
            }
            other => {
                out.push(other);
                if let Some(p) = other.end_point() {
                    last = p;
                }
            }
        }
    }
    out
}

/// Font-wide extents collected from the emitted glyphs.
struct Summary {
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
    advance_max: u16,
    min_lsb: i16,
    min_rsb: i16,
    x_max_extent: i16,
    /// Mean of the non-zero advances.
    avg_advance: i16,
    fixed_pitch: bool,
}

impl Summary {
    fn of(glyphs: &[EmittedGlyph]) -> Self {
        let inked: Vec<_> = glyphs.iter().filter_map(|g| g.bbox.map(|b| (g, b))).collect();
        let advances: Vec<u16> = glyphs.iter().map(|g| g.advance).filter(|&a| a > 0).collect();

        let fold = |f: fn(&(i16, i16, i16, i16)) -> i16, pick: fn(i16, i16) -> i16| {
            inked.iter().map(|(_, b)| f(b)).reduce(pick).unwrap_or(0)
        };
        let avg_advance = if advances.is_empty() {
            0
        } else {
            let total: u64 = advances.iter().map(|&a| a as u64).sum();
            (total as f64 / advances.len() as f64).round() as i16
        };

        let x_min = fold(|b| b.0, i16::min);

        Self {
            x_min,
            y_min: fold(|b| b.1, i16::min),
            x_max: fold(|b| b.2, i16::max),
            y_max: fold(|b| b.3, i16::max),
            advance_max: glyphs.iter().map(|g| g.advance).max().unwrap_or(0),
            min_lsb: x_min,
            min_rsb: inked
                .iter()
                .map(|(g, b)| (g.advance as i32 - b.2 as i32) as i16)
                .min()
                .unwrap_or(0),
            x_max_extent: fold(|b| b.2, i16::max),
            avg_advance,
            fixed_pitch: advances.windows(2).all(|w| w[0] == w[1]),
        }
    }
}

fn is_italic(meta: &FontMeta) -> bool {
    meta.italic_angle != 0.0
}

fn is_bold(meta: &FontMeta) -> bool {
    meta.naming.style.to_ascii_lowercase().contains("bold")
}

fn clamp_i16(v: i32) -> i16 {
    v.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

fn make_head(font: &Font, meta: &FontMeta, summary: &Summary, loca_format: LocaFormat) -> Head {
    let now = LongDateTime::new(Utc::now().timestamp() + MAC_EPOCH_OFFSET);
    let mut mac_style = MacStyle::empty();
    if is_bold(meta) {
        mac_style |= MacStyle::BOLD;
    }
    if is_italic(meta) {
        mac_style |= MacStyle::ITALIC;
    }

    Head {
        font_revision: meta.version.revision(),
        checksum_adjustment: 0,
        magic_number: 0x5F0F3CF5,
        // baseline at y=0, left sidebearing at x=0
        flags: Flags::from_bits_truncate(0b11),
        units_per_em: font.em.clamp(16, 16384) as u16,
        created: now,
        modified: now,
        x_min: summary.x_min,
        y_min: summary.y_min,
        x_max: summary.x_max,
        y_max: summary.y_max,
        mac_style,
        lowest_rec_ppem: 8,
        font_direction_hint: 2,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
    }
}

fn make_hhea(font: &Font, meta: &FontMeta, summary: &Summary, num_glyphs: u16) -> Result<Hhea> {
    let (caret_slope_rise, caret_slope_run) = if is_italic(meta) {
        let rise = clamp_i16(font.em);
        let run = (rise as f64 * (-meta.italic_angle).to_radians().tan()).round() as i16;
        (rise, run)
    } else {
        (1, 0)
    };

    let mut hhea = Hhea {
        ascender: FWord::new(clamp_i16(font.ascent)),
        descender: FWord::new(clamp_i16(-font.descent)),
        line_gap: FWord::new(0),
        advance_width_max: UfWord::new(summary.advance_max),
        min_left_side_bearing: FWord::new(summary.min_lsb),
        min_right_side_bearing: FWord::new(summary.min_rsb),
        x_max_extent: FWord::new(summary.x_max_extent),
        caret_slope_rise,
        caret_slope_run,
        caret_offset: 0,
        number_of_h_metrics: num_glyphs,
    };
    meta.os2.apply_hhea(&mut hhea, font.ascent, font.descent)?;
    Ok(hhea)
}

fn make_hmtx(glyphs: &[EmittedGlyph]) -> Hmtx {
    let h_metrics = glyphs
        .iter()
        .map(|g| LongMetric { advance: g.advance, side_bearing: g.left_side_bearing() })
        .collect();
    Hmtx::new(h_metrics, vec![])
}

fn make_maxp(glyphs: &[EmittedGlyph], num_glyphs: u16) -> Maxp {
    Maxp {
        num_glyphs,
        max_points: Some(glyphs.iter().map(|g| g.points).max().unwrap_or(0)),
        max_contours: Some(glyphs.iter().map(|g| g.contours).max().unwrap_or(0)),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(2),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    }
}

fn make_cmap(order: &[&Glyph]) -> Result<Cmap> {
    let mappings: Vec<(char, GlyphId)> = order
        .iter()
        .enumerate()
        .filter_map(|(i, glyph)| Some((glyph.codepoint().to_char()?, GlyphId::new(i as u32 + 1))))
        .collect();
    Cmap::from_mappings(mappings).map_err(|_| SfntError::Cmap)
}

fn make_post(font: &Font, meta: &FontMeta, summary: &Summary, num_glyphs: u16) -> Post {
    Post {
        version: Version16Dot16::VERSION_3_0,
        num_glyphs: Some(num_glyphs),
        glyph_name_index: None,
        string_data: None,
        italic_angle: Fixed::from_f64(meta.italic_angle),
        underline_position: FWord::new(clamp_i16(meta.underline_position)),
        underline_thickness: FWord::new(clamp_i16(meta.underline_thickness_for(font.em))),
        is_fixed_pitch: summary.fixed_pitch as u32,
        min_mem_type42: 0,
        max_mem_type42: 0,
        min_mem_type1: 0,
        max_mem_type1: 0,
    }
}

fn make_os2(
    font: &Font,
    meta: &FontMeta,
    order: &[&Glyph],
    summary: &Summary,
    version: u16,
) -> Result<Os2> {
    let em = font.em;
    let per_mille = |v: i32| clamp_i16(em * v / 1000);
    let encoded: Vec<u32> = order
        .iter()
        .filter_map(|g| u32::try_from(g.codepoint().to_i32()).ok())
        .collect();
    let char_index = |cp: Option<&u32>| cp.map_or(0, |&cp| cp.min(0xFFFF) as u16);

    let mut fs_selection = SelectionFlags::empty();
    if is_italic(meta) {
        fs_selection |= SelectionFlags::ITALIC;
    }
    if is_bold(meta) {
        fs_selection |= SelectionFlags::BOLD;
    }
    if fs_selection.is_empty() {
        fs_selection = SelectionFlags::REGULAR;
    }

    let mut os2 = Os2 {
        x_avg_char_width: summary.avg_advance,
        us_weight_class: if is_bold(meta) { 700 } else { 400 },
        us_width_class: 5,
        fs_type: 0,
        y_subscript_x_size: per_mille(650),
        y_subscript_y_size: per_mille(600),
        y_subscript_x_offset: 0,
        y_subscript_y_offset: per_mille(75),
        y_superscript_x_size: per_mille(650),
        y_superscript_y_size: per_mille(600),
        y_superscript_x_offset: 0,
        y_superscript_y_offset: per_mille(350),
        y_strikeout_size: per_mille(50),
        y_strikeout_position: per_mille(250),
        s_family_class: 0,
        panose_10: [0; 10],
        ul_unicode_range_1: 0,
        ul_unicode_range_2: 0,
        ul_unicode_range_3: 0,
        ul_unicode_range_4: 0,
        ach_vend_id: Tag::new(b"NONE"),
        fs_selection,
        us_first_char_index: char_index(encoded.first()),
        us_last_char_index: char_index(encoded.last()),
        s_typo_ascender: clamp_i16(font.ascent),
        s_typo_descender: clamp_i16(-font.descent),
        s_typo_line_gap: 0,
        us_win_ascent: font.ascent.max(summary.y_max as i32).clamp(0, u16::MAX as i32) as u16,
        us_win_descent: font.descent.max(-(summary.y_min as i32)).clamp(0, u16::MAX as i32) as u16,
        // Latin 1
        ul_code_page_range_1: Some(1),
        ul_code_page_range_2: Some(0),
        sx_height: Some(0),
        s_cap_height: Some(0),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(0),
        us_lower_optical_point_size: None,
        us_upper_optical_point_size: None,
    };
    meta.os2.apply_os2(&mut os2, font.ascent, font.descent)?;
    fit_version(&mut os2, version);
    Ok(os2)
}

/// Make the optional fields match the layout of `version`.
///
/// Versions 2 to 4 share a layout; the caller patches the version number.
fn fit_version(os2: &mut Os2, version: u16) {
    if version >= 5 {
        os2.us_lower_optical_point_size.get_or_insert(0);
        os2.us_upper_optical_point_size.get_or_insert(0xFFFF);
    } else {
        os2.us_lower_optical_point_size = None;
        os2.us_upper_optical_point_size = None;
    }
    if version < 2 {
        os2.sx_height = None;
        os2.s_cap_height = None;
        os2.us_default_char = None;
        os2.us_break_char = None;
        os2.us_max_context = None;
    }
    if version < 1 {
        os2.ul_code_page_range_1 = None;
        os2.ul_code_page_range_2 = None;
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Shape;
    use quillwort_outline::{Codepoint, Outline};

    use super::*;

    #[test]
    fn test_cubics_become_quadratics() {
        let circle = kurbo::Circle::new((500.0, 500.0), 300.0).to_path(0.1);
        let quads = to_quadratic(&circle);
        assert!(!quads.elements().iter().any(|el| matches!(el, PathEl::CurveTo(..))));
        let area = |p: &BezPath| p.area().abs();
        assert!((area(&quads) - area(&circle)).abs() / area(&circle) < 0.01);
    }

    #[test]
    fn test_glyph_order() {
        let mut font = Font::new(800, 200);
        font.insert(Glyph::new(0x42, 500.0));
        font.insert(Glyph::new(0x41, 500.0));
        font.insert(Glyph::new(Codepoint::unencoded(7), 500.0));
        font.insert(Glyph::new(Codepoint::unencoded(3), 500.0));
        font.insert(Glyph::new(Codepoint::unencoded(9), 0.0));

        let order: Vec<i32> = glyph_order(&font).iter().map(|g| g.codepoint().to_i32()).collect();
        assert_eq!(order, [0x41, 0x42, -3, -7]);
    }

    #[test]
    fn test_fit_version_layouts() {
        let meta = FontMeta::new(
            quillwort_metadata::FontNaming::new("A", "Regular", "Regular"),
            Default::default(),
        );
        let font = Font::new(800, 200);
        let summary = Summary::of(&[]);

        let mut os2 = make_os2(&font, &meta, &[], &summary, 1).unwrap();
        assert!(os2.sx_height.is_none());
        assert!(os2.ul_code_page_range_1.is_some());

        os2 = make_os2(&font, &meta, &[], &summary, 5).unwrap();
        assert_eq!(os2.us_upper_optical_point_size, Some(0xFFFF));
    }

    #[test]
    fn test_contours_count_subpaths() {
        let mut rings = BezPath::new();
        for (x0, x1) in [(0.0, 100.0), (200.0, 300.0), (400.0, 500.0)] {
            rings.move_to((x0, 0.0));
            rings.line_to((x0, 100.0));
            rings.line_to((x1, 100.0));
            rings.line_to((x1, 0.0));
            rings.close_path();
        }
        let glyph = Glyph::new(0x41, 600.0).with_outline(Outline::new(vec![rings]));
        let emitted = EmittedGlyph::new(&glyph).unwrap();
        assert_eq!(emitted.contours, 3);
        assert_eq!(emitted.points, 12);

        let maxp = make_maxp(&[EmittedGlyph::empty(), emitted], 2);
        assert_eq!(maxp.max_contours, Some(3));
    }

    #[test]
    fn test_empty_outline_emits_empty_glyph() {
        let glyph = Glyph::new(0x20, 500.4).with_outline(Outline::default());
        let emitted = EmittedGlyph::new(&glyph).unwrap();
        assert_eq!(emitted.advance, 500);
        assert!(emitted.bbox.is_none());
        assert!(matches!(emitted.glyph, WriteGlyph::Empty));
    }
}
