//! End-to-end builds from synthetic source fonts.

use std::{fs::write, path::Path};

use kurbo::BezPath;
use quillwort_core::{
    BuildOptions, IconBuild, Parameter, build_font, build_icons, inspect, parse_codepoint,
};
use quillwort_merge::{GlyphMap, GlyphSet};
use quillwort_metadata::{FontMeta, FontNaming, FontVersion, NAME_ID_COPYRIGHT, NAME_ID_LICENSE_URL};
use quillwort_metrics::Envelope;
use quillwort_outline::{Codepoint, Font, Glyph, Outline};
use quillwort_sfnt::{open_font, to_bytes};
use read_fonts::{FontRef, TableProvider};
use tempfile::TempDir;

fn rect(x0: f64, y0: f64, x1: f64, y1: f64, clockwise: bool) -> BezPath {
    let mut pts = vec![(x0, y1), (x1, y1), (x1, y0)];
    if !clockwise {
        pts.reverse();
    }
    let mut path = BezPath::new();
    path.move_to((x0, y0));
    for p in pts {
        path.line_to(p);
    }
    path.close_path();
    path
}

fn glyph(cp: i32, width: f64, contours: Vec<BezPath>) -> Glyph {
    Glyph::new(cp, width).with_outline(Outline::new(contours))
}

fn save(dir: &Path, name: &str, font: &Font) {
    let meta = FontMeta::new(FontNaming::new(name, "Regular", "Regular"), FontVersion::default());
    write(dir.join(name), to_bytes(font, &meta).unwrap()).unwrap();
}

/// Latin source drawn at 2048-ish units with every glyph the carves need.
fn latin_source() -> Font {
    let mut font = Font::new(1901, 483);
    font.insert(Glyph::new(0x20, 1233.0));
    font.insert(glyph(0x41, 1233.0, vec![rect(100.0, 0.0, 1133.0, 1500.0, true)]));
    font.insert(glyph(
        0x6D,
        1233.0,
        vec![
            rect(100.0, 0.0, 250.0, 1100.0, true),
            rect(550.0, 0.0, 700.0, 1100.0, true),
            rect(1000.0, 0.0, 1150.0, 1100.0, true),
        ],
    ));
    font.insert(glyph(
        0x30,
        1233.0,
        vec![rect(150.0, -30.0, 1080.0, 1520.0, true), rect(300.0, 100.0, 930.0, 1400.0, false)],
    ));
    font.insert(glyph(0xB7, 1233.0, vec![rect(550.0, 650.0, 700.0, 800.0, true)]));
    font.insert(glyph(0x7C, 1233.0, vec![rect(560.0, -400.0, 680.0, 1800.0, true)]));
    font.insert(glyph(
        0xA6,
        1233.0,
        vec![rect(560.0, -300.0, 680.0, 500.0, true), rect(560.0, 800.0, 680.0, 1600.0, true)],
    ));
    font
}

fn wide_source() -> Font {
    let mut font = Font::new(880, 120);
    font.insert(glyph(0x41, 500.0, vec![rect(50.0, 0.0, 450.0, 700.0, true)]));
    font.insert(glyph(0x3042, 1000.0, vec![rect(100.0, -50.0, 900.0, 800.0, true)]));
    font.insert(glyph(0xFF71, 500.0, vec![rect(80.0, 0.0, 420.0, 700.0, true)]));
    font.insert(Glyph::new(0x3000, 1000.0));
    font.insert(glyph(
        0x25A1,
        1000.0,
        vec![rect(100.0, -50.0, 900.0, 750.0, true), rect(150.0, 0.0, 850.0, 700.0, false)],
    ));
    let mut diamond = BezPath::new();
    diamond.move_to((500.0, -120.0));
    diamond.line_to((80.0, 350.0));
    diamond.line_to((500.0, 820.0));
    diamond.line_to((920.0, 350.0));
    diamond.close_path();
    font.insert(glyph(0x25C6, 1000.0, vec![diamond]));
    font.insert(glyph(-7, 1000.0, vec![rect(0.0, 0.0, 100.0, 100.0, true)]));
    font
}

fn icon_source() -> Font {
    let mut font = Font::new(1600, 400);
    font.insert(glyph(0xE000, 1800.0, vec![rect(100.0, 0.0, 1700.0, 1600.0, true)]));
    font.insert(glyph(0xE001, 1800.0, vec![rect(300.0, 0.0, 1500.0, 1200.0, true)]));
    font
}

fn sources() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    save(dir.path(), "Latin.ttf", &latin_source());
    save(dir.path(), "Wide.ttf", &wide_source());
    save(dir.path(), "Icons.ttf", &icon_source());
    dir
}

fn parameter(icons: &str) -> Parameter {
    let json = format!(
        r#"{{
            "family_name": "Quillwort Test",
            "style_name": "Bold",
            "weight_name": "Bold",
            "shape_to": {{"ascent": 880, "descent": 240, "half_width": 560, "full_width": 1120}},
            "upos": -120,
            "os2_table": {{"os2_weight": 700, "os2_vendor": "QW"}},
            "latin": {{
                "source": "Latin.ttf",
                "shape_as": {{"ascent": 1901, "descent": 483, "half_width": 1233, "full_width": 2466}}
            }},
            "wide": {{
                "source": "Wide.ttf",
                "shape_as": {{"ascent": 880, "descent": 120, "half_width": 500, "full_width": 1000}},
                "baseline_shift": -20
            }},
            "icons": {icons}
        }}"#
    );
    Parameter::from_json(&json).unwrap()
}

const GLYPH_SET_ICONS: &str = r#"{"glyph_sets": [{"source": "Icons.ttf", "glyph_maps": [{"src_range": [57344, 57345], "dst_start": 61440}]}]}"#;

#[test]
fn test_build_from_glyph_sets() {
    let _ = env_logger::builder().is_test(true).try_init();
    let src = sources();
    let built = build_font(&parameter(GLYPH_SET_ICONS), src.path(), &BuildOptions::default()).unwrap();
    let font = &built.font;

    assert_eq!((font.ascent, font.descent, font.em), (880, 240, 1120));

    // latin wins the codepoint both layers define
    let a = font.glyph(0x41).unwrap();
    assert!((a.width - 560.0).abs() < 1e-6);
    assert!(a.bounding_box().height() > 600.0);

    let wide = font.glyph(0x3042).unwrap();
    assert!((wide.width - 1120.0).abs() < 1e-6);
    let half = font.glyph(0xFF71).unwrap();
    assert!((half.width - 560.0).abs() < 1e-6);

    assert!(font.glyph(0x3000).unwrap().is_worth_outputting());
    assert!(font.contains(0xF000) && font.contains(0xF001));
    assert!(!font.contains(0xE000));
    assert!(font.glyphs().all(|g| g.codepoint().is_encoded()));

    assert_eq!(built.file_name(), "QuillwortTest-Bold.ttf");
}

#[test]
fn test_build_writes_metadata() {
    let src = sources();
    let copyright = src.path().join("COPYRIGHT");
    write(&copyright, "Copyright (c) Quillwort authors\n").unwrap();
    let options = BuildOptions {
        version: FontVersion::parse(Some("v0.5")).unwrap(),
        copyright_file: Some(copyright),
        license_url: Some("https://scripts.sil.org/OFL".to_string()),
    };

    let built = build_font(&parameter(GLYPH_SET_ICONS), src.path(), &options).unwrap();
    let dst = tempfile::tempdir().unwrap();
    let path = built.generate(dst.path()).unwrap();
    assert!(path.ends_with("QuillwortTest-Bold.ttf"));

    let data = std::fs::read(&path).unwrap();
    let font = FontRef::new(&data).unwrap();
    let os2 = font.os2().unwrap();
    assert_eq!(os2.us_weight_class(), 700);
    assert_eq!(os2.s_typo_ascender(), 880);
    assert_eq!(os2.s_typo_descender(), -240);
    assert_eq!(font.post().unwrap().underline_position().to_i16(), -120);
    assert!((font.head().unwrap().font_revision().to_f64() - 0.5).abs() < 0.001);

    let name = font.name().unwrap();
    let texts: Vec<(u16, String)> = name
        .name_record()
        .iter()
        .map(|r| (r.name_id().to_u16(), r.string(name.string_data()).unwrap().to_string()))
        .collect();
    let copyrights = texts.iter().filter(|(id, _)| *id == NAME_ID_COPYRIGHT).count();
    assert_eq!(copyrights, 2);
    assert!(texts.contains(&(NAME_ID_COPYRIGHT, "Copyright (c) Quillwort authors".to_string())));
    assert!(texts.iter().any(|(id, _)| *id == NAME_ID_LICENSE_URL));

    let reopened = open_font(&path).unwrap();
    assert_eq!(reopened.len(), built.font.len());
}

#[test]
fn test_build_with_prebuilt_icons() {
    let src = sources();
    let sets = [GlyphSet::new("Icons.ttf", vec![GlyphMap::new(0xE000, 0xE001, 0xF500)])];
    let build = IconBuild {
        sets: &sets,
        cell: Envelope::new(648.0, 864.0, 216.0),
        version: FontVersion::default(),
    };
    let icons = build_icons(&build, src.path(), src.path()).unwrap();
    assert!(icons.ends_with("NerdFont.ttf"));

    let prebuilt = r#"{"source": "NerdFont.ttf", "shape_as": {"ascent": 864, "descent": 216, "half_width": 648, "full_width": 1296}}"#;
    let built = build_font(&parameter(prebuilt), src.path(), &BuildOptions::default()).unwrap();
    let icon = built.font.glyph(0xF500).unwrap();
    assert!((icon.width - 560.0).abs() < 1e-6);
    let bbox = icon.bounding_box();
    assert!(bbox.y1 <= 880.5 && bbox.y0 >= -240.5);
}

#[test]
fn test_missing_source_names_file() {
    let src = sources();
    let mut parameter = parameter(GLYPH_SET_ICONS);
    parameter.wide.source = "Absent.ttf".to_string();
    let err = build_font(&parameter, src.path(), &BuildOptions::default()).unwrap_err();
    assert!(format!("{err:#}").contains("Absent.ttf"));
}

#[test]
fn test_missing_carve_glyph_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut latin = latin_source();
    latin.remove(0xA6);
    save(dir.path(), "Latin.ttf", &latin);
    save(dir.path(), "Wide.ttf", &wide_source());
    save(dir.path(), "Icons.ttf", &icon_source());

    let err = build_font(&parameter(GLYPH_SET_ICONS), dir.path(), &BuildOptions::default()).unwrap_err();
    assert!(format!("{err:#}").contains("U+00A6"));
}

#[test]
fn test_inspect_built_font() {
    let src = sources();
    let built = build_font(&parameter(GLYPH_SET_ICONS), src.path(), &BuildOptions::default()).unwrap();
    let path = built.generate(src.path()).unwrap();

    let codepoints = [parse_codepoint("A").unwrap(), parse_codepoint("U+3042").unwrap()];
    let found = inspect(&path, &codepoints, Some(0.5)).unwrap();
    assert_eq!(found[0].codepoint, Codepoint::new(0x41));
    assert_eq!(found[1].report.width, 1120.0);
    assert!(found[0].stem_weight.is_some());
}
