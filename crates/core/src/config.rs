//! Build parameters, loaded from JSON.

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use quillwort_merge::{GlyphSet, validate_all};
use quillwort_metadata::Os2Table;
use quillwort_metrics::{Envelope, ShapeSpec};
use serde::Deserialize;

/// Version used when none is given on the command line.
pub const DEFAULT_VERSION: &str = "1.000";

/// Default icon cell: ascent, descent and advance width.
pub const DEFAULT_ICON_ASCENT: i32 = 864;
pub const DEFAULT_ICON_DESCENT: i32 = 216;
pub const DEFAULT_ICON_WIDTH: i32 = 648;

/// Family name of the standalone icon font.
pub const ICON_FAMILY: &str = "NerdFont";

const DEFAULT_M_CUTOFF: i32 = 400;

fn enabled() -> bool {
    true
}

fn default_m_cutoff() -> i32 {
    DEFAULT_M_CUTOFF
}

/// Everything describing one composite font build.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Parameter {
    pub family_name: String,
    pub style_name: String,
    pub weight_name: String,
    pub shape_to: ShapeSpec,
    /// Italic shear in radians; 0 is upright.
    #[serde(default)]
    pub skew: f64,
    pub upos: i32,
    #[serde(default)]
    pub os2_table: Os2Table,
    pub latin: LatinConfig,
    pub wide: WideConfig,
    pub icons: IconConfig,
}

/// The Latin (half-width) source.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatinConfig {
    pub source: String,
    pub shape_as: ShapeSpec,
    /// Height of the notch cut under the middle stem of `m`; 0 leaves it alone.
    #[serde(default = "default_m_cutoff")]
    pub m_cutoff: i32,
    #[serde(default = "enabled")]
    pub dot_zero: bool,
    #[serde(default = "enabled")]
    pub broken_vline: bool,
}

/// The wide (CJK) source.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WideConfig {
    pub source: String,
    pub shape_as: ShapeSpec,
    #[serde(default = "enabled")]
    pub visualize_zenkaku_space: bool,
    #[serde(default)]
    pub baseline_shift: f64,
    /// Stroke weight delta in font units.
    #[serde(default)]
    pub weight: f64,
}

/// The icon layer: a prebuilt icon font or glyph sets merged in-process.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IconConfig {
    pub source: Option<String>,
    pub glyph_sets: Option<Vec<GlyphSet>>,
    /// Metrics the icons are drawn at. Given, the layer is reshaped to `shape_to`.
    pub shape_as: Option<ShapeSpec>,
}

/// Where the icon layer comes from.
#[derive(Debug, Clone, Copy)]
pub enum IconSource<'a> {
    Prebuilt(&'a str),
    GlyphSets(&'a [GlyphSet]),
}

impl IconConfig {
    pub fn source(&self) -> Result<IconSource<'_>> {
        match (&self.source, &self.glyph_sets) {
            (Some(source), None) => Ok(IconSource::Prebuilt(source)),
            (None, Some(sets)) => Ok(IconSource::GlyphSets(sets)),
            (Some(_), Some(_)) => bail!("icons: give either 'source' or 'glyph_sets', not both"),
            (None, None) => bail!("icons: one of 'source' or 'glyph_sets' is required"),
        }
    }

    /// The cell glyph sets are normalized into.
    pub fn cell(&self, shape_to: &ShapeSpec) -> Envelope {
        let shape = self.shape_as.as_ref().unwrap_or(shape_to);
        shape.envelope(shape.half_width)
    }
}

fn validate_shape(name: &str, shape: &ShapeSpec) -> Result<()> {
    let metrics = [
        ("ascent", shape.ascent),
        ("descent", shape.descent),
        ("half_width", shape.half_width),
        ("full_width", shape.full_width),
    ];
    for (field, value) in metrics {
        if value <= 0 {
            bail!("{name}.{field} must be positive, got {value}");
        }
    }
    Ok(())
}

/// Read a JSON list of glyph sets, validated.
pub fn load_glyph_sets(path: impl AsRef<Path>) -> Result<Vec<GlyphSet>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read glyph set file: {}", path.display()))?;
    let sets: Vec<GlyphSet> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid glyph set file: {}", path.display()))?;
    validate_all(&sets)?;
    Ok(sets)
}

impl Parameter {
    /// Read and validate a parameter file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read parameter file: {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid parameter file: {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let parameter: Parameter = serde_json::from_str(json)?;
        parameter.validate()?;
        Ok(parameter)
    }

    /// Check what deserialization alone cannot.
    pub fn validate(&self) -> Result<()> {
        let shapes = [
            ("shape_to", Some(&self.shape_to)),
            ("latin.shape_as", Some(&self.latin.shape_as)),
            ("wide.shape_as", Some(&self.wide.shape_as)),
            ("icons.shape_as", self.icons.shape_as.as_ref()),
        ];
        for (name, shape) in shapes.into_iter().filter_map(|(n, s)| s.map(|s| (n, s))) {
            validate_shape(name, shape)?;
        }
        if let IconSource::GlyphSets(sets) = self.icons.source()? {
            validate_all(sets)?;
        }
        self.os2_table.requested_version()?;
        Ok(())
    }

    /// "{family}-{style}" with spaces removed.
    pub fn postscript_name(&self) -> String {
        format!("{}-{}", self.family_name, self.style_name).replace(' ', "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "family_name": "Quillwort",
        "style_name": "Regular",
        "weight_name": "Book",
        "shape_to": {"ascent": 880, "descent": 240, "half_width": 560, "full_width": 1120},
        "upos": -120,
        "os2_table": {"os2_weight": 400, "os2_panose": [2, 11, 5, 9, 2, 2, 3, 2, 2, 7]},
        "latin": {
            "source": "Hack-Regular.ttf",
            "shape_as": {"ascent": 1901, "descent": 483, "half_width": 1233, "full_width": 2466}
        },
        "wide": {
            "source": "BIZUDGothic-Regular.ttf",
            "shape_as": {"ascent": 880, "descent": 120, "half_width": 500, "full_width": 1000},
            "baseline_shift": -40,
            "weight": 6
        },
        "icons": {"source": "NerdFont.ttf", "shape_as": {"ascent": 864, "descent": 216, "half_width": 648, "full_width": 1296}}
    }"#;

    #[test]
    fn test_load_sample() {
        let parameter = Parameter::from_json(SAMPLE).unwrap();
        assert_eq!(parameter.postscript_name(), "Quillwort-Regular");
        assert_eq!(parameter.latin.m_cutoff, 400);
        assert!(parameter.latin.dot_zero);
        assert!(parameter.wide.visualize_zenkaku_space);
        assert_eq!(parameter.skew, 0.0);
        assert!(matches!(parameter.icons.source().unwrap(), IconSource::Prebuilt("NerdFont.ttf")));
        assert_eq!(parameter.os2_table.len(), 2);
    }

    #[test]
    fn test_unknown_os2_key_rejected() {
        let json = SAMPLE.replace("os2_weight", "os2_wieght");
        let err = Parameter::from_json(&json).unwrap_err();
        assert!(format!("{err:#}").contains("os2_wieght"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = SAMPLE.replace("\"upos\"", "\"underline\": 1, \"upos\"");
        assert!(Parameter::from_json(&json).is_err());
    }

    #[test]
    fn test_zero_descent_rejected() {
        let json = SAMPLE.replace(
            r#""shape_to": {"ascent": 880, "descent": 240"#,
            r#""shape_to": {"ascent": 1120, "descent": 0"#,
        );
        let err = Parameter::from_json(&json).unwrap_err();
        assert!(format!("{err:#}").contains("shape_to.descent must be positive"));
    }

    #[test]
    fn test_icon_shape_validated() {
        let json = SAMPLE.replace(r#""half_width": 648"#, r#""half_width": 0"#);
        let err = Parameter::from_json(&json).unwrap_err();
        assert!(format!("{err:#}").contains("icons.shape_as.half_width"));
    }

    #[test]
    fn test_icon_source_exclusive() {
        let json = SAMPLE.replace(
            r#""icons": {"source": "NerdFont.ttf","#,
            r#""icons": {"source": "NerdFont.ttf", "glyph_sets": [],"#,
        );
        assert!(Parameter::from_json(&json).is_err());
    }

    #[test]
    fn test_glyph_sets_validated_at_load() {
        let json = SAMPLE.replace(
            r#""icons": {"source": "NerdFont.ttf","#,
            r#""icons": {"glyph_sets": [{"source": "a.ttf", "glyph_maps": [{"src_range": [16, 8], "dst_start": 0}]}],"#,
        );
        let err = Parameter::from_json(&json).unwrap_err();
        assert!(format!("{err:#}").contains("a.ttf"));
    }

    #[test]
    fn test_load_glyph_sets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icons.json");
        fs::write(
            &path,
            r#"[{"source": "a.ttf", "glyph_maps": [{"src_range": [57344, 57350], "dst_start": 61440}], "fit_target": "max_height"}]"#,
        )
        .unwrap();
        let sets = load_glyph_sets(&path).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].glyph_maps[0].dst_stop(), 61446);

        fs::write(&path, r#"[{"source": "a.ttf", "glyph_maps": []}]"#).unwrap();
        assert!(load_glyph_sets(&path).is_err());
    }

    #[test]
    fn test_icon_cell() {
        let parameter = Parameter::from_json(SAMPLE).unwrap();
        let cell = parameter.icons.cell(&parameter.shape_to);
        assert_eq!(cell, Envelope::new(648.0, 864.0, 216.0));
    }
}
