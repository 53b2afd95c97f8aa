//! Glyph metric reports for `quillwort inspect`.

use std::{
    fmt::{self, Display, Formatter},
    path::Path,
};

use anyhow::{Context, Result, bail};
use quillwort_carve::stem_weight;
use quillwort_metrics::GlyphReport;
use quillwort_outline::{Codepoint, Font};
use quillwort_sfnt::open_font;

/// Metrics of one glyph, optionally with its stem weight.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub codepoint: Codepoint,
    pub report: GlyphReport,
    /// Ink width along a slab at the requested relative height.
    pub stem_weight: Option<f64>,
}

impl Display for Inspection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.codepoint.to_char() {
            Some(ch) if !ch.is_control() => writeln!(f, "{} '{ch}'", self.codepoint)?,
            _ => writeln!(f, "{}", self.codepoint)?,
        }
        write!(f, "{}", self.report)?;
        if let Some(weight) = self.stem_weight {
            writeln!(f, "{:>17}: {weight}", "stem weight")?;
        }
        Ok(())
    }
}

/// Parse `U+3042`, `0x3042` or a single character.
pub fn parse_codepoint(value: &str) -> Result<Codepoint> {
    let hex = value
        .strip_prefix("U+")
        .or_else(|| value.strip_prefix("u+"))
        .or_else(|| value.strip_prefix("0x"))
        .or_else(|| value.strip_prefix("0X"));
    if let Some(hex) = hex {
        let cp = i32::from_str_radix(hex, 16)
            .with_context(|| format!("Invalid hexadecimal codepoint: {value}"))?;
        return Ok(Codepoint::new(cp));
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(Codepoint::from(ch)),
        _ => bail!("Expected U+XXXX, 0xXXXX or a single character, got {value:?}"),
    }
}

/// Report each codepoint of an already loaded font.
pub fn inspect_font(
    font: &Font,
    codepoints: &[Codepoint],
    weight_at: Option<f64>,
) -> Result<Vec<Inspection>> {
    codepoints
        .iter()
        .map(|&codepoint| {
            let glyph = font.glyph(codepoint)?;
            let stem_weight = match weight_at {
                Some(rel) => stem_weight(font, codepoint, rel)?,
                None => None,
            };
            Ok(Inspection { codepoint, report: GlyphReport::new(font, glyph), stem_weight })
        })
        .collect()
}

pub fn inspect(path: &Path, codepoints: &[Codepoint], weight_at: Option<f64>) -> Result<Vec<Inspection>> {
    let font = open_font(path).with_context(|| format!("Failed to open {}", path.display()))?;
    inspect_font(&font, codepoints, weight_at)
        .with_context(|| format!("Failed to inspect {}", path.display()))
}
