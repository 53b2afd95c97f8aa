use std::path::Path;

use anyhow::Result;
use quillwort_core::{inspect as inspect_glyphs, parse_codepoint};
use quillwort_outline::Codepoint;

/// Print the metric report of each requested glyph.
pub fn inspect(font: &Path, codepoints: &[String], weight: Option<f64>) -> Result<()> {
    let codepoints = codepoints
        .iter()
        .map(|value| parse_codepoint(value))
        .collect::<Result<Vec<Codepoint>>>()?;

    println!("{}", font.display());
    for inspection in inspect_glyphs(font, &codepoints, weight)? {
        println!("\n{inspection}");
    }
    Ok(())
}
