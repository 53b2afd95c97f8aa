//! Standalone icon font builds.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use quillwort_merge::GlyphSet;
use quillwort_metadata::{FontMeta, FontNaming, FontVersion, Os2Table};
use quillwort_metrics::Envelope;
use quillwort_sfnt::generate;

use crate::{
    config::ICON_FAMILY,
    io::{ensure_dir, source_loader},
    layers::build_icon_font,
};

/// One icon font build: glyph sets normalized into a single cell.
pub struct IconBuild<'a> {
    pub sets: &'a [GlyphSet],
    pub cell: Envelope,
    pub version: FontVersion,
}

/// Build the icon font from sources under `src_dir` into `{dst_dir}/NerdFont.ttf`.
pub fn build_icons(build: &IconBuild, src_dir: &Path, dst_dir: &Path) -> Result<PathBuf> {
    let font = build_icon_font(build.sets, &source_loader(src_dir), build.cell)?;

    let (ascent, descent) = (font.ascent, font.descent);
    let meta = FontMeta::new(FontNaming::new(ICON_FAMILY, "Regular", "Regular"), build.version.clone())
        .with_os2(Os2Table::default_vertical_metrics(ascent, descent));

    ensure_dir(dst_dir)?;
    let path = dst_dir.join(format!("{ICON_FAMILY}.ttf"));
    generate(&font, &meta, &path).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("wrote {} ({} glyphs)", path.display(), font.len());
    Ok(path)
}
