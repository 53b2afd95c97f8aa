//! Per-source preparation of the three base layers.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use quillwort_carve::{broken_vline, cut_m, dot_zero, zenkaku_space};
use quillwort_merge::{FontLoader, GlyphSet, merge_glyph_sets};
use quillwort_metrics::{Envelope, ReshapePlan, ShapeSpec, WidthClass, reshape_font, skew_font};
use quillwort_outline::Font;
use quillwort_sfnt::open_font;

use crate::{
    config::{IconSource, LatinConfig, Parameter, WideConfig},
    io::source_loader,
};

fn open_source(src_dir: &Path, source: &str) -> Result<Font> {
    let path = src_dir.join(source);
    open_font(&path).with_context(|| format!("Failed to open source font: {}", path.display()))
}

/// Open the Latin source, carve its derived forms and reshape it to half width.
pub fn prepare_latin(
    config: &LatinConfig,
    shape_to: ShapeSpec,
    skew: f64,
    src_dir: &Path,
) -> Result<Font> {
    let mut font = open_source(src_dir, &config.source)?;
    if config.m_cutoff > 0 {
        cut_m(&mut font, config.m_cutoff as f64).context("latin: cut m")?;
    }
    if config.dot_zero {
        dot_zero(&mut font).context("latin: dot zero")?;
    }
    if config.broken_vline {
        broken_vline(&mut font).context("latin: broken vertical line")?;
    }

    let plan = ReshapePlan::new(config.shape_as, shape_to, WidthClass::Half);
    reshape_font(&mut font, &plan).with_context(|| format!("{}: reshape", config.source))?;
    skew_font(&mut font, skew);
    info!("{}: {} glyphs prepared", config.source, font.len());
    Ok(font)
}

/// Open the wide source and reshape it, classing glyphs by width.
pub fn prepare_wide(
    config: &WideConfig,
    shape_to: ShapeSpec,
    skew: f64,
    src_dir: &Path,
) -> Result<Font> {
    let mut font = open_source(src_dir, &config.source)?;
    if config.visualize_zenkaku_space {
        zenkaku_space(&mut font).context("wide: zenkaku space")?;
    }

    let plan = ReshapePlan::new(config.shape_as, shape_to, WidthClass::ByEm)
        .with_baseline_shift(config.baseline_shift)
        .with_weight(config.weight);
    reshape_font(&mut font, &plan).with_context(|| format!("{}: reshape", config.source))?;
    skew_font(&mut font, skew);
    info!("{}: {} glyphs prepared", config.source, font.len());
    Ok(font)
}

/// Build or open the icon layer and bring it to the target metrics.
pub fn prepare_icons(parameter: &Parameter, src_dir: &Path) -> Result<Font> {
    let icons = &parameter.icons;
    let mut font = match icons.source()? {
        IconSource::Prebuilt(source) => open_source(src_dir, source)?,
        IconSource::GlyphSets(sets) => {
            let cell = icons.cell(&parameter.shape_to);
            build_icon_font(sets, &source_loader(src_dir), cell)?
        }
    };

    if let Some(shape_as) = icons.shape_as {
        let plan = ReshapePlan::new(shape_as, parameter.shape_to, WidthClass::Half);
        reshape_font(&mut font, &plan).context("icons: reshape")?;
    }
    info!("icons: {} glyphs prepared", font.len());
    Ok(font)
}

/// Merge glyph sets into a fresh font whose metrics are the cell's.
pub fn build_icon_font(
    sets: &[GlyphSet],
    loader: &impl FontLoader,
    cell: Envelope,
) -> Result<Font> {
    let accumulator = Font::new(cell.ascent.round() as i32, cell.descent.round() as i32);
    merge_glyph_sets(sets, loader, accumulator, cell).context("Failed to merge icon glyph sets")
}
