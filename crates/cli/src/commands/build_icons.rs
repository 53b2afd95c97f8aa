use anyhow::Result;
use log::info;
use quillwort_core::{IconBuild, build_icons as build_icon_font_file, load_glyph_sets};
use quillwort_merge::stock_icon_sets;
use quillwort_metadata::FontVersion;
use quillwort_metrics::Envelope;

use crate::cli::IconArgs;

pub fn build_icons(args: &IconArgs) -> Result<()> {
    let sets = match &args.config {
        Some(path) => load_glyph_sets(path)?,
        None => stock_icon_sets(),
    };
    info!("building icon font from {} glyph sets", sets.len());

    let build = IconBuild {
        sets: &sets,
        cell: Envelope::new(args.width as f64, args.ascent as f64, args.descent as f64),
        version: FontVersion::parse(Some(&args.version))?,
    };
    build_icon_font_file(&build, &args.src_dir, &args.dst_dir)?;
    Ok(())
}
