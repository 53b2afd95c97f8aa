//! Pipeline step definitions.

use std::fs::read_to_string;

use anyhow::{Context, Result};
use log::info;
use quillwort_merge::{Overlap, merge_layer};
use quillwort_metadata::{
    FontMeta, FontNaming, LANG_JP, LANG_US, NAME_ID_COPYRIGHT, NAME_ID_LICENSE_URL,
    NAME_ID_SUBFAMILY, NameTable,
};
use quillwort_outline::Font;

use super::{BuildContext, BuildState};
use crate::layers::{prepare_icons, prepare_latin, prepare_wide};

pub type PipelineStep = (&'static str, fn(&BuildContext, &mut BuildState) -> Result<()>);

pub const BUILD_STEPS: &[PipelineStep] = &[
    ("prepare-base-layers", step_prepare_base_layers),
    ("prepare-icons", step_prepare_icons),
    ("merge-layers", step_merge_layers),
    ("assemble-metadata", step_assemble_metadata),
];

fn step_prepare_base_layers(ctx: &BuildContext, state: &mut BuildState) -> Result<()> {
    let parameter = ctx.parameter;
    let (latin, wide) = rayon::join(
        || prepare_latin(&parameter.latin, parameter.shape_to, parameter.skew, ctx.src_dir),
        || prepare_wide(&parameter.wide, parameter.shape_to, parameter.skew, ctx.src_dir),
    );
    state.latin = Some(latin?);
    state.wide = Some(wide?);
    Ok(())
}

fn step_prepare_icons(ctx: &BuildContext, state: &mut BuildState) -> Result<()> {
    state.icons = Some(prepare_icons(ctx.parameter, ctx.src_dir)?);
    Ok(())
}

fn step_merge_layers(ctx: &BuildContext, state: &mut BuildState) -> Result<()> {
    let shape_to = ctx.parameter.shape_to;
    let mut merged = Font::new(shape_to.ascent, shape_to.descent);

    let layers = [
        ("latin", state.latin.take()),
        ("wide", state.wide.take()),
        ("icons", state.icons.take()),
    ];
    for (name, layer) in layers {
        let layer = layer.with_context(|| format!("{name} layer was not prepared"))?;
        let copied = merge_layer(&mut merged, &layer, Overlap::Preserve);
        info!("  {name}: {copied} of {} glyphs merged", layer.len());
    }

    state.merged = Some(merged);
    Ok(())
}

fn step_assemble_metadata(ctx: &BuildContext, state: &mut BuildState) -> Result<()> {
    let parameter = ctx.parameter;
    let options = ctx.options;

    let mut names = NameTable::new();
    names.append(&[LANG_US], NAME_ID_SUBFAMILY, &parameter.style_name);
    if let Some(path) = &options.copyright_file {
        let copyright = read_to_string(path)
            .with_context(|| format!("Failed to read copyright file: {}", path.display()))?;
        names.append(&[LANG_US, LANG_JP], NAME_ID_COPYRIGHT, copyright.trim_end());
    }
    if let Some(url) = &options.license_url {
        names.append(&[LANG_US, LANG_JP], NAME_ID_LICENSE_URL, url);
    }

    let mut os2 = parameter.os2_table.clone();
    os2.apply_default_vertical_metrics(parameter.shape_to.ascent, parameter.shape_to.descent);

    let naming = FontNaming::new(&parameter.family_name, &parameter.style_name, &parameter.weight_name);
    let meta = FontMeta::new(naming, options.version.clone())
        .with_names(names)
        .with_os2(os2)
        .with_underline(parameter.upos, None)
        .with_skew(parameter.skew);
    info!("  {} {}", meta.naming.full_name(), meta.version.version_string());

    state.meta = Some(meta);
    Ok(())
}
