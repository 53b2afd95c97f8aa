//! Build pipeline for composite fonts.

mod steps;

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use log::info;
use quillwort_metadata::{FontMeta, FontVersion};
use quillwort_outline::Font;
use quillwort_sfnt::generate;

use crate::{config::Parameter, io::ensure_dir};
pub use steps::{BUILD_STEPS, PipelineStep};

/// Command-line options shared by every build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub version: FontVersion,
    pub copyright_file: Option<PathBuf>,
    pub license_url: Option<String>,
}

/// Read-only inputs of one build.
pub struct BuildContext<'a> {
    pub parameter: &'a Parameter,
    pub src_dir: &'a Path,
    pub options: &'a BuildOptions,
}

/// Intermediate fonts handed from step to step.
#[derive(Default)]
pub struct BuildState {
    pub latin: Option<Font>,
    pub wide: Option<Font>,
    pub icons: Option<Font>,
    pub merged: Option<Font>,
    pub meta: Option<FontMeta>,
}

/// A finished composite font, ready to be written.
#[derive(Debug)]
pub struct BuiltFont {
    pub font: Font,
    pub meta: FontMeta,
}

impl BuiltFont {
    pub fn file_name(&self) -> String {
        format!("{}.ttf", self.meta.naming.postscript_name())
    }

    /// Write `{dst_dir}/{postscript name}.ttf`.
    pub fn generate(&self, dst_dir: &Path) -> Result<PathBuf> {
        ensure_dir(dst_dir)?;
        let path = dst_dir.join(self.file_name());
        generate(&self.font, &self.meta, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

pub fn run_step(
    name: &str,
    step_num: usize,
    total: usize,
    ctx: &BuildContext,
    state: &mut BuildState,
    f: impl Fn(&BuildContext, &mut BuildState) -> Result<()>,
) -> Result<()> {
    info!("[{step_num}/{total}] {name}");
    let start = Instant::now();
    f(ctx, state).with_context(|| format!("step '{name}' failed"))?;
    info!("  {name} done ({:.2}s)", start.elapsed().as_secs_f64());
    Ok(())
}

pub fn run_steps(steps: &[PipelineStep], ctx: &BuildContext, state: &mut BuildState) -> Result<()> {
    let total = steps.len();
    for (i, (name, step_fn)) in steps.iter().enumerate() {
        run_step(name, i + 1, total, ctx, state, step_fn)?;
    }
    Ok(())
}

/// Compose the font described by `parameter` from sources under `src_dir`.
pub fn build_font(parameter: &Parameter, src_dir: &Path, options: &BuildOptions) -> Result<BuiltFont> {
    let ctx = BuildContext { parameter, src_dir, options };
    let mut state = BuildState::default();
    let start = Instant::now();

    info!("building {}", parameter.postscript_name());
    run_steps(BUILD_STEPS, &ctx, &mut state)?;

    let font = state.merged.context("merge step produced no font")?;
    let meta = state.meta.context("metadata step produced no metadata")?;
    info!(
        "built {} ({} glyphs) in {:.2}s",
        parameter.postscript_name(),
        font.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(BuiltFont { font, meta })
}
