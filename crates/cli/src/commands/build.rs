use std::{path::PathBuf, time::Instant};

use anyhow::Result;
use log::info;
use quillwort_core::{
    BuildOptions, Parameter, build_font,
    io::{check_results_with_paths, expand_patterns},
};
use quillwort_metadata::FontVersion;
use rayon::prelude::*;

use crate::cli::BuildArgs;

/// Build every parameter file matched by `patterns`, each independently.
pub fn build(args: &BuildArgs, patterns: &[String]) -> Result<()> {
    let start = Instant::now();
    let options = BuildOptions {
        version: FontVersion::parse(Some(&args.version))?,
        copyright_file: args.copyright_file.clone(),
        license_url: args.license_url.clone(),
    };
    let params = expand_patterns(patterns)?;
    info!("building {} fonts into {}", params.len(), args.dst_dir.display());

    let results: Vec<(PathBuf, Result<PathBuf>)> = params
        .par_iter()
        .map(|path| {
            let result = Parameter::load(path)
                .and_then(|parameter| build_font(&parameter, &args.src_dir, &options))
                .and_then(|built| built.generate(&args.dst_dir));
            (path.clone(), result)
        })
        .collect();
    check_results_with_paths(&results, "build")?;

    for output in results.iter().filter_map(|(_, r)| r.as_ref().ok()) {
        info!("wrote {}", output.display());
    }
    info!("built {} fonts in {:.2}s", results.len(), start.elapsed().as_secs_f64());
    Ok(())
}
