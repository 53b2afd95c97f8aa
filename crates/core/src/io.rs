//! Shared file utilities.

use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::glob;
use log::error;
use quillwort_outline::Font;
use quillwort_sfnt::{SfntError, open_font};

/// Expand each argument as a glob pattern; plain paths pass through.
///
/// A pattern matching nothing is an error, so a typo never builds nothing.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let matches: Vec<PathBuf> = glob(pattern)
            .with_context(|| format!("Failed to glob pattern: {pattern}"))?
            .filter_map(Result::ok)
            .collect();
        if matches.is_empty() {
            bail!("No file matches {pattern}");
        }
        paths.extend(matches);
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

/// A loader resolving source names against `src_dir`.
pub fn source_loader<'a>(src_dir: &'a Path) -> impl Fn(&str) -> Result<Font, SfntError> + Sync + 'a {
    move |name: &str| open_font(src_dir.join(name))
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    create_dir_all(dir).with_context(|| format!("Failed to create directory: {}", dir.display()))
}

/// Log every failure in a batch with its file name and bail if any failed.
pub fn check_results_with_paths<T, P: AsRef<Path>>(
    results: &[(P, Result<T>)],
    operation: &str,
) -> Result<()> {
    let errors: Vec<_> = results
        .iter()
        .filter_map(|(path, r)| r.as_ref().err().map(|e| (path.as_ref(), e)))
        .collect();

    if !errors.is_empty() {
        for (path, err) in &errors {
            error!("{}: {err:#}", path.display());
        }
        bail!("{operation} failed for {} of {} files", errors.len(), results.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_expand_patterns() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["regular.json", "bold.json", "notes.txt"] {
            write(dir.path().join(name), "{}").unwrap();
        }
        let pattern = dir.path().join("*.json").to_string_lossy().into_owned();
        let plain = dir.path().join("notes.txt").to_string_lossy().into_owned();

        let paths = expand_patterns(&[pattern.clone(), plain, pattern]).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths[0].ends_with("bold.json"));
    }

    #[test]
    fn test_unmatched_pattern_fails() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = dir.path().join("*.json").to_string_lossy().into_owned();
        assert!(expand_patterns(&[pattern]).is_err());
    }

    #[test]
    fn test_check_results_with_paths() {
        let ok: Vec<(PathBuf, Result<()>)> = vec![(PathBuf::from("a.json"), Ok(()))];
        assert!(check_results_with_paths(&ok, "build").is_ok());

        let failed = vec![
            (PathBuf::from("a.json"), Ok(())),
            (PathBuf::from("b.json"), Err(anyhow!("boom"))),
        ];
        let err = check_results_with_paths(&failed, "build").unwrap_err();
        assert_eq!(err.to_string(), "build failed for 1 of 2 files");
    }
}
