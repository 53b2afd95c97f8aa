//! The per-merge state machine: open, normalize, remap, close.
//!
//! Each stage is a distinct type, so stages cannot be skipped or repeated.
//! Sources are normalized in parallel since each touches only its own font;
//! remapping into the accumulator runs in configured order so later sets win.

use std::{marker::PhantomData, time::Instant};

use log::info;
use quillwort_metrics::Envelope;
use quillwort_outline::Font;
use rayon::prelude::*;

use crate::{GlyphSet, LoadError, MergeError, Overlap, Result, normalize, remap_into, validate_all};

/// Loads a source font by its configured name.
pub trait FontLoader: Sync {
    fn load(&self, source: &str) -> std::result::Result<Font, LoadError>;
}

impl<F, E> FontLoader for F
where
    F: Fn(&str) -> std::result::Result<Font, E> + Sync,
    E: Into<LoadError>,
{
    fn load(&self, source: &str) -> std::result::Result<Font, LoadError> {
        self(source).map_err(Into::into)
    }
}

pub struct Opened;
pub struct Normalized;
pub struct Remapped;

/// A merge of several glyph sets into one accumulator font.
pub struct MergeJob<'a, S> {
    sets: &'a [GlyphSet],
    sources: Vec<Font>,
    accumulator: Font,
    cell: Envelope,
    _stage: PhantomData<S>,
}

impl<'a, S> MergeJob<'a, S> {
    fn advance<T>(self) -> MergeJob<'a, T> {
        MergeJob {
            sets: self.sets,
            sources: self.sources,
            accumulator: self.accumulator,
            cell: self.cell,
            _stage: PhantomData,
        }
    }
}

impl<'a> MergeJob<'a, Opened> {
    /// Validate every set, then open every source.
    ///
    /// Configuration errors are reported before any font is loaded.
    pub fn open(
        sets: &'a [GlyphSet],
        loader: &impl FontLoader,
        accumulator: Font,
        cell: Envelope,
    ) -> Result<Self> {
        validate_all(sets)?;
        let sources = sets
            .par_iter()
            .map(|set| {
                loader
                    .load(&set.source)
                    .map_err(|error| MergeError::Load { font: set.source.clone(), error })
            })
            .collect::<Result<Vec<_>>>()?;
        info!("opened {} glyph set sources", sources.len());
        Ok(Self { sets, sources, accumulator, cell, _stage: PhantomData })
    }

    pub fn normalize(mut self) -> Result<MergeJob<'a, Normalized>> {
        let cell = self.cell;
        self.sources
            .par_iter_mut()
            .zip(self.sets.par_iter())
            .try_for_each(|(font, set)| normalize(font, set, cell).map(|_| ()))?;
        Ok(self.advance())
    }
}

impl<'a> MergeJob<'a, Normalized> {
    pub fn remap(mut self) -> MergeJob<'a, Remapped> {
        for (set, source) in self.sets.iter().zip(&self.sources) {
            let copied: usize = set
                .glyph_maps
                .iter()
                .map(|map| remap_into(&mut self.accumulator, source, map, Overlap::Replace))
                .sum();
            info!("{}: copied {copied} glyphs", set.source);
        }
        self.advance()
    }
}

impl MergeJob<'_, Remapped> {
    /// Release the sources and hand back the accumulator.
    pub fn close(self) -> Font {
        self.accumulator
    }
}

/// Run a complete merge job.
pub fn merge_glyph_sets(
    sets: &[GlyphSet],
    loader: &impl FontLoader,
    accumulator: Font,
    cell: Envelope,
) -> Result<Font> {
    let start = Instant::now();
    let font = MergeJob::open(sets, loader, accumulator, cell)?.normalize()?.remap().close();
    info!("merged {} glyph sets in {:.2?}", sets.len(), start.elapsed());
    Ok(font)
}
