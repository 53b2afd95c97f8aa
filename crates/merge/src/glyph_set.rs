//! Declarative codepoint remapping rules.

use std::{collections::BTreeSet, ops::RangeInclusive};

use quillwort_metrics::{FitPolicy, HAlign, VAlign};
use quillwort_outline::Codepoint;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{MergeError, Result};

const MAX_CODEPOINT: u32 = 0x10FFFF;

/// Map the source range `[start, stop]` onto destinations starting at `dst_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphMap {
    pub src_range: (u32, u32),
    pub dst_start: u32,
}

impl GlyphMap {
    pub fn new(src_start: u32, src_stop: u32, dst_start: u32) -> Self {
        Self { src_range: (src_start, src_stop), dst_start }
    }

    /// Map a single codepoint onto itself.
    pub fn identity(codepoint: u32) -> Self {
        Self::new(codepoint, codepoint, codepoint)
    }

    pub fn src_start(&self) -> u32 {
        self.src_range.0
    }

    pub fn src_stop(&self) -> u32 {
        self.src_range.1
    }

    pub fn sources(&self) -> RangeInclusive<u32> {
        self.src_start()..=self.src_stop()
    }

    /// Last destination codepoint; only meaningful for a valid map.
    pub fn dst_stop(&self) -> u32 {
        self.dst_start + self.src_stop().saturating_sub(self.src_start())
    }

    /// Destination of `source`, if it lies in this map's source range.
    pub fn destination(&self, source: u32) -> Option<Codepoint> {
        self.sources()
            .contains(&source)
            .then(|| Codepoint::new((self.dst_start + (source - self.src_start())) as i32))
    }

    fn validate(&self, font: &str) -> Result<()> {
        let (start, stop) = self.src_range;
        let in_bounds = stop <= MAX_CODEPOINT
            && self.dst_start.checked_add(stop.saturating_sub(start)).is_some_and(|end| end <= MAX_CODEPOINT);
        if start > stop || !in_bounds {
            return Err(MergeError::InvalidRange { font: font.to_string(), start, stop });
        }
        Ok(())
    }
}

/// One source font, the ranges it contributes and the batch policy shared by all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphSet {
    /// Path of the source font, relative to the source directory.
    pub source: String,
    pub glyph_maps: Vec<GlyphMap>,
    #[serde(default)]
    pub fit_target: FitPolicy,
    #[serde(default, deserialize_with = "halign_or_none")]
    pub halign: HAlign,
    #[serde(default, deserialize_with = "valign_or_none")]
    pub valign: VAlign,
}

impl GlyphSet {
    /// A set with the default policy: fit to the widest glyph, center, align on the common bottom.
    pub fn new(source: impl Into<String>, glyph_maps: Vec<GlyphMap>) -> Self {
        Self {
            source: source.into(),
            glyph_maps,
            fit_target: FitPolicy::default(),
            halign: HAlign::default(),
            valign: VAlign::default(),
        }
    }

    pub fn with_fit_target(mut self, fit_target: FitPolicy) -> Self {
        self.fit_target = fit_target;
        self
    }

    pub fn with_align(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }

    /// Check every range and that no two destination ranges overlap.
    pub fn validate(&self) -> Result<()> {
        if self.glyph_maps.is_empty() {
            return Err(MergeError::NoGlyphMaps { font: self.source.clone() });
        }
        for map in &self.glyph_maps {
            map.validate(&self.source)?;
        }

        let mut by_dst: Vec<&GlyphMap> = self.glyph_maps.iter().collect();
        by_dst.sort_by_key(|m| m.dst_start);
        for pair in by_dst.windows(2) {
            let (first, second) = (pair[0], pair[1]);
            if second.dst_start <= first.dst_stop() {
                return Err(MergeError::OverlappingDestination {
                    font: self.source.clone(),
                    first_start: first.dst_start,
                    first_stop: first.dst_stop(),
                    second_start: second.dst_start,
                    second_stop: second.dst_stop(),
                });
            }
        }
        Ok(())
    }

    /// Every source codepoint covered by any map, deduplicated, ascending.
    pub fn source_codepoints(&self) -> BTreeSet<Codepoint> {
        self.glyph_maps
            .iter()
            .flat_map(|m| m.sources())
            .map(|cp| Codepoint::new(cp as i32))
            .collect()
    }
}

/// Validate a list of sets, reporting the first invalid one.
pub fn validate_all(sets: &[GlyphSet]) -> Result<()> {
    sets.iter().try_for_each(GlyphSet::validate)
}

fn halign_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<HAlign, D::Error> {
    Ok(Option::deserialize(deserializer)?.unwrap_or(HAlign::None))
}

fn valign_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<VAlign, D::Error> {
    Ok(Option::deserialize(deserializer)?.unwrap_or(VAlign::None))
}
