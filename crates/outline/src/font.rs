//! An in-memory font: glyphs keyed by codepoint plus vertical metrics.

use std::collections::BTreeMap;

use log::trace;

use crate::{Codepoint, Glyph, OutlineError, Result};

/// How [`Font::paste`] combines a copied glyph with its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteMode {
    /// Replace the destination outline and width.
    Replace,
    /// Union the copied contours into the destination; the width is kept.
    Merge,
    /// Add the copied contours as boolean operands of the destination.
    Operand,
}

/// A collection of glyphs addressed by codepoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    glyphs: BTreeMap<Codepoint, Glyph>,
    /// Distance from the baseline to the top of the em box, positive.
    pub ascent: i32,
    /// Distance from the baseline to the bottom of the em box, positive.
    pub descent: i32,
    /// Units per em.
    pub em: i32,
}

impl Font {
    /// An empty font whose em is `ascent + descent`.
    pub fn new(ascent: i32, descent: i32) -> Self {
        Self { glyphs: BTreeMap::new(), ascent, descent, em: ascent + descent }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn contains(&self, codepoint: impl Into<Codepoint>) -> bool {
        self.glyphs.contains_key(&codepoint.into())
    }

    pub fn get(&self, codepoint: impl Into<Codepoint>) -> Option<&Glyph> {
        self.glyphs.get(&codepoint.into())
    }

    pub fn get_mut(&mut self, codepoint: impl Into<Codepoint>) -> Option<&mut Glyph> {
        self.glyphs.get_mut(&codepoint.into())
    }

    /// Like [`get`](Self::get), but a missing glyph is an error.
    pub fn glyph(&self, codepoint: impl Into<Codepoint>) -> Result<&Glyph> {
        let codepoint = codepoint.into();
        self.glyphs.get(&codepoint).ok_or(OutlineError::MissingGlyph(codepoint))
    }

    /// Like [`get_mut`](Self::get_mut), but a missing glyph is an error.
    pub fn glyph_mut(&mut self, codepoint: impl Into<Codepoint>) -> Result<&mut Glyph> {
        let codepoint = codepoint.into();
        self.glyphs.get_mut(&codepoint).ok_or(OutlineError::MissingGlyph(codepoint))
    }

    /// Insert a glyph at its own codepoint, returning any glyph it displaced.
    pub fn insert(&mut self, glyph: Glyph) -> Option<Glyph> {
        self.glyphs.insert(glyph.codepoint(), glyph)
    }

    pub fn remove(&mut self, codepoint: impl Into<Codepoint>) -> Option<Glyph> {
        self.glyphs.remove(&codepoint.into())
    }

    /// Glyphs in codepoint order.
    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.values()
    }

    pub fn glyphs_mut(&mut self) -> impl Iterator<Item = &mut Glyph> {
        self.glyphs.values_mut()
    }

    pub fn codepoints(&self) -> impl Iterator<Item = Codepoint> + '_ {
        self.glyphs.keys().copied()
    }

    /// A detached copy of the glyph at `codepoint`.
    pub fn copy(&self, codepoint: impl Into<Codepoint>) -> Result<Glyph> {
        self.glyph(codepoint).cloned()
    }

    /// Paste `source` onto `destination`, creating an empty destination glyph
    /// if none exists.
    pub fn paste(&mut self, destination: impl Into<Codepoint>, source: &Glyph, mode: PasteMode) {
        let destination = destination.into();
        trace!("paste {} onto {destination} ({mode:?})", source.codepoint());
        let target = self
            .glyphs
            .entry(destination)
            .or_insert_with(|| Glyph::new(destination, 0.0));
        match mode {
            PasteMode::Replace => {
                target.outline = source.outline.clone();
                target.width = source.width;
            }
            PasteMode::Merge => target.outline.merge(&source.outline),
            PasteMode::Operand => {
                for contour in source.outline.contours() {
                    target.outline.push_operand(contour.clone());
                }
            }
        }
    }

    /// Copy the glyph at `source` and paste it onto `destination` in this font.
    pub fn copy_within(
        &mut self,
        source: impl Into<Codepoint>,
        destination: impl Into<Codepoint>,
        mode: PasteMode,
    ) -> Result<()> {
        let glyph = self.copy(source)?;
        self.paste(destination, &glyph, mode);
        Ok(())
    }

    /// Resolve pending boolean operands on each selected glyph.
    pub fn intersect<I, C>(&mut self, selection: I) -> Result<()>
    where
        I: IntoIterator<Item = C>,
        C: Into<Codepoint>,
    {
        for codepoint in selection {
            self.glyph_mut(codepoint)?.intersect()?;
        }
        Ok(())
    }

    /// Move a glyph to a new codepoint, replacing whatever was there.
    pub fn rekey(&mut self, from: impl Into<Codepoint>, to: impl Into<Codepoint>) -> Result<()> {
        let (from, to) = (from.into(), to.into());
        let mut glyph = self.glyphs.remove(&from).ok_or(OutlineError::MissingGlyph(from))?;
        glyph.set_codepoint(to);
        self.glyphs.insert(to, glyph);
        Ok(())
    }
}
