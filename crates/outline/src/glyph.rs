//! Glyphs and their outlines.

use kurbo::{Affine, BezPath, Rect, Shape, Vec2};

use crate::{Codepoint, GlyphPen, Result, clip::ClipRegion, embolden::embolden_contours};

/// The vector shape of a glyph.
///
/// `contours` are the glyph's ink. `operands` hold contours drawn through a
/// [`GlyphPen`] (or pasted as operands) that wait for a boolean operation;
/// they never contribute ink on their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    contours: Vec<BezPath>,
    operands: Vec<BezPath>,
}

impl Outline {
    pub fn new(contours: Vec<BezPath>) -> Self {
        Self { contours, operands: Vec::new() }
    }

    pub fn contours(&self) -> &[BezPath] {
        &self.contours
    }

    pub fn operands(&self) -> &[BezPath] {
        &self.operands
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn push_contour(&mut self, contour: BezPath) {
        if !contour.elements().is_empty() {
            self.contours.push(contour);
        }
    }

    pub fn push_operand(&mut self, contour: BezPath) {
        if !contour.elements().is_empty() {
            self.operands.push(contour);
        }
    }

    /// Union another outline's contours into this one, without resolving overlaps.
    pub fn merge(&mut self, other: &Outline) {
        self.contours.extend(other.contours.iter().cloned());
    }

    /// Ink extents as `(left, bottom, right, top)`; zero-area at the origin when empty.
    pub fn bounding_box(&self) -> Rect {
        self.contours
            .iter()
            .map(|c| c.bounding_box())
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO)
    }

    pub fn apply_affine(&mut self, affine: Affine) {
        for path in self.contours.iter_mut().chain(self.operands.iter_mut()) {
            path.apply_affine(affine);
        }
    }

    pub(crate) fn take_operands(&mut self) -> Vec<BezPath> {
        std::mem::take(&mut self.operands)
    }

    pub(crate) fn contours_mut(&mut self) -> &mut Vec<BezPath> {
        &mut self.contours
    }
}

/// A glyph: one outline plus a declared advance width.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    codepoint: Codepoint,
    /// Declared advance width, independent of the ink extent.
    pub width: f64,
    pub outline: Outline,
}

impl Glyph {
    pub fn new(codepoint: impl Into<Codepoint>, width: f64) -> Self {
        Self { codepoint: codepoint.into(), width, outline: Outline::default() }
    }

    pub fn with_outline(mut self, outline: Outline) -> Self {
        self.outline = outline;
        self
    }

    pub fn codepoint(&self) -> Codepoint {
        self.codepoint
    }

    pub(crate) fn set_codepoint(&mut self, codepoint: Codepoint) {
        self.codepoint = codepoint;
    }

    /// Ink extents as `(left, bottom, right, top)`.
    pub fn bounding_box(&self) -> Rect {
        self.outline.bounding_box()
    }

    /// Whether the glyph would produce any output (ink or advance).
    pub fn is_worth_outputting(&self) -> bool {
        !self.outline.is_empty() || self.width != 0.0
    }

    /// Apply an affine transform to the outline only; the advance width is untouched.
    pub fn transform(&mut self, affine: Affine) {
        self.outline.apply_affine(affine);
    }

    /// Uniformly scale about the origin. Scales the advance width too.
    pub fn scale(&mut self, factor: f64) {
        self.transform(Affine::scale(factor));
        self.width *= factor;
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        if dx != 0.0 || dy != 0.0 {
            self.transform(Affine::translate(Vec2::new(dx, dy)));
        }
    }

    /// Shear horizontally by `angle` radians: `x' = x + tan(angle) * y`.
    pub fn skew(&mut self, angle: f64) {
        self.transform(Affine::skew(angle.tan(), 0.0));
    }

    /// A pen appending boolean operands to this glyph.
    pub fn pen(&mut self) -> GlyphPen<'_> {
        GlyphPen::new(&mut self.outline)
    }

    /// Replace the contours with `fill(contours) ∩ fill(operands)` and clear the operands.
    ///
    /// A glyph without operands is left as is.
    pub fn intersect(&mut self) -> Result<()> {
        let operands = self.outline.take_operands();
        if operands.is_empty() {
            return Ok(());
        }
        let region = ClipRegion::from_operands(&operands)
            .ok_or(crate::OutlineError::UnsupportedOperands {
                codepoint: self.codepoint,
                count: operands.len(),
            })?;
        let clipped = region.clip(self.outline.contours());
        *self.outline.contours_mut() = clipped;
        Ok(())
    }

    /// Thicken (or thin, for negative `delta`) every stroke by `delta` font units.
    pub fn embolden(&mut self, delta: f64) {
        if delta != 0.0 {
            embolden_contours(self.outline.contours_mut(), delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::*;
    use crate::draw_rectangle;

    fn square(x: f64, y: f64, size: f64) -> BezPath {
        let mut path = BezPath::new();
        path.move_to((x, y));
        path.line_to((x, y + size));
        path.line_to((x + size, y + size));
        path.line_to((x + size, y));
        path.close_path();
        path
    }

    #[test]
    fn test_bounding_box_empty() {
        let glyph = Glyph::new(0x20, 500.0);
        assert_eq!(glyph.bounding_box(), Rect::ZERO);
    }

    #[test]
    fn test_bounding_box_union() {
        let glyph = Glyph::new(0x41, 500.0)
            .with_outline(Outline::new(vec![square(10.0, 0.0, 100.0), square(200.0, -50.0, 20.0)]));
        assert_eq!(glyph.bounding_box(), Rect::new(10.0, -50.0, 220.0, 100.0));
    }

    #[test]
    fn test_scale_scales_width() {
        let mut glyph =
            Glyph::new(0x41, 400.0).with_outline(Outline::new(vec![square(100.0, 0.0, 200.0)]));
        glyph.scale(2.5);
        assert_eq!(glyph.width, 1000.0);
        assert_eq!(glyph.bounding_box(), Rect::new(250.0, 0.0, 750.0, 500.0));
    }

    #[test]
    fn test_translate_keeps_width() {
        let mut glyph =
            Glyph::new(0x41, 400.0).with_outline(Outline::new(vec![square(0.0, 0.0, 10.0)]));
        glyph.translate(5.0, -3.0);
        assert_eq!(glyph.width, 400.0);
        assert_eq!(glyph.bounding_box(), Rect::new(5.0, -3.0, 15.0, 7.0));
    }

    #[test]
    fn test_skew() {
        let mut glyph =
            Glyph::new(0x49, 500.0).with_outline(Outline::new(vec![square(0.0, 0.0, 100.0)]));
        glyph.skew(std::f64::consts::FRAC_PI_4);
        let bbox = glyph.bounding_box();
        assert!((bbox.x1 - 200.0).abs() < 1e-9);
        assert!((bbox.y1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_intersect_without_operands_is_noop() {
        let mut glyph =
            Glyph::new(0x41, 500.0).with_outline(Outline::new(vec![square(0.0, 0.0, 100.0)]));
        let before = glyph.clone();
        glyph.intersect().unwrap();
        assert_eq!(glyph, before);
    }

    #[test]
    fn test_intersect_erases_region() {
        let mut glyph =
            Glyph::new(0x41, 500.0).with_outline(Outline::new(vec![square(0.0, 0.0, 100.0)]));
        {
            let mut pen = glyph.pen();
            draw_rectangle(&mut pen, Point::new(-10.0, -10.0), 200.0, 200.0, false);
            draw_rectangle(&mut pen, Point::new(-10.0, -10.0), 200.0, 60.0, true);
        }
        glyph.intersect().unwrap();
        assert!(glyph.outline.operands().is_empty());
        assert_eq!(glyph.bounding_box(), Rect::new(0.0, 50.0, 100.0, 100.0));
    }
}
