//! Drawing boolean operands into a glyph.

use kurbo::{BezPath, PathEl, Point};

use crate::Outline;

/// A pen that appends closed contours to a glyph's boolean operands.
///
/// Contours are committed on [`close`](GlyphPen::close); an unclosed contour
/// is closed when the pen is dropped.
pub struct GlyphPen<'a> {
    outline: &'a mut Outline,
    current: BezPath,
}

impl<'a> GlyphPen<'a> {
    pub(crate) fn new(outline: &'a mut Outline) -> Self {
        Self { outline, current: BezPath::new() }
    }

    pub fn move_to(&mut self, p: impl Into<Point>) {
        self.flush();
        self.current.move_to(p);
    }

    pub fn line_to(&mut self, p: impl Into<Point>) {
        self.current.line_to(p);
    }

    pub fn close(&mut self) {
        if !self.current.elements().is_empty() {
            self.current.close_path();
            self.flush();
        }
    }

    fn flush(&mut self) {
        let mut contour = std::mem::take(&mut self.current);
        if contour.elements().len() > 1 {
            if !matches!(contour.elements().last(), Some(PathEl::ClosePath)) {
                contour.close_path();
            }
            self.outline.push_operand(contour);
        }
    }
}

impl Drop for GlyphPen<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Append a `width` x `height` rectangle with its lower-left corner at `origin`.
///
/// The rectangle is drawn clockwise (additive under nonzero fill). With
/// `invert_winding` the point order is reversed, which makes it subtractive.
pub fn draw_rectangle(
    pen: &mut GlyphPen<'_>,
    origin: Point,
    width: f64,
    height: f64,
    invert_winding: bool,
) {
    let Point { x, y } = origin;
    let mut corners = [
        Point::new(x, y + height),
        Point::new(x + width, y + height),
        Point::new(x + width, y),
    ];
    if invert_winding {
        corners.reverse();
    }

    pen.move_to(origin);
    for corner in corners {
        pen.line_to(corner);
    }
    pen.close();
}

#[cfg(test)]
mod tests {
    use kurbo::Shape;

    use super::*;
    use crate::Glyph;

    #[test]
    fn test_rectangle_winding() {
        let mut glyph = Glyph::new(0x30, 600.0);
        {
            let mut pen = glyph.pen();
            draw_rectangle(&mut pen, Point::new(0.0, 0.0), 100.0, 50.0, false);
            draw_rectangle(&mut pen, Point::new(0.0, 0.0), 100.0, 50.0, true);
        }
        let operands = glyph.outline.operands();
        assert_eq!(operands.len(), 2);
        // kurbo's signed area is negative for clockwise paths in y-up space
        assert!((operands[0].area() + 5000.0).abs() < 1e-9);
        assert!((operands[1].area() - 5000.0).abs() < 1e-9);
        assert!(glyph.outline.contours().is_empty());
    }

    #[test]
    fn test_unclosed_contour_closed_on_drop() {
        let mut glyph = Glyph::new(0x30, 600.0);
        {
            let mut pen = glyph.pen();
            pen.move_to((0.0, 0.0));
            pen.line_to((0.0, 10.0));
            pen.line_to((10.0, 10.0));
        }
        assert_eq!(glyph.outline.operands().len(), 1);
    }
}
