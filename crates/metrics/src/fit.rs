//! Single-glyph metric fitting.

use log::trace;
use quillwort_outline::Glyph;

use crate::{FitError, Result};

/// A target cell: advance width plus the vertical extent above and below the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl Envelope {
    pub fn new(width: f64, ascent: f64, descent: f64) -> Self {
        Self { width, ascent, descent }
    }

    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// Scale `glyph` uniformly into `target` and center it in the new advance.
///
/// The scale is the smallest of `target.width / advance`,
/// `target.ascent / font_ascent` and `target.descent / font_descent`, where
/// the font metrics are those the glyph was drawn against. Returns the
/// applied scale. Afterwards the advance width is exactly `target.width`.
pub fn fit(glyph: &mut Glyph, font_ascent: f64, font_descent: f64, target: Envelope) -> Result<f64> {
    if glyph.width == 0.0 {
        return Err(FitError::ZeroAdvance(glyph.codepoint()));
    }
    if font_ascent == 0.0 || font_descent == 0.0 {
        return Err(FitError::ZeroMetric { ascent: font_ascent, descent: font_descent });
    }

    let scale = fit_scale([
        target.width / glyph.width,
        target.ascent / font_ascent,
        target.descent / font_descent,
    ]);
    trace!("fit {}: scale {scale}", glyph.codepoint());

    glyph.scale(scale);
    resize_width(glyph, target.width, false, true)?;
    Ok(scale)
}

/// The largest uniform scale that respects every ratio.
pub fn fit_scale(ratios: [f64; 3]) -> f64 {
    ratios.into_iter().fold(f64::INFINITY, f64::min)
}

/// Set the advance width to `width`.
///
/// With `rescale` the glyph is first scaled by `width / advance`; with
/// `retain_position` it is then shifted by half the change in advance so its
/// ink stays in the same place relative to the cell center.
pub fn resize_width(
    glyph: &mut Glyph,
    width: f64,
    rescale: bool,
    retain_position: bool,
) -> Result<()> {
    if rescale {
        if glyph.width == 0.0 {
            return Err(FitError::ZeroAdvance(glyph.codepoint()));
        }
        glyph.scale(width / glyph.width);
    }
    if retain_position {
        glyph.translate((width - glyph.width) / 2.0, 0.0);
    }
    glyph.width = width;
    Ok(())
}

/// Center the ink horizontally within the current advance width.
pub fn align_center(glyph: &mut Glyph) {
    let bbox = glyph.bounding_box();
    let right_margin = glyph.width - bbox.x1;
    glyph.translate((right_margin - bbox.x0) / 2.0, 0.0);
}

#[cfg(test)]
mod tests {
    use kurbo::{BezPath, Rect};
    use quillwort_outline::Outline;

    use super::*;

    fn rect_glyph(width: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> Glyph {
        let mut path = BezPath::new();
        path.move_to((x0, y0));
        path.line_to((x0, y1));
        path.line_to((x1, y1));
        path.line_to((x1, y0));
        path.close_path();
        Glyph::new(0x41, width).with_outline(Outline::new(vec![path]))
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_resize_width_rescale() {
        let mut glyph = rect_glyph(400.0, 100.0, 0.0, 300.0, 200.0);
        resize_width(&mut glyph, 1000.0, true, true).unwrap();
        assert_eq!(glyph.width, 1000.0);
        assert_eq!(glyph.bounding_box(), Rect::new(250.0, 0.0, 750.0, 500.0));
    }

    #[test]
    fn test_resize_width_without_rescale_recenters() {
        let mut glyph = rect_glyph(500.0, 100.0, 0.0, 400.0, 700.0);
        resize_width(&mut glyph, 600.0, false, true).unwrap();
        assert_eq!(glyph.width, 600.0);
        assert_eq!(glyph.bounding_box(), Rect::new(150.0, 0.0, 450.0, 700.0));
    }

    #[test]
    fn test_resize_width_plain() {
        let mut glyph = rect_glyph(500.0, 100.0, 0.0, 400.0, 700.0);
        resize_width(&mut glyph, 600.0, false, false).unwrap();
        assert_eq!(glyph.width, 600.0);
        assert_eq!(glyph.bounding_box().x0, 100.0);
    }

    #[test]
    fn test_fit_width_bound() {
        // drawn at 1000/800/200, fitted into 500/800/200: width is the tightest ratio
        let mut glyph = rect_glyph(1000.0, 0.0, -200.0, 1000.0, 800.0);
        let scale = fit(&mut glyph, 800.0, 200.0, Envelope::new(500.0, 800.0, 200.0)).unwrap();
        assert_close(scale, 0.5);
        assert_eq!(glyph.width, 500.0);
        let bbox = glyph.bounding_box();
        assert_close(bbox.x0, 0.0);
        assert_close(bbox.x1, 500.0);
        assert_close(bbox.y0, -100.0);
    }

    #[test]
    fn test_fit_height_bound_centers() {
        let mut glyph = rect_glyph(600.0, 0.0, -200.0, 600.0, 800.0);
        let scale = fit(&mut glyph, 800.0, 200.0, Envelope::new(600.0, 400.0, 100.0)).unwrap();
        assert_close(scale, 0.5);
        assert_eq!(glyph.width, 600.0);
        let bbox = glyph.bounding_box();
        assert_close(bbox.x0, 150.0);
        assert_close(bbox.x1, 450.0);
        assert!(bbox.height() <= 500.0 + 1e-9);
    }

    #[test]
    fn test_fit_scale_is_minimum() {
        let samples = [
            [1.0, 2.0, 3.0],
            [3.0, 2.0, 1.0],
            [2.0, 0.5, 0.5],
            [0.7, 0.7, 0.7],
            [1e-3, 1e3, 1.0],
        ];
        for ratios in samples {
            let expected = ratios.iter().copied().fold(f64::INFINITY, f64::min);
            assert_eq!(fit_scale(ratios), expected);
        }
    }

    #[test]
    fn test_fit_rejects_zero_advance() {
        let mut glyph = rect_glyph(0.0, 0.0, 0.0, 10.0, 10.0);
        assert!(matches!(
            fit(&mut glyph, 800.0, 200.0, Envelope::new(500.0, 800.0, 200.0)),
            Err(FitError::ZeroAdvance(_))
        ));
    }

    #[test]
    fn test_fit_rejects_zero_metric() {
        let mut glyph = rect_glyph(500.0, 0.0, 0.0, 10.0, 10.0);
        assert!(matches!(
            fit(&mut glyph, 800.0, 0.0, Envelope::new(500.0, 800.0, 200.0)),
            Err(FitError::ZeroMetric { .. })
        ));
    }

    #[test]
    fn test_align_center() {
        let mut glyph = rect_glyph(1000.0, 100.0, 0.0, 300.0, 100.0);
        align_center(&mut glyph);
        assert_eq!(glyph.bounding_box(), Rect::new(400.0, 0.0, 600.0, 100.0));
        assert_eq!(glyph.width, 1000.0);
    }
}
