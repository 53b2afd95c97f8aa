use kurbo::Point;
use quillwort_outline::{Codepoint, Font, draw_rectangle};

use crate::{CarveError, Result};

/// Measure the ink width of a glyph along a 1-unit slab.
///
/// The slab spans the advance width at `rel_position` times the glyph's ink
/// height. The font is not modified. Returns `None` when the glyph is absent.
pub fn stem_weight(
    font: &Font,
    codepoint: impl Into<Codepoint>,
    rel_position: f64,
) -> Result<Option<f64>> {
    if !(0.0..=1.0).contains(&rel_position) {
        return Err(CarveError::InvalidPosition(rel_position));
    }
    let Some(glyph) = font.get(codepoint) else {
        return Ok(None);
    };

    let mut probe = glyph.clone();
    let height = probe.bounding_box().height();
    let width = probe.width;
    {
        let mut pen = probe.pen();
        draw_rectangle(&mut pen, Point::new(0.0, height * rel_position), width, 1.0, false);
    }
    probe.intersect()?;
    Ok(Some(probe.bounding_box().width()))
}
