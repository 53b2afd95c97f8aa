//! Batch statistics over glyph bounding boxes.

use std::collections::HashMap;

use quillwort_outline::Glyph;

use crate::{FitError, Result};

/// Round to the nearest integer, ties away from zero (`0.5 -> 1`, `-0.5 -> -1`).
pub fn round_half_up(value: f64) -> i64 {
    value.round() as i64
}

/// The most frequent value of a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Unique(i64),
    /// Several values share the highest count; sorted ascending.
    Tied(Vec<i64>),
    Empty,
}

impl Mode {
    pub fn of(values: impl IntoIterator<Item = i64>) -> Self {
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for v in values {
            *counts.entry(v).or_default() += 1;
        }
        let Some(best) = counts.values().copied().max() else {
            return Mode::Empty;
        };

        let mut winners: Vec<i64> =
            counts.into_iter().filter(|(_, n)| *n == best).map(|(v, _)| v).collect();
        winners.sort_unstable();
        match winners.as_slice() {
            [single] => Mode::Unique(*single),
            _ => Mode::Tied(winners),
        }
    }

    /// The unique mode, or an error naming `coordinate`.
    pub fn unique(&self, coordinate: &'static str) -> Result<i64> {
        match self {
            Mode::Unique(v) => Ok(*v),
            Mode::Tied(candidates) => {
                Err(FitError::AmbiguousMode { coordinate, candidates: candidates.clone() })
            }
            Mode::Empty => Err(FitError::EmptyBatch),
        }
    }
}

/// Per-coordinate modes of a batch's rounded bounding boxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxMode {
    pub left: Mode,
    pub bottom: Mode,
    pub right: Mode,
    pub top: Mode,
}

impl BoxMode {
    pub fn of(glyphs: &[&Glyph]) -> Self {
        let boxes: Vec<[i64; 4]> = glyphs
            .iter()
            .map(|g| {
                let b = g.bounding_box();
                [b.x0, b.y0, b.x1, b.y1].map(round_half_up)
            })
            .collect();
        let column = |i: usize| Mode::of(boxes.iter().map(|b| b[i]));
        Self { left: column(0), bottom: column(1), right: column(2), top: column(3) }
    }
}

/// Widest ink extent in the batch, at least zero.
pub fn max_ink_width(glyphs: &[&Glyph]) -> f64 {
    glyphs.iter().map(|g| g.bounding_box().width()).fold(0.0, f64::max)
}

/// Tallest ink extent in the batch, at least zero.
pub fn max_ink_height(glyphs: &[&Glyph]) -> f64 {
    glyphs.iter().map(|g| g.bounding_box().height()).fold(0.0, f64::max)
}

/// Highest ink top in the batch, floored at zero.
pub fn max_ink_top(glyphs: &[&Glyph]) -> f64 {
    glyphs.iter().map(|g| g.bounding_box().y1).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use kurbo::BezPath;
    use quillwort_outline::Outline;

    use super::*;

    fn glyph_with_box(cp: i32, x0: f64, y0: f64, x1: f64, y1: f64) -> Glyph {
        let mut path = BezPath::new();
        path.move_to((x0, y0));
        path.line_to((x0, y1));
        path.line_to((x1, y1));
        path.line_to((x1, y0));
        path.close_path();
        Glyph::new(cp, 1000.0).with_outline(Outline::new(vec![path]))
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(0.5), 1);
        assert_eq!(round_half_up(-0.5), -1);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -3);
        assert_eq!(round_half_up(2.4999), 2);
        assert_eq!(round_half_up(-0.4), 0);
    }

    #[test]
    fn test_mode() {
        assert_eq!(Mode::of([10, 10, -40]), Mode::Unique(10));
        assert_eq!(Mode::of([3, 1, 3, 1, 2]), Mode::Tied(vec![1, 3]));
        assert_eq!(Mode::of(Vec::<i64>::new()), Mode::Empty);
    }

    #[test]
    fn test_tied_mode_is_error() {
        let err = Mode::of([1, 2]).unique("bottom").unwrap_err();
        assert!(matches!(
            err,
            FitError::AmbiguousMode { coordinate: "bottom", ref candidates } if candidates == &[1, 2]
        ));
    }

    #[test]
    fn test_box_mode_rounds_before_counting() {
        let a = glyph_with_box(1, 0.0, 9.5, 100.0, 500.0);
        let b = glyph_with_box(2, 0.0, 10.4, 90.0, 400.0);
        let c = glyph_with_box(3, 0.0, -40.0, 80.0, 300.0);
        let mode = BoxMode::of(&[&a, &b, &c]);
        assert_eq!(mode.bottom, Mode::Unique(10));
        assert_eq!(mode.left, Mode::Unique(0));
        assert!(matches!(mode.top, Mode::Tied(_)));
    }

    #[test]
    fn test_max_extents() {
        let a = glyph_with_box(1, 10.0, -20.0, 110.0, 80.0);
        let b = glyph_with_box(2, 0.0, 0.0, 50.0, 300.0);
        assert_eq!(max_ink_width(&[&a, &b]), 100.0);
        assert_eq!(max_ink_height(&[&a, &b]), 300.0);
        assert_eq!(max_ink_top(&[&a, &b]), 300.0);
        let below = glyph_with_box(3, 0.0, -100.0, 10.0, -50.0);
        assert_eq!(max_ink_top(&[&below]), 0.0);
    }
}
