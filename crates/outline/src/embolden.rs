//! Stroke thickening by point offsetting.
//!
//! Every point, on- or off-curve, moves along the bisector of its incoming and
//! outgoing directions so that each edge shifts outward by half the requested
//! delta. The shift is capped by the shorter neighbouring edge so tight corners
//! do not fold over; near-reversals are left in place.

use kurbo::{BezPath, PathEl, Point, Shape, Vec2};

/// Cosine below which a corner is treated as a reversal and not shifted.
const REVERSAL_COS: f64 = -0.9375;

pub(crate) fn embolden_contours(contours: &mut [BezPath], delta: f64) {
    let total_area: f64 = contours.iter().map(|c| c.area()).sum();
    if total_area == 0.0 {
        return;
    }
    // clockwise outer contours in y-up space
    let clockwise = total_area < 0.0;
    let strength = delta / 2.0;

    for contour in contours.iter_mut() {
        *contour = embolden_path(contour, strength, clockwise);
    }
}

fn embolden_path(path: &BezPath, strength: f64, clockwise: bool) -> BezPath {
    // split into subpaths of flat point lists, keeping element shapes
    let mut subpaths: Vec<(Vec<PathEl>, Vec<Point>)> = Vec::new();
    for el in path.elements() {
        if matches!(el, PathEl::MoveTo(_)) || subpaths.is_empty() {
            subpaths.push((Vec::new(), Vec::new()));
        }
        if let Some((els, points)) = subpaths.last_mut() {
            els.push(*el);
            match *el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => points.push(p),
                PathEl::QuadTo(a, b) => points.extend([a, b]),
                PathEl::CurveTo(a, b, c) => points.extend([a, b, c]),
                PathEl::ClosePath => {}
            }
        }
    }

    let mut out = BezPath::new();
    for (els, points) in subpaths {
        let shifted = offset_points(&points, strength, clockwise);
        let mut iter = shifted.into_iter();
        let mut next = || iter.next().unwrap_or_default();
        for el in els {
            match el {
                PathEl::MoveTo(_) => out.move_to(next()),
                PathEl::LineTo(_) => out.line_to(next()),
                PathEl::QuadTo(..) => {
                    let (a, b) = (next(), next());
                    out.quad_to(a, b);
                }
                PathEl::CurveTo(..) => {
                    let (a, b, c) = (next(), next(), next());
                    out.curve_to(a, b, c);
                }
                PathEl::ClosePath => out.close_path(),
            }
        }
    }
    out
}

fn offset_points(points: &[Point], strength: f64, clockwise: bool) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let neighbour = |i: usize, step: isize| -> Option<Point> {
        (1..n).map(|k| points[(i as isize + step * k as isize).rem_euclid(n as isize) as usize]).find(
            |p| *p != points[i],
        )
    };

    (0..n)
        .map(|i| {
            let p = points[i];
            let (Some(prev), Some(next)) = (neighbour(i, -1), neighbour(i, 1)) else {
                return p;
            };
            p + corner_shift(p - prev, next - p, strength, clockwise)
        })
        .collect()
}

fn corner_shift(incoming: Vec2, outgoing: Vec2, strength: f64, clockwise: bool) -> Vec2 {
    let (l_in, l_out) = (incoming.hypot(), outgoing.hypot());
    let (a, b) = (incoming / l_in, outgoing / l_out);

    let cos = a.dot(b);
    if cos <= REVERSAL_COS {
        return Vec2::ZERO;
    }
    let d = cos + 1.0;

    let mut shift = Vec2::new(a.y + b.y, a.x + b.x);
    let mut q = b.x * a.y - b.y * a.x;
    if clockwise {
        shift.x = -shift.x;
        q = -q;
    } else {
        shift.y = -shift.y;
    }

    let l = l_in.min(l_out);
    let scale = if strength * q <= l * d { strength / d } else { l / q };
    shift * scale
}
