//! Nonzero-fill intersection of glyph contours with a clip region.
//!
//! The clip region is decomposed into disjoint convex cells, each an
//! intersection of half-planes. Every contour is clipped against every cell
//! with a curve-preserving Sutherland-Hodgman pass: segments are split where
//! they cross a cell boundary, inside pieces are kept verbatim and
//! consecutive pieces are joined along the boundary. Clipping a closed
//! contour to a convex cell preserves its winding number at every point of
//! the cell, so the nonzero fill of the output equals the fill of the input
//! restricted to the region.

use kurbo::{
    BezPath, CubicBez, Line, ParamCurve, PathEl, PathSeg, Point, QuadBez, Rect, Shape, Vec2,
    common::{solve_cubic, solve_quadratic},
    flatten,
};
use log::debug;

const EPSILON: f64 = 1e-9;
const FLATTEN_TOLERANCE: f64 = 0.1;
const MIN_AREA: f64 = 1e-6;

/// Points with `normal · p <= offset` are inside.
#[derive(Debug, Clone, Copy)]
struct HalfPlane {
    normal: Vec2,
    offset: f64,
}

impl HalfPlane {
    fn distance(&self, p: Point) -> f64 {
        self.normal.dot(p.to_vec2()) - self.offset
    }

    /// Project a point that is known to lie on the boundary exactly onto it.
    fn snap(&self, p: Point) -> Point {
        if self.normal.x == 0.0 {
            Point::new(p.x, self.offset / self.normal.y)
        } else if self.normal.y == 0.0 {
            Point::new(self.offset / self.normal.x, p.y)
        } else {
            p - self.normal * (self.distance(p) / self.normal.hypot2())
        }
    }

    /// Parameters in `(0, 1)` where `seg` crosses the boundary, ascending.
    fn crossings(&self, seg: &PathSeg) -> Vec<f64> {
        let d: Vec<f64> = control_points(seg).iter().map(|p| self.distance(*p)).collect();
        let roots: Vec<f64> = match d.as_slice() {
            [d0, d1] => solve_quadratic(*d0, d1 - d0, 0.0).to_vec(),
            [d0, d1, d2] => solve_quadratic(*d0, 2.0 * (d1 - d0), d0 - 2.0 * d1 + d2).to_vec(),
            [d0, d1, d2, d3] => solve_cubic(
                *d0,
                3.0 * (d1 - d0),
                3.0 * (d0 - 2.0 * d1 + d2),
                -d0 + 3.0 * d1 - 3.0 * d2 + d3,
            )
            .to_vec(),
            _ => Vec::new(),
        };

        let mut ts: Vec<f64> =
            roots.into_iter().filter(|t| *t > EPSILON && *t < 1.0 - EPSILON).collect();
        ts.sort_by(f64::total_cmp);
        ts.dedup_by(|a, b| (*a - *b).abs() < EPSILON);
        ts
    }
}

/// A convex cell of the clip region.
#[derive(Debug, Clone)]
struct Cell {
    planes: Vec<HalfPlane>,
}

impl Cell {
    fn from_rect(rect: Rect) -> Self {
        Self {
            planes: vec![
                HalfPlane { normal: Vec2::new(-1.0, 0.0), offset: -rect.x0 },
                HalfPlane { normal: Vec2::new(1.0, 0.0), offset: rect.x1 },
                HalfPlane { normal: Vec2::new(0.0, -1.0), offset: -rect.y0 },
                HalfPlane { normal: Vec2::new(0.0, 1.0), offset: rect.y1 },
            ],
        }
    }
}

/// The region covered by a glyph's boolean operands.
#[derive(Debug, Clone)]
pub(crate) struct ClipRegion {
    cells: Vec<Cell>,
}

impl ClipRegion {
    /// Build the nonzero-fill region of `operands`.
    ///
    /// Returns `None` unless the operands are all axis-aligned rectangles or
    /// form a single convex contour.
    pub(crate) fn from_operands(operands: &[BezPath]) -> Option<Self> {
        if let Some(rects) = operands.iter().map(as_rectangle).collect::<Option<Vec<_>>>() {
            return Some(Self::from_rectangles(&rects));
        }
        match operands {
            [single] => Self::from_convex(single),
            _ => None,
        }
    }

    fn from_rectangles(rects: &[(Rect, i32)]) -> Self {
        let mut xs: Vec<f64> = rects.iter().flat_map(|(r, _)| [r.x0, r.x1]).collect();
        let mut ys: Vec<f64> = rects.iter().flat_map(|(r, _)| [r.y0, r.y1]).collect();
        for v in [&mut xs, &mut ys] {
            v.sort_by(f64::total_cmp);
            v.dedup();
        }

        let winding_at = |p: Point| -> i32 {
            rects
                .iter()
                .filter(|(r, _)| p.x > r.x0 && p.x < r.x1 && p.y > r.y0 && p.y < r.y1)
                .map(|(_, w)| w)
                .sum()
        };

        let mut cells: Vec<Rect> = Vec::new();
        for row in ys.windows(2) {
            let (y0, y1) = (row[0], row[1]);
            let mut run: Option<f64> = None;
            for (i, col) in xs.windows(2).enumerate() {
                let center = Point::new((col[0] + col[1]) / 2.0, (y0 + y1) / 2.0);
                let inside = winding_at(center) != 0;
                match (inside, run) {
                    (true, None) => run = Some(col[0]),
                    (false, Some(x0)) => {
                        push_cell(&mut cells, Rect::new(x0, y0, col[0], y1));
                        run = None;
                    }
                    _ => {}
                }
                if i == xs.len() - 2
                    && let Some(x0) = run.take()
                {
                    push_cell(&mut cells, Rect::new(x0, y0, col[1], y1));
                }
            }
        }

        debug!("clip region: {} rectangle cells from {} operands", cells.len(), rects.len());
        Self { cells: cells.into_iter().map(Cell::from_rect).collect() }
    }

    fn from_convex(path: &BezPath) -> Option<Self> {
        let mut points: Vec<Point> = Vec::new();
        flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => points.push(p),
            _ => {}
        });
        points.dedup_by(|a, b| a.distance(*b) < EPSILON);
        if points.len() > 1 && points[0].distance(points[points.len() - 1]) < EPSILON {
            points.pop();
        }
        if points.len() < 3 {
            return None;
        }

        let area = polygon_area(&points);
        if area.abs() < MIN_AREA {
            return None;
        }
        let orientation = area.signum();

        let n = points.len();
        let convex = (0..n).all(|i| {
            let a = points[(i + 1) % n] - points[i];
            let b = points[(i + 2) % n] - points[(i + 1) % n];
            a.cross(b) * orientation >= -EPSILON * a.hypot() * b.hypot()
        });
        if !convex {
            return None;
        }

        let planes = (0..n)
            .filter_map(|i| {
                let a = points[i];
                let d = points[(i + 1) % n] - a;
                if d.hypot() < EPSILON {
                    return None;
                }
                // outward normal: right of travel for counter-clockwise, left for clockwise
                let normal = Vec2::new(d.y, -d.x) * orientation;
                Some(HalfPlane { normal, offset: normal.dot(a.to_vec2()) })
            })
            .collect();

        Some(Self { cells: vec![Cell { planes }] })
    }

    /// Clip `contours` to this region, one output contour per surviving piece.
    pub(crate) fn clip(&self, contours: &[BezPath]) -> Vec<BezPath> {
        let mut out = Vec::new();
        for cell in &self.cells {
            for contour in contours {
                for subpath in subpaths(contour) {
                    let clipped = cell
                        .planes
                        .iter()
                        .try_fold(subpath, |segs, plane| clip_segments(&segs, plane));
                    if let Some(segs) = clipped {
                        let path = to_bezpath(&segs);
                        if path.area().abs() > MIN_AREA {
                            out.push(path);
                        }
                    }
                }
            }
        }
        out
    }
}

/// Merge `rect` into a cell directly below it with the same horizontal span.
fn push_cell(cells: &mut Vec<Rect>, rect: Rect) {
    if let Some(below) =
        cells.iter_mut().find(|c| c.x0 == rect.x0 && c.x1 == rect.x1 && c.y1 == rect.y0)
    {
        below.y1 = rect.y1;
    } else {
        cells.push(rect);
    }
}

/// Recognize an axis-aligned rectangle, returning it with its winding
/// contribution (+1 clockwise, -1 counter-clockwise).
fn as_rectangle(path: &BezPath) -> Option<(Rect, i32)> {
    let mut points: Vec<Point> = Vec::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => points.push(p),
            PathEl::ClosePath => {}
            _ => return None,
        }
    }
    points.dedup();
    if points.len() > 1 && points[0] == points[points.len() - 1] {
        points.pop();
    }
    if points.len() != 4 {
        return None;
    }

    let axis_aligned = (0..4).all(|i| {
        let (a, b) = (points[i], points[(i + 1) % 4]);
        (a.x == b.x) != (a.y == b.y)
    });
    if !axis_aligned {
        return None;
    }

    let rect = points.iter().skip(1).fold(Rect::from_points(points[0], points[0]), |r, p| {
        r.union_pt(*p)
    });
    let winding = if polygon_area(&points) < 0.0 { 1 } else { -1 };
    Some((rect, winding))
}

/// Shoelace area, positive for counter-clockwise polygons in y-up space.
fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        / 2.0
}

fn control_points(seg: &PathSeg) -> Vec<Point> {
    match seg {
        PathSeg::Line(l) => vec![l.p0, l.p1],
        PathSeg::Quad(q) => vec![q.p0, q.p1, q.p2],
        PathSeg::Cubic(c) => vec![c.p0, c.p1, c.p2, c.p3],
    }
}

fn with_endpoints(seg: PathSeg, start: Point, end: Point) -> PathSeg {
    match seg {
        PathSeg::Line(_) => PathSeg::Line(Line::new(start, end)),
        PathSeg::Quad(q) => PathSeg::Quad(QuadBez::new(start, q.p1, end)),
        PathSeg::Cubic(c) => PathSeg::Cubic(CubicBez::new(start, c.p1, c.p2, end)),
    }
}

/// Split a path into closed subpaths, each an explicit segment loop.
fn subpaths(path: &BezPath) -> Vec<Vec<PathSeg>> {
    let mut result = Vec::new();
    let mut current: Vec<PathSeg> = Vec::new();
    let mut start = Point::ZERO;
    let mut last = Point::ZERO;

    let mut finish = |current: &mut Vec<PathSeg>, last: Point, start: Point| {
        if current.is_empty() {
            return;
        }
        if last != start {
            current.push(PathSeg::Line(Line::new(last, start)));
        }
        result.push(std::mem::take(current));
    };

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                finish(&mut current, last, start);
                start = p;
                last = p;
            }
            PathEl::LineTo(p) => {
                current.push(PathSeg::Line(Line::new(last, p)));
                last = p;
            }
            PathEl::QuadTo(c, p) => {
                current.push(PathSeg::Quad(QuadBez::new(last, c, p)));
                last = p;
            }
            PathEl::CurveTo(c1, c2, p) => {
                current.push(PathSeg::Cubic(CubicBez::new(last, c1, c2, p)));
                last = p;
            }
            PathEl::ClosePath => {
                finish(&mut current, last, start);
                last = start;
            }
        }
    }
    finish(&mut current, last, start);
    result
}

fn clip_segments(segs: &[PathSeg], plane: &HalfPlane) -> Option<Vec<PathSeg>> {
    let distances: Vec<f64> =
        segs.iter().flat_map(|s| control_points(s)).map(|p| plane.distance(p)).collect();
    if distances.iter().all(|d| *d <= EPSILON) {
        return Some(segs.to_vec());
    }
    if distances.iter().all(|d| *d >= -EPSILON) {
        return None;
    }

    let mut out: Vec<PathSeg> = Vec::new();
    let mut first: Option<Point> = None;
    let mut last = Point::ZERO;

    for seg in segs {
        let mut ts = plane.crossings(seg);
        ts.insert(0, 0.0);
        ts.push(1.0);

        for window in ts.windows(2) {
            let (t0, t1) = (window[0], window[1]);
            let piece = seg.subsegment(t0..t1);
            if plane.distance(piece.eval(0.5)) > EPSILON {
                continue;
            }

            let start = if t0 > 0.0 { plane.snap(piece.start()) } else { piece.start() };
            let end = if t1 < 1.0 { plane.snap(piece.end()) } else { piece.end() };
            let piece = with_endpoints(piece, start, end);

            match first {
                None => first = Some(start),
                Some(_) if last.distance(start) > EPSILON => {
                    out.push(PathSeg::Line(Line::new(last, start)));
                }
                Some(_) => {}
            }
            out.push(piece);
            last = end;
        }
    }

    let first = first?;
    if last.distance(first) > EPSILON {
        out.push(PathSeg::Line(Line::new(last, first)));
    }
    Some(out)
}

fn to_bezpath(segs: &[PathSeg]) -> BezPath {
    let mut path = BezPath::new();
    let Some(head) = segs.first() else {
        return path;
    };
    let origin = head.start();
    path.move_to(origin);

    for (i, seg) in segs.iter().enumerate() {
        match seg {
            // the closing line is implied by ClosePath
            PathSeg::Line(l) if i == segs.len() - 1 && l.p1 == origin => {}
            PathSeg::Line(l) => path.line_to(l.p1),
            PathSeg::Quad(q) => path.quad_to(q.p1, q.p2),
            PathSeg::Cubic(c) => path.curve_to(c.p1, c.p2, c.p3),
        }
    }
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64, clockwise: bool) -> BezPath {
        let mut pts = vec![(x0, y1), (x1, y1), (x1, y0)];
        if !clockwise {
            pts.reverse();
        }
        let mut path = BezPath::new();
        path.move_to((x0, y0));
        for p in pts {
            path.line_to(p);
        }
        path.close_path();
        path
    }

    fn circle(cx: f64, cy: f64, r: f64) -> BezPath {
        kurbo::Circle::new((cx, cy), r).to_path(0.01)
    }

    #[test]
    fn test_rectangle_detection() {
        let (rect, winding) = as_rectangle(&rect_path(0.0, 0.0, 10.0, 20.0, true)).unwrap();
        assert_eq!(rect, Rect::new(0.0, 0.0, 10.0, 20.0));
        assert_eq!(winding, 1);
        let (_, winding) = as_rectangle(&rect_path(0.0, 0.0, 10.0, 20.0, false)).unwrap();
        assert_eq!(winding, -1);
        assert!(as_rectangle(&circle(0.0, 0.0, 5.0)).is_none());
    }

    #[test]
    fn test_cover_minus_erase_cells() {
        let region = ClipRegion::from_operands(&[
            rect_path(0.0, 0.0, 100.0, 100.0, true),
            rect_path(40.0, 0.0, 60.0, 50.0, false),
        ])
        .unwrap();
        // left strip, right strip, and the band above the erased notch
        let total: f64 = region
            .cells
            .iter()
            .map(|c| {
                let x0 = -c.planes[0].offset;
                let x1 = c.planes[1].offset;
                let y0 = -c.planes[2].offset;
                let y1 = c.planes[3].offset;
                (x1 - x0) * (y1 - y0)
            })
            .sum();
        assert!((total - (10000.0 - 1000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_clip_square_keeps_area() {
        let region = ClipRegion::from_operands(&[
            rect_path(-10.0, -10.0, 110.0, 110.0, true),
            rect_path(40.0, -10.0, 60.0, 50.0, false),
        ])
        .unwrap();
        let clipped = region.clip(&[rect_path(0.0, 0.0, 100.0, 100.0, true)]);
        let area: f64 = clipped.iter().map(|p| p.area().abs()).sum();
        assert!((area - (10000.0 - 20.0 * 50.0)).abs() < 1e-6);
    }

    #[test]
    fn test_clip_preserves_curves() {
        let region =
            ClipRegion::from_operands(&[rect_path(-100.0, 0.0, 100.0, 100.0, true)]).unwrap();
        let clipped = region.clip(&[circle(0.0, 0.0, 50.0)]);
        assert_eq!(clipped.len(), 1);
        let half = std::f64::consts::PI * 50.0 * 50.0 / 2.0;
        assert!((clipped[0].area().abs() - half).abs() < 1.0);
        assert!(clipped[0].elements().iter().any(|el| matches!(el, PathEl::CurveTo(..))));
    }

    #[test]
    fn test_clip_hole_survives() {
        // ring: clockwise outer, counter-clockwise inner
        let outer = rect_path(0.0, 0.0, 100.0, 100.0, true);
        let inner = rect_path(25.0, 25.0, 75.0, 75.0, false);
        let region =
            ClipRegion::from_operands(&[rect_path(0.0, 50.0, 100.0, 200.0, true)]).unwrap();
        let clipped = region.clip(&[outer, inner]);
        let net: f64 = clipped.iter().map(|p| p.area()).sum();
        // upper half of the ring: 100x50 minus 50x25
        assert!((net.abs() - (5000.0 - 1250.0)).abs() < 1e-6);
    }

    #[test]
    fn test_convex_operand() {
        let mut diamond = BezPath::new();
        diamond.move_to((50.0, 0.0));
        diamond.line_to((0.0, 50.0));
        diamond.line_to((50.0, 100.0));
        diamond.line_to((100.0, 50.0));
        diamond.close_path();
        let region = ClipRegion::from_operands(&[diamond]).unwrap();
        let clipped = region.clip(&[rect_path(0.0, 0.0, 100.0, 100.0, true)]);
        let area: f64 = clipped.iter().map(|p| p.area().abs()).sum();
        assert!((area - 5000.0).abs() < 1e-6);
    }

    #[test]
    fn test_unsupported_operands() {
        assert!(ClipRegion::from_operands(&[circle(0.0, 0.0, 5.0), circle(3.0, 0.0, 5.0)])
            .is_none());
    }

    #[test]
    fn test_disjoint_contour_dropped() {
        let region =
            ClipRegion::from_operands(&[rect_path(0.0, 0.0, 10.0, 10.0, true)]).unwrap();
        assert!(region.clip(&[rect_path(20.0, 20.0, 30.0, 30.0, true)]).is_empty());
    }
}
