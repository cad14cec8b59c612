//! Shared geometry utilities.

use std::f64::consts::{PI, TAU};

use geo::{Area, ConvexHull, LineString, MultiPoint, SimplifyIdx};
use kurbo::{fit_to_bezpath_opt, simplify::SimplifyBezPath, BezPath, PathEl, Point, Vec2};

/// Signed area of a BezPath via the shoelace formula (on-curve points only).
///
/// Positive = counter-clockwise in a y-up frame.
pub fn signed_area(path: &BezPath) -> f64 {
    let mut area = 0.0;
    let mut first = Point::ZERO;
    let mut current = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                first = p;
                current = p;
            }
            PathEl::LineTo(p) | PathEl::CurveTo(_, _, p) | PathEl::QuadTo(_, p) => {
                area += current.x * p.y - p.x * current.y;
                current = p;
            }
            PathEl::ClosePath => {
                area += current.x * first.y - first.x * current.y;
            }
        }
    }
    area / 2.0
}

/// Area enclosed by a point loop (implicitly closed).
pub fn polygon_area(points: &[Point]) -> f64 {
    signed_area(&points_to_path(points, true)).abs()
}

/// Area of the convex hull of `points`.
pub fn hull_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let cloud = MultiPoint::from(points.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>());
    cloud.convex_hull().unsigned_area()
}

/// Distance from `p` to the infinite line through `a` and `b`.
///
/// Falls back to the distance to `a` when the line is degenerate.
pub fn orthogonal_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len = ab.hypot();
    if len <= f64::EPSILON {
        return p.distance(a);
    }
    ab.cross(p - a).abs() / len
}

/// Area between a polyline and the chord `a`-`b`, summed as trapezoids
/// over the projection of each segment onto the chord.
pub fn feature_area_to_line(points: &[Point], a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len = ab.hypot();
    if len <= f64::EPSILON || points.len() < 2 {
        return 0.0;
    }
    let axis = ab / len;
    let mut area = 0.0;
    for w in points.windows(2) {
        let d0 = orthogonal_distance(w[0], a, b);
        let d1 = orthogonal_distance(w[1], a, b);
        let along = (w[1] - w[0]).dot(axis).abs();
        area += (d0 + d1) / 2.0 * along;
    }
    area
}

/// Circle through three points, or `None` if they are collinear.
pub fn circumcircle(a: Point, b: Point, c: Point) -> Option<(Point, f64)> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    let scale = a.distance(b).max(b.distance(c)).max(a.distance(c));
    if d.abs() <= 1e-9 * scale * scale {
        return None;
    }
    let (a2, b2, c2) = (
        a.to_vec2().hypot2(),
        b.to_vec2().hypot2(),
        c.to_vec2().hypot2(),
    );
    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
    let center = Point::new(ux, uy);
    Some((center, center.distance(a)))
}

/// Unsigned angle between two vectors, in `[0, pi]`.
pub fn angle_between(u: Vec2, v: Vec2) -> f64 {
    u.cross(v).atan2(u.dot(v)).abs()
}

/// True if segments `a`-`b` and `c`-`d` properly cross.
pub fn segments_cross(a: Point, b: Point, c: Point, d: Point) -> bool {
    let d1 = (b - a).cross(c - a);
    let d2 = (b - a).cross(d - a);
    let d3 = (d - c).cross(a - c);
    let d4 = (d - c).cross(b - c);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

/// True if the open polyline crosses itself (adjacent segments excluded).
pub fn self_intersects(points: &[Point]) -> bool {
    let n = points.len();
    for i in 0..n.saturating_sub(1) {
        for j in (i + 2)..n.saturating_sub(1) {
            if segments_cross(points[i], points[i + 1], points[j], points[j + 1]) {
                return true;
            }
        }
    }
    false
}

/// Ramer-Douglas-Peucker: indices of the points kept, always including
/// the first and last.
pub fn rdp_indices(points: &[Point], epsilon: f64) -> Vec<usize> {
    if points.len() <= 2 || epsilon <= 0.0 {
        return (0..points.len()).collect();
    }
    LineString::from(points.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>())
        .simplify_idx(&epsilon)
}

/// Convert points to a line-segment BezPath.
pub fn points_to_path(points: &[Point], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    if let Some(&first) = points.first() {
        path.move_to(first);
        for &p in &points[1..] {
            path.line_to(p);
        }
        if closed {
            path.push(PathEl::ClosePath);
        }
    }
    path
}

/// Two-pass fitting: polyline → curves → minimal curves.
pub fn two_pass_fit(path: &BezPath, accuracy: f64) -> BezPath {
    let pass1 = fit_to_bezpath_opt(
        &SimplifyBezPath::new(path.elements().iter().copied()),
        accuracy,
    );
    fit_to_bezpath_opt(
        &SimplifyBezPath::new(pass1.elements().iter().copied()),
        accuracy,
    )
}

/// Smooth cubic path through sampled points.
pub fn smooth_path(points: &[Point], closed: bool, accuracy: f64) -> BezPath {
    if points.len() < 3 {
        return points_to_path(points, closed);
    }
    let mut path = two_pass_fit(&points_to_path(points, false), accuracy);
    if closed {
        path.push(PathEl::ClosePath);
    }
    path
}

/// True if every coordinate in the path is finite.
pub fn path_is_finite(path: &BezPath) -> bool {
    let ok = |p: &Point| p.x.is_finite() && p.y.is_finite();
    path.elements().iter().all(|el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => ok(p),
        PathEl::QuadTo(a, b) => ok(a) && ok(b),
        PathEl::CurveTo(a, b, c) => ok(a) && ok(b) && ok(c),
        PathEl::ClosePath => true,
    })
}

/// Unwrap a sequence of angles so neighbours differ by at most pi.
pub fn unwrap_angles(angles: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::new();
    for mut angle in angles {
        if let Some(&prev) = out.last() {
            while angle - prev > PI {
                angle -= TAU;
            }
            while angle - prev < -PI {
                angle += TAU;
            }
        }
        out.push(angle);
    }
    out
}

/// Mean of a slice; 0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Distance from `p` to the nearest of `samples`.
pub fn nearest_distance(p: Point, samples: &[Point]) -> f64 {
    samples
        .iter()
        .map(|s| s.distance(p))
        .fold(f64::INFINITY, f64::min)
}
