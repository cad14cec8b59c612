//! Geometric features of a single stroke.
//!
//! Built once per stroke and read by every fit test and segmenter:
//! 1. Drop consecutive duplicate points
//! 2. Unwrapped direction graph (optionally smoothed)
//! 3. Turning signal and per-point curvature
//! 4. Length, closure, bounds and rotation summaries

use kurbo::{Point, Rect};

use crate::geom::unwrap_angles;
use crate::stroke::{Span, Stroke};

/// Curvature values at or below this are treated as flat.
const FLAT_CURVATURE: f64 = 1e-12;

/// Read-only feature set for one stroke.
#[derive(Debug, Clone)]
pub struct StrokeFeatures {
    stroke: Stroke,
    smoothing: bool,
    /// Cleaned points (no consecutive duplicates).
    points: Vec<Point>,
    /// Index into `stroke.points()` for each cleaned point.
    source: Vec<usize>,
    /// Cumulative arc length at each cleaned point.
    arc: Vec<f64>,
    dir: Vec<f64>,
    turns: Vec<f64>,
    curvature: Vec<f64>,
    max_curv_index: usize,
    bounds: Rect,
    centroid: Point,
}

impl StrokeFeatures {
    pub fn new(stroke: &Stroke, smoothing: bool) -> Self {
        let (points, source) = dedup(stroke);

        let mut arc = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += points[i - 1].distance(*p);
            }
            arc.push(total);
        }

        let mut dir = direction_graph(&points);
        if smoothing {
            dir = smooth_signal(&dir);
        }
        let turns: Vec<f64> = dir.windows(2).map(|w| w[1] - w[0]).collect();
        let curvature = curvature(&points, &turns);
        let max_curv_index = max_index(&curvature);

        let bounds = points
            .iter()
            .fold(Rect::from_points(points[0], points[0]), |r, p| r.union_pt(*p));
        let sum = points
            .iter()
            .fold((0.0, 0.0), |acc, p| (acc.0 + p.x, acc.1 + p.y));
        let centroid = Point::new(sum.0 / points.len() as f64, sum.1 / points.len() as f64);

        Self {
            stroke: stroke.clone(),
            smoothing,
            points,
            source,
            arc,
            dir,
            turns,
            curvature,
            max_curv_index,
            bounds,
            centroid,
        }
    }

    pub fn stroke(&self) -> &Stroke {
        &self.stroke
    }

    pub fn smoothing(&self) -> bool {
        self.smoothing
    }

    /// Cleaned points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> Point {
        self.points[0]
    }

    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Unwrapped direction of each consecutive point pair.
    pub fn dir(&self) -> &[f64] {
        &self.dir
    }

    /// Signed turn at each interior point (`turns()[i]` is at point `i + 1`).
    pub fn turns(&self) -> &[f64] {
        &self.turns
    }

    /// Per-point curvature; endpoints are 0.
    pub fn curvature(&self) -> &[f64] {
        &self.curvature
    }

    /// Index of the highest-curvature point, 0 for a flat stroke.
    pub fn max_curv_index(&self) -> usize {
        self.max_curv_index
    }

    /// Arc length from the first point to point `i`.
    pub fn arc_length_at(&self, i: usize) -> f64 {
        self.arc[i]
    }

    pub fn path_length(&self) -> f64 {
        self.arc[self.arc.len() - 1]
    }

    pub fn endpoint_distance(&self) -> f64 {
        self.first().distance(self.last())
    }

    /// Endpoint distance over path length; 1.0 for degenerate strokes.
    pub fn endpoint_ratio(&self) -> f64 {
        let length = self.path_length();
        if length <= f64::EPSILON {
            1.0
        } else {
            self.endpoint_distance() / length
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn bounds_diagonal(&self) -> f64 {
        self.bounds.width().hypot(self.bounds.height())
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn duration_ms(&self) -> i64 {
        self.stroke.last().time - self.stroke.first().time
    }

    /// Signed total turning, in radians.
    pub fn total_rotation(&self) -> f64 {
        self.turns.iter().sum()
    }

    pub fn abs_rotation(&self) -> f64 {
        self.turns.iter().map(|t| t.abs()).sum()
    }

    /// Direction change ratio: largest turn over mean turn.
    pub fn dcr(&self) -> f64 {
        if self.turns.is_empty() {
            return 0.0;
        }
        let mean = self.abs_rotation() / self.turns.len() as f64;
        if mean < FLAT_CURVATURE {
            return 0.0;
        }
        let max = self.turns.iter().fold(0.0_f64, |m, t| m.max(t.abs()));
        max / mean
    }

    /// Normalized distance between direction extremes.
    pub fn ndde(&self) -> f64 {
        let length = self.path_length();
        if self.dir.is_empty() || length <= f64::EPSILON {
            return 0.0;
        }
        let (mut lo, mut hi) = (0, 0);
        for (i, d) in self.dir.iter().enumerate() {
            if *d < self.dir[lo] {
                lo = i;
            }
            if *d > self.dir[hi] {
                hi = i;
            }
        }
        (self.arc[hi] - self.arc[lo]).abs() / length
    }

    /// Extract cleaned points `start..=end` as a sub-stroke parented to this
    /// stroke. Duplicates dropped in between are kept so the result is a
    /// contiguous slice of the root stroke.
    pub fn sub_stroke(&self, start: usize, end: usize) -> Stroke {
        let end = end.min(self.points.len() - 1);
        let start = start.min(end);
        let (a, b) = (self.source[start], self.source[end]);
        let offset = self.stroke.root_offset();
        Stroke::derived(
            self.stroke.points()[a..=b].to_vec(),
            self.stroke.provenance(),
            Some(Span {
                start: offset + a,
                end: offset + b,
            }),
        )
    }
}

fn dedup(stroke: &Stroke) -> (Vec<Point>, Vec<usize>) {
    let mut points: Vec<Point> = Vec::with_capacity(stroke.len());
    let mut source = Vec::with_capacity(stroke.len());
    for (i, sp) in stroke.points().iter().enumerate() {
        let p = sp.to_point();
        if points.last() != Some(&p) {
            points.push(p);
            source.push(i);
        }
    }
    (points, source)
}

/// Direction of each segment, unwrapped so neighbours differ by at most pi.
fn direction_graph(points: &[Point]) -> Vec<f64> {
    unwrap_angles(points.windows(2).map(|w| (w[1] - w[0]).atan2()))
}

/// 3-tap moving average, ends preserved.
fn smooth_signal(values: &[f64]) -> Vec<f64> {
    if values.len() < 3 {
        return values.to_vec();
    }
    let mut out = values.to_vec();
    for i in 1..values.len() - 1 {
        out[i] = (values[i - 1] + values[i] + values[i + 1]) / 3.0;
    }
    out
}

fn curvature(points: &[Point], turns: &[f64]) -> Vec<f64> {
    let n = points.len();
    let mut out = vec![0.0; n];
    for (k, turn) in turns.iter().enumerate() {
        let i = k + 1;
        let local = (points[i - 1].distance(points[i]) + points[i].distance(points[i + 1])) / 2.0;
        out[i] = turn.abs() / local.max(f64::EPSILON);
    }
    out
}

/// First index of the maximum, or 0 when everything is flat.
fn max_index(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    if values.get(best).copied().unwrap_or(0.0) <= FLAT_CURVATURE {
        0
    } else {
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn features(coords: &[(f64, f64)]) -> StrokeFeatures {
        StrokeFeatures::new(&Stroke::from_xy(coords).unwrap(), false)
    }

    #[test]
    fn straight_stroke_is_flat() {
        let f = features(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        assert_eq!(f.max_curv_index(), 0);
        assert!(approx_eq(f.path_length(), 3.0));
        assert!(approx_eq(f.endpoint_ratio(), 1.0));
        assert_eq!(f.dcr(), 0.0);
    }

    #[test]
    fn duplicates_are_dropped() {
        let f = features(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 0.0)]);
        assert_eq!(f.num_points(), 2);
        assert_eq!(f.dir().len(), 1);
    }

    #[test]
    fn direction_is_unwrapped() {
        // Counter-clockwise square loop crosses the +-pi boundary.
        let f = features(&[
            (1.0, 0.0),
            (0.0, 1.0),
            (-1.0, 0.0),
            (0.0, -1.0),
            (1.0, 0.0),
            (0.0, 1.0),
        ]);
        for w in f.dir().windows(2) {
            assert!((w[1] - w[0]).abs() <= PI + 1e-12);
        }
        assert!(approx_eq(f.total_rotation(), 2.0 * PI));
    }

    #[test]
    fn corner_has_max_curvature() {
        let f = features(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (2.0, 2.0)]);
        assert_eq!(f.max_curv_index(), 2);
        assert_eq!(f.curvature()[0], 0.0);
        assert_eq!(f.curvature()[4], 0.0);
    }

    #[test]
    fn sub_stroke_tracks_root_span() {
        let mut arena = crate::stroke::StrokeArena::new();
        let root = arena.insert(
            Stroke::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]).unwrap(),
        );
        let f = StrokeFeatures::new(&root, false);
        let sub = f.sub_stroke(1, 3);
        assert_eq!(sub.parent(), root.id());
        assert_eq!(sub.span(), Some(Span { start: 1, end: 4 }));

        let nested = StrokeFeatures::new(&sub, false).sub_stroke(1, 2);
        assert_eq!(nested.parent(), root.id());
        assert_eq!(nested.span(), Some(Span { start: 3, end: 4 }));
    }
}
