//! Ellipse test: major axis from the farthest point pair, minor axis from
//! the perpendicular extent.

use kurbo::{Point, Vec2};

use crate::config::Thresholds;
use crate::features::StrokeFeatures;
use crate::fit::{Fit, FitKind, ShapeType};

/// Fail codes: 0 not a full turn, 1 has a corner, 2 too thin,
/// 3 error too high.
pub fn fit(features: &StrokeFeatures, th: &Thresholds) -> Fit {
    let points = features.points();
    let Some((a, b)) = farthest_pair(points) else {
        return Fit::unfit(ShapeType::Ellipse, 2);
    };
    let u = (b - a).normalize();
    let v = Vec2::new(-u.y, u.x);
    let major = a.distance(b) / 2.0;
    let mid = a.midpoint(b);

    let (lo, hi) = points.iter().fold((0.0_f64, 0.0_f64), |(lo, hi), p| {
        let s = v.dot(*p - mid);
        (lo.min(s), hi.max(s))
    });
    let minor = (hi - lo) / 2.0;
    if minor <= f64::EPSILON {
        return Fit::unfit(ShapeType::Ellipse, 2);
    }
    let center = mid + v * ((hi + lo) / 2.0);
    let radii = Vec2::new(major, minor);

    let error = points
        .iter()
        .map(|p| {
            let d = *p - center;
            let (x, y) = (u.dot(d) / major, v.dot(d) / minor);
            ((x * x + y * y).sqrt() - 1.0).abs()
        })
        .sum::<f64>()
        / points.len() as f64;

    let kind = FitKind::Ellipse {
        center,
        radii,
        rotation: u.atan2(),
    };
    let mut fit = Fit::new(ShapeType::Ellipse, kind).with_error(error);
    if features.total_rotation().abs() < th.circle_min_rotation {
        fit.fail(0);
    }
    if features.dcr() > th.curve_max_dcr {
        fit.fail(1);
    }
    if minor / major < th.ellipse_min_axis_ratio {
        fit.fail(2);
    }
    if error > th.ellipse_max_error {
        fit.fail(3);
    }
    fit
}

fn farthest_pair(points: &[Point]) -> Option<(Point, Point)> {
    let mut best: Option<(f64, Point, Point)> = None;
    for (i, p) in points.iter().enumerate() {
        for q in &points[i + 1..] {
            let d = p.distance_squared(*q);
            if best.map_or(true, |(bd, _, _)| d > bd) {
                best = Some((d, *p, *q));
            }
        }
    }
    best.filter(|(d, _, _)| *d > f64::EPSILON).map(|(_, p, q)| (p, q))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Stroke;
    use std::f64::consts::TAU;

    fn run(coords: &[(f64, f64)]) -> Fit {
        let stroke = Stroke::from_xy(coords).unwrap();
        fit(&StrokeFeatures::new(&stroke, false), &Thresholds::default())
    }

    fn ellipse_coords(rx: f64, ry: f64) -> Vec<(f64, f64)> {
        (0..=72)
            .map(|i| {
                let a = TAU * i as f64 / 72.0;
                (rx * a.cos(), ry * a.sin())
            })
            .collect()
    }

    #[test]
    fn flat_ellipse_passes() {
        let fit = run(&ellipse_coords(80.0, 30.0));
        assert!(fit.passed(), "fail code {:?}", fit.fail_code());
        match fit.kind() {
            FitKind::Ellipse { radii, .. } => {
                assert!((radii.x - 80.0).abs() < 1.0);
                assert!((radii.y - 30.0).abs() < 1.0);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn open_arc_is_not_an_ellipse() {
        let coords: Vec<(f64, f64)> = ellipse_coords(80.0, 30.0).into_iter().take(30).collect();
        assert!(!run(&coords).passed());
    }
}
