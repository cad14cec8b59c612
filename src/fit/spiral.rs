//! Spirals and helixes, both judged revolution by revolution.
//!
//! A spiral keeps one center while its radius grows or shrinks; a helix
//! keeps its radius while the center travels.

use kurbo::Point;

use crate::config::Thresholds;
use crate::features::StrokeFeatures;
use crate::fit::{Fit, FitKind, ShapeType};
use crate::geom::{mean, unwrap_angles};
use crate::segment::RevolutionSegmenter;

/// One revolution: its point centroid, mean radius about it, and the arc
/// fraction at its middle.
struct Revolution {
    center: Point,
    radius: f64,
    midpoint: f64,
}

fn revolutions(features: &StrokeFeatures) -> Vec<Revolution> {
    let length = features.path_length().max(f64::EPSILON);
    let points = features.points();
    RevolutionSegmenter
        .ranges(features)
        .into_iter()
        .filter(|(a, b)| b - a >= 2)
        .map(|(a, b)| {
            let loop_points = &points[a..=b];
            let n = loop_points.len() as f64;
            let center = Point::new(
                loop_points.iter().map(|p| p.x).sum::<f64>() / n,
                loop_points.iter().map(|p| p.y).sum::<f64>() / n,
            );
            let radius = loop_points.iter().map(|p| p.distance(center)).sum::<f64>() / n;
            Revolution {
                center,
                radius,
                midpoint: features.arc_length_at((a + b) / 2) / length,
            }
        })
        .collect()
}

/// Spiral fail codes: 0 too little rotation, 1 has a corner, 2 center
/// drifts, 3 radius barely changes, 4 error too high.
pub fn spiral(features: &StrokeFeatures, th: &Thresholds) -> Fit {
    let revs = revolutions(features);
    if revs.is_empty() {
        return Fit::unfit(ShapeType::Spiral, 0);
    }
    let full: Vec<&Revolution> = if revs.len() > 1 {
        revs[..revs.len() - 1].iter().collect()
    } else {
        revs.iter().collect()
    };
    let center = Point::new(
        full.iter().map(|r| r.center.x).sum::<f64>() / full.len() as f64,
        full.iter().map(|r| r.center.y).sum::<f64>() / full.len() as f64,
    );

    let points = features.points();
    let radii: Vec<f64> = points.iter().map(|p| p.distance(center)).collect();
    let mean_radius = mean(&radii).max(f64::EPSILON);
    let (r0, r1) = (radii[0], radii[radii.len() - 1]);
    let drift = full
        .iter()
        .map(|r| r.center.distance(center))
        .fold(0.0, f64::max)
        / mean_radius;
    let radius_change = (r1 - r0).abs() / r0.max(r1).max(f64::EPSILON);

    let angles = unwrap_angles(points.iter().map(|p| (*p - center).atan2()));
    let sweep = angles[angles.len() - 1] - angles[0];
    let progress = |i: usize| {
        if sweep.abs() <= f64::EPSILON {
            0.0
        } else {
            ((angles[i] - angles[0]) / sweep).clamp(0.0, 1.0)
        }
    };
    let error = radii
        .iter()
        .enumerate()
        .map(|(i, d)| (d - (r0 + (r1 - r0) * progress(i))).abs())
        .sum::<f64>()
        / radii.len() as f64
        / mean_radius;

    let samples = ((sweep.abs() / std::f64::consts::TAU * 64.0).ceil() as usize).max(8);
    let mut outline: Vec<Point> = (0..=samples)
        .map(|k| {
            let t = k as f64 / samples as f64;
            let a = angles[0] + sweep * t;
            let r = r0 + (r1 - r0) * t;
            center + kurbo::Vec2::from_angle(a) * r
        })
        .collect();
    outline[0] = features.first();
    outline[samples] = features.last();

    let kind = FitKind::Outline {
        points: outline,
        closed: false,
    };
    let mut fit = Fit::new(ShapeType::Spiral, kind).with_error(error);
    if features.total_rotation().abs() < th.spiral_min_rotation {
        fit.fail(0);
    }
    if features.dcr() > th.curve_max_dcr {
        fit.fail(1);
    }
    if drift > th.spiral_max_center_drift {
        fit.fail(2);
    }
    if radius_change < th.spiral_min_radius_change {
        fit.fail(3);
    }
    if error > th.spiral_max_error {
        fit.fail(4);
    }
    fit
}

/// Helix fail codes: 0 too little rotation, 1 has a corner, 2 centers do
/// not travel, 3 radii vary too much, 4 closed.
pub fn helix(features: &StrokeFeatures, th: &Thresholds) -> Fit {
    let revs = revolutions(features);
    if revs.len() < 2 {
        return Fit::unfit(ShapeType::Helix, 2);
    }
    let full = &revs[..revs.len() - 1];
    let (first, last) = (&revs[0], &revs[revs.len() - 1]);
    let radii: Vec<f64> = full.iter().map(|r| r.radius).collect();
    let radius = mean(&radii).max(f64::EPSILON);
    let spread = (radii.iter().map(|r| (r - radius).powi(2)).sum::<f64>() / radii.len() as f64)
        .sqrt()
        / radius;
    let travel = first.center.distance(last.center) / radius;

    let span = (last.midpoint - first.midpoint).max(f64::EPSILON);
    let length = features.path_length().max(f64::EPSILON);
    let center_at = |i: usize| {
        let t = (features.arc_length_at(i) / length - first.midpoint) / span;
        first.center.lerp(last.center, t)
    };
    let points = features.points();
    let outline: Vec<Point> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let c = center_at(i);
            if i == 0 || i == points.len() - 1 {
                *p
            } else {
                c + (*p - c).normalize() * radius
            }
        })
        .collect();

    let kind = FitKind::Outline {
        points: outline,
        closed: false,
    };
    let mut fit = Fit::new(ShapeType::Helix, kind).with_error(spread);
    if features.total_rotation().abs() < th.spiral_min_rotation {
        fit.fail(0);
    }
    if features.dcr() > th.curve_max_dcr {
        fit.fail(1);
    }
    if travel < th.helix_min_center_travel {
        fit.fail(2);
    }
    if spread > th.helix_max_radius_variation {
        fit.fail(3);
    }
    if features.endpoint_ratio() <= th.closed_max_endpoint_ratio {
        fit.fail(4);
    }
    fit
}
