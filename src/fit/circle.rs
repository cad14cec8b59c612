//! Circle test: a full turn at near-constant distance from the centroid.

use kurbo::Point;

use crate::config::Thresholds;
use crate::features::StrokeFeatures;
use crate::fit::{Fit, FitKind, ShapeType};

/// Fail codes: 0 not a full turn, 1 has a corner, 2 radial error too high.
pub fn fit(features: &StrokeFeatures, th: &Thresholds) -> Fit {
    let center = features.centroid();
    let (radius, error) = radial_fit(features.points(), center);
    if radius <= f64::EPSILON {
        return Fit::unfit(ShapeType::Circle, 2);
    }

    let mut fit = Fit::new(ShapeType::Circle, FitKind::Circle { center, radius }).with_error(error);
    if features.total_rotation().abs() < th.circle_min_rotation {
        fit.fail(0);
    }
    if features.dcr() > th.curve_max_dcr {
        fit.fail(1);
    }
    if error > th.circle_max_error {
        fit.fail(2);
    }
    fit
}

/// Mean radius about `center` and the mean radial deviation relative to it.
pub(crate) fn radial_fit(points: &[Point], center: Point) -> (f64, f64) {
    let n = points.len() as f64;
    let radius = points.iter().map(|p| p.distance(center)).sum::<f64>() / n;
    if radius <= f64::EPSILON {
        return (0.0, f64::INFINITY);
    }
    let deviation = points
        .iter()
        .map(|p| (p.distance(center) - radius).abs())
        .sum::<f64>()
        / n;
    (radius, deviation / radius)
}
