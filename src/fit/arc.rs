//! Arc test: a circular arc through the first, middle and last point.

use crate::config::Thresholds;
use crate::features::StrokeFeatures;
use crate::fit::{arc_error, arc_through, Fit, FitKind, ShapeType};

/// Fail codes: 0 collinear or too short, 1 turns too far, 2 has a corner,
/// 3 radial error too high.
pub fn fit(features: &StrokeFeatures, th: &Thresholds) -> Fit {
    let points = features.points();
    if points.len() < 3 {
        return Fit::unfit(ShapeType::Arc, 0);
    }
    let start = features.first();
    let end = features.last();
    let Some(arc) = arc_through(start, points[points.len() / 2], end) else {
        return Fit::unfit(ShapeType::Arc, 0);
    };
    let error = arc_error(points).unwrap_or(f64::INFINITY);

    let mut fit = Fit::new(ShapeType::Arc, FitKind::Arc { arc, start, end }).with_error(error);
    if features.total_rotation().abs() > th.arc_max_rotation {
        fit.fail(1);
    }
    if features.dcr() > th.curve_max_dcr {
        fit.fail(2);
    }
    if error > th.arc_max_error {
        fit.fail(3);
    }
    fit
}
