//! Polygon test: a closed polyline with enough sides.

use crate::config::Thresholds;
use crate::features::StrokeFeatures;
use crate::fit::{polyline, Fit, FitKind, ShapeType};

/// Fail codes: 0 endpoints too far apart, 1 too few sides. Both are
/// checked; the later failure wins.
///
/// The beautified outline walks the polyline breakpoints and closes back
/// to the stroke's original first point.
pub fn fit(features: &StrokeFeatures, polyline_fit: &Fit, th: &Thresholds) -> Fit {
    let sides = polyline_fit.children().len();
    let vertices = polyline::vertices(polyline_fit);

    let kind = if vertices.len() >= 2 {
        let first = features.stroke().first().to_point();
        let mut walk = Vec::with_capacity(vertices.len());
        walk.push(first);
        walk.extend_from_slice(&vertices[1..vertices.len() - 1]);
        walk.push(first);
        FitKind::Polygon { vertices: walk }
    } else {
        FitKind::Unfit
    };

    let error = features.endpoint_ratio();
    let mut fit = Fit::new(ShapeType::Polygon, kind).with_error(error);
    if error > th.polygon_max_endpoint_ratio {
        fit.fail(0);
    }
    if sides < th.polygon_min_lines {
        fit.fail(1);
    }
    fit
}
