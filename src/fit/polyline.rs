//! Polyline test: corners from Ramer-Douglas-Peucker, every piece a line.

use crate::config::Thresholds;
use crate::features::StrokeFeatures;
use crate::fit::{line, Fit, FitKind, ShapeType};
use crate::geom::{mean, rdp_indices};

/// Fail codes: 0 fewer than two pieces, 1 a piece is not a line.
pub fn fit(features: &StrokeFeatures, th: &Thresholds) -> Fit {
    let points = features.points();
    if points.len() < 3 {
        return Fit::unfit(ShapeType::Polyline, 0);
    }
    let epsilon = (th.polyline_rdp_ratio * features.bounds_diagonal()).max(f64::EPSILON);
    let corners = corner_indices(features, epsilon, th);

    let lines: Vec<Fit> = corners
        .windows(2)
        .map(|w| {
            let piece = features.sub_stroke(w[0], w[1]);
            line::fit(&StrokeFeatures::new(&piece, features.smoothing()), th)
        })
        .collect();
    let vertices = corners.iter().map(|&i| points[i]).collect();
    let errors: Vec<f64> = lines.iter().map(Fit::error).collect();
    let error = mean(&errors);
    let too_few = lines.len() < 2;
    let crooked = lines.iter().any(|l| !l.passed());

    let mut fit = Fit::new(ShapeType::Polyline, FitKind::Polyline { vertices, lines })
        .with_error(error);
    if too_few {
        fit.fail(0);
    }
    if crooked {
        fit.fail(1);
    }
    fit
}

/// RDP corner indices. A closed loop is split at the point farthest from
/// its start and each half simplified on its own, since RDP needs a
/// baseline of non-zero length.
fn corner_indices(features: &StrokeFeatures, epsilon: f64, th: &Thresholds) -> Vec<usize> {
    let points = features.points();
    let n = points.len();
    let closed = n > 3 && features.endpoint_ratio() <= th.closed_max_endpoint_ratio;
    if !closed {
        return rdp_indices(points, epsilon);
    }
    let start = points[0];
    let mut far = 1;
    for i in 2..n - 1 {
        if points[i].distance(start) > points[far].distance(start) {
            far = i;
        }
    }
    let mut corners = rdp_indices(&points[..=far], epsilon);
    corners.pop();
    corners.extend(rdp_indices(&points[far..], epsilon).into_iter().map(|i| i + far));
    corners
}

/// Vertices of a polyline fit, first and last included.
pub(crate) fn vertices(fit: &Fit) -> &[kurbo::Point] {
    match fit.kind() {
        FitKind::Polyline { vertices, .. } => vertices,
        _ => &[],
    }
}
