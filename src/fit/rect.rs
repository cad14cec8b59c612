//! Four-sided closed shapes: rectangle, square and diamond.
//!
//! All three start from the polyline decomposition:
//! 1. The stroke must close on itself
//! 2. The polyline must have 4 sides (a 5th side collinear with the first,
//!    from starting mid-edge, is folded in)
//! 3. Each side must be straight
//!
//! Rectangles and squares then check right angles; diamonds check that
//! the sides are tilted 45 degrees.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use kurbo::{Point, Rect, Vec2};

use crate::config::Thresholds;
use crate::features::StrokeFeatures;
use crate::fit::{polyline, Fit, FitKind, ShapeType};
use crate::geom::{angle_between, mean};

/// Rectangle fail codes: 0 not closed, 1 not four sides, 2 crooked side,
/// 3 corner not square.
pub fn rectangle(features: &StrokeFeatures, polyline_fit: &Fit, th: &Thresholds) -> Fit {
    let corners = match quad(features, polyline_fit, th) {
        Ok(c) => c,
        Err(code) => return Fit::unfit(ShapeType::Rectangle, code),
    };
    let (fit, _) = right_angled(ShapeType::Rectangle, features, &corners, polyline_fit, th, false);
    fit
}

/// Square fail codes: as for rectangles, plus 4 sides too unequal.
pub fn square(features: &StrokeFeatures, polyline_fit: &Fit, th: &Thresholds) -> Fit {
    let corners = match quad(features, polyline_fit, th) {
        Ok(c) => c,
        Err(code) => return Fit::unfit(ShapeType::Square, code),
    };
    let (mut fit, side_ratio) =
        right_angled(ShapeType::Square, features, &corners, polyline_fit, th, true);
    if side_ratio < th.square_min_side_ratio {
        fit.fail(4);
    }
    fit
}

/// Diamond fail codes: 0 not closed, 1 not four sides, 2 crooked side,
/// 3 sides not tilted 45 degrees, 4 sides too unequal.
pub fn diamond(features: &StrokeFeatures, polyline_fit: &Fit, th: &Thresholds) -> Fit {
    let corners = match quad(features, polyline_fit, th) {
        Ok(c) => c,
        Err(code) => return Fit::unfit(ShapeType::Diamond, code),
    };
    let sides = side_vectors(&corners);
    let tilt: Vec<f64> = sides
        .iter()
        .map(|s| (s.atan2().rem_euclid(FRAC_PI_2) - FRAC_PI_4).abs())
        .collect();
    let lengths: Vec<f64> = sides.iter().map(|s| s.hypot()).collect();
    let shortest = lengths.iter().copied().fold(f64::INFINITY, f64::min);
    let longest = lengths.iter().copied().fold(0.0, f64::max);

    let bounds = corners
        .iter()
        .fold(Rect::from_points(corners[0], corners[0]), |r, p| r.union_pt(*p));
    let center = bounds.center();
    let rhombus = starting_near(
        [
            Point::new(center.x, bounds.y0),
            Point::new(bounds.x1, center.y),
            Point::new(center.x, bounds.y1),
            Point::new(bounds.x0, center.y),
        ],
        features.first(),
    );

    let error = polyline_fit.error() + mean(&tilt) / FRAC_PI_4;
    let mut fit = Fit::new(ShapeType::Diamond, FitKind::Quad { corners: rhombus }).with_error(error);
    if tilt.iter().any(|t| *t > th.diamond_max_tilt_deviation) {
        fit.fail(3);
    }
    if longest <= f64::EPSILON || shortest / longest < th.square_min_side_ratio {
        fit.fail(4);
    }
    fit
}

/// The four corners of a closed four-sided polyline, or the fail code.
fn quad(features: &StrokeFeatures, polyline_fit: &Fit, th: &Thresholds) -> Result<[Point; 4], u8> {
    if features.endpoint_ratio() > th.closed_max_endpoint_ratio {
        return Err(0);
    }
    let v = polyline::vertices(polyline_fit);
    let corners = match v.len() {
        5 => [v[0], v[1], v[2], v[3]],
        6 if angle_between(v[1] - v[0], v[5] - v[4]) <= th.rect_max_angle_deviation => {
            [v[1], v[2], v[3], v[4]]
        }
        _ => return Err(1),
    };
    if polyline_fit.children().iter().any(|l| !l.passed()) {
        return Err(2);
    }
    Ok(corners)
}

/// Rotate the corner order so the outline starts at the corner nearest
/// `start`.
fn starting_near(corners: [Point; 4], start: Point) -> [Point; 4] {
    let mut nearest = 0;
    for i in 1..4 {
        if corners[i].distance(start) < corners[nearest].distance(start) {
            nearest = i;
        }
    }
    let mut out = corners;
    out.rotate_left(nearest);
    out
}

fn side_vectors(c: &[Point; 4]) -> [Vec2; 4] {
    [c[1] - c[0], c[2] - c[1], c[3] - c[2], c[0] - c[3]]
}

/// Score right angles and build the ideal rectangle. Returns the fit and
/// the short-over-long side ratio.
fn right_angled(
    shape: ShapeType,
    features: &StrokeFeatures,
    corners: &[Point; 4],
    polyline_fit: &Fit,
    th: &Thresholds,
    equal_sides: bool,
) -> (Fit, f64) {
    let sides = side_vectors(corners);
    let deviations: Vec<f64> = (0..4)
        .map(|i| {
            let incoming = sides[(i + 3) % 4];
            let outgoing = sides[i];
            (angle_between(-incoming, outgoing) - FRAC_PI_2).abs()
        })
        .collect();

    let center = Point::new(
        corners.iter().map(|p| p.x).sum::<f64>() / 4.0,
        corners.iter().map(|p| p.y).sum::<f64>() / 4.0,
    );
    let along = sides[0] - sides[2];
    let u = if along.hypot() > f64::EPSILON {
        along.normalize()
    } else {
        Vec2::new(1.0, 0.0)
    };
    let mut v = Vec2::new(-u.y, u.x);
    if v.dot(sides[1] - sides[3]) < 0.0 {
        v = -v;
    }
    let mut width = (sides[0].hypot() + sides[2].hypot()) / 2.0;
    let mut height = (sides[1].hypot() + sides[3].hypot()) / 2.0;
    let side_ratio = if width.max(height) > f64::EPSILON {
        width.min(height) / width.max(height)
    } else {
        0.0
    };
    if equal_sides {
        width = (width + height) / 2.0;
        height = width;
    }
    let (hu, hv) = (u * (width / 2.0), v * (height / 2.0));
    let ideal = starting_near(
        [
            center - hu - hv,
            center + hu - hv,
            center + hu + hv,
            center - hu + hv,
        ],
        features.first(),
    );

    let error = polyline_fit.error() + mean(&deviations) / FRAC_PI_2;
    let mut fit = Fit::new(shape, FitKind::Quad { corners: ideal }).with_error(error);
    if deviations.iter().any(|d| *d > th.rect_max_angle_deviation) {
        fit.fail(3);
    }
    (fit, side_ratio)
}
