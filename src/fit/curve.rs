//! Curve test: a single cubic with the stroke's endpoints.
//!
//! Handle directions come from the stroke's end tangents; handle lengths
//! are found by a coarse grid search followed by a finer one around the
//! best pair.

use kurbo::{CubicBez, ParamCurve, Point, Vec2};

use crate::config::Thresholds;
use crate::features::StrokeFeatures;
use crate::fit::{Fit, FitKind, ShapeType};
use crate::geom::nearest_distance;

/// Points used on each end to estimate the tangent.
const TANGENT_SPAN: usize = 3;
const CURVE_SAMPLES: usize = 32;
const COARSE_STEPS: usize = 12;
const REFINE_STEPS: usize = 6;

/// Fail codes: 0 too few points, 1 has a corner, 2 error too high.
pub fn fit(features: &StrokeFeatures, th: &Thresholds) -> Fit {
    let points = features.points();
    let n = points.len();
    if n < 3 {
        return Fit::unfit(ShapeType::Curve, 0);
    }
    let k = TANGENT_SPAN.min(n - 1);
    let p0 = points[0];
    let p3 = points[n - 1];
    let d0 = unit(points[k] - p0);
    let d3 = unit(p3 - points[n - 1 - k]);

    let length = features.path_length();
    let (cubic, err) = fit_constrained(p0, d0, p3, d3, points, length);
    let error = err / length.max(f64::EPSILON);

    let mut fit = Fit::new(ShapeType::Curve, FitKind::Curve { cubic }).with_error(error);
    if features.dcr() > th.curve_max_dcr {
        fit.fail(1);
    }
    if error > th.curve_max_error {
        fit.fail(2);
    }
    fit
}

fn unit(v: Vec2) -> Vec2 {
    if v.hypot() > f64::EPSILON {
        v.normalize()
    } else {
        Vec2::ZERO
    }
}

/// Best cubic from `p0` leaving along `d0` to `p3` arriving along `d3`,
/// with the mean distance from `points` to it.
fn fit_constrained(
    p0: Point,
    d0: Vec2,
    p3: Point,
    d3: Vec2,
    points: &[Point],
    scale: f64,
) -> (CubicBez, f64) {
    let cubic = |alpha: f64, beta: f64| CubicBez::new(p0, p0 + d0 * alpha, p3 - d3 * beta, p3);

    let step = scale / (COARSE_STEPS + 1) as f64;
    let mut best = (scale / 3.0, scale / 3.0);
    let mut best_err = mean_error(&cubic(best.0, best.1), points);

    for ai in 1..=COARSE_STEPS {
        for bi in 1..=COARSE_STEPS {
            let (alpha, beta) = (step * ai as f64, step * bi as f64);
            let err = mean_error(&cubic(alpha, beta), points);
            if err < best_err {
                best_err = err;
                best = (alpha, beta);
            }
        }
    }

    let (ra, rb) = best;
    for ai in 0..=REFINE_STEPS {
        let alpha = (ra - step + 2.0 * step * ai as f64 / REFINE_STEPS as f64).max(0.0);
        for bi in 0..=REFINE_STEPS {
            let beta = (rb - step + 2.0 * step * bi as f64 / REFINE_STEPS as f64).max(0.0);
            let err = mean_error(&cubic(alpha, beta), points);
            if err < best_err {
                best_err = err;
                best = (alpha, beta);
            }
        }
    }

    (cubic(best.0, best.1), best_err)
}

/// Mean distance from each point to the sampled cubic.
fn mean_error(cubic: &CubicBez, points: &[Point]) -> f64 {
    let samples: Vec<Point> = (0..=CURVE_SAMPLES)
        .map(|i| cubic.eval(i as f64 / CURVE_SAMPLES as f64))
        .collect();
    points
        .iter()
        .map(|p| nearest_distance(*p, &samples))
        .sum::<f64>()
        / points.len() as f64
}
