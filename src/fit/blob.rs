//! Blobs and infinity signs: closed free-form loops.

use crate::config::Thresholds;
use crate::features::StrokeFeatures;
use crate::fit::{Fit, FitKind, ShapeType};
use crate::geom::{hull_area, polygon_area, self_intersects};
use crate::segment::{Segmenter, VSegmenter};

fn is_closed(features: &StrokeFeatures, th: &Thresholds) -> bool {
    features.num_points() > 3 && features.endpoint_ratio() <= th.closed_max_endpoint_ratio
}

/// Fail codes: 0 not closed, 1 turns too little or too much.
///
/// Error is how far the loop falls short of its convex hull.
pub fn blob(features: &StrokeFeatures, th: &Thresholds) -> Fit {
    let points = features.points();
    let hull = hull_area(points);
    let error = if hull <= f64::EPSILON {
        1.0
    } else {
        (1.0 - polygon_area(points) / hull).max(0.0)
    };
    let rotation = features.total_rotation().abs();

    let kind = FitKind::Outline {
        points: points.to_vec(),
        closed: true,
    };
    let mut fit = Fit::new(ShapeType::Blob, kind).with_error(error);
    if !is_closed(features, th) {
        fit.fail(0);
    }
    if rotation < th.blob_min_rotation || rotation > th.blob_max_rotation {
        fit.fail(1);
    }
    fit
}

/// Fail codes: 0 not closed, 1 the two loops do not turn in opposite
/// senses, 2 the loop never crosses itself.
///
/// Error is the leftover net turning relative to the total turning.
pub fn infinity(features: &StrokeFeatures, th: &Thresholds) -> Fit {
    let halves = VSegmenter.segment(features);
    let loops: Vec<f64> = halves
        .strokes
        .iter()
        .map(|s| StrokeFeatures::new(s, features.smoothing()).total_rotation())
        .collect();
    let opposed = loops.len() == 2
        && loops[0].signum() != loops[1].signum()
        && loops.iter().all(|r| r.abs() >= th.infinity_min_loop_rotation);

    let mut walk = features.points().to_vec();
    walk.push(features.first());
    let crosses = self_intersects(&walk);

    let abs = features.abs_rotation();
    let error = if abs <= f64::EPSILON {
        1.0
    } else {
        features.total_rotation().abs() / abs
    };
    let kind = FitKind::Outline {
        points: features.points().to_vec(),
        closed: true,
    };
    let mut fit = Fit::new(ShapeType::Infinity, kind).with_error(error);
    if !is_closed(features, th) {
        fit.fail(0);
    }
    if !opposed {
        fit.fail(1);
    }
    if !crosses {
        fit.fail(2);
    }
    fit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Stroke;
    use std::f64::consts::TAU;

    fn features(coords: &[(f64, f64)]) -> StrokeFeatures {
        StrokeFeatures::new(&Stroke::from_xy(coords).unwrap(), false)
    }

    fn lumpy_loop() -> Vec<(f64, f64)> {
        (0..=90)
            .map(|i| {
                let t = TAU * i as f64 / 90.0;
                let r = 50.0 + 8.0 * (3.0 * t).sin();
                (r * t.cos(), r * t.sin())
            })
            .collect()
    }

    fn figure_eight() -> Vec<(f64, f64)> {
        (0..160)
            .map(|i| {
                let t = TAU * (i as f64 + 0.5) / 160.0;
                (100.0 * t.sin(), 50.0 * (2.0 * t).sin())
            })
            .collect()
    }

    #[test]
    fn lumpy_loop_is_a_blob() {
        let fit = blob(&features(&lumpy_loop()), &Thresholds::default());
        assert!(fit.passed(), "fail code {:?}", fit.fail_code());
        assert!(fit.error() < 0.2);
    }

    #[test]
    fn open_curve_is_not_a_blob() {
        let coords: Vec<(f64, f64)> = lumpy_loop().into_iter().take(40).collect();
        assert!(!blob(&features(&coords), &Thresholds::default()).passed());
    }

    #[test]
    fn figure_eight_is_infinity() {
        let fit = infinity(&features(&figure_eight()), &Thresholds::default());
        assert!(fit.passed(), "fail code {:?}", fit.fail_code());
        assert!(fit.error() < 0.2);
    }

    #[test]
    fn plain_loop_is_not_infinity() {
        let fit = infinity(&features(&lumpy_loop()), &Thresholds::default());
        assert!(!fit.passed());
    }
}
