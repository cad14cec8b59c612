//! Line test: the stroke stays close to the chord between its endpoints.

use crate::config::Thresholds;
use crate::features::StrokeFeatures;
use crate::fit::{Fit, FitKind, ShapeType};
use crate::geom::{feature_area_to_line, orthogonal_distance};

/// Fail codes: 0 degenerate length, 1 endpoint ratio too low, 2 RMS
/// distance too high, 3 feature area too high.
pub fn fit(features: &StrokeFeatures, th: &Thresholds) -> Fit {
    let length = features.path_length();
    if length <= f64::EPSILON {
        return Fit::unfit(ShapeType::Line, 0);
    }
    let start = features.first();
    let end = features.last();
    let points = features.points();

    let error = feature_area_to_line(points, start, end) / (length * length);
    let mean_sq = points
        .iter()
        .map(|p| orthogonal_distance(*p, start, end).powi(2))
        .sum::<f64>()
        / points.len() as f64;
    let rms_ratio = mean_sq.sqrt() / length;

    let mut fit = Fit::new(ShapeType::Line, FitKind::Line { start, end }).with_error(error);
    if features.endpoint_ratio() < th.line_min_endpoint_ratio {
        fit.fail(1);
    }
    if rms_ratio > th.line_max_rms_ratio {
        fit.fail(2);
    }
    if error > th.line_max_feature_area_ratio {
        fit.fail(3);
    }
    fit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Stroke;

    fn run(coords: &[(f64, f64)]) -> Fit {
        let stroke = Stroke::from_xy(coords).unwrap();
        fit(&StrokeFeatures::new(&stroke, false), &Thresholds::default())
    }

    #[test]
    fn straight_stroke_passes_with_zero_error() {
        let coords: Vec<(f64, f64)> = (0..20).map(|i| (i as f64 * 5.0, i as f64 * 2.0)).collect();
        let fit = run(&coords);
        assert!(fit.passed());
        assert!(fit.error() < 1e-9);
    }

    #[test]
    fn two_points_pass() {
        assert!(run(&[(0.0, 0.0), (10.0, 0.0)]).passed());
    }

    #[test]
    fn single_point_is_degenerate() {
        let fit = run(&[(3.0, 3.0)]);
        assert!(!fit.passed());
        assert_eq!(fit.fail_code(), Some(0));
    }

    #[test]
    fn l_shape_fails() {
        let mut coords: Vec<(f64, f64)> = (0..=10).map(|i| (i as f64 * 10.0, 0.0)).collect();
        coords.extend((1..=10).map(|i| (100.0, i as f64 * 10.0)));
        let fit = run(&coords);
        assert!(!fit.passed());
        assert_eq!(fit.fail_code(), Some(3));
    }

    #[test]
    fn endpoints_are_preserved() {
        let fit = run(&[(1.0, 2.0), (5.0, 2.1), (9.0, 2.0)]);
        match fit.kind() {
            FitKind::Line { start, end } => {
                assert_eq!((start.x, start.y), (1.0, 2.0));
                assert_eq!((end.x, end.y), (9.0, 2.0));
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }
}
