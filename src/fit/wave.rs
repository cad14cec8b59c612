//! Waves and gull wings.
//!
//! A wave alternates its turning direction at least a few times, each
//! stretch a shallow arc. A gull is two same-sense arcs meeting in a cusp.

use kurbo::Point;

use crate::config::Thresholds;
use crate::features::StrokeFeatures;
use crate::fit::{arc_error, arc_through, Fit, FitKind, ShapeType};
use crate::geom::{angle_between, mean};
use crate::segment::{GullSegmenter, Segmenter, VSegmenter, WaveSegmenter};
use crate::stroke::Stroke;

fn stroke_points(stroke: &Stroke) -> Vec<Point> {
    stroke.points().iter().map(|p| p.to_point()).collect()
}

/// Wave fail codes: 0 too few segments, 1 a segment turns too far,
/// 2 a segment is not arc-like.
pub fn wave(features: &StrokeFeatures, th: &Thresholds) -> Fit {
    let segmentation = WaveSegmenter::new(th.wave_sign_tolerance).segment(features);
    let mut pieces = Vec::with_capacity(segmentation.len());
    let mut errors = Vec::with_capacity(segmentation.len());
    let mut over_turned = false;
    for stroke in &segmentation.strokes {
        let piece = StrokeFeatures::new(stroke, features.smoothing());
        let points = piece.points();
        if piece.total_rotation().abs() > th.wave_max_segment_rotation {
            over_turned = true;
        }
        errors.push(arc_error(points).unwrap_or(f64::INFINITY));
        let (from, to) = (piece.first(), piece.last());
        let mid = points[points.len() / 2];
        let ctrl = mid + (mid - from.midpoint(to));
        pieces.push((from, ctrl, to));
    }
    let error = if errors.is_empty() {
        f64::INFINITY
    } else {
        mean(&errors)
    };

    let kind = FitKind::Wave {
        start: features.first(),
        pieces,
        end: features.last(),
    };
    let mut fit = Fit::new(ShapeType::Wave, kind).with_error(error);
    if segmentation.len() < th.wave_min_segments {
        fit.fail(0);
    }
    if over_turned {
        fit.fail(1);
    }
    if errors.iter().any(|e| *e > th.wave_max_segment_error) {
        fit.fail(2);
    }
    fit
}

/// Gull fail codes: 0 not four quarters, 1 a half is not an arc, 2 halves
/// turn in different senses or too little, 3 no cusp, 4 halves too
/// unequal.
pub fn gull(features: &StrokeFeatures, th: &Thresholds) -> Fit {
    let quarters = GullSegmenter.segment(features);
    if quarters.len() != 4 {
        return Fit::unfit(ShapeType::Gull, 0);
    }
    let q: Vec<Vec<Point>> = quarters.strokes.iter().map(stroke_points).collect();
    let half_features: Vec<StrokeFeatures> = VSegmenter
        .segment(features)
        .strokes
        .iter()
        .map(|half| StrokeFeatures::new(half, features.smoothing()))
        .collect();
    let halves: Vec<&[Point]> = half_features.iter().map(|h| h.points()).collect();

    let junction = halves[0][halves[0].len() - 1].midpoint(halves[1][0]);
    let start = features.first();
    let end = features.last();
    let arcs: Vec<_> = [
        arc_through(start, q[1][0], junction),
        arc_through(junction, q[3][0], end),
    ]
    .into_iter()
    .flatten()
    .collect();

    let errors: Vec<f64> = halves
        .iter()
        .map(|h| arc_error(h).unwrap_or(f64::INFINITY))
        .collect();
    let rotations: Vec<f64> = half_features.iter().map(|h| h.total_rotation()).collect();
    let chords: Vec<f64> = halves
        .iter()
        .map(|h| h[0].distance(h[h.len() - 1]))
        .collect();

    let end_tangent = {
        let h = halves[0];
        h[h.len() - 1] - h[h.len().saturating_sub(2)]
    };
    let start_tangent = {
        let h = halves[1];
        h[1.min(h.len() - 1)] - h[0]
    };
    let cusp = angle_between(end_tangent, start_tangent);

    let kind = if arcs.len() == 2 {
        FitKind::Arcs { start, arcs, end }
    } else {
        FitKind::Unfit
    };
    let mut fit = Fit::new(ShapeType::Gull, kind).with_error(mean(&errors));
    if errors.iter().any(|e| *e > th.arc_max_error)
        || half_features.iter().any(|h| h.dcr() > th.curve_max_dcr)
    {
        fit.fail(1);
    }
    if rotations[0].signum() != rotations[1].signum()
        || rotations.iter().any(|r| r.abs() < th.gull_min_half_rotation)
    {
        fit.fail(2);
    }
    if cusp < th.gull_min_cusp_angle {
        fit.fail(3);
    }
    let (short, long) = (chords[0].min(chords[1]), chords[0].max(chords[1]));
    if long <= f64::EPSILON || short / long < th.gull_min_half_ratio {
        fit.fail(4);
    }
    fit
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn features(coords: &[(f64, f64)]) -> StrokeFeatures {
        StrokeFeatures::new(&Stroke::from_xy(coords).unwrap(), false)
    }

    fn sine(half_periods: usize) -> Vec<(f64, f64)> {
        (0..=half_periods * 20)
            .map(|i| (i as f64 * 5.0, 30.0 * (PI * i as f64 / 20.0).sin()))
            .collect()
    }

    fn gull_coords() -> Vec<(f64, f64)> {
        let mut coords = Vec::new();
        for offset in [0.0, 100.0] {
            for t in 0..=20 {
                let a = PI - PI * t as f64 / 20.0;
                coords.push((offset + 50.0 + 50.0 * a.cos(), 50.0 * a.sin()));
            }
        }
        coords
    }

    #[test]
    fn sine_is_a_wave() {
        let fit = wave(&features(&sine(4)), &Thresholds::default());
        assert!(fit.passed(), "fail code {:?}", fit.fail_code());
    }

    #[test]
    fn single_bump_is_not_a_wave() {
        assert_eq!(wave(&features(&sine(1)), &Thresholds::default()).fail_code(), Some(0));
    }

    #[test]
    fn two_bumps_with_cusp_are_a_gull() {
        let fit = gull(&features(&gull_coords()), &Thresholds::default());
        assert!(fit.passed(), "fail code {:?}", fit.fail_code());
        assert!(fit.beautified_path().is_some());
    }

    #[test]
    fn smooth_wave_has_no_cusp() {
        let fit = gull(&features(&sine(2)), &Thresholds::default());
        assert!(!fit.passed());
    }

    #[test]
    fn too_short_for_quarters() {
        assert_eq!(
            gull(&features(&[(0.0, 0.0), (1.0, 1.0)]), &Thresholds::default()).fail_code(),
            Some(0)
        );
    }
}
