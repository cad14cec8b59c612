//! Arrow test over an accepted polyline: a long shaft ending in a tip,
//! with a short head of barbs spread to both sides of it.

use kurbo::Point;

use crate::config::Thresholds;
use crate::fit::{polyline, Fit, FitKind, ShapeType};
use crate::geom::angle_between;

/// Head vertices closer to the tip than this share of the shaft are
/// retrace points, not barbs.
const BARB_MIN_SHARE: f64 = 0.05;

/// Fail codes: 0 no usable polyline, 1 the shaft is not the longest side,
/// 2 the head reaches too far from the tip, 3 no barb on each side.
pub fn fit(polyline_fit: &Fit, th: &Thresholds) -> Fit {
    let vertices = polyline::vertices(polyline_fit);
    if !polyline_fit.passed() || vertices.len() < 4 {
        return Fit::unfit(ShapeType::Arrow, 0);
    }
    let (tail, tip) = (vertices[0], vertices[1]);
    let head = &vertices[2..];
    let shaft = tail.distance(tip);

    let longest_other = vertices[1..]
        .windows(2)
        .map(|w| w[0].distance(w[1]))
        .fold(0.0_f64, f64::max);
    let reach = head
        .iter()
        .map(|p| p.distance(tip))
        .fold(0.0_f64, f64::max);

    let back = tail - tip;
    let mut sides: [Option<(Point, f64)>; 2] = [None, None];
    for &p in head {
        let d = p.distance(tip);
        if d <= BARB_MIN_SHARE * shaft {
            continue;
        }
        let angle = angle_between(back, p - tip);
        if angle < th.arrow_min_barb_angle || angle > th.arrow_max_barb_angle {
            continue;
        }
        let side = usize::from(back.cross(p - tip) < 0.0);
        if sides[side].map_or(true, |(_, best)| d > best) {
            sides[side] = Some((p, d));
        }
    }

    let kind = match sides {
        [Some((left, _)), Some((right, _))] => FitKind::Arrow {
            tail,
            tip,
            barbs: [left, right],
        },
        _ => FitKind::Unfit,
    };
    let barbed = matches!(kind, FitKind::Arrow { .. });
    let mut fit = Fit::new(ShapeType::Arrow, kind).with_error(polyline_fit.error());
    if shaft <= longest_other {
        fit.fail(1);
    }
    if reach > th.arrow_max_head_ratio * shaft {
        fit.fail(2);
    }
    if !barbed {
        fit.fail(3);
    }
    fit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::StrokeFeatures;
    use crate::stroke::Stroke;

    fn dense(corners: &[(f64, f64)]) -> Vec<(f64, f64)> {
        let mut coords = vec![corners[0]];
        for w in corners.windows(2) {
            for i in 1..=10 {
                let t = i as f64 / 10.0;
                coords.push((
                    w[0].0 + (w[1].0 - w[0].0) * t,
                    w[0].1 + (w[1].1 - w[0].1) * t,
                ));
            }
        }
        coords
    }

    fn run(corners: &[(f64, f64)]) -> Fit {
        let th = Thresholds::default();
        let stroke = Stroke::from_xy(&dense(corners)).unwrap();
        let poly = polyline::fit(&StrokeFeatures::new(&stroke, false), &th);
        fit(&poly, &th)
    }

    #[test]
    fn retraced_head_is_an_arrow() {
        let fit = run(&[
            (0.0, 0.0),
            (100.0, 0.0),
            (80.0, 15.0),
            (100.0, 0.0),
            (80.0, -15.0),
        ]);
        assert!(fit.passed(), "fail code {:?}", fit.fail_code());
        assert!(fit.beautified_path().is_some());
    }

    #[test]
    fn one_sided_head_is_not_an_arrow() {
        let fit = run(&[
            (0.0, 0.0),
            (100.0, 0.0),
            (80.0, 15.0),
            (100.0, 0.0),
            (75.0, 10.0),
        ]);
        assert_eq!(fit.fail_code(), Some(3));
    }

    #[test]
    fn zigzag_has_no_shaft() {
        let fit = run(&[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0), (100.0, 50.0)]);
        assert!(!fit.passed());
    }
}
