use crate::config::Thresholds;
use crate::features::StrokeFeatures;
use crate::fit::{Fit, FitKind, ShapeType};

/// Smallest radius given to a beautified dot.
const MIN_DOT_RADIUS: f64 = 1.0;

/// Dot test. Fail code 0: the stroke's extent exceeds the dot size.
/// Error is the extent relative to the dot size.
pub fn fit(features: &StrokeFeatures, th: &Thresholds) -> Fit {
    let size = features.bounds_diagonal();
    let kind = FitKind::Dot {
        center: features.bounds().center(),
        radius: (size / 2.0).max(MIN_DOT_RADIUS),
    };
    let mut fit = Fit::new(ShapeType::Dot, kind).with_error(size / th.dot_max_size.max(f64::EPSILON));
    if size > th.dot_max_size {
        fit.fail(0);
    }
    fit
}
