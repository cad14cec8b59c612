//! Statistical classification hook.
//!
//! The engine ships no trained model. Callers plug one in through
//! [`StrokeClassifier`]; the NBC test then reports the classifier's label
//! and confidence as a fit.

use crate::config::Thresholds;
use crate::features::StrokeFeatures;
use crate::fit::{Fit, FitKind, ShapeType};

/// A label and how sure the classifier is of it, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub shape: ShapeType,
    pub confidence: f64,
}

/// External statistical classifier over stroke features.
pub trait StrokeClassifier: Send + Sync {
    fn classify(&self, features: &StrokeFeatures) -> Option<Classification>;
}

/// Fail codes: 0 no classifier or no answer, 1 confidence too low.
pub fn fit(
    features: &StrokeFeatures,
    classifier: Option<&dyn StrokeClassifier>,
    th: &Thresholds,
) -> Fit {
    let Some(result) = classifier.and_then(|c| c.classify(features)) else {
        return Fit::unfit(ShapeType::Nbc, 0);
    };
    let kind = FitKind::Nbc {
        class: result.shape,
        points: features.points().to_vec(),
    };
    let mut fit = Fit::new(ShapeType::Nbc, kind).with_confidence(result.confidence);
    if result.confidence < th.nbc_min_confidence {
        fit.fail(1);
    }
    fit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::ScoreKind;
    use crate::stroke::Stroke;

    struct Fixed(f64);

    impl StrokeClassifier for Fixed {
        fn classify(&self, _features: &StrokeFeatures) -> Option<Classification> {
            Some(Classification {
                shape: ShapeType::Circle,
                confidence: self.0,
            })
        }
    }

    fn features() -> StrokeFeatures {
        StrokeFeatures::new(&Stroke::from_xy(&[(0.0, 0.0), (4.0, 3.0)]).unwrap(), false)
    }

    #[test]
    fn no_classifier_fails() {
        let fit = fit(&features(), None, &Thresholds::default());
        assert_eq!(fit.fail_code(), Some(0));
    }

    #[test]
    fn confident_label_passes() {
        let fit = fit(&features(), Some(&Fixed(0.8)), &Thresholds::default());
        assert!(fit.passed());
        assert_eq!(fit.score_kind(), ScoreKind::Confidence);
        assert!((fit.error() - 0.2).abs() < 1e-12);
        assert_eq!(fit.label(), "NBC (Circle)");
    }

    #[test]
    fn unsure_label_fails() {
        let fit = fit(&features(), Some(&Fixed(0.3)), &Thresholds::default());
        assert_eq!(fit.fail_code(), Some(1));
    }
}
