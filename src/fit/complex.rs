//! Composite interpretation: cut the stroke at its corners and explain each
//! piece with a single primitive.
//!
//! 1. Recursive-curvature segmentation (with merge pass)
//! 2. Best accepted single-primitive fit per piece; pieces with none drop out
//! 3. Score the combination (summed error or mean classifier confidence)

use std::sync::Arc;

use log::{debug, warn};

use crate::config::{ComplexScoring, PaleoConfig};
use crate::features::StrokeFeatures;
use crate::fit::nbc::StrokeClassifier;
use crate::fit::{Fit, FitKind, ShapeType};
use crate::geom::mean;
use crate::recognizer::Recognizer;
use crate::segment::{CurvatureSegmenter, MergeRule, Segmenter};

/// Fail codes: 0 fewer than two pieces could be explained.
pub fn fit(
    features: &StrokeFeatures,
    config: &PaleoConfig,
    classifier: Option<&Arc<dyn StrokeClassifier>>,
) -> Fit {
    let scoring = match (config.complex_scoring, classifier) {
        (ComplexScoring::Classifier, None) => {
            warn!("classifier scoring requested without a classifier, summing errors instead");
            ComplexScoring::ErrorSum
        }
        (scoring, _) => scoring,
    };

    let mut segmenter = CurvatureSegmenter::new(config);
    let mut recognizer = Recognizer::new(config.restricted());
    if let Some(classifier) = classifier {
        segmenter = segmenter.with_classifier(Arc::clone(classifier));
        recognizer = recognizer.with_classifier(Arc::clone(classifier));
        if scoring == ComplexScoring::Classifier {
            segmenter = segmenter.with_merge_rule(MergeRule::Confidence {
                classifier: Arc::clone(classifier),
                min_confidence: config.thresholds.complex_merge_confidence,
            });
        }
    }

    let segmentation = segmenter.segment(features);
    let mut children = Vec::with_capacity(segmentation.len());
    let mut sub_strokes = Vec::with_capacity(segmentation.len());
    let mut confidences = Vec::new();
    for stroke in segmentation.strokes {
        let piece = StrokeFeatures::new(&stroke, config.smoothing);
        let Some(best) = recognizer.recognize_features(&piece).into_best() else {
            debug!("complex: no primitive for a {}-point piece", stroke.len());
            continue;
        };
        if scoring == ComplexScoring::Classifier {
            let confidence = classifier
                .and_then(|c| c.classify(&piece))
                .map_or(0.0, |c| c.confidence);
            confidences.push(confidence);
        }
        children.push(best);
        sub_strokes.push(stroke);
    }

    let too_few = children.len() < 2;
    let error_sum: f64 = children.iter().map(Fit::error).sum();
    let kind = FitKind::Complex {
        children,
        sub_strokes,
    };
    let mut fit = Fit::new(ShapeType::Complex, kind);
    fit = match scoring {
        ComplexScoring::ErrorSum => fit.with_error(error_sum),
        ComplexScoring::Classifier => fit.with_confidence(mean(&confidences)),
    };
    if too_few {
        fit.fail(0);
    }
    fit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::nbc::Classification;
    use crate::fit::ScoreKind;
    use crate::stroke::{Stroke, StrokeArena};

    fn l_shape() -> Vec<(f64, f64)> {
        let mut coords: Vec<(f64, f64)> = (0..=10).map(|i| (i as f64 * 10.0, 0.0)).collect();
        coords.extend((1..=10).map(|i| (100.0, i as f64 * 10.0)));
        coords
    }

    fn features(stroke: &Stroke) -> StrokeFeatures {
        StrokeFeatures::new(stroke, false)
    }

    #[test]
    fn corner_splits_into_two_lines() {
        let stroke = Stroke::from_xy(&l_shape()).unwrap();
        let fit = fit(&features(&stroke), &PaleoConfig::all_tests(), None);
        assert!(fit.passed());
        assert_eq!(fit.label(), "Complex (Line, Line)");
        assert_eq!(fit.num_primitives(), 2);
        assert_eq!(fit.percent_lines(), 1.0);
        assert!(fit.error() < 1e-9);
    }

    #[test]
    fn straight_stroke_is_not_complex() {
        let coords: Vec<(f64, f64)> = (0..20).map(|i| (i as f64, 0.0)).collect();
        let stroke = Stroke::from_xy(&coords).unwrap();
        let fit = fit(&features(&stroke), &PaleoConfig::all_tests(), None);
        assert_eq!(fit.fail_code(), Some(0));
    }

    #[test]
    fn pieces_point_back_to_the_root() {
        let mut arena = StrokeArena::new();
        let root = arena.insert(Stroke::from_xy(&l_shape()).unwrap());
        let fit = fit(&features(&root), &PaleoConfig::all_tests(), None);
        for sub in fit.sub_strokes() {
            assert_eq!(arena.parent_of(sub).and_then(Stroke::id), root.id());
        }
        let spans: Vec<_> = fit.sub_strokes().iter().filter_map(Stroke::span).collect();
        assert_eq!(spans.first().map(|s| s.start), Some(0));
        assert_eq!(spans.last().map(|s| s.end), Some(20));
    }

    struct Sure;

    impl StrokeClassifier for Sure {
        fn classify(&self, _features: &StrokeFeatures) -> Option<Classification> {
            Some(Classification {
                shape: ShapeType::Polyline,
                confidence: 0.8,
            })
        }
    }

    #[test]
    fn classifier_scoring_reports_confidence() {
        let stroke = Stroke::from_xy(&l_shape()).unwrap();
        let config = PaleoConfig {
            complex_scoring: ComplexScoring::Classifier,
            ..PaleoConfig::all_tests()
        };
        let classifier: Arc<dyn StrokeClassifier> = Arc::new(Sure);
        let fit = fit(&features(&stroke), &config, Some(&classifier));
        assert_eq!(fit.score_kind(), ScoreKind::Confidence);
        assert!((fit.score() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn classifier_scoring_without_classifier_sums_errors() {
        let stroke = Stroke::from_xy(&l_shape()).unwrap();
        let config = PaleoConfig {
            complex_scoring: ComplexScoring::Classifier,
            ..PaleoConfig::all_tests()
        };
        let fit = fit(&features(&stroke), &config, None);
        assert_eq!(fit.score_kind(), ScoreKind::Error);
    }
}
