//! Recursive max-curvature segmentation with an adjacent-pair merge pass.
//!
//! 1. Split at the highest-curvature point; both halves share it
//! 2. A half the restricted recognizer accepts is a leaf; otherwise recurse
//! 3. Merge adjacent leaves whose union is still a simple primitive

use std::sync::Arc;

use log::debug;

use crate::config::PaleoConfig;
use crate::features::StrokeFeatures;
use crate::fit::nbc::StrokeClassifier;
use crate::fit::ShapeType;
use crate::recognizer::Recognizer;
use crate::segment::{Segmentation, Segmenter};
use crate::stroke::Stroke;

/// Decides whether two adjacent segments may be merged.
#[derive(Clone)]
pub enum MergeRule {
    /// Merge when the best accepted fit is a primitive other than a
    /// polyline or curve.
    Primitive,
    /// Merge when the classifier is confident in a label other than
    /// complex or arrow.
    Confidence {
        classifier: Arc<dyn StrokeClassifier>,
        min_confidence: f64,
    },
}

impl std::fmt::Debug for MergeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeRule::Primitive => f.write_str("Primitive"),
            MergeRule::Confidence { min_confidence, .. } => f
                .debug_struct("Confidence")
                .field("min_confidence", min_confidence)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CurvatureSegmenter {
    recognizer: Recognizer,
    merge: MergeRule,
}

impl CurvatureSegmenter {
    /// Uses the restricted form of `config` to judge segments.
    pub fn new(config: &PaleoConfig) -> Self {
        Self {
            recognizer: Recognizer::new(config.restricted()),
            merge: MergeRule::Primitive,
        }
    }

    pub fn with_merge_rule(mut self, merge: MergeRule) -> Self {
        self.merge = merge;
        self
    }

    /// Install a classifier on the segment recognizer.
    pub fn with_classifier(mut self, classifier: Arc<dyn StrokeClassifier>) -> Self {
        self.recognizer = self.recognizer.with_classifier(classifier);
        self
    }

    fn smoothing(&self) -> bool {
        self.recognizer.config().smoothing
    }

    /// Leaf segments before the merge pass.
    pub fn leaves(&self, features: &StrokeFeatures) -> Vec<Stroke> {
        let n = features.num_points();
        if n < 2 {
            return Vec::new();
        }
        if n == 2 {
            return vec![features.sub_stroke(0, 1)];
        }
        let corner = features.max_curv_index();
        if corner + 1 <= 2 || n - corner <= 2 {
            return vec![features.sub_stroke(0, n - 1)];
        }

        let mut leaves = Vec::new();
        for piece in [features.sub_stroke(0, corner), features.sub_stroke(corner, n - 1)] {
            let piece_features = StrokeFeatures::new(&piece, self.smoothing());
            if self.recognizer.recognize_features(&piece_features).is_empty() {
                leaves.extend(self.leaves(&piece_features));
            } else {
                leaves.push(piece);
            }
        }
        leaves
    }

    /// Merge adjacent segments in place. Never increases the count.
    pub fn merge(&self, mut segments: Vec<Stroke>) -> Vec<Stroke> {
        if segments.len() <= 2 {
            return segments;
        }
        let mut i = 0;
        while i + 1 < segments.len() {
            let merged = segments[i].concat(&segments[i + 1]);
            if self.accepts(&StrokeFeatures::new(&merged, self.smoothing())) {
                debug!("merged segments {} and {}", i, i + 1);
                segments.splice(i..=i + 1, [merged]);
            } else {
                i += 1;
            }
        }
        segments
    }

    fn accepts(&self, merged: &StrokeFeatures) -> bool {
        match &self.merge {
            MergeRule::Primitive => self
                .recognizer
                .recognize_features(merged)
                .best()
                .is_some_and(|best| {
                    !matches!(best.shape_type(), ShapeType::Polyline | ShapeType::Curve)
                }),
            MergeRule::Confidence {
                classifier,
                min_confidence,
            } => classifier.classify(merged).is_some_and(|c| {
                !matches!(c.shape, ShapeType::Complex | ShapeType::Arrow)
                    && c.confidence > *min_confidence
            }),
        }
    }
}

impl Segmenter for CurvatureSegmenter {
    fn name(&self) -> &'static str {
        "Curvature"
    }

    fn segment(&self, features: &StrokeFeatures) -> Segmentation {
        let leaves = self.leaves(features);
        let count = leaves.len();
        let merged = self.merge(leaves);
        debug!("curvature segmentation: {} leaves, {} after merge", count, merged.len());
        Segmentation::new(self.name(), merged)
    }
}
