//! Runs the enabled fit tests over a stroke and ranks what passed.
//!
//! 1. Build the stroke's features once
//! 2. Derive the polyline if any corner-based test needs it
//! 3. Run each enabled test in a fixed order
//! 4. Rank accepted fits: simplest first, then lowest error

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use rayon::prelude::*;

use crate::config::PaleoConfig;
use crate::error::PaleoError;
use crate::features::StrokeFeatures;
use crate::fit::nbc::StrokeClassifier;
use crate::fit::{
    arc, arrow, blob, circle, complex, curve, dot, ellipse, line, nbc, polygon, polyline, rank,
    rect, spiral, wave, Fit, ShapeType,
};
use crate::stroke::Stroke;

/// Tests that read the polyline fit.
const NEEDS_POLYLINE: [ShapeType; 6] = [
    ShapeType::Polyline,
    ShapeType::Polygon,
    ShapeType::Rectangle,
    ShapeType::Square,
    ShapeType::Diamond,
    ShapeType::Arrow,
];

/// Outcome of one recognition request.
#[derive(Debug, Clone, Default)]
pub struct Recognition {
    accepted: Vec<Fit>,
    rejected: Vec<Fit>,
}

impl Recognition {
    /// Accepted fits, best first.
    pub fn accepted(&self) -> &[Fit] {
        &self.accepted
    }

    /// Fits that ran and failed, in test order.
    pub fn rejected(&self) -> &[Fit] {
        &self.rejected
    }

    pub fn best(&self) -> Option<&Fit> {
        self.accepted.first()
    }

    pub fn into_best(self) -> Option<Fit> {
        self.accepted.into_iter().next()
    }

    /// True when no test accepted the stroke.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Accepted fit for one shape, if it passed.
    pub fn get(&self, shape: ShapeType) -> Option<&Fit> {
        self.accepted.iter().find(|f| f.shape_type() == shape)
    }

    /// Fit for one shape whether or not it passed.
    pub fn result(&self, shape: ShapeType) -> Option<&Fit> {
        self.get(shape)
            .or_else(|| self.rejected.iter().find(|f| f.shape_type() == shape))
    }
}

/// Optional wall-clock limit on one request.
struct Budget {
    start: Instant,
    limit: Option<Duration>,
}

impl Budget {
    fn unlimited() -> Self {
        Self {
            start: Instant::now(),
            limit: None,
        }
    }

    fn within(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit: Some(limit),
        }
    }

    fn check(&self) -> Result<(), PaleoError> {
        match self.limit {
            Some(limit) if self.start.elapsed() >= limit => Err(PaleoError::TimeExceeded {
                elapsed_ms: self.start.elapsed().as_millis(),
                budget_ms: limit.as_millis(),
            }),
            _ => Ok(()),
        }
    }
}

/// Stroke recognizer: an enabled-tests configuration plus an optional
/// statistical classifier. Cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct Recognizer {
    config: PaleoConfig,
    classifier: Option<Arc<dyn StrokeClassifier>>,
}

impl fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recognizer")
            .field("config", &self.config)
            .field("classifier", &self.classifier.is_some())
            .finish()
    }
}

impl Default for Recognizer {
    fn default() -> Self {
        Self::new(PaleoConfig::default())
    }
}

impl Recognizer {
    pub fn new(config: PaleoConfig) -> Self {
        Self {
            config,
            classifier: None,
        }
    }

    /// Install the classifier used by the NBC test and classifier scoring.
    pub fn with_classifier(mut self, classifier: Arc<dyn StrokeClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn config(&self) -> &PaleoConfig {
        &self.config
    }

    pub fn recognize(&self, stroke: &Stroke) -> Recognition {
        self.recognize_features(&StrokeFeatures::new(stroke, self.config.smoothing))
    }

    /// Recognize a stroke whose features are already built.
    pub fn recognize_features(&self, features: &StrokeFeatures) -> Recognition {
        // An unlimited budget never expires.
        self.run(features, &Budget::unlimited()).unwrap_or_default()
    }

    /// Like [`recognize`](Self::recognize), but gives up with
    /// [`PaleoError::TimeExceeded`] once `budget` has elapsed. The clock is
    /// checked before and after every test.
    pub fn recognize_within(
        &self,
        stroke: &Stroke,
        budget: Duration,
    ) -> Result<Recognition, PaleoError> {
        let budget = Budget::within(budget);
        let features = StrokeFeatures::new(stroke, self.config.smoothing);
        self.run(&features, &budget)
    }

    /// Recognize independent strokes in parallel, one task per stroke.
    /// Results come back in input order.
    pub fn recognize_batch(&self, strokes: &[Stroke]) -> Vec<Recognition> {
        strokes.par_iter().map(|s| self.recognize(s)).collect()
    }

    fn run(&self, features: &StrokeFeatures, budget: &Budget) -> Result<Recognition, PaleoError> {
        let config = &self.config;
        let th = &config.thresholds;

        budget.check()?;
        let polyline_fit = if NEEDS_POLYLINE.iter().any(|s| config.is_enabled(*s)) {
            let fit = polyline::fit(features, th);
            budget.check()?;
            Some(fit)
        } else {
            None
        };

        let mut recognition = Recognition::default();
        for shape in ShapeType::ALL {
            if !config.is_enabled(shape) {
                continue;
            }
            budget.check()?;
            let Some(fit) = self.test(shape, features, polyline_fit.as_ref()) else {
                continue;
            };
            budget.check()?;
            debug!(
                "{}: passed={} fail_code={:?} error={:.4}",
                fit.label(),
                fit.passed(),
                fit.fail_code(),
                fit.error()
            );
            if fit.passed() {
                recognition.accepted.push(fit);
            } else {
                recognition.rejected.push(fit);
            }
        }
        recognition.accepted.sort_by(rank);
        Ok(recognition)
    }

    fn test(&self, shape: ShapeType, features: &StrokeFeatures, polyline_fit: Option<&Fit>) -> Option<Fit> {
        let th = &self.config.thresholds;
        let fit = match shape {
            ShapeType::Line => line::fit(features, th),
            ShapeType::Polyline => polyline_fit?.clone(),
            ShapeType::Arc => arc::fit(features, th),
            ShapeType::Circle => circle::fit(features, th),
            ShapeType::Ellipse => ellipse::fit(features, th),
            ShapeType::Polygon => polygon::fit(features, polyline_fit?, th),
            ShapeType::Curve => curve::fit(features, th),
            ShapeType::Spiral => spiral::spiral(features, th),
            ShapeType::Helix => spiral::helix(features, th),
            ShapeType::Wave => wave::wave(features, th),
            ShapeType::Gull => wave::gull(features, th),
            ShapeType::Rectangle => rect::rectangle(features, polyline_fit?, th),
            ShapeType::Square => rect::square(features, polyline_fit?, th),
            ShapeType::Diamond => rect::diamond(features, polyline_fit?, th),
            ShapeType::Dot => dot::fit(features, th),
            ShapeType::Arrow => arrow::fit(polyline_fit?, th),
            ShapeType::Blob => blob::blob(features, th),
            ShapeType::Infinity => blob::infinity(features, th),
            ShapeType::Nbc => nbc::fit(features, self.classifier.as_deref(), th),
            ShapeType::Complex => complex::fit(features, &self.config, self.classifier.as_ref()),
            ShapeType::Unspecified => return None,
        };
        Some(fit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_stroke() -> Stroke {
        let coords: Vec<(f64, f64)> = (0..20).map(|i| (i as f64 * 5.0, i as f64 * 2.0)).collect();
        Stroke::from_xy(&coords).unwrap()
    }

    #[test]
    fn straight_stroke_ranks_line_first() {
        let recognition = Recognizer::default().recognize(&line_stroke());
        let best = recognition.best().unwrap();
        assert_eq!(best.shape_type(), ShapeType::Line);
        assert!(best.error() < 1e-9);
    }

    #[test]
    fn disabled_tests_do_not_run() {
        let config = PaleoConfig::all_tests().with(ShapeType::Line, false);
        let recognition = Recognizer::new(config).recognize(&line_stroke());
        assert!(recognition.result(ShapeType::Line).is_none());
        assert!(recognition.result(ShapeType::Arc).is_some());
    }

    #[test]
    fn polyline_hidden_when_disabled() {
        let recognition = Recognizer::new(PaleoConfig::basic_prims_only()).recognize(&line_stroke());
        assert!(recognition.result(ShapeType::Polyline).is_none());
        assert!(recognition.result(ShapeType::Rectangle).is_some());
    }

    #[test]
    fn accepted_fits_are_ranked() {
        let recognition = Recognizer::default().recognize(&line_stroke());
        for w in recognition.accepted().windows(2) {
            assert_ne!(rank(&w[0], &w[1]), std::cmp::Ordering::Greater);
        }
    }

    #[test]
    fn zero_budget_error_names_budget() {
        let result = Recognizer::default().recognize_within(&line_stroke(), Duration::ZERO);
        assert!(
            matches!(result, Err(PaleoError::TimeExceeded { budget_ms: 0, .. })),
            "zero budget gave {result:?}"
        );
    }

    #[test]
    fn generous_budget_matches_plain_run() {
        let recognizer = Recognizer::default();
        let timed = recognizer
            .recognize_within(&line_stroke(), Duration::from_secs(60))
            .unwrap();
        let plain = recognizer.recognize(&line_stroke());
        assert_eq!(timed.accepted().len(), plain.accepted().len());
    }

    #[test]
    fn recognizer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Recognizer>();
        assert_send_sync::<Recognition>();
    }
}
