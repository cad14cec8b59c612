//! Stroke segmenters.
//!
//! A segmenter cuts one stroke into ordered sub-strokes, each parented to
//! the stroke it came from. [`SegmentationTask`] lets a caller compute a
//! segmentation now or stash it for later retrieval.

pub mod curvature;
pub mod gull;
pub mod revolution;
pub mod v;
pub mod wave;

pub use curvature::{CurvatureSegmenter, MergeRule};
pub use gull::GullSegmenter;
pub use revolution::RevolutionSegmenter;
pub use v::VSegmenter;
pub use wave::WaveSegmenter;

use crate::features::StrokeFeatures;
use crate::stroke::Stroke;

/// Ordered sub-strokes produced by one segmenter.
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    pub segmenter: &'static str,
    pub strokes: Vec<Stroke>,
}

impl Segmentation {
    pub fn new(segmenter: &'static str, strokes: Vec<Stroke>) -> Self {
        Self { segmenter, strokes }
    }

    /// The whole stroke as a single segment.
    pub fn whole(segmenter: &'static str, features: &StrokeFeatures) -> Self {
        let last = features.num_points() - 1;
        Self::new(segmenter, vec![features.sub_stroke(0, last)])
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

/// Cuts a stroke into sub-strokes.
pub trait Segmenter {
    fn name(&self) -> &'static str;

    fn segment(&self, features: &StrokeFeatures) -> Segmentation;
}

/// A segmenter bound to one stroke, run now or stashed for later.
#[derive(Debug)]
pub struct SegmentationTask<S> {
    segmenter: S,
    features: StrokeFeatures,
    result: Option<Segmentation>,
}

impl<S: Segmenter> SegmentationTask<S> {
    pub fn new(segmenter: S, features: StrokeFeatures) -> Self {
        Self {
            segmenter,
            features,
            result: None,
        }
    }

    /// Compute the segmentation without storing it.
    pub fn segment_now(&self) -> Segmentation {
        self.segmenter.segment(&self.features)
    }

    /// Compute and stash the segmentation (first call only).
    pub fn run(&mut self) -> &Segmentation {
        let (segmenter, features) = (&self.segmenter, &self.features);
        self.result.get_or_insert_with(|| segmenter.segment(features))
    }

    /// The stashed result, if [`run`](Self::run) has been called.
    pub fn result(&self) -> Option<&Segmentation> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Option<Segmentation> {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_stashes_result() {
        let stroke = Stroke::from_xy(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]).unwrap();
        let mut task = SegmentationTask::new(VSegmenter, StrokeFeatures::new(&stroke, false));
        assert!(task.result().is_none());
        let now = task.segment_now();
        assert_eq!(task.run().len(), 2);
        assert_eq!(task.result(), Some(&now));
        assert_eq!(task.into_result().map(|s| s.segmenter), Some("V"));
    }

    #[test]
    fn task_runs_on_worker_thread() {
        let stroke = Stroke::from_xy(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]).unwrap();
        let mut task = SegmentationTask::new(VSegmenter, StrokeFeatures::new(&stroke, false));
        let handle = std::thread::spawn(move || {
            task.run();
            task
        });
        let task = handle.join().unwrap();
        assert_eq!(task.result().map(Segmentation::len), Some(2));
    }
}
