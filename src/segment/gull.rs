use crate::features::StrokeFeatures;
use crate::segment::{Segmentation, Segmenter, VSegmenter};

/// Quarters a stroke: V-split the whole, then V-split each half.
#[derive(Debug, Clone, Copy, Default)]
pub struct GullSegmenter;

impl Segmenter for GullSegmenter {
    fn name(&self) -> &'static str {
        "Gull"
    }

    /// Returns exactly four quarters, or the whole stroke if any V-split
    /// does not produce two parts.
    fn segment(&self, features: &StrokeFeatures) -> Segmentation {
        if features.dir().len() < 2 {
            return Segmentation::whole(self.name(), features);
        }
        let halves = VSegmenter.segment(features);
        if halves.len() != 2 {
            return Segmentation::whole(self.name(), features);
        }
        let mut quarters = Vec::with_capacity(4);
        for half in &halves.strokes {
            let parts = VSegmenter.segment(&StrokeFeatures::new(half, features.smoothing()));
            if parts.len() != 2 {
                return Segmentation::whole(self.name(), features);
            }
            quarters.extend(parts.strokes);
        }
        Segmentation::new(self.name(), quarters)
    }
}
