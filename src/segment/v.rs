use crate::features::StrokeFeatures;
use crate::segment::{Segmentation, Segmenter};

/// Bisects a stroke by point count.
#[derive(Debug, Clone, Copy, Default)]
pub struct VSegmenter;

impl Segmenter for VSegmenter {
    fn name(&self) -> &'static str {
        "V"
    }

    /// Point `i` goes to the tail when `i / n >= 0.5`. Fewer than two
    /// points yield the whole stroke.
    fn segment(&self, features: &StrokeFeatures) -> Segmentation {
        let n = features.num_points();
        if n < 2 {
            return Segmentation::whole(self.name(), features);
        }
        let split = (n + 1) / 2;
        Segmentation::new(
            self.name(),
            vec![
                features.sub_stroke(0, split - 1),
                features.sub_stroke(split, n - 1),
            ],
        )
    }
}
