use std::f64::consts::TAU;

use crate::features::StrokeFeatures;
use crate::segment::{Segmentation, Segmenter};

/// Cuts a stroke at every full revolution of its direction graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct RevolutionSegmenter;

impl RevolutionSegmenter {
    /// Inclusive point index ranges, one per revolution.
    ///
    /// Whether the direction increases is decided once, from the middle
    /// sample against the first. Each revolution ends on the point where
    /// the direction passes another 2 pi, and the next one starts there.
    /// The partial tail is kept only if it has more than two points.
    pub fn ranges(&self, features: &StrokeFeatures) -> Vec<(usize, usize)> {
        let dir = features.dir();
        let last = features.num_points() - 1;
        if dir.is_empty() {
            return vec![(0, last)];
        }
        let increasing = dir[dir.len() / 2] > dir[0];
        let step = if increasing { TAU } else { -TAU };
        let mut limit = dir[0] + step;
        let mut start = 0;
        let mut ranges = Vec::new();

        for (i, d) in dir.iter().enumerate().skip(1) {
            let crossed = if increasing { *d > limit } else { *d < limit };
            if crossed {
                ranges.push((start, i));
                start = i;
                limit += step;
            }
        }
        if last + 1 - start > 2 {
            ranges.push((start, last));
        }
        ranges
    }
}

impl Segmenter for RevolutionSegmenter {
    fn name(&self) -> &'static str {
        "Revolution"
    }

    fn segment(&self, features: &StrokeFeatures) -> Segmentation {
        let strokes = self
            .ranges(features)
            .into_iter()
            .map(|(a, b)| features.sub_stroke(a, b))
            .collect();
        Segmentation::new(self.name(), strokes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Stroke;

    fn loops(turns: f64) -> Segmentation {
        let n = (36.0 * turns) as usize;
        let coords: Vec<(f64, f64)> = (0..=n)
            .map(|i| {
                let a = TAU * turns * i as f64 / n as f64;
                let r = 30.0 + 10.0 * a;
                (r * a.cos(), r * a.sin())
            })
            .collect();
        RevolutionSegmenter.segment(&StrokeFeatures::new(&Stroke::from_xy(&coords).unwrap(), false))
    }

    #[test]
    fn one_segment_per_revolution() {
        assert_eq!(loops(3.5).len(), 4);
    }

    #[test]
    fn count_grows_with_rotation() {
        let counts: Vec<usize> = [0.5, 1.5, 2.5, 3.5, 4.5].iter().map(|t| loops(*t).len()).collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]), "{counts:?}");
    }

    #[test]
    fn clockwise_loops_are_counted() {
        let coords: Vec<(f64, f64)> = (0..=90)
            .map(|i| {
                let a = -TAU * 2.5 * i as f64 / 90.0;
                (50.0 * a.cos(), 50.0 * a.sin())
            })
            .collect();
        let seg = RevolutionSegmenter
            .segment(&StrokeFeatures::new(&Stroke::from_xy(&coords).unwrap(), false));
        assert_eq!(seg.len(), 3);
    }

    #[test]
    fn two_points_leave_nothing() {
        let stroke = Stroke::from_xy(&[(0.0, 0.0), (1.0, 0.0)]).unwrap();
        assert!(RevolutionSegmenter
            .segment(&StrokeFeatures::new(&stroke, false))
            .is_empty());
    }
}
