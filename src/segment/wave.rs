use crate::features::StrokeFeatures;
use crate::segment::{Segmentation, Segmenter};

/// Splits a stroke wherever its turning direction changes sign.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveSegmenter {
    /// Turns with magnitude at or below this carry no sign.
    pub sign_tolerance: f64,
}

impl WaveSegmenter {
    pub fn new(sign_tolerance: f64) -> Self {
        Self { sign_tolerance }
    }

    fn sign(&self, turn: f64) -> i8 {
        if turn.abs() <= self.sign_tolerance || turn == 0.0 {
            0
        } else if turn > 0.0 {
            1
        } else {
            -1
        }
    }
}

impl Segmenter for WaveSegmenter {
    fn name(&self) -> &'static str {
        "Wave"
    }

    /// Segments share their boundary point. Segments of two points or
    /// fewer are dropped.
    fn segment(&self, features: &StrokeFeatures) -> Segmentation {
        let turns = features.turns();
        if turns.len() < 2 {
            return Segmentation::whole(self.name(), features);
        }
        let last = features.num_points() - 1;
        let mut bounds = vec![0];
        let mut prev = 0;
        for (k, turn) in turns.iter().enumerate() {
            let sign = self.sign(*turn);
            if sign == 0 {
                continue;
            }
            if prev != 0 && sign != prev {
                bounds.push(k);
            }
            prev = sign;
        }
        bounds.push(last);

        let strokes = bounds
            .windows(2)
            .filter(|w| w[1] - w[0] + 1 > 2)
            .map(|w| features.sub_stroke(w[0], w[1]))
            .collect();
        Segmentation::new(self.name(), strokes)
    }
}
