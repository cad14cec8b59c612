//! paleo: freehand stroke → geometric primitives.
//!
//! Decides which primitives (line, arc, circle, polygon, spiral, arrow, …)
//! best describe a pen stroke, scores each interpretation, and builds an
//! idealized `kurbo::BezPath` for every one that fits.
//!
//! # Example
//!
//! ```
//! use paleo::{PaleoConfig, Recognizer, ShapeType, Stroke};
//!
//! let coords: Vec<(f64, f64)> = (0..20).map(|i| (i as f64 * 5.0, 0.0)).collect();
//! let stroke = Stroke::from_xy(&coords)?;
//! let recognition = Recognizer::new(PaleoConfig::default()).recognize(&stroke);
//! let best = recognition.best().expect("a line fits");
//! assert_eq!(best.shape_type(), ShapeType::Line);
//! let _path = best.beautified_path();
//! # Ok::<(), paleo::PaleoError>(())
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod features;
pub mod fit;
mod geom;
pub mod recognizer;
pub mod segment;
pub mod shape;
pub mod stroke;

// Re-export kurbo so callers build and read paths with the same version.
pub use kurbo;

pub use config::{ComplexScoring, PaleoConfig, Thresholds};
pub use error::PaleoError;
pub use features::StrokeFeatures;
pub use fit::nbc::{Classification, StrokeClassifier};
pub use fit::{Fit, FitKind, ScoreKind, ShapeType};
pub use recognizer::{Recognition, Recognizer};
pub use segment::{
    CurvatureSegmenter, GullSegmenter, MergeRule, RevolutionSegmenter, Segmentation,
    SegmentationTask, Segmenter, VSegmenter, WaveSegmenter,
};
pub use shape::{BeautifiedShape, PaintSink, Painter};
pub use stroke::{Span, Stroke, StrokeArena, StrokeId, StrokePoint};
