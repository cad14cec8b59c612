use serde::{Deserialize, Serialize};

use crate::fit::ShapeType;

/// Which fit tests run, plus the thresholds they use.
///
/// Designed to be serializable (for saving presets); missing fields
/// deserialize to the defaults. Loading presets from disk is left to the
/// caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaleoConfig {
    // -- Primitive tests --
    pub line: bool,
    pub arc: bool,
    pub curve: bool,
    pub circle: bool,
    pub ellipse: bool,
    pub spiral: bool,
    pub helix: bool,
    pub wave: bool,
    pub gull: bool,
    pub dot: bool,
    pub blob: bool,
    pub infinity: bool,
    pub rectangle: bool,
    pub square: bool,
    pub diamond: bool,
    pub nbc: bool,

    // -- Composite tests --
    pub polyline: bool,
    pub polygon: bool,
    pub arrow: bool,
    pub complex: bool,

    /// Smooth the direction graph before computing turns and curvature.
    pub smoothing: bool,
    /// How ComplexFit scores a segmentation.
    pub complex_scoring: ComplexScoring,
    pub thresholds: Thresholds,
}

/// Scoring used by ComplexFit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComplexScoring {
    /// Sum of the sub-fits' errors; merges accept any simple primitive.
    #[default]
    ErrorSum,
    /// Mean classifier confidence over segments; merges require a confident
    /// simple label. Needs a classifier on the recognizer.
    Classifier,
}

impl Default for PaleoConfig {
    fn default() -> Self {
        Self::all_tests()
    }
}

impl PaleoConfig {
    /// Every test enabled.
    pub fn all_tests() -> Self {
        Self {
            line: true,
            arc: true,
            curve: true,
            circle: true,
            ellipse: true,
            spiral: true,
            helix: true,
            wave: true,
            gull: true,
            dot: true,
            blob: true,
            infinity: true,
            rectangle: true,
            square: true,
            diamond: true,
            nbc: true,
            polyline: true,
            polygon: true,
            arrow: true,
            complex: true,
            smoothing: false,
            complex_scoring: ComplexScoring::ErrorSum,
            thresholds: Thresholds::default(),
        }
    }

    /// Single primitives only: no Complex, Polygon, Polyline or Arrow.
    pub fn basic_prims_only() -> Self {
        Self::all_tests().restricted()
    }

    /// This configuration with the composite tests switched off.
    pub fn restricted(&self) -> Self {
        Self {
            polyline: false,
            polygon: false,
            arrow: false,
            complex: false,
            ..self.clone()
        }
    }

    pub fn is_enabled(&self, shape: ShapeType) -> bool {
        match shape {
            ShapeType::Line => self.line,
            ShapeType::Arc => self.arc,
            ShapeType::Curve => self.curve,
            ShapeType::Circle => self.circle,
            ShapeType::Ellipse => self.ellipse,
            ShapeType::Spiral => self.spiral,
            ShapeType::Helix => self.helix,
            ShapeType::Wave => self.wave,
            ShapeType::Gull => self.gull,
            ShapeType::Dot => self.dot,
            ShapeType::Blob => self.blob,
            ShapeType::Infinity => self.infinity,
            ShapeType::Rectangle => self.rectangle,
            ShapeType::Square => self.square,
            ShapeType::Diamond => self.diamond,
            ShapeType::Nbc => self.nbc,
            ShapeType::Polyline => self.polyline,
            ShapeType::Polygon => self.polygon,
            ShapeType::Arrow => self.arrow,
            ShapeType::Complex => self.complex,
            ShapeType::Unspecified => false,
        }
    }

    pub fn set_enabled(&mut self, shape: ShapeType, on: bool) {
        let flag = match shape {
            ShapeType::Line => &mut self.line,
            ShapeType::Arc => &mut self.arc,
            ShapeType::Curve => &mut self.curve,
            ShapeType::Circle => &mut self.circle,
            ShapeType::Ellipse => &mut self.ellipse,
            ShapeType::Spiral => &mut self.spiral,
            ShapeType::Helix => &mut self.helix,
            ShapeType::Wave => &mut self.wave,
            ShapeType::Gull => &mut self.gull,
            ShapeType::Dot => &mut self.dot,
            ShapeType::Blob => &mut self.blob,
            ShapeType::Infinity => &mut self.infinity,
            ShapeType::Rectangle => &mut self.rectangle,
            ShapeType::Square => &mut self.square,
            ShapeType::Diamond => &mut self.diamond,
            ShapeType::Nbc => &mut self.nbc,
            ShapeType::Polyline => &mut self.polyline,
            ShapeType::Polygon => &mut self.polygon,
            ShapeType::Arrow => &mut self.arrow,
            ShapeType::Complex => &mut self.complex,
            ShapeType::Unspecified => return,
        };
        *flag = on;
    }

    /// Builder-style toggle.
    pub fn with(mut self, shape: ShapeType, on: bool) -> Self {
        self.set_enabled(shape, on);
        self
    }
}

/// Numeric acceptance thresholds. Angles are in radians; ratios are
/// dimensionless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    // -- Line / polyline --
    /// Minimum endpoint distance over path length for a line.
    pub line_min_endpoint_ratio: f64,
    /// Maximum RMS distance from the chord, relative to length.
    pub line_max_rms_ratio: f64,
    /// Maximum feature area between stroke and chord, over length squared.
    pub line_max_feature_area_ratio: f64,
    /// RDP epsilon for polyline corners, relative to the bbox diagonal.
    pub polyline_rdp_ratio: f64,

    // -- Closed shapes --
    /// Maximum endpoint gap over path length for a polygon.
    pub polygon_max_endpoint_ratio: f64,
    /// Minimum number of polyline sides for a polygon.
    pub polygon_min_lines: usize,
    /// Maximum endpoint gap over path length for rectangles, blobs and
    /// infinity signs.
    pub closed_max_endpoint_ratio: f64,
    /// Maximum deviation of a rectangle corner from a right angle.
    pub rect_max_angle_deviation: f64,
    /// Minimum short side over long side for squares and diamonds.
    pub square_min_side_ratio: f64,
    /// Maximum deviation of diamond sides from a 45 degree tilt.
    pub diamond_max_tilt_deviation: f64,

    // -- Curved primitives --
    /// Maximum direction change ratio for any smooth primitive.
    pub curve_max_dcr: f64,
    /// Minimum total rotation for circles and ellipses.
    pub circle_min_rotation: f64,
    /// Maximum mean radial deviation over radius.
    pub circle_max_error: f64,
    /// Maximum mean normalized radial deviation for ellipses.
    pub ellipse_max_error: f64,
    /// Minimum minor over major axis.
    pub ellipse_min_axis_ratio: f64,
    /// Maximum total rotation for an arc.
    pub arc_max_rotation: f64,
    /// Maximum mean radial deviation over radius for arcs.
    pub arc_max_error: f64,
    /// Maximum mean distance to the fitted cubic over path length.
    pub curve_max_error: f64,

    // -- Spirals and helixes --
    pub spiral_min_rotation: f64,
    /// Maximum drift of revolution centers, relative to mean radius.
    pub spiral_max_center_drift: f64,
    /// Minimum relative change between start and end radius.
    pub spiral_min_radius_change: f64,
    pub spiral_max_error: f64,
    /// Minimum travel of revolution centers, relative to mean radius.
    pub helix_min_center_travel: f64,
    /// Maximum coefficient of variation of revolution radii.
    pub helix_max_radius_variation: f64,

    // -- Waves and gulls --
    pub wave_min_segments: usize,
    /// Turning values with magnitude at or below this carry no sign.
    pub wave_sign_tolerance: f64,
    pub wave_max_segment_rotation: f64,
    /// Maximum arc error of any wave segment.
    pub wave_max_segment_error: f64,
    pub gull_min_half_rotation: f64,
    pub gull_min_cusp_angle: f64,
    /// Minimum shorter over longer half chord.
    pub gull_min_half_ratio: f64,

    // -- Misc --
    /// Maximum bounding-box diagonal of a dot, in stroke units.
    pub dot_max_size: f64,
    /// Maximum head extent relative to shaft length.
    pub arrow_max_head_ratio: f64,
    pub arrow_min_barb_angle: f64,
    pub arrow_max_barb_angle: f64,
    pub blob_min_rotation: f64,
    pub blob_max_rotation: f64,
    pub infinity_min_loop_rotation: f64,
    pub nbc_min_confidence: f64,
    /// Classifier confidence needed to merge segments.
    pub complex_merge_confidence: f64,
    /// Accuracy for smooth beautified paths (kurbo fit tolerance).
    pub fit_accuracy: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            line_min_endpoint_ratio: 0.9,
            line_max_rms_ratio: 0.02,
            line_max_feature_area_ratio: 0.015,
            polyline_rdp_ratio: 0.03,

            polygon_max_endpoint_ratio: 0.1,
            polygon_min_lines: 5,
            closed_max_endpoint_ratio: 0.1,
            rect_max_angle_deviation: 0.35,
            square_min_side_ratio: 0.8,
            diamond_max_tilt_deviation: 0.26,

            curve_max_dcr: 6.0,
            circle_min_rotation: 5.0,
            circle_max_error: 0.1,
            ellipse_max_error: 0.12,
            ellipse_min_axis_ratio: 0.05,
            arc_max_rotation: 5.3,
            arc_max_error: 0.08,
            curve_max_error: 0.02,

            spiral_min_rotation: 9.0,
            spiral_max_center_drift: 0.4,
            spiral_min_radius_change: 0.25,
            spiral_max_error: 0.25,
            helix_min_center_travel: 0.5,
            helix_max_radius_variation: 0.35,

            wave_min_segments: 3,
            wave_sign_tolerance: 0.0,
            wave_max_segment_rotation: 4.0,
            wave_max_segment_error: 0.15,
            gull_min_half_rotation: 0.8,
            gull_min_cusp_angle: 0.6,
            gull_min_half_ratio: 0.4,

            dot_max_size: 10.0,
            arrow_max_head_ratio: 0.6,
            arrow_min_barb_angle: 0.17,
            arrow_max_barb_angle: 1.4,
            blob_min_rotation: 4.7,
            blob_max_rotation: 8.5,
            infinity_min_loop_rotation: 4.0,
            nbc_min_confidence: 0.5,
            complex_merge_confidence: 0.5,
            fit_accuracy: 0.5,
        }
    }
}
