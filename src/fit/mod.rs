//! Primitive fit tests.
//!
//! Every test takes a stroke's [`StrokeFeatures`](crate::StrokeFeatures)
//! and returns a [`Fit`]: pass/fail, a fail code naming the failed
//! predicate, a score, and the geometry needed to build the beautified
//! shape. Failing a test is an expected outcome, never an error.

pub mod arc;
pub mod arrow;
pub mod blob;
pub mod circle;
pub mod complex;
pub mod curve;
pub mod dot;
pub mod ellipse;
pub mod line;
pub mod nbc;
pub mod polygon;
pub mod polyline;
pub mod rect;
pub mod spiral;
pub mod wave;

use std::fmt;
use std::sync::OnceLock;

use kurbo::{Arc, BezPath, Circle, CubicBez, Ellipse, PathEl, Point, Shape, Vec2};
use log::error;
use serde::{Deserialize, Serialize};

use crate::error::PaleoError;
use crate::geom::{path_is_finite, points_to_path, smooth_path};
use crate::shape::{BeautifiedShape, Painter};
use crate::stroke::Stroke;

/// Flattening tolerance for kurbo shapes turned into paths.
const SHAPE_TOLERANCE: f64 = 0.1;

/// Smoothing accuracy for sample-based outlines.
const OUTLINE_ACCURACY: f64 = 0.5;

/// Label of a recognized shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    Unspecified,
    Line,
    Polyline,
    Arc,
    Circle,
    Ellipse,
    Polygon,
    Curve,
    Spiral,
    Helix,
    Wave,
    Gull,
    Rectangle,
    Square,
    Diamond,
    Dot,
    Arrow,
    Blob,
    Infinity,
    Nbc,
    Complex,
}

impl ShapeType {
    /// Every testable shape, in the order the recognizer runs them.
    pub const ALL: [ShapeType; 20] = [
        ShapeType::Line,
        ShapeType::Polyline,
        ShapeType::Arc,
        ShapeType::Circle,
        ShapeType::Ellipse,
        ShapeType::Polygon,
        ShapeType::Curve,
        ShapeType::Spiral,
        ShapeType::Helix,
        ShapeType::Wave,
        ShapeType::Gull,
        ShapeType::Rectangle,
        ShapeType::Square,
        ShapeType::Diamond,
        ShapeType::Dot,
        ShapeType::Arrow,
        ShapeType::Blob,
        ShapeType::Infinity,
        ShapeType::Nbc,
        ShapeType::Complex,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeType::Unspecified => "Unspecified",
            ShapeType::Line => "Line",
            ShapeType::Polyline => "Polyline",
            ShapeType::Arc => "Arc",
            ShapeType::Circle => "Circle",
            ShapeType::Ellipse => "Ellipse",
            ShapeType::Polygon => "Polygon",
            ShapeType::Curve => "Curve",
            ShapeType::Spiral => "Spiral",
            ShapeType::Helix => "Helix",
            ShapeType::Wave => "Wave",
            ShapeType::Gull => "Gull",
            ShapeType::Rectangle => "Rectangle",
            ShapeType::Square => "Square",
            ShapeType::Diamond => "Diamond",
            ShapeType::Dot => "Dot",
            ShapeType::Arrow => "Arrow",
            ShapeType::Blob => "Blob",
            ShapeType::Infinity => "Infinity",
            ShapeType::Nbc => "NBC",
            ShapeType::Complex => "Complex",
        }
    }

    /// Ranking weight for a single instance of this shape. Simpler
    /// interpretations rank first.
    fn base_complexity(self) -> f64 {
        match self {
            ShapeType::Dot => 0.5,
            ShapeType::Line => 1.0,
            ShapeType::Diamond => 1.7,
            ShapeType::Square => 1.8,
            ShapeType::Rectangle => 1.9,
            ShapeType::Arc | ShapeType::Circle | ShapeType::Nbc => 2.0,
            ShapeType::Ellipse => 2.5,
            ShapeType::Arrow | ShapeType::Wave | ShapeType::Gull | ShapeType::Infinity => 3.0,
            ShapeType::Spiral | ShapeType::Helix => 4.0,
            ShapeType::Curve => 5.0,
            ShapeType::Blob => 6.0,
            ShapeType::Polyline | ShapeType::Polygon | ShapeType::Complex => 1.0,
            ShapeType::Unspecified => f64::MAX,
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a fit's score is an error (lower is better) or a confidence
/// (higher is better).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    Error,
    Confidence,
}

/// Geometry a fit test produced, keyed by the kind of idealized form.
#[derive(Debug, Clone)]
pub enum FitKind {
    /// The test failed before any geometry could be derived.
    Unfit,
    Line {
        start: Point,
        end: Point,
    },
    Polyline {
        vertices: Vec<Point>,
        lines: Vec<Fit>,
    },
    /// Closed vertex walk ending back at the first vertex.
    Polygon {
        vertices: Vec<Point>,
    },
    Quad {
        corners: [Point; 4],
    },
    Arc {
        arc: Arc,
        start: Point,
        end: Point,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    Ellipse {
        center: Point,
        radii: Vec2,
        rotation: f64,
    },
    Curve {
        cubic: CubicBez,
    },
    /// One quadratic per wave segment: `(from, control, to)`.
    Wave {
        start: Point,
        pieces: Vec<(Point, Point, Point)>,
        end: Point,
    },
    /// Consecutive arcs joined end to end.
    Arcs {
        start: Point,
        arcs: Vec<Arc>,
        end: Point,
    },
    /// Sampled ideal outline, smoothed into cubics when beautified.
    Outline {
        points: Vec<Point>,
        closed: bool,
    },
    Dot {
        center: Point,
        radius: f64,
    },
    Arrow {
        tail: Point,
        tip: Point,
        barbs: [Point; 2],
    },
    Nbc {
        class: ShapeType,
        points: Vec<Point>,
    },
    Complex {
        children: Vec<Fit>,
        sub_strokes: Vec<Stroke>,
    },
}

/// Result of one fit test on one stroke.
#[derive(Debug, Clone)]
pub struct Fit {
    pub(crate) shape: ShapeType,
    pub(crate) passed: bool,
    pub(crate) fail_code: Option<u8>,
    pub(crate) score: f64,
    pub(crate) score_kind: ScoreKind,
    pub(crate) kind: FitKind,
    beautified: OnceLock<Option<BeautifiedShape>>,
}

impl Fit {
    /// A passing fit with zero error; tests then record their score and
    /// any failed predicates.
    pub(crate) fn new(shape: ShapeType, kind: FitKind) -> Self {
        Self {
            shape,
            passed: true,
            fail_code: None,
            score: 0.0,
            score_kind: ScoreKind::Error,
            kind,
            beautified: OnceLock::new(),
        }
    }

    /// A fit that failed before producing geometry.
    pub(crate) fn unfit(shape: ShapeType, code: u8) -> Self {
        let mut fit = Self::new(shape, FitKind::Unfit);
        fit.fail(code);
        fit
    }

    /// Record a failed predicate. The last failure wins.
    pub(crate) fn fail(&mut self, code: u8) {
        self.passed = false;
        self.fail_code = Some(code);
    }

    pub(crate) fn with_error(mut self, error: f64) -> Self {
        self.score = error;
        self.score_kind = ScoreKind::Error;
        self
    }

    pub(crate) fn with_confidence(mut self, confidence: f64) -> Self {
        self.score = confidence;
        self.score_kind = ScoreKind::Confidence;
        self
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn fail_code(&self) -> Option<u8> {
        self.fail_code
    }

    /// The raw score: an error or a confidence, see [`Fit::score_kind`].
    pub fn score(&self) -> f64 {
        self.score
    }

    /// The score as an error: confidences are reported as `1 - confidence`.
    pub fn error(&self) -> f64 {
        match self.score_kind {
            ScoreKind::Error => self.score,
            ScoreKind::Confidence => 1.0 - self.score,
        }
    }

    pub fn score_kind(&self) -> ScoreKind {
        self.score_kind
    }

    pub fn kind(&self) -> &FitKind {
        &self.kind
    }

    /// Display label, e.g. "Line", "Polygon (5)" or "Complex (Line, Arc)".
    pub fn label(&self) -> String {
        match &self.kind {
            FitKind::Polyline { lines, .. } => format!("Polyline ({})", lines.len()),
            FitKind::Polygon { vertices } => {
                format!("Polygon ({})", vertices.len().saturating_sub(1))
            }
            FitKind::Nbc { class, .. } => format!("NBC ({})", class),
            FitKind::Complex { children, .. } => {
                let names: Vec<String> = children.iter().map(Fit::label).collect();
                format!("Complex ({})", names.join(", "))
            }
            _ => self.shape.name().to_string(),
        }
    }

    /// Ranking weight: lower means simpler.
    pub fn complexity(&self) -> f64 {
        match &self.kind {
            FitKind::Polyline { lines, .. } => lines.len() as f64,
            FitKind::Polygon { vertices } => {
                vertices.len().saturating_sub(1) as f64 - 0.5
            }
            FitKind::Complex { children, .. } => children.iter().map(Fit::complexity).sum(),
            _ => self.shape.base_complexity(),
        }
    }

    /// Sub-fits of a composite (polyline lines or complex parts).
    pub fn children(&self) -> &[Fit] {
        match &self.kind {
            FitKind::Polyline { lines, .. } => lines,
            FitKind::Complex { children, .. } => children,
            _ => &[],
        }
    }

    /// Sub-strokes a complex fit was built from.
    pub fn sub_strokes(&self) -> &[Stroke] {
        match &self.kind {
            FitKind::Complex { sub_strokes, .. } => sub_strokes,
            _ => &[],
        }
    }

    /// Number of primitives, counting each polyline side separately.
    pub fn num_primitives(&self) -> usize {
        match &self.kind {
            FitKind::Polyline { lines, .. } => lines.len(),
            FitKind::Complex { children, .. } => children.iter().map(Fit::num_primitives).sum(),
            _ => 1,
        }
    }

    /// Fraction of primitives that are lines.
    pub fn percent_lines(&self) -> f64 {
        fn count_lines(fit: &Fit) -> usize {
            match &fit.kind {
                FitKind::Line { .. } => 1,
                FitKind::Polyline { lines, .. } => lines.len(),
                FitKind::Complex { children, .. } => children.iter().map(count_lines).sum(),
                _ => 0,
            }
        }
        let total = self.num_primitives();
        if total == 0 {
            0.0
        } else {
            count_lines(self) as f64 / total as f64
        }
    }

    /// Lazily built idealized shape. Returns `None` if the test produced no
    /// geometry or the shape could not be built; build failures are logged.
    pub fn beautified(&self) -> Option<&BeautifiedShape> {
        self.beautified
            .get_or_init(|| match self.build_shape() {
                Ok(shape) => shape,
                Err(e) => {
                    error!("{} fit: {e}", self.label());
                    None
                }
            })
            .as_ref()
    }

    /// Shortcut for the beautified path.
    pub fn beautified_path(&self) -> Option<&BezPath> {
        self.beautified().map(|s| &s.path)
    }

    fn build_shape(&self) -> Result<Option<BeautifiedShape>, PaleoError> {
        let (path, closed) = match &self.kind {
            FitKind::Unfit => return Ok(None),
            FitKind::Complex { children, .. } => return self.build_complex(children).map(Some),
            FitKind::Line { start, end } => (points_to_path(&[*start, *end], false), false),
            FitKind::Polyline { vertices, .. } => (points_to_path(vertices, false), false),
            FitKind::Polygon { vertices } => {
                let mut path = points_to_path(vertices, false);
                path.close_path();
                (path, true)
            }
            FitKind::Quad { corners } => (points_to_path(corners, true), true),
            FitKind::Arc { arc, start, end } => (arc_path(*start, &[*arc], *end), false),
            FitKind::Arcs { start, arcs, end } => (arc_path(*start, arcs, *end), false),
            FitKind::Circle { center, radius } | FitKind::Dot { center, radius } => {
                (Circle::new(*center, *radius).to_path(SHAPE_TOLERANCE), true)
            }
            FitKind::Ellipse {
                center,
                radii,
                rotation,
            } => (
                Ellipse::new(*center, *radii, *rotation).to_path(SHAPE_TOLERANCE),
                true,
            ),
            FitKind::Curve { cubic } => {
                let mut path = BezPath::new();
                path.move_to(cubic.p0);
                path.curve_to(cubic.p1, cubic.p2, cubic.p3);
                (path, false)
            }
            FitKind::Wave { start, pieces, end } => {
                let mut path = BezPath::new();
                path.move_to(*start);
                let mut current = *start;
                for &(from, ctrl, to) in pieces {
                    if from != current {
                        path.line_to(from);
                    }
                    path.quad_to(ctrl, to);
                    current = to;
                }
                if current != *end {
                    path.line_to(*end);
                }
                (path, false)
            }
            FitKind::Outline { points, closed } => {
                (smooth_path(points, *closed, OUTLINE_ACCURACY), *closed)
            }
            FitKind::Arrow { tail, tip, barbs } => {
                let mut path = BezPath::new();
                path.move_to(*tail);
                path.line_to(*tip);
                path.move_to(barbs[0]);
                path.line_to(*tip);
                path.line_to(barbs[1]);
                (path, false)
            }
            FitKind::Nbc { points, .. } => (points_to_path(points, false), false),
        };
        if !path_is_finite(&path) {
            return Err(PaleoError::Beautify(format!(
                "non-finite geometry for {}",
                self.shape
            )));
        }
        let mut shape = BeautifiedShape::primitive(self.shape, self.label(), path, closed);
        if self.shape == ShapeType::Dot {
            shape = shape.with_painter(Painter::Fill);
        }
        Ok(Some(shape))
    }

    fn build_complex(&self, children: &[Fit]) -> Result<BeautifiedShape, PaleoError> {
        let mut path = BezPath::new();
        let mut shapes = Vec::with_capacity(children.len());
        for child in children {
            let Some(shape) = child.beautified() else {
                return Err(PaleoError::Beautify(format!(
                    "sub-shape {} has no geometry",
                    child.label()
                )));
            };
            path.extend(shape.path.elements().iter().copied());
            shapes.push(shape.clone());
        }
        Ok(BeautifiedShape {
            shape: ShapeType::Complex,
            label: self.label(),
            path,
            painter: Some(Painter::Composite),
            closed: false,
            primitive: false,
            children: shapes,
        })
    }
}

/// Path through consecutive arcs, pinned to the given endpoints.
fn arc_path(start: Point, arcs: &[Arc], end: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(start);
    for arc in arcs {
        path.extend(arc.append_iter(SHAPE_TOLERANCE));
    }
    let mut elements = path.elements().to_vec();
    if let Some(last) = elements.last_mut() {
        match last {
            PathEl::CurveTo(_, _, p) | PathEl::LineTo(p) | PathEl::QuadTo(_, p) => *p = end,
            PathEl::MoveTo(_) => elements.push(PathEl::LineTo(end)),
            PathEl::ClosePath => {}
        }
    }
    BezPath::from_vec(elements)
}

/// Arc through three points, from `a` via `m` to `b`.
pub(crate) fn arc_through(a: Point, m: Point, b: Point) -> Option<Arc> {
    let (center, radius) = crate::geom::circumcircle(a, m, b)?;
    let angle = |p: Point| (p - center).atan2();
    let (a0, am, a1) = (angle(a), angle(m), angle(b));
    let tau = std::f64::consts::TAU;
    // Counter-clockwise sweeps from a to m and from a to b.
    let to_m = (am - a0).rem_euclid(tau);
    let to_b = (a1 - a0).rem_euclid(tau);
    let sweep = if to_m <= to_b { to_b } else { to_b - tau };
    Some(Arc {
        center,
        radii: Vec2::new(radius, radius),
        start_angle: a0,
        sweep_angle: sweep,
        x_rotation: 0.0,
    })
}

/// Mean radial deviation of `points` from the arc through the first,
/// middle and last point, relative to its radius.
pub(crate) fn arc_error(points: &[Point]) -> Option<f64> {
    if points.len() < 3 {
        return None;
    }
    let (center, radius) = crate::geom::circumcircle(
        points[0],
        points[points.len() / 2],
        points[points.len() - 1],
    )?;
    let deviation: f64 = points
        .iter()
        .map(|p| (p.distance(center) - radius).abs())
        .sum::<f64>()
        / points.len() as f64;
    Some(deviation / radius)
}

/// Rank key: simpler first, then lower error.
pub(crate) fn rank(a: &Fit, b: &Fit) -> std::cmp::Ordering {
    a.complexity()
        .total_cmp(&b.complexity())
        .then(a.error().total_cmp(&b.error()))
}
