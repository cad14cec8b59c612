//! Timestamped pen strokes and sub-stroke provenance.
//!
//! A [`Stroke`] never owns its parent. Sub-strokes carry the parent's
//! [`StrokeId`] plus the inclusive index [`Span`] they cover in the root
//! stroke; the parent itself lives in a per-request [`StrokeArena`].

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::error::PaleoError;

/// A single sampled pen position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
    /// Sample time in milliseconds.
    pub time: i64,
}

impl StrokePoint {
    pub fn new(x: f64, y: f64, time: i64) -> Self {
        Self { x, y, time }
    }

    pub fn to_point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Handle of a stroke registered in a [`StrokeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StrokeId(pub u32);

/// Inclusive point index range of a sub-stroke within its root stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// An ordered, non-empty sequence of timestamped points.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<StrokePoint>,
    id: Option<StrokeId>,
    parent: Option<StrokeId>,
    span: Option<Span>,
}

impl Stroke {
    /// Build a root stroke. Rejects empty input and non-finite coordinates.
    pub fn new(points: Vec<StrokePoint>) -> Result<Self, PaleoError> {
        if points.is_empty() {
            return Err(PaleoError::EmptyStroke);
        }
        if let Some(index) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(PaleoError::NonFinitePoint { index });
        }
        Ok(Self {
            points,
            id: None,
            parent: None,
            span: None,
        })
    }

    /// Convenience constructor from `(x, y)` pairs, timestamped 1ms apart.
    pub fn from_xy(coords: &[(f64, f64)]) -> Result<Self, PaleoError> {
        let points = coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| StrokePoint::new(x, y, i as i64))
            .collect();
        Self::new(points)
    }

    /// Internal constructor for derived strokes; callers guarantee `points`
    /// is non-empty and finite.
    pub(crate) fn derived(
        points: Vec<StrokePoint>,
        parent: Option<StrokeId>,
        span: Option<Span>,
    ) -> Self {
        debug_assert!(!points.is_empty());
        Self {
            points,
            id: None,
            parent,
            span,
        }
    }

    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed stroke; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> StrokePoint {
        self.points[0]
    }

    pub fn last(&self) -> StrokePoint {
        self.points[self.points.len() - 1]
    }

    pub fn id(&self) -> Option<StrokeId> {
        self.id
    }

    pub fn parent(&self) -> Option<StrokeId> {
        self.parent
    }

    /// Index range covered in the root stroke, if this is a sub-stroke.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// The id sub-strokes of this stroke should point back to: its own id
    /// if registered, otherwise its parent's.
    pub fn provenance(&self) -> Option<StrokeId> {
        self.id.or(self.parent)
    }

    /// Offset of this stroke's first point in the root stroke.
    pub(crate) fn root_offset(&self) -> usize {
        self.span.map_or(0, |s| s.start)
    }

    /// Join `self` and `next`, dropping the duplicated joint point
    /// (the first point of `next`).
    pub fn concat(&self, next: &Stroke) -> Stroke {
        let mut points = self.points.clone();
        points.extend(next.points.iter().skip(1).copied());
        let span = match (self.span, next.span) {
            (Some(a), Some(b)) => Some(Span {
                start: a.start.min(b.start),
                end: a.end.max(b.end),
            }),
            _ => None,
        };
        Stroke::derived(points, self.parent.or(next.parent), span)
    }

    /// Re-parent a derived stroke.
    pub(crate) fn with_parent(mut self, parent: Option<StrokeId>) -> Self {
        self.parent = parent;
        self
    }
}

/// Per-request storage for strokes, so sub-strokes can look up their
/// parents by id.
#[derive(Debug, Default)]
pub struct StrokeArena {
    strokes: Vec<Stroke>,
}

impl StrokeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stroke and return a copy that knows its id.
    pub fn insert(&mut self, mut stroke: Stroke) -> Stroke {
        let id = StrokeId(self.strokes.len() as u32);
        stroke.id = Some(id);
        self.strokes.push(stroke.clone());
        stroke
    }

    pub fn get(&self, id: StrokeId) -> Option<&Stroke> {
        self.strokes.get(id.0 as usize)
    }

    /// The parent stroke of `stroke`, if it has one registered here.
    pub fn parent_of(&self, stroke: &Stroke) -> Option<&Stroke> {
        stroke.parent.and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
