//! Beautified shapes and declarative paint instructions.
//!
//! The engine never rasterizes. A [`BeautifiedShape`] carries an idealized
//! `BezPath` and an optional [`Painter`]; a rendering collaborator supplies
//! a [`PaintSink`] and calls [`BeautifiedShape::paint`].

use kurbo::BezPath;

use crate::fit::ShapeType;

/// How a shape wants to be drawn when plain stroking is not enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Painter {
    /// Fill the path instead of stroking it.
    Fill,
    /// Paint each child in order, each with its own painter.
    Composite,
}

/// Drawing backend supplied by the caller.
pub trait PaintSink {
    fn stroke_path(&mut self, path: &BezPath);
    fn fill_path(&mut self, path: &BezPath);
}

/// Idealized vector version of a recognized shape.
#[derive(Debug, Clone, PartialEq)]
pub struct BeautifiedShape {
    pub shape: ShapeType,
    pub label: String,
    pub path: BezPath,
    pub painter: Option<Painter>,
    pub closed: bool,
    /// False for composites.
    pub primitive: bool,
    pub children: Vec<BeautifiedShape>,
}

impl BeautifiedShape {
    pub(crate) fn primitive(shape: ShapeType, label: String, path: BezPath, closed: bool) -> Self {
        Self {
            shape,
            label,
            path,
            painter: None,
            closed,
            primitive: true,
            children: Vec::new(),
        }
    }

    pub(crate) fn with_painter(mut self, painter: Painter) -> Self {
        self.painter = Some(painter);
        self
    }

    /// Emit draw calls for this shape.
    pub fn paint(&self, sink: &mut dyn PaintSink) {
        match self.painter {
            Some(Painter::Fill) => sink.fill_path(&self.path),
            Some(Painter::Composite) => {
                for child in &self.children {
                    child.paint(sink);
                }
            }
            None => sink.stroke_path(&self.path),
        }
    }
}
