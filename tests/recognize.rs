mod common;

use std::sync::Arc;
use std::time::Duration;

use common::synthetic_strokes::{circle, rectangle, regular_polygon, straight, stroke};
use paleo::kurbo::{BezPath, PathEl};
use paleo::{
    Classification, PaintSink, PaleoConfig, PaleoError, Painter, Recognizer, ShapeType,
    StrokeClassifier, StrokeFeatures,
};

fn vertex_count(path: &BezPath) -> usize {
    path.elements()
        .iter()
        .filter(|el| !matches!(el, PathEl::ClosePath))
        .count()
}

#[test]
fn closed_rectangle_ranks_rectangle_first() {
    let recognition = Recognizer::default().recognize(&stroke(&rectangle(200.0, 100.0, 10)));
    let best = recognition.best().expect("rectangle should be recognized");

    assert_eq!(best.shape_type(), ShapeType::Rectangle);
    assert!(best.error() < 1e-6, "rectangle error {:.6}", best.error());
    let shape = best.beautified().expect("rectangle has geometry");
    assert!(shape.closed);
    assert_eq!(vertex_count(&shape.path), 4);
}

#[test]
fn straight_stroke_is_a_line() {
    let recognition = Recognizer::default().recognize(&stroke(&straight(120.0, 25)));
    let best = recognition.best().expect("line should be recognized");
    assert_eq!(best.shape_type(), ShapeType::Line);
    assert!(best.error() < 1e-9);
    assert!(recognition.result(ShapeType::Complex).is_some_and(|f| !f.passed()));
}

#[test]
fn closed_hexagon_is_a_polygon() {
    let recognition = Recognizer::default().recognize(&stroke(&regular_polygon(6, 100.0, 10)));
    let polygon = recognition.get(ShapeType::Polygon).expect("polygon accepted");
    assert_eq!(polygon.label(), "Polygon (6)");
}

#[test]
fn closed_square_is_not_a_polygon() {
    let recognition = Recognizer::default().recognize(&stroke(&regular_polygon(4, 100.0, 10)));
    let polygon = recognition.result(ShapeType::Polygon).expect("polygon test ran");
    assert!(!polygon.passed());
    assert_eq!(polygon.fail_code(), Some(1));
}

#[test]
fn round_loop_is_a_circle() {
    let recognition = Recognizer::default().recognize(&stroke(&circle(50.0)));
    assert_eq!(
        recognition.best().map(|f| f.shape_type()),
        Some(ShapeType::Circle)
    );
}

#[test]
fn batch_keeps_input_order() {
    let strokes = vec![
        stroke(&straight(120.0, 25)),
        stroke(&rectangle(200.0, 100.0, 10)),
        stroke(&circle(50.0)),
    ];
    let recognizer = Recognizer::default();
    let shapes: Vec<Option<ShapeType>> = recognizer
        .recognize_batch(&strokes)
        .iter()
        .map(|r| r.best().map(|f| f.shape_type()))
        .collect();
    assert_eq!(
        shapes,
        vec![
            Some(ShapeType::Line),
            Some(ShapeType::Rectangle),
            Some(ShapeType::Circle)
        ]
    );
}

#[test]
fn generous_budget_succeeds() {
    let recognition = Recognizer::default()
        .recognize_within(&stroke(&rectangle(200.0, 100.0, 10)), Duration::from_secs(60))
        .expect("well within budget");
    assert!(!recognition.is_empty());
}

#[test]
fn exhausted_budget_reports_time_exceeded() {
    let result = Recognizer::default().recognize_within(&stroke(&circle(50.0)), Duration::ZERO);
    match result {
        Err(PaleoError::TimeExceeded { budget_ms, .. }) => assert_eq!(budget_ms, 0),
        Err(other) => panic!("unexpected error {other}"),
        Ok(recognition) => panic!(
            "zero budget still returned {} fits",
            recognition.accepted().len()
        ),
    }
}

struct AlwaysCircle;

impl StrokeClassifier for AlwaysCircle {
    fn classify(&self, _features: &StrokeFeatures) -> Option<Classification> {
        Some(Classification {
            shape: ShapeType::Circle,
            confidence: 0.9,
        })
    }
}

#[test]
fn classifier_feeds_the_nbc_test() {
    let recognizer = Recognizer::default().with_classifier(Arc::new(AlwaysCircle));
    let recognition = recognizer.recognize(&stroke(&straight(120.0, 25)));
    let nbc = recognition.get(ShapeType::Nbc).expect("confident classifier passes");
    assert_eq!(nbc.label(), "NBC (Circle)");
    assert!((nbc.error() - 0.1).abs() < 1e-9);
    assert_eq!(
        recognition.best().map(|f| f.shape_type()),
        Some(ShapeType::Line)
    );
}

#[test]
fn nbc_without_classifier_fails_with_code_zero() {
    let recognition = Recognizer::default().recognize(&stroke(&straight(120.0, 25)));
    let nbc = recognition.result(ShapeType::Nbc).expect("nbc test ran");
    assert_eq!(nbc.fail_code(), Some(0));
}

#[derive(Default)]
struct Counter {
    strokes: usize,
    fills: usize,
}

impl PaintSink for Counter {
    fn stroke_path(&mut self, _path: &BezPath) {
        self.strokes += 1;
    }
    fn fill_path(&mut self, _path: &BezPath) {
        self.fills += 1;
    }
}

#[test]
fn tiny_scribble_paints_a_filled_dot() {
    let scribble = [(0.0, 0.0), (2.0, 1.0), (1.0, 3.0), (3.0, 2.0)];
    let recognition = Recognizer::default().recognize(&stroke(&scribble));
    let best = recognition.best().expect("dot accepted");
    assert_eq!(best.shape_type(), ShapeType::Dot);

    let shape = best.beautified().expect("dot has geometry");
    assert_eq!(shape.painter, Some(Painter::Fill));
    let mut sink = Counter::default();
    shape.paint(&mut sink);
    assert_eq!((sink.strokes, sink.fills), (0, 1));
}

#[test]
fn basic_profile_never_reports_composites() {
    let recognizer = Recognizer::new(PaleoConfig::basic_prims_only());
    let recognition = recognizer.recognize(&stroke(&rectangle(200.0, 100.0, 10)));
    for fit in recognition.accepted().iter().chain(recognition.rejected()) {
        assert!(!matches!(
            fit.shape_type(),
            ShapeType::Complex | ShapeType::Polygon | ShapeType::Polyline | ShapeType::Arrow
        ));
    }
}

#[test]
fn partial_config_deserializes_over_defaults() {
    let json = r#"{ "complex": false, "thresholds": { "polygon_min_lines": 6 } }"#;
    let config: PaleoConfig = serde_json::from_str(json).expect("valid config");
    assert!(!config.complex);
    assert!(config.line);
    assert_eq!(config.thresholds.polygon_min_lines, 6);
    assert_eq!(
        config.thresholds.line_min_endpoint_ratio,
        PaleoConfig::default().thresholds.line_min_endpoint_ratio
    );

    let text = serde_json::to_string(&config).expect("serializable");
    let back: PaleoConfig = serde_json::from_str(&text).expect("round trip");
    assert_eq!(back, config);
}
