use std::f64::consts::{PI, TAU};

use paleo::Stroke;

/// Evenly sampled polyline through `corners`, `per_side` steps per side.
pub fn through(corners: &[(f64, f64)], per_side: usize) -> Vec<(f64, f64)> {
    assert!(per_side > 0, "need at least one step per side");
    let mut coords = vec![corners[0]];
    for w in corners.windows(2) {
        for s in 1..=per_side {
            let t = s as f64 / per_side as f64;
            coords.push((w[0].0 + (w[1].0 - w[0].0) * t, w[0].1 + (w[1].1 - w[0].1) * t));
        }
    }
    coords
}

/// Axis-aligned rectangle drawn from the origin, counter-clockwise, closed.
pub fn rectangle(width: f64, height: f64, per_side: usize) -> Vec<(f64, f64)> {
    through(
        &[(0.0, 0.0), (width, 0.0), (width, height), (0.0, height), (0.0, 0.0)],
        per_side,
    )
}

/// Closed regular polygon of the given radius.
pub fn regular_polygon(sides: usize, radius: f64, per_side: usize) -> Vec<(f64, f64)> {
    let corners: Vec<(f64, f64)> = (0..=sides)
        .map(|k| {
            let a = TAU * k as f64 / sides as f64;
            (radius * a.cos(), radius * a.sin())
        })
        .collect();
    through(&corners, per_side)
}

pub fn straight(length: f64, samples: usize) -> Vec<(f64, f64)> {
    (0..samples)
        .map(|i| {
            let t = i as f64 / (samples - 1) as f64;
            (length * t * 0.8, length * t * 0.6)
        })
        .collect()
}

/// Closed circle, one sample every 5 degrees.
pub fn circle(radius: f64) -> Vec<(f64, f64)> {
    (0..=72)
        .map(|i| {
            let a = TAU * i as f64 / 72.0;
            (radius * a.cos(), radius * a.sin())
        })
        .collect()
}

/// Archimedean spiral sampled every 10 degrees of polar angle.
pub fn spiral(turns: f64) -> Vec<(f64, f64)> {
    let n = (36.0 * turns).round() as usize;
    (0..=n)
        .map(|i| {
            let a = TAU * i as f64 / 36.0;
            let r = 20.0 + 8.0 * a;
            (r * a.cos(), r * a.sin())
        })
        .collect()
}

/// A straight run into a half circle, meeting at a right angle.
pub fn line_then_arc() -> Vec<(f64, f64)> {
    let mut coords: Vec<(f64, f64)> = (0..=10).map(|i| (-100.0 + i as f64 * 10.0, 0.0)).collect();
    coords.extend((1..=20).map(|i| {
        let a = PI - PI * i as f64 / 20.0;
        (50.0 + 50.0 * a.cos(), 50.0 * a.sin())
    }));
    coords
}

pub fn stroke(coords: &[(f64, f64)]) -> Stroke {
    Stroke::from_xy(coords).expect("synthetic strokes are finite and non-empty")
}
