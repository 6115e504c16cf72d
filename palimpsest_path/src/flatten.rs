// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform-parameter curve flattening.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{CubicBez, ParamCurve, Point, QuadBez};

use crate::conic::Conic;
use crate::path::{Path, PathCommand, PathDirection};

/// Line segments per quadratic at a resolution scale of 1.
pub const QUAD_BASE_STEPS: u32 = 8;
/// Line segments per conic at a resolution scale of 1.
pub const CONIC_BASE_STEPS: u32 = 8;
/// Line segments per cubic at a resolution scale of 1.
pub const CUBIC_BASE_STEPS: u32 = 16;

/// Upper bound on the segments emitted for a single curve.
const MAX_STEPS: u32 = 1 << 12;

/// One flattened contour.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatContour {
    /// The polyline, starting at the contour's move point.
    pub points: Vec<Point>,
    /// Whether the contour ended with a `Close`.
    pub closed: bool,
}

impl FlatContour {
    /// Twice the signed area enclosed by the polyline, closed implicitly.
    ///
    /// Positive for clockwise contours in a y-down coordinate system.
    pub fn signed_area(&self) -> f64 {
        let pts = &self.points;
        let mut sum = 0.0;
        for (i, a) in pts.iter().enumerate() {
            let b = pts[(i + 1) % pts.len()];
            sum += a.x * b.y - b.x * a.y;
        }
        sum
    }

    /// Direction the contour runs in, `None` when it encloses no area.
    pub fn direction(&self) -> Option<PathDirection> {
        let area = self.signed_area();
        if area > 0.0 {
            Some(PathDirection::Clockwise)
        } else if area < 0.0 {
            Some(PathDirection::CounterClockwise)
        } else {
            None
        }
    }

    /// Winding number of `p` against this contour alone, treated as closed.
    ///
    /// Clockwise contours wind positively around the points they enclose.
    pub fn winding(&self, p: Point) -> i32 {
        let pts = &self.points;
        if pts.len() < 2 {
            return 0;
        }
        let mut winding = 0;
        for (i, a) in pts.iter().enumerate() {
            let b = pts[(i + 1) % pts.len()];
            let cross = (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y);
            if a.y <= p.y {
                if b.y > p.y && cross > 0.0 {
                    winding += 1;
                }
            } else if b.y <= p.y && cross < 0.0 {
                winding -= 1;
            }
        }
        winding
    }
}

/// Number of line segments used for a curve with the given base step count.
///
/// This is `ceil(base * res_scale)`, never less than one. Non-finite or
/// non-positive scales fall back to a single segment.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the value is clamped to [1, MAX_STEPS] before the cast"
)]
pub fn subdivision_steps(base: u32, res_scale: f64) -> u32 {
    let steps = (f64::from(base) * res_scale).ceil();
    if steps.is_nan() || steps < 1.0 {
        1
    } else if steps >= f64::from(MAX_STEPS) {
        MAX_STEPS
    } else {
        steps as u32
    }
}

/// Flattens every contour of `path` into a polyline.
///
/// Curves are sampled at uniformly spaced parameter values: quadratics and
/// conics in [`QUAD_BASE_STEPS`]/[`CONIC_BASE_STEPS`] segments, cubics in
/// [`CUBIC_BASE_STEPS`], each scaled by `res_scale`. Lines are kept as-is.
/// A contour consisting of a lone `MoveTo` yields a single point.
pub fn flatten(path: &Path, res_scale: f64) -> Vec<FlatContour> {
    let quad_steps = subdivision_steps(QUAD_BASE_STEPS, res_scale);
    let conic_steps = subdivision_steps(CONIC_BASE_STEPS, res_scale);
    let cubic_steps = subdivision_steps(CUBIC_BASE_STEPS, res_scale);

    let mut contours = Vec::new();
    let mut current = FlatContour::default();
    let mut last = Point::ZERO;
    for cmd in path.iter() {
        match cmd {
            PathCommand::MoveTo(p) => {
                if !current.points.is_empty() {
                    contours.push(core::mem::take(&mut current));
                }
                current.points.push(p);
                last = p;
            }
            PathCommand::LineTo(p) => {
                current.points.push(p);
                last = p;
            }
            PathCommand::QuadTo(c, p) => {
                let quad = QuadBez::new(last, c, p);
                sample(&mut current.points, quad_steps, |t| quad.eval(t), p);
                last = p;
            }
            PathCommand::ConicTo(c, p, w) => {
                let conic = Conic::new(last, c, p, w);
                sample(&mut current.points, conic_steps, |t| conic.eval(t), p);
                last = p;
            }
            PathCommand::CubicTo(c1, c2, p) => {
                let cubic = CubicBez::new(last, c1, c2, p);
                sample(&mut current.points, cubic_steps, |t| cubic.eval(t), p);
                last = p;
            }
            PathCommand::Close => {
                current.closed = true;
                contours.push(core::mem::take(&mut current));
            }
        }
    }
    if !current.points.is_empty() {
        contours.push(current);
    }
    contours
}

/// Pushes `steps - 1` interior samples and then the exact end point.
fn sample(points: &mut Vec<Point>, steps: u32, eval: impl Fn(f64) -> Point, end: Point) {
    let inv = 1.0 / f64::from(steps);
    for i in 1..steps {
        points.push(eval(f64::from(i) * inv));
    }
    points.push(end);
}
