// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rational quadratic segments.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

/// A rational quadratic Bézier: `(p0, p1, p2)` with weight `w` on `p1`.
///
/// `w == 1` is an ordinary quadratic; `w == sqrt(2)/2` traces an exact
/// quarter of a circle when the control polygon is a right isosceles corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Conic {
    /// Start point.
    pub p0: Point,
    /// Control point.
    pub p1: Point,
    /// End point.
    pub p2: Point,
    /// Weight of the control point.
    pub weight: f64,
}

impl Conic {
    /// Creates a conic.
    #[inline]
    pub const fn new(p0: Point, p1: Point, p2: Point, weight: f64) -> Self {
        Self { p0, p1, p2, weight }
    }

    /// Evaluates the conic at parameter `t` in `[0, 1]`.
    pub fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let b0 = mt * mt;
        let b1 = 2.0 * mt * t * self.weight;
        let b2 = t * t;
        let denom = b0 + b1 + b2;
        let x = b0 * self.p0.x + b1 * self.p1.x + b2 * self.p2.x;
        let y = b0 * self.p0.y + b1 * self.p1.y + b2 * self.p2.y;
        Point::new(x / denom, y / denom)
    }

    /// Splits the conic at `t = 0.5` into two conics with a shared weight.
    pub fn subdivide(&self) -> (Self, Self) {
        let w = self.weight;
        let scale = 1.0 / (1.0 + w);
        let new_w = (0.5 + 0.5 * w).sqrt();

        let wp1 = self.p1.to_vec2() * w;
        let mid = ((self.p0.to_vec2() + wp1 * 2.0 + self.p2.to_vec2()) * (scale * 0.5)).to_point();
        let c0 = ((self.p0.to_vec2() + wp1) * scale).to_point();
        let c1 = ((wp1 + self.p2.to_vec2()) * scale).to_point();
        (
            Self::new(self.p0, c0, mid, new_w),
            Self::new(mid, c1, self.p2, new_w),
        )
    }

    /// Approximates the conic with `2^pow2` quadratics.
    ///
    /// `emit` receives the control and end point of each quadratic, in order.
    pub fn to_quads(&self, pow2: u32, mut emit: impl FnMut(Point, Point)) {
        self.to_quads_rec(pow2, &mut emit);
    }

    fn to_quads_rec(&self, pow2: u32, emit: &mut impl FnMut(Point, Point)) {
        if pow2 == 0 {
            emit(self.p1, self.p2);
            return;
        }
        let (a, b) = self.subdivide();
        a.to_quads_rec(pow2 - 1, emit);
        b.to_quads_rec(pow2 - 1, emit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::SQRT_2;

    #[test]
    fn quarter_circle_stays_on_circle() {
        let c = Conic::new(
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            SQRT_2 / 2.0,
        );
        for i in 0..=10 {
            let p = c.eval(f64::from(i) / 10.0);
            assert!((p.to_vec2().hypot() - 1.0).abs() < 1e-12, "off circle at {i}");
        }
    }

    #[test]
    fn subdivision_midpoint_matches_eval() {
        let c = Conic::new(
            Point::new(0.0, 0.0),
            Point::new(4.0, 8.0),
            Point::new(10.0, 0.0),
            0.6,
        );
        let (a, b) = c.subdivide();
        let mid = c.eval(0.5);
        assert!((a.p2 - mid).hypot() < 1e-12, "left half ends at midpoint");
        assert_eq!(a.p2, b.p0);
        assert_eq!(a.weight, b.weight);
    }

    #[test]
    fn unit_weight_to_quads_with_zero_pow_is_identity() {
        let c = Conic::new(Point::ZERO, Point::new(1.0, 2.0), Point::new(3.0, 0.0), 1.0);
        let mut quads = alloc::vec::Vec::new();
        c.to_quads(0, |ctrl, end| quads.push((ctrl, end)));
        assert_eq!(quads, [(Point::new(1.0, 2.0), Point::new(3.0, 0.0))]);
    }
}
