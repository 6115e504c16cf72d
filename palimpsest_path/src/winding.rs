// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rewriting paths for renderers that only fill with non-zero winding.

use alloc::vec::Vec;

use kurbo::Affine;

use crate::flatten::{FlatContour, flatten};
use crate::path::{FillRule, Path, PathDirection};

/// Rewrites `path` so that its area winds exactly once in `direction`.
///
/// The result is a [`FillRule::NonZero`] path whose winding number is `+1`
/// (for `direction`) at every point `path` fills under the base of its own
/// fill rule, and `0` everywhere else. Adding it, reversed in direction, to a
/// larger contour therefore cuts a hole of exactly the original shape.
///
/// Each contour is kept, reversed or dropped depending on whether filling
/// changes across it: the winding just outside a contour is the sum of the
/// windings of the other contours around its first point. This is exact when
/// no two contours cross; crossing contours and self-intersecting contours
/// keep their own winding and are approximate. Contours enclosing no area
/// are dropped.
pub fn to_unit_winding(path: &Path, direction: PathDirection, res_scale: f64) -> Path {
    let rule = path.fill_rule().base();
    let contours = path.contours();
    let flat: Vec<FlatContour> = contours
        .iter()
        .map(|c| flatten(c, res_scale).into_iter().next().unwrap_or_default())
        .collect();

    let mut out = Path::with_fill_rule(FillRule::NonZero);
    for (i, (contour, own)) in contours.iter().zip(&flat).enumerate() {
        let (Some(own_direction), Some(&start)) = (own.direction(), own.points.first()) else {
            continue;
        };
        let around: i32 = flat
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, other)| other.winding(start))
            .sum();
        let step = match own_direction {
            PathDirection::Clockwise => 1,
            PathDirection::CounterClockwise => -1,
        };
        let wanted = match (rule.is_inside(around), rule.is_inside(around + step)) {
            (false, true) => direction,
            (true, false) => opposite(direction),
            _ => continue,
        };
        if wanted == own_direction {
            out.add_path(contour, &Affine::IDENTITY);
        } else {
            out.add_path(&contour.reversed(), &Affine::IDENTITY);
        }
    }
    out
}

fn opposite(direction: PathDirection) -> PathDirection {
    match direction {
        PathDirection::Clockwise => PathDirection::CounterClockwise,
        PathDirection::CounterClockwise => PathDirection::Clockwise,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Rect};

    fn nested(rule: FillRule, inner: PathDirection) -> Path {
        let mut path = Path::with_fill_rule(rule);
        path.add_rect(Rect::new(0.0, 0.0, 30.0, 30.0), PathDirection::Clockwise);
        path.add_rect(Rect::new(10.0, 10.0, 20.0, 20.0), inner);
        path
    }

    fn winding_at(path: &Path, p: (f64, f64)) -> i32 {
        flatten(path, 1.0)
            .iter()
            .map(|c| c.winding(Point::new(p.0, p.1)))
            .sum()
    }

    #[test]
    fn even_odd_ring_keeps_its_hole() {
        let ring = nested(FillRule::EvenOdd, PathDirection::Clockwise);
        let unit = to_unit_winding(&ring, PathDirection::Clockwise, 1.0);
        assert_eq!(unit.fill_rule(), FillRule::NonZero);
        assert_eq!(winding_at(&unit, (5.0, 5.0)), 1, "ring");
        assert_eq!(winding_at(&unit, (15.0, 15.0)), 0, "hole");
        assert_eq!(winding_at(&unit, (40.0, 5.0)), 0, "outside");
    }

    #[test]
    fn non_zero_same_direction_nesting_drops_the_inner_contour() {
        let solid = nested(FillRule::NonZero, PathDirection::Clockwise);
        let unit = to_unit_winding(&solid, PathDirection::CounterClockwise, 1.0);
        assert_eq!(unit.contour_count(), 1);
        assert_eq!(winding_at(&unit, (15.0, 15.0)), -1);
        assert_eq!(winding_at(&unit, (5.0, 5.0)), -1);
    }

    #[test]
    fn non_zero_opposite_nesting_is_a_ring() {
        let ring = nested(FillRule::NonZero, PathDirection::CounterClockwise);
        let unit = to_unit_winding(&ring, PathDirection::CounterClockwise, 1.0);
        assert_eq!(winding_at(&unit, (5.0, 5.0)), -1);
        assert_eq!(winding_at(&unit, (15.0, 15.0)), 0);
    }

    #[test]
    fn contour_direction_is_normalized() {
        let mut path = Path::new();
        path.add_rect(Rect::new(0.0, 0.0, 10.0, 10.0), PathDirection::CounterClockwise);
        path.add_circle(Point::new(30.0, 30.0), 5.0, PathDirection::Clockwise);
        let unit = to_unit_winding(&path, PathDirection::Clockwise, 1.0);
        assert_eq!(winding_at(&unit, (5.0, 5.0)), 1);
        assert_eq!(winding_at(&unit, (30.0, 30.0)), 1);
    }

    #[test]
    fn three_level_even_odd_nesting_alternates() {
        let mut path = nested(FillRule::EvenOdd, PathDirection::Clockwise);
        path.add_rect(Rect::new(13.0, 13.0, 17.0, 17.0), PathDirection::Clockwise);
        let unit = to_unit_winding(&path, PathDirection::Clockwise, 1.0);
        assert_eq!(winding_at(&unit, (5.0, 5.0)), 1);
        assert_eq!(winding_at(&unit, (11.0, 11.0)), 0);
        assert_eq!(winding_at(&unit, (15.0, 15.0)), 1);
    }

    #[test]
    fn zero_area_contours_are_dropped() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 10.0));
        assert!(to_unit_winding(&path, PathDirection::Clockwise, 1.0).is_empty());
    }
}
