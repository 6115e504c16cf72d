// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

/// An integer rectangle with exclusive right and bottom edges.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IRect {
    /// Left edge, inclusive.
    pub left: i32,
    /// Top edge, inclusive.
    pub top: i32,
    /// Right edge, exclusive.
    pub right: i32,
    /// Bottom edge, exclusive.
    pub bottom: i32,
}

impl IRect {
    /// The empty rectangle at the origin.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// Creates a rectangle from its edges, as given.
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle from an origin and a size.
    #[inline]
    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    /// Returns a copy with `left <= right` and `top <= bottom`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::new(
            self.left.min(self.right),
            self.top.min(self.bottom),
            self.left.max(self.right),
            self.top.max(self.bottom),
        )
    }

    /// Returns `true` if the rectangle covers no pixel.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Width; negative for an unnormalized rectangle.
    #[inline]
    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    /// Height; negative for an unnormalized rectangle.
    #[inline]
    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    /// Number of covered pixels, zero when empty.
    ///
    /// Unsigned so that the full `i32` range, `(2^32 - 1)^2` pixels, fits.
    #[inline]
    pub fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.width().unsigned_abs() * self.height().unsigned_abs()
        }
    }

    /// The overlap of two rectangles, or `None` if they do not overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let r = Self::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        (!r.is_empty()).then_some(r)
    }

    /// Returns `true` if the two rectangles share at least one pixel.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.intersect(other).is_some()
    }

    /// Returns `true` if the pixel at `(x, y)` is inside.
    #[inline]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Returns `true` if `other` is non-empty and entirely inside.
    pub const fn contains_rect(&self, other: &Self) -> bool {
        !other.is_empty()
            && !self.is_empty()
            && other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Returns a copy offset by `(dx, dy)`, saturating at the `i32` range.
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.left.saturating_add(dx),
            self.top.saturating_add(dy),
            self.right.saturating_add(dx),
            self.bottom.saturating_add(dy),
        )
    }

    /// The smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Pushes the parts of `self` not covered by `cut` onto `out`.
    ///
    /// The remainder is split into at most four pieces: a full-width strip
    /// above and below the overlap, then the parts left and right of it.
    pub(crate) fn subtract_into(&self, cut: &Self, out: &mut Vec<Self>) {
        let Some(hole) = self.intersect(cut) else {
            out.push(*self);
            return;
        };
        if hole.top > self.top {
            out.push(Self::new(self.left, self.top, self.right, hole.top));
        }
        if self.bottom > hole.bottom {
            out.push(Self::new(self.left, hole.bottom, self.right, self.bottom));
        }
        if hole.left > self.left {
            out.push(Self::new(self.left, hole.top, hole.left, hole.bottom));
        }
        if self.right > hole.right {
            out.push(Self::new(hole.right, hole.top, self.right, hole.bottom));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_sorts_edges() {
        let r = IRect::new(10, 8, 2, 4).normalized();
        assert_eq!(r, IRect::new(2, 4, 10, 8));
        assert!(!r.is_empty());
        assert!(IRect::new(3, 3, 3, 9).is_empty());
    }

    #[test]
    fn subtract_splits_into_four_strips() {
        let outer = IRect::new(0, 0, 10, 10);
        let mut out = Vec::new();
        outer.subtract_into(&IRect::new(3, 3, 6, 6), &mut out);
        assert_eq!(
            out,
            [
                IRect::new(0, 0, 10, 3),
                IRect::new(0, 6, 10, 10),
                IRect::new(0, 3, 3, 6),
                IRect::new(6, 3, 10, 6),
            ]
        );
        let area: u64 = out.iter().map(IRect::area).sum();
        assert_eq!(area, 100 - 9);
    }

    #[test]
    fn subtract_disjoint_keeps_original() {
        let mut out = Vec::new();
        IRect::new(0, 0, 2, 2).subtract_into(&IRect::new(5, 5, 6, 6), &mut out);
        assert_eq!(out, [IRect::new(0, 0, 2, 2)]);
    }

    #[test]
    fn edges_are_half_open() {
        let r = IRect::from_xywh(0, 0, 4, 4);
        assert!(r.contains_point(0, 0));
        assert!(!r.contains_point(4, 0));
        assert!(!r.intersects(&IRect::new(4, 0, 8, 4)));
    }

    #[test]
    fn full_range_area_does_not_overflow() {
        let full = IRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        let side = u64::from(u32::MAX);
        assert_eq!(full.area(), side * side);
        assert_eq!(IRect::new(3, 3, 1, 1).area(), 0, "unnormalized is empty");
    }
}
