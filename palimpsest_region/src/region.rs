// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec;
use alloc::vec::Vec;

use crate::rect::IRect;

/// Set operation applied by [`Region::op`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegionOp {
    /// Remove the operand from the region.
    Difference,
    /// Keep only the overlap with the operand.
    Intersect,
    /// Add the operand to the region.
    Union,
    /// Keep the parts covered by exactly one of the two.
    Xor,
    /// Replace the region with the operand minus the region.
    ReverseDifference,
    /// Replace the region with the operand.
    Replace,
}

/// A set of pixels stored as a list of non-overlapping rectangles.
///
/// Every operation keeps the rectangles non-empty and pairwise disjoint, but
/// makes no attempt at a minimal or canonical covering: two regions covering
/// the same pixels may store different lists, so compare with
/// [`same_coverage`](Self::same_coverage) rather than `==`. Results depend only
/// on the operation sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<IRect>,
}

impl Region {
    /// Creates an empty region.
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Creates a region covering `rect`, or an empty one if it is degenerate.
    pub fn from_rect(rect: IRect) -> Self {
        let mut region = Self::new();
        region.set_rect(rect);
        region
    }

    /// The rectangles, in insertion order.
    #[inline]
    pub fn rects(&self) -> &[IRect] {
        &self.rects
    }

    /// Iterates over the rectangles.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, IRect> {
        self.rects.iter()
    }

    /// Returns `true` if no pixel is covered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Returns `true` if the region is a single rectangle.
    #[inline]
    pub fn is_rect(&self) -> bool {
        self.rects.len() == 1
    }

    /// Bounding rectangle, [`IRect::EMPTY`] for an empty region.
    pub fn bounds(&self) -> IRect {
        let mut rects = self.rects.iter();
        let Some(first) = rects.next() else {
            return IRect::EMPTY;
        };
        rects.fold(*first, |acc, r| acc.union(r))
    }

    /// Number of covered pixels.
    ///
    /// The rectangles are disjoint, so the sum never exceeds the area of the
    /// whole `i32` plane.
    pub fn area(&self) -> u64 {
        self.rects.iter().map(IRect::area).sum()
    }

    /// Returns `true` if the pixel at `(x, y)` is covered.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rects.iter().any(|r| r.contains_point(x, y))
    }

    /// Returns `true` if every pixel of a non-empty `rect` is covered.
    pub fn contains_rect(&self, rect: IRect) -> bool {
        let rect = rect.normalized();
        if rect.is_empty() {
            return false;
        }
        subtract_all(vec![rect], &self.rects).is_empty()
    }

    /// Returns `true` if `rect` shares at least one pixel with the region.
    pub fn intersects_rect(&self, rect: IRect) -> bool {
        let rect = rect.normalized();
        self.rects.iter().any(|r| r.intersects(&rect))
    }

    /// Cheap conservative test: `true` means `rect` certainly misses the region.
    pub fn quick_reject(&self, rect: IRect) -> bool {
        self.is_empty() || !self.bounds().intersects(&rect.normalized())
    }

    /// Returns `true` if both regions cover exactly the same pixels.
    pub fn same_coverage(&self, other: &Self) -> bool {
        self.area() == other.area()
            && subtract_all(self.rects.clone(), &other.rects).is_empty()
    }

    /// Offsets every rectangle.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        for r in &mut self.rects {
            *r = r.translate(dx, dy);
        }
    }

    /// Removes every rectangle.
    pub fn set_empty(&mut self) {
        self.rects.clear();
    }

    /// Replaces the region with `rect`; returns `false` if it is degenerate.
    pub fn set_rect(&mut self, rect: IRect) -> bool {
        self.op(rect, RegionOp::Replace)
    }

    /// Replaces the region with a copy of `other`.
    pub fn set_region(&mut self, other: &Self) -> bool {
        self.rects.clone_from(&other.rects);
        !self.is_empty()
    }

    /// Applies `op` with `rect` as the right-hand operand.
    ///
    /// The rectangle is normalized first. A degenerate rectangle leaves the
    /// region unchanged, except for [`RegionOp::Replace`] which always clears
    /// the region before adding. Returns `true` if the result is non-empty.
    pub fn op(&mut self, rect: IRect, op: RegionOp) -> bool {
        let rect = rect.normalized();
        if rect.is_empty() && op != RegionOp::Replace {
            tracing::debug!(?op, "degenerate rectangle ignored by region op");
            return !self.is_empty();
        }

        match op {
            RegionOp::Replace => {
                self.rects.clear();
                if !rect.is_empty() {
                    self.rects.push(rect);
                }
                return !self.is_empty();
            }
            RegionOp::Union => {
                let uncovered = subtract_all(vec![rect], &self.rects);
                self.rects.extend(uncovered);
            }
            RegionOp::Intersect => {
                self.rects = self.rects.iter().filter_map(|r| r.intersect(&rect)).collect();
            }
            RegionOp::Difference => {
                self.rects = subtract_all(core::mem::take(&mut self.rects), &[rect]);
            }
            RegionOp::ReverseDifference => {
                self.rects = subtract_all(vec![rect], &self.rects);
            }
            RegionOp::Xor => {
                let outside = subtract_all(vec![rect], &self.rects);
                let mut kept = subtract_all(core::mem::take(&mut self.rects), &[rect]);
                kept.extend(outside);
                self.rects = kept;
            }
        }
        self.note_if_empty(op);
        !self.is_empty()
    }

    /// Applies `op` with every rectangle of `other` as the operand.
    #[tracing::instrument(skip_all, fields(op = ?op, lhs = self.rects.len(), rhs = other.rects.len()))]
    pub fn op_region(&mut self, other: &Self, op: RegionOp) -> bool {
        match op {
            RegionOp::Replace => {
                self.set_region(other);
            }
            RegionOp::Union => {
                for r in &other.rects {
                    let uncovered = subtract_all(vec![*r], &self.rects);
                    self.rects.extend(uncovered);
                }
            }
            RegionOp::Intersect => {
                let mut out = Vec::new();
                for r in &other.rects {
                    out.extend(self.rects.iter().filter_map(|own| own.intersect(r)));
                }
                self.rects = out;
            }
            RegionOp::Difference => {
                self.rects = subtract_all(core::mem::take(&mut self.rects), &other.rects);
            }
            RegionOp::ReverseDifference => {
                self.rects = subtract_all(other.rects.clone(), &self.rects);
            }
            RegionOp::Xor => {
                let outside = subtract_all(other.rects.clone(), &self.rects);
                let mut kept = subtract_all(core::mem::take(&mut self.rects), &other.rects);
                kept.extend(outside);
                self.rects = kept;
            }
        }
        self.note_if_empty(op);
        !self.is_empty()
    }

    fn note_if_empty(&self, op: RegionOp) {
        if self.is_empty() {
            tracing::debug!(?op, "region op produced an empty region");
        }
    }
}

impl<'a> IntoIterator for &'a Region {
    type Item = &'a IRect;
    type IntoIter = core::slice::Iter<'a, IRect>;

    fn into_iter(self) -> Self::IntoIter {
        self.rects.iter()
    }
}

impl From<IRect> for Region {
    fn from(rect: IRect) -> Self {
        Self::from_rect(rect)
    }
}

/// Subtracts every rectangle of `cuts` from every rectangle of `seeds`.
fn subtract_all(mut seeds: Vec<IRect>, cuts: &[IRect]) -> Vec<IRect> {
    let mut next = Vec::new();
    for cut in cuts {
        if seeds.is_empty() {
            break;
        }
        for seed in &seeds {
            seed.subtract_into(cut, &mut next);
        }
        core::mem::swap(&mut seeds, &mut next);
        next.clear();
    }
    seeds
}
