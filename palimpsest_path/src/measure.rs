// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arc-length measurement over flattened contours.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Vec2};

use crate::flatten::flatten;
use crate::path::Path;

/// Distances this close to the end of a contour are pulled back before the
/// segment search, so the search always lands on a segment with a tangent.
pub const MEASURE_EPSILON: f64 = 1e-4;

bitflags::bitflags! {
    /// Components requested from [`PathMeasure::transform_at`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MatrixFlags: u8 {
        /// Translate to the position on the path.
        const GET_POSITION = 0b0000_0001;
        /// Rotate to the tangent direction.
        const GET_TANGENT  = 0b0000_0010;
        /// Both position and tangent.
        const GET_POSITION_AND_TANGENT = Self::GET_POSITION.bits() | Self::GET_TANGENT.bits();
    }
}

/// A straight piece of a flattened contour.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeasureSegment {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Distance from the start of the owning contour to `start`.
    pub start_distance: f64,
    /// Euclidean length; zero for coincident points.
    pub length: f64,
}

impl MeasureSegment {
    /// Distance from the start of the owning contour to `end`.
    #[inline]
    pub fn end_distance(&self) -> f64 {
        self.start_distance + self.length
    }

    /// Point at `distance` from the start of the owning contour.
    fn point_at(&self, distance: f64) -> Point {
        if self.length > 0.0 {
            let t = ((distance - self.start_distance) / self.length).clamp(0.0, 1.0);
            self.start.lerp(self.end, t)
        } else {
            self.start
        }
    }
}

/// Index entry for one measured contour.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeasureContour {
    /// Cumulative distance of all earlier contours.
    pub start_distance: f64,
    /// `start_distance` plus the length of this contour.
    pub end_distance: f64,
    /// Index of the first segment in [`PathMeasure::segments`].
    pub start_segment: usize,
    /// Number of segments in this contour; always at least one.
    pub segment_count: usize,
    /// Whether the contour was closed, explicitly or by `force_closed`.
    pub closed: bool,
}

impl MeasureContour {
    /// Length of the contour.
    #[inline]
    pub fn length(&self) -> f64 {
        self.end_distance - self.start_distance
    }
}

/// Arc-length table over every contour of a path.
///
/// The table is built once by flattening the path; it is not affected by later
/// edits to that path. Queries are answered relative to the current contour,
/// which starts at the first one and advances with
/// [`next_contour`](Self::next_contour). Contours without any segment (a lone
/// `MoveTo`) are skipped.
#[derive(Clone, Debug, Default)]
pub struct PathMeasure {
    segments: Vec<MeasureSegment>,
    contours: Vec<MeasureContour>,
    current: usize,
}

impl PathMeasure {
    /// Measures `path`, treating every contour as closed if `force_closed`.
    #[tracing::instrument(skip_all)]
    pub fn new(path: &Path, force_closed: bool, res_scale: f64) -> Self {
        let mut segments = Vec::new();
        let mut contours = Vec::new();
        let mut total = 0.0;
        for flat in flatten(path, res_scale) {
            if flat.points.len() < 2 {
                continue;
            }
            let closed = flat.closed || force_closed;
            let start_segment = segments.len();
            let mut distance = 0.0;
            let mut push = |a: Point, b: Point| {
                let length = (b - a).hypot();
                segments.push(MeasureSegment {
                    start: a,
                    end: b,
                    start_distance: distance,
                    length,
                });
                distance += length;
            };
            for pair in flat.points.windows(2) {
                push(pair[0], pair[1]);
            }
            if closed {
                push(flat.points[flat.points.len() - 1], flat.points[0]);
            }
            contours.push(MeasureContour {
                start_distance: total,
                end_distance: total + distance,
                start_segment,
                segment_count: segments.len() - start_segment,
                closed,
            });
            total += distance;
        }
        Self {
            segments,
            contours,
            current: 0,
        }
    }

    /// All segments of all contours.
    #[inline]
    pub fn segments(&self) -> &[MeasureSegment] {
        &self.segments
    }

    /// The contour index.
    #[inline]
    pub fn contours(&self) -> &[MeasureContour] {
        &self.contours
    }

    /// Number of measured contours.
    #[inline]
    pub fn contour_count(&self) -> usize {
        self.contours.len()
    }

    /// Index of the current contour.
    #[inline]
    pub fn contour_index(&self) -> usize {
        self.current
    }

    /// Advances to the next contour, returning `false` when there is none.
    pub fn next_contour(&mut self) -> bool {
        if self.current + 1 < self.contours.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Length of the current contour, or zero when nothing was measured.
    pub fn length(&self) -> f64 {
        self.contour().map_or(0.0, MeasureContour::length)
    }

    /// Sum of the lengths of every contour.
    pub fn total_length(&self) -> f64 {
        self.contours.last().map_or(0.0, |c| c.end_distance)
    }

    /// Whether the current contour is closed.
    pub fn is_closed(&self) -> bool {
        self.contour().is_some_and(|c| c.closed)
    }

    fn contour(&self) -> Option<&MeasureContour> {
        self.contours.get(self.current)
    }

    fn contour_segments(&self, contour: &MeasureContour) -> &[MeasureSegment] {
        &self.segments[contour.start_segment..contour.start_segment + contour.segment_count]
    }

    /// Clamps `distance` into the current contour.
    ///
    /// Returns the contour, the clamped distance and the index (within the
    /// contour) of the segment the ε-adjusted distance falls on.
    fn locate(&self, distance: f64) -> Option<(&MeasureContour, f64, usize)> {
        let contour = self.contour()?;
        let length = contour.length();
        // `max` discards a NaN distance; `clamp` would panic on a NaN length.
        let distance = distance.max(0.0).min(length);
        let search = if length - distance < MEASURE_EPSILON {
            (length - MEASURE_EPSILON).max(0.0)
        } else {
            distance
        };
        let segments = self.contour_segments(contour);
        let index = segments
            .partition_point(|s| s.end_distance() <= search)
            .min(segments.len() - 1);
        Some((contour, distance, index))
    }

    /// Point at `distance` along the current contour.
    ///
    /// The distance is clamped into `[0, length]`. Returns `None` when nothing
    /// was measured.
    pub fn position(&self, distance: f64) -> Option<Point> {
        let (contour, distance, index) = self.locate(distance)?;
        Some(self.contour_segments(contour)[index].point_at(distance))
    }

    /// Point and unit tangent at `distance` along the current contour.
    ///
    /// A zero-length segment borrows the direction of the nearest following
    /// segment with a length, then of the nearest preceding one. A contour whose
    /// segments all have zero length reports a zero tangent.
    pub fn position_and_tangent(&self, distance: f64) -> Option<(Point, Vec2)> {
        let (contour, distance, index) = self.locate(distance)?;
        let segments = self.contour_segments(contour);
        let position = segments[index].point_at(distance);
        let direction = segments[index..]
            .iter()
            .chain(segments[..index].iter().rev())
            .find(|s| s.length > 0.0)
            .map_or(Vec2::ZERO, |s| (s.end - s.start) / s.length);
        Some((position, direction))
    }

    /// Matrix mapping the origin and x axis onto the path at `distance`.
    ///
    /// `flags` selects whether the rotation to the tangent, the translation to
    /// the position, or both are included.
    pub fn transform_at(&self, distance: f64, flags: MatrixFlags) -> Option<Affine> {
        let (position, tangent) = self.position_and_tangent(distance)?;
        let mut matrix = Affine::IDENTITY;
        if flags.contains(MatrixFlags::GET_TANGENT) {
            matrix = Affine::new([tangent.x, tangent.y, -tangent.y, tangent.x, 0.0, 0.0]);
        }
        if flags.contains(MatrixFlags::GET_POSITION) {
            matrix = matrix.then_translate(position.to_vec2());
        }
        Some(matrix)
    }

    /// Appends the part of the current contour between `start` and `end` to `dest`.
    ///
    /// Both distances are clamped into the contour first. The piece starts with
    /// a `MoveTo` when `start_with_move_to` is set and is otherwise joined to
    /// `dest` with a line. Returns `false`, leaving `dest` untouched, when the
    /// clamped range is empty or nothing was measured.
    pub fn segment(&self, start: f64, end: f64, dest: &mut Path, start_with_move_to: bool) -> bool {
        let Some(contour) = self.contour() else {
            return false;
        };
        let length = contour.length();
        let start = start.max(0.0);
        let end = end.min(length);
        if start >= end {
            return false;
        }
        let segments = self.contour_segments(contour);
        let last = segments.len() - 1;
        let first_index = segments
            .partition_point(|s| s.end_distance() <= start)
            .min(last);
        let last_index = segments
            .partition_point(|s| s.end_distance() < end)
            .min(last);

        let p0 = segments[first_index].point_at(start);
        if start_with_move_to {
            dest.move_to(p0);
        } else {
            dest.line_to(p0);
        }
        for seg in &segments[first_index..last_index] {
            dest.line_to(seg.end);
        }
        dest.line_to(segments[last_index].point_at(end));
        true
    }
}
