// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dash patterns and dash application.

use smallvec::SmallVec;

use crate::error::DashError;
use crate::measure::PathMeasure;
use crate::path::Path;

/// Upper bound on the dashes emitted for one path before dashing is abandoned.
const MAX_DASH_COUNT: f64 = 1_000_000.0;

/// A validated list of alternating on/off lengths plus a phase.
///
/// Intervals at even indices are drawn, odd ones are gaps. The phase is the
/// distance into the pattern at which each contour starts; it is wrapped
/// modulo the pattern length, and negative phases count backwards from the end.
#[derive(Clone, Debug, PartialEq)]
pub struct DashPattern {
    intervals: SmallVec<[f64; 4]>,
    phase: f64,
    total: f64,
    first_index: usize,
    first_length: f64,
}

impl DashPattern {
    /// Validates `intervals` and resolves where `phase` lands in the pattern.
    ///
    /// Intervals must be finite, non-negative, even in number and have a
    /// positive sum. A zero gap is allowed, so `[len, 0]` draws everything.
    pub fn new(intervals: &[f64], phase: f64) -> Result<Self, DashError> {
        if intervals.is_empty() {
            return Err(DashError::Empty);
        }
        if intervals.len() % 2 != 0 {
            return Err(DashError::OddCount);
        }
        if intervals.iter().any(|v| !v.is_finite()) {
            return Err(DashError::NonFiniteInterval);
        }
        if intervals.iter().any(|v| *v < 0.0) {
            return Err(DashError::NegativeInterval);
        }
        let total: f64 = intervals.iter().sum();
        if total <= 0.0 {
            return Err(DashError::ZeroLength);
        }

        let phase = if phase.is_finite() { phase } else { 0.0 };
        let mut offset = if phase < 0.0 {
            let wrapped = total - (-phase % total);
            if wrapped == total { 0.0 } else { wrapped }
        } else {
            phase % total
        };

        let mut first_index = 0;
        let mut first_length = intervals[0];
        for (i, &gap) in intervals.iter().enumerate() {
            if offset > gap || (offset == gap && gap != 0.0) {
                offset -= gap;
            } else {
                first_index = i;
                first_length = gap - offset;
                break;
            }
        }

        Ok(Self {
            intervals: SmallVec::from_slice(intervals),
            phase,
            total,
            first_index,
            first_length,
        })
    }

    /// The on/off lengths.
    #[inline]
    pub fn intervals(&self) -> &[f64] {
        &self.intervals
    }

    /// The phase as given (non-finite phases are stored as zero).
    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Sum of all intervals.
    #[inline]
    pub fn pattern_length(&self) -> f64 {
        self.total
    }
}

/// Returns a path holding only the "on" pieces of every contour of `path`.
///
/// Each contour restarts the pattern at the phase. On a closed contour the
/// first dash is drawn last, joined to the final dash when the pattern is "on"
/// across the closing point. Paths that would produce more than a million
/// dashes are returned undashed.
#[tracing::instrument(skip_all)]
pub fn dash_path(path: &Path, pattern: &DashPattern, res_scale: f64) -> Path {
    let mut out = Path::with_fill_rule(path.fill_rule());
    let mut measure = PathMeasure::new(path, false, res_scale);
    if measure.contour_count() == 0 {
        return out;
    }

    let estimated = measure.total_length() / pattern.total * pattern.intervals.len() as f64;
    if estimated > MAX_DASH_COUNT {
        tracing::debug!(estimated, "dash count too large, path left undashed");
        return path.clone();
    }

    let count = pattern.intervals.len();
    loop {
        let length = measure.length();
        let closed = measure.is_closed();
        let mut skip_first = closed;
        let mut added = false;
        let mut distance = 0.0;
        let mut index = pattern.first_index;
        let mut dash = pattern.first_length;
        while distance < length {
            added = false;
            if index % 2 == 0 && !skip_first {
                added = measure.segment(distance, distance + dash, &mut out, true);
            }
            distance += dash;
            skip_first = false;
            index = (index + 1) % count;
            dash = pattern.intervals[index];
        }
        if closed && pattern.first_index % 2 == 0 {
            measure.segment(0.0, pattern.first_length, &mut out, !added);
        }
        if !measure.next_contour() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Rect};

    fn total_length(path: &Path) -> f64 {
        let mut measure = PathMeasure::new(path, false, 1.0);
        let mut sum = measure.length();
        while measure.next_contour() {
            sum += measure.length();
        }
        sum
    }

    #[test]
    fn rejects_malformed_intervals() {
        assert_eq!(DashPattern::new(&[], 0.0), Err(DashError::Empty));
        assert_eq!(DashPattern::new(&[1.0, 2.0, 3.0], 0.0), Err(DashError::OddCount));
        assert_eq!(
            DashPattern::new(&[1.0, -2.0], 0.0),
            Err(DashError::NegativeInterval)
        );
        assert_eq!(
            DashPattern::new(&[1.0, f64::NAN], 0.0),
            Err(DashError::NonFiniteInterval)
        );
        assert_eq!(DashPattern::new(&[0.0, 0.0], 0.0), Err(DashError::ZeroLength));
    }

    #[test]
    fn phase_wraps_into_pattern() {
        let p = DashPattern::new(&[4.0, 2.0], 7.0).unwrap();
        // 7 mod 6 = 1, one unit into the first dash.
        assert_eq!(p.first_index, 0);
        assert_eq!(p.first_length, 3.0);

        let p = DashPattern::new(&[4.0, 2.0], -1.0).unwrap();
        // -1 is one unit before the end: inside the gap.
        assert_eq!(p.first_index, 1);
        assert_eq!(p.first_length, 1.0);

        let p = DashPattern::new(&[4.0, 2.0], 4.0).unwrap();
        assert_eq!(p.first_index, 1, "landing exactly on a boundary starts the gap");
        assert_eq!(p.first_length, 2.0);
    }

    #[test]
    fn full_on_pattern_preserves_length() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.cubic_to((30.0, 60.0), (70.0, -60.0), (100.0, 0.0));
        path.add_rect(Rect::new(0.0, 0.0, 20.0, 10.0), crate::PathDirection::Clockwise);
        let input = total_length(&path);

        for on in [5.0, 1000.0] {
            let pattern = DashPattern::new(&[on, 0.0], 0.0).unwrap();
            let dashed = dash_path(&path, &pattern, 1.0);
            let output = total_length(&dashed);
            assert!(
                (output - input).abs() < 1e-6,
                "on = {on}: {output} != {input}"
            );
        }
    }

    #[test]
    fn open_line_is_split_into_dashes() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        let pattern = DashPattern::new(&[3.0, 1.0], 0.0).unwrap();
        let dashed = dash_path(&path, &pattern, 1.0);
        let starts: alloc::vec::Vec<Point> = dashed
            .iter()
            .filter_map(|c| match c {
                crate::PathCommand::MoveTo(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(
            starts,
            [Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(8.0, 0.0)]
        );
        assert!((total_length(&dashed) - 8.0).abs() < 1e-9, "3 + 3 + 2");
    }

    #[test]
    fn closed_contour_draws_first_dash_last() {
        let path = Path::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        // Perimeter 40. The first dash [0, 15) is held back and drawn last; the
        // pattern is in a gap at the closing point, so it stays separate.
        let pattern = DashPattern::new(&[15.0, 5.0], 0.0).unwrap();
        let dashed = dash_path(&path, &pattern, 1.0);
        assert_eq!(dashed.contour_count(), 2);
        assert!((total_length(&dashed) - 30.0).abs() < 1e-9);
    }
}
