// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=palimpsest_path --heading-base-level=0

//! Palimpsest Path: the path model and the geometry algorithms built on it.
//!
//! A [`Path`] is an ordered list of [`PathCommand`]s (move, line, quadratic,
//! conic, cubic, close) plus a [`FillRule`]. It is the only geometric data
//! source for the rest of Palimpsest; everything else in this crate reduces a
//! path to simpler geometry:
//!
//! - [`flatten`] subdivides curves into polylines with a fixed, resolution
//!   scaled number of steps per segment.
//! - [`PathMeasure`] builds an arc-length table over every contour and answers
//!   position, tangent and sub-segment queries.
//! - [`RoundRect`] synthesizes rounded rectangles with independent elliptical
//!   corners.
//! - [`dash_path`] keeps only the "on" intervals of a [`DashPattern`].
//! - [`stroke_to_fill`] expands a [`StrokeStyle`] into a fillable outline.
//! - [`to_unit_winding`] rewrites a path for renderers that only fill with
//!   non-zero winding.
//!
//! The algorithms intentionally favour predictable, uniform subdivision over
//! curvature-adaptive accuracy: consumers such as dashing only need a monotone
//! arc-length approximation.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use palimpsest_path::{Path, PathMeasure};
//!
//! let mut path = Path::new();
//! path.move_to((0.0, 0.0));
//! path.line_to((30.0, 40.0));
//!
//! let measure = PathMeasure::new(&path, false, 1.0);
//! assert!((measure.length() - 50.0).abs() < 1e-9);
//! assert_eq!(measure.position(0.0), Some(Point::new(0.0, 0.0)));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod conic;
mod dash;
mod error;
mod flatten;
mod measure;
mod path;
mod round_rect;
mod stroke;
mod winding;

pub use conic::Conic;
pub use dash::{DashPattern, dash_path};
pub use error::{DashError, StrokeError};
pub use flatten::{
    CONIC_BASE_STEPS, CUBIC_BASE_STEPS, FlatContour, QUAD_BASE_STEPS, flatten, subdivision_steps,
};
pub use measure::{
    MEASURE_EPSILON, MatrixFlags, MeasureContour, MeasureSegment, PathMeasure,
};
pub use path::{FillRule, Path, PathCommand, PathDirection};
pub use round_rect::{CUBIC_ARC_FACTOR, RoundRect, RoundRectKind, RoundRectRadii};
pub use stroke::{
    Cap, DEFAULT_STROKE_TOLERANCE, Join, StrokeStyle, fill_path_for_stroke, stroke_to_fill,
};
pub use winding::to_unit_winding;
