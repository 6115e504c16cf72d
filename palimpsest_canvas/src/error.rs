// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use palimpsest_color::ColorError;
use palimpsest_path::StrokeError;

/// Error returned by canvas operations.
///
/// [`NotImplemented`](Self::NotImplemented) marks a known gap in the emulated
/// API and is kept apart from usage errors so callers can tell the two apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CanvasError {
    /// The operation has no emulation on top of a scene renderer.
    NotImplemented(&'static str),
    /// An argument is out of range or malformed.
    InvalidArgument(&'static str),
    /// The paint's stroke style is malformed.
    Stroke(StrokeError),
    /// A pixel buffer does not match its description.
    Color(ColorError),
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented(what) => write!(f, "not implemented: {what}"),
            Self::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            Self::Stroke(err) => write!(f, "invalid stroke: {err}"),
            Self::Color(err) => write!(f, "invalid pixels: {err}"),
        }
    }
}

impl core::error::Error for CanvasError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Stroke(err) => Some(err),
            Self::Color(err) => Some(err),
            Self::NotImplemented(_) | Self::InvalidArgument(_) => None,
        }
    }
}

impl From<StrokeError> for CanvasError {
    fn from(err: StrokeError) -> Self {
        Self::Stroke(err)
    }
}

impl From<ColorError> for CanvasError {
    fn from(err: ColorError) -> Self {
        Self::Color(err)
    }
}
