// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors for malformed stroke and dash parameters.

use core::fmt;

/// Error returned when a dash interval list cannot be used.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DashError {
    /// The interval list is empty.
    Empty,
    /// The interval list has an odd number of entries.
    OddCount,
    /// An interval is negative.
    NegativeInterval,
    /// An interval is NaN or infinite.
    NonFiniteInterval,
    /// The intervals sum to zero, so the pattern would never advance.
    ZeroLength,
}

impl fmt::Display for DashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Empty => "dash interval list is empty",
            Self::OddCount => "dash interval list must have an even number of entries",
            Self::NegativeInterval => "dash intervals must not be negative",
            Self::NonFiniteInterval => "dash intervals must be finite",
            Self::ZeroLength => "dash intervals must have a positive sum",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for DashError {}

/// Error returned when a stroke style is malformed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StrokeError {
    /// The stroke width is negative.
    NegativeWidth,
    /// The stroke width is NaN or infinite.
    NonFiniteWidth,
    /// The miter limit is negative, NaN or infinite.
    InvalidMiterLimit,
    /// The dash pattern is malformed.
    InvalidDash(DashError),
}

impl fmt::Display for StrokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeWidth => f.write_str("stroke width must not be negative"),
            Self::NonFiniteWidth => f.write_str("stroke width must be finite"),
            Self::InvalidMiterLimit => {
                f.write_str("stroke miter limit must be finite and not negative")
            }
            Self::InvalidDash(err) => write!(f, "invalid stroke dash: {err}"),
        }
    }
}

impl core::error::Error for StrokeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidDash(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DashError> for StrokeError {
    fn from(err: DashError) -> Self {
        Self::InvalidDash(err)
    }
}
