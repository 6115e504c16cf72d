// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Error returned when a pixel buffer does not match its description.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorError {
    /// The byte buffer is shorter than `stride * (height - 1) + width * 4`.
    BufferTooSmall {
        /// Bytes required by the description.
        expected: usize,
        /// Bytes actually provided.
        actual: usize,
    },
    /// The row stride is smaller than one row of pixels, or overflows.
    InvalidStride,
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { expected, actual } => write!(
                f,
                "pixel buffer too small: expected at least {expected} bytes, got {actual}"
            ),
            Self::InvalidStride => f.write_str("row stride is smaller than one row of pixels"),
        }
    }
}

impl core::error::Error for ColorError {}
