// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;

use peniko::Color;

use crate::blend::PorterDuff;
use crate::matrix::ColorMatrix;
use crate::transform::{BlendColor, ColorTransform};

/// A color filter attached to a paint.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorFilter {
    /// Multiplies colors by a [`ColorMatrix`].
    Matrix(ColorMatrix),
    /// Composites a fixed color over each color.
    Blend {
        /// Source color.
        color: Color,
        /// Compositing operator.
        mode: PorterDuff,
    },
    /// Applies the second filter, then the first.
    Compose(Box<ColorFilter>, Box<ColorFilter>),
}

impl ColorFilter {
    /// A filter that runs `inner` and then `outer`.
    pub fn compose(outer: Self, inner: Self) -> Self {
        Self::Compose(Box::new(outer), Box::new(inner))
    }
}

impl ColorTransform for ColorFilter {
    fn transform(&self, color: Color) -> Color {
        match self {
            Self::Matrix(m) => m.apply_color(color),
            Self::Blend { color: src, mode } => BlendColor::new(*src, *mode).transform(color),
            Self::Compose(outer, inner) => outer.transform(inner.transform(color)),
        }
    }
}

impl From<ColorMatrix> for ColorFilter {
    fn from(matrix: ColorMatrix) -> Self {
        Self::Matrix(matrix)
    }
}
