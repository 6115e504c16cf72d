// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::Color;

/// A 4×5 color matrix applied to straight-alpha RGBA.
///
/// Rows are R, G, B, A. Each output channel is
/// `m[c][0]*r + m[c][1]*g + m[c][2]*b + m[c][3]*a + m[c][4]`, clamped to
/// `[0, 1]`. Offsets (the fifth column) are in normalized units, not 0–255.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorMatrix {
    /// Row-major coefficients.
    pub values: [f32; 20],
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColorMatrix {
    /// Leaves colors unchanged.
    pub const IDENTITY: Self = Self::scale(1.0, 1.0, 1.0, 1.0);

    /// Creates a matrix from row-major coefficients.
    pub const fn new(values: [f32; 20]) -> Self {
        Self { values }
    }

    /// Multiplies each channel by a constant.
    #[rustfmt::skip]
    pub const fn scale(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::new([
            r,   0.0, 0.0, 0.0, 0.0,
            0.0, g,   0.0, 0.0, 0.0,
            0.0, 0.0, b,   0.0, 0.0,
            0.0, 0.0, 0.0, a,   0.0,
        ])
    }

    /// Adjusts saturation: `0` is grayscale, `1` is unchanged.
    #[rustfmt::skip]
    pub fn saturation(s: f32) -> Self {
        const R: f32 = 0.213;
        const G: f32 = 0.715;
        const B: f32 = 0.072;
        let i = 1.0 - s;
        Self::new([
            R * i + s, G * i,     B * i,     0.0, 0.0,
            R * i,     G * i + s, B * i,     0.0, 0.0,
            R * i,     G * i,     B * i + s, 0.0, 0.0,
            0.0,       0.0,       0.0,       1.0, 0.0,
        ])
    }

    /// The matrix that applies `self` and then `next`.
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        let a = &self.values;
        let b = &next.values;
        let mut out = [0.0_f32; 20];
        for row in 0..4 {
            for col in 0..5 {
                let mut v = 0.0;
                for k in 0..4 {
                    v += b[row * 5 + k] * a[k * 5 + col];
                }
                if col == 4 {
                    v += b[row * 5 + 4];
                }
                out[row * 5 + col] = v;
            }
        }
        Self::new(out)
    }

    /// Applies the matrix to straight-alpha components, clamping the result.
    pub fn apply(&self, input: [f32; 4]) -> [f32; 4] {
        let m = &self.values;
        let mut out = [0.0_f32; 4];
        for (c, slot) in out.iter_mut().enumerate() {
            let row = &m[c * 5..c * 5 + 5];
            let v = row[0] * input[0]
                + row[1] * input[1]
                + row[2] * input[2]
                + row[3] * input[3]
                + row[4];
            *slot = v.clamp(0.0, 1.0);
        }
        out
    }

    /// Applies the matrix to a color.
    pub fn apply_color(&self, color: Color) -> Color {
        Color::new(self.apply(color.components))
    }
}
