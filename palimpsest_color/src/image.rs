// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoded pixel buffers and their format/alpha conversions.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use peniko::Color;

use crate::error::ColorError;

/// Byte order of a 32-bit pixel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Red, green, blue, alpha.
    #[default]
    Rgba8,
    /// Blue, green, red, alpha.
    Bgra8,
}

/// How the alpha channel of a buffer is to be read.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlphaMode {
    /// Color channels are already multiplied by alpha.
    #[default]
    Premultiplied,
    /// Color channels are independent of alpha.
    Straight,
    /// Alpha is ignored and treated as fully opaque.
    Opaque,
}

/// An immutable, already-decoded 8-bit-per-channel image.
///
/// Pixel data is shared: cloning a buffer is cheap, and transforms produce a
/// new buffer rather than writing into an existing one.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
    alpha: AlphaMode,
    data: Arc<[u8]>,
}

impl fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("format", &self.format)
            .field("alpha", &self.alpha)
            .finish_non_exhaustive()
    }
}

impl ImageBuffer {
    /// Wraps decoded pixels.
    ///
    /// `stride` is the distance in bytes between the starts of two rows. It
    /// must hold a full row, and `data` must reach the end of the last row.
    pub fn new(
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
        alpha: AlphaMode,
        data: impl Into<Arc<[u8]>>,
    ) -> Result<Self, ColorError> {
        let data = data.into();
        let row = width as usize * 4;
        if stride < row {
            return Err(ColorError::InvalidStride);
        }
        let expected = if height == 0 {
            0
        } else {
            stride
                .checked_mul(height as usize - 1)
                .and_then(|v| v.checked_add(row))
                .ok_or(ColorError::InvalidStride)?
        };
        if data.len() < expected {
            return Err(ColorError::BufferTooSmall {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            alpha,
            data,
        })
    }

    /// Wraps tightly packed RGBA pixels.
    pub fn from_rgba8(
        width: u32,
        height: u32,
        alpha: AlphaMode,
        data: impl Into<Arc<[u8]>>,
    ) -> Result<Self, ColorError> {
        Self::new(width, height, width as usize * 4, PixelFormat::Rgba8, alpha, data)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Channel order.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Alpha interpretation.
    pub fn alpha_mode(&self) -> AlphaMode {
        self.alpha
    }

    /// The raw bytes, including any row padding.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The raw channels of the pixel at `(x, y)` in RGBA order.
    fn raw(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = y as usize * self.stride + x as usize * 4;
        let px = self.data.get(at..at + 4)?;
        Some(match self.format {
            PixelFormat::Rgba8 => [px[0], px[1], px[2], px[3]],
            PixelFormat::Bgra8 => [px[2], px[1], px[0], px[3]],
        })
    }

    /// The straight-alpha color of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.raw(x, y).map(|px| Color::new(self.straight(px)))
    }

    /// Normalizes raw RGBA channels to straight alpha.
    pub(crate) fn straight(&self, [r, g, b, a]: [u8; 4]) -> [f32; 4] {
        let n = |v: u8| f32::from(v) / 255.0;
        match self.alpha {
            AlphaMode::Opaque => [n(r), n(g), n(b), 1.0],
            AlphaMode::Straight => [n(r), n(g), n(b), n(a)],
            AlphaMode::Premultiplied => {
                if a == 0 {
                    [0.0, 0.0, 0.0, 0.0]
                } else {
                    let inv = 255.0 / f32::from(a);
                    [
                        (n(r) * inv).min(1.0),
                        (n(g) * inv).min(1.0),
                        (n(b) * inv).min(1.0),
                        n(a),
                    ]
                }
            }
        }
    }

    /// Visits every pixel as straight-alpha components, row by row.
    pub(crate) fn for_each_straight(&self, mut f: impl FnMut([f32; 4])) {
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(px) = self.raw(x, y) {
                    f(self.straight(px));
                }
            }
        }
    }

    /// Tightly packed RGBA bytes with premultiplied alpha.
    pub fn to_rgba8_premultiplied(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        self.for_each_straight(|px| out.extend_from_slice(&encode(px, true)));
        out
    }

    /// Tightly packed RGBA bytes with straight alpha.
    pub fn to_rgba8_straight(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        self.for_each_straight(|px| out.extend_from_slice(&encode(px, false)));
        out
    }
}

/// Quantizes straight-alpha components, optionally premultiplying.
pub(crate) fn encode([r, g, b, a]: [f32; 4], premultiply: bool) -> [u8; 4] {
    let a = a.clamp(0.0, 1.0);
    let k = if premultiply { a } else { 1.0 };
    [
        to_u8(r.clamp(0.0, 1.0) * k),
        to_u8(g.clamp(0.0, 1.0) * k),
        to_u8(b.clamp(0.0, 1.0) * k),
        to_u8(a),
    ]
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the input is clamped to [0, 1] so the scaled value fits in a u8"
)]
fn to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn validation_checks_stride_and_length() {
        assert_eq!(
            ImageBuffer::new(2, 2, 7, PixelFormat::Rgba8, AlphaMode::Straight, vec![0; 16])
                .unwrap_err(),
            ColorError::InvalidStride
        );
        assert_eq!(
            ImageBuffer::new(2, 2, 12, PixelFormat::Rgba8, AlphaMode::Straight, vec![0; 19])
                .unwrap_err(),
            ColorError::BufferTooSmall {
                expected: 20,
                actual: 19
            }
        );
        // The last row does not need padding.
        assert!(
            ImageBuffer::new(2, 2, 12, PixelFormat::Rgba8, AlphaMode::Straight, vec![0; 20])
                .is_ok(),
            "padding after the last row is optional"
        );
    }

    #[test]
    fn premultiplied_pixels_are_unpremultiplied() {
        let img =
            ImageBuffer::from_rgba8(1, 1, AlphaMode::Premultiplied, vec![64, 0, 0, 128]).unwrap();
        let c = img.pixel(0, 0).unwrap();
        assert!((c.components[0] - 0.5).abs() < 0.01);
        assert!((c.components[3] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(img.pixel(1, 0), None);
    }

    #[test]
    fn bgra_is_reordered() {
        let img = ImageBuffer::new(
            1,
            1,
            4,
            PixelFormat::Bgra8,
            AlphaMode::Straight,
            vec![10, 20, 30, 255],
        )
        .unwrap();
        assert_eq!(img.to_rgba8_straight(), vec![30, 20, 10, 255]);
    }

    #[test]
    fn conversions_drop_row_padding() {
        let data = vec![255, 255, 255, 128, 9, 9, 9, 9, 0, 0, 0, 0];
        let img =
            ImageBuffer::new(1, 2, 8, PixelFormat::Rgba8, AlphaMode::Straight, data).unwrap();
        assert_eq!(img.to_rgba8_premultiplied(), vec![128, 128, 128, 128, 0, 0, 0, 0]);
        assert_eq!(img.to_rgba8_straight(), vec![255, 255, 255, 128, 0, 0, 0, 0]);
    }

    #[test]
    fn opaque_ignores_alpha() {
        let img = ImageBuffer::from_rgba8(1, 1, AlphaMode::Opaque, vec![1, 2, 3, 0]).unwrap();
        assert_eq!(img.to_rgba8_straight(), vec![1, 2, 3, 255]);
    }
}
