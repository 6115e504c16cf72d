// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Applying per-color transforms to brushes, gradient stops and images.

use alloc::vec::Vec;
use core::fmt;

use peniko::Color;

use crate::blend::PorterDuff;
use crate::brush::{Brush, GradientStop, ImageBrush};
use crate::image::{AlphaMode, ImageBuffer, PixelFormat, encode};
use crate::matrix::ColorMatrix;

/// A function from one straight-alpha color to another.
pub trait ColorTransform {
    /// Maps a single color.
    fn transform(&self, color: Color) -> Color;
}

impl<T: ColorTransform + ?Sized> ColorTransform for &T {
    fn transform(&self, color: Color) -> Color {
        (**self).transform(color)
    }
}

impl ColorTransform for ColorMatrix {
    fn transform(&self, color: Color) -> Color {
        self.apply_color(color)
    }
}

/// Composites a fixed source color over each input color.
///
/// The input is the destination of the blend.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlendColor {
    /// The source color.
    pub color: Color,
    /// How the source is combined with the input.
    pub mode: PorterDuff,
}

impl BlendColor {
    /// Creates a blend transform.
    pub const fn new(color: Color, mode: PorterDuff) -> Self {
        Self { color, mode }
    }
}

impl ColorTransform for BlendColor {
    fn transform(&self, color: Color) -> Color {
        self.mode.blend(self.color, color)
    }
}

/// Applies `inner`, then `outer`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComposedTransform<A, B> {
    /// Applied second.
    pub outer: A,
    /// Applied first.
    pub inner: B,
}

impl<A: ColorTransform, B: ColorTransform> ColorTransform for ComposedTransform<A, B> {
    fn transform(&self, color: Color) -> Color {
        self.outer.transform(self.inner.transform(color))
    }
}

/// Adapts a closure into a [`ColorTransform`].
#[derive(Copy, Clone)]
pub struct FnTransform<F>(pub F);

impl<F> fmt::Debug for FnTransform<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnTransform { .. }")
    }
}

impl<F: Fn(Color) -> Color> ColorTransform for FnTransform<F> {
    fn transform(&self, color: Color) -> Color {
        (self.0)(color)
    }
}

/// Transforms every stop color, keeping offsets and order.
pub fn transform_stops(stops: &[GradientStop], transform: &impl ColorTransform) -> Vec<GradientStop> {
    stops
        .iter()
        .map(|s| GradientStop::new(s.offset, transform.transform(s.color)))
        .collect()
}

/// Builds a new brush with every color passed through `transform`.
///
/// Geometry, extend modes and sampling are kept. Image brushes get a new
/// pixel buffer, see [`transform_image`].
pub fn transform_brush(brush: &Brush, transform: &impl ColorTransform) -> Brush {
    match brush {
        Brush::Solid(color) => Brush::Solid(transform.transform(*color)),
        Brush::LinearGradient {
            start,
            end,
            stops,
            extend,
        } => Brush::LinearGradient {
            start: *start,
            end: *end,
            stops: transform_stops(stops, transform),
            extend: *extend,
        },
        Brush::RadialGradient {
            start_center,
            start_radius,
            end_center,
            end_radius,
            stops,
            extend,
        } => Brush::RadialGradient {
            start_center: *start_center,
            start_radius: *start_radius,
            end_center: *end_center,
            end_radius: *end_radius,
            stops: transform_stops(stops, transform),
            extend: *extend,
        },
        Brush::SweepGradient {
            center,
            start_angle,
            end_angle,
            stops,
            extend,
        } => Brush::SweepGradient {
            center: *center,
            start_angle: *start_angle,
            end_angle: *end_angle,
            stops: transform_stops(stops, transform),
            extend: *extend,
        },
        Brush::Image(image) => Brush::Image(ImageBrush {
            image: transform_image(&image.image, transform),
            ..image.clone()
        }),
    }
}

/// Transforms every pixel of `image` into a new, tightly packed buffer.
///
/// Each pixel is unpremultiplied, transformed, clamped to `[0, 1]` and
/// premultiplied again if the source was premultiplied. The channel order is
/// kept. An opaque source yields a straight-alpha result, since the transform
/// may introduce transparency.
#[tracing::instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn transform_image(image: &ImageBuffer, transform: &impl ColorTransform) -> ImageBuffer {
    let premultiplied = image.alpha_mode() == AlphaMode::Premultiplied;
    let mut out = Vec::with_capacity(image.width() as usize * image.height() as usize * 4);
    let bgra = image.format() == PixelFormat::Bgra8;
    image.for_each_straight(|px| {
        let mapped = transform.transform(Color::new(px)).components;
        let [r, g, b, a] = encode(mapped, premultiplied);
        if bgra {
            out.extend_from_slice(&[b, g, r, a]);
        } else {
            out.extend_from_slice(&[r, g, b, a]);
        }
    });
    let alpha = if premultiplied {
        AlphaMode::Premultiplied
    } else {
        AlphaMode::Straight
    };
    match ImageBuffer::new(
        image.width(),
        image.height(),
        image.width() as usize * 4,
        image.format(),
        alpha,
        out,
    ) {
        Ok(buffer) => buffer,
        Err(err) => {
            tracing::debug!(%err, "transformed image rejected, keeping source");
            image.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::Point;
    use peniko::Extend;

    fn gradient() -> Brush {
        Brush::RadialGradient {
            start_center: Point::new(1.0, 2.0),
            start_radius: 0.0,
            end_center: Point::new(1.0, 2.0),
            end_radius: 5.0,
            stops: vec![
                GradientStop::new(0.0, Color::new([0.1, 0.2, 0.3, 1.0])),
                GradientStop::new(1.0, Color::new([0.9, 0.8, 0.7, 0.5])),
            ],
            extend: Extend::Reflect,
        }
    }

    #[test]
    fn identity_matrix_leaves_every_brush_color_unchanged() {
        let img = ImageBuffer::from_rgba8(
            2,
            1,
            AlphaMode::Straight,
            vec![10, 20, 30, 40, 250, 128, 0, 255],
        )
        .unwrap();
        for brush in [
            Brush::Solid(Color::new([0.25, 0.5, 0.75, 0.6])),
            gradient(),
            Brush::Image(ImageBrush::new(img)),
        ] {
            assert_eq!(
                transform_brush(&brush, &ColorMatrix::IDENTITY),
                brush,
                "identity changed {brush:?}"
            );
        }
    }

    #[test]
    fn premultiplied_images_round_trip() {
        let img = ImageBuffer::from_rgba8(1, 1, AlphaMode::Premultiplied, vec![100, 50, 0, 200])
            .unwrap();
        let out = transform_image(&img, &ColorMatrix::IDENTITY);
        assert_eq!(out.alpha_mode(), AlphaMode::Premultiplied);
        let bytes = out.data();
        for (a, b) in bytes.iter().zip([100_u8, 50, 0, 200].iter()) {
            assert!(a.abs_diff(*b) <= 1, "{bytes:?}");
        }
    }

    #[test]
    fn opaque_images_become_straight() {
        let img = ImageBuffer::from_rgba8(1, 1, AlphaMode::Opaque, vec![255, 0, 0, 0]).unwrap();
        let half = ColorMatrix::scale(1.0, 1.0, 1.0, 0.5);
        let out = transform_image(&img, &half);
        assert_eq!(out.alpha_mode(), AlphaMode::Straight);
        assert_eq!(out.data(), &[255, 0, 0, 128]);
    }

    #[test]
    fn blend_color_uses_input_as_destination() {
        let tint = BlendColor::new(Color::new([1.0, 0.0, 0.0, 1.0]), PorterDuff::SrcATop);
        let out = tint.transform(Color::new([0.0, 0.0, 1.0, 0.5]));
        assert_eq!(out.components, [1.0, 0.0, 0.0, 0.5]);
        let keep = BlendColor::new(Color::WHITE, PorterDuff::Dst);
        let c = Color::new([0.2, 0.4, 0.6, 1.0]);
        assert_eq!(keep.transform(c), c);
    }

    #[test]
    fn composition_applies_inner_first() {
        let composed = ComposedTransform {
            outer: FnTransform(|c: Color| Color::new([c.components[0] * 2.0, 0.0, 0.0, 1.0])),
            inner: FnTransform(|c: Color| Color::new([c.components[0] + 0.25, 0.0, 0.0, 1.0])),
        };
        assert_eq!(
            composed.transform(Color::new([0.0, 0.0, 0.0, 1.0])).components[0],
            0.5
        );
    }

    #[test]
    fn stops_keep_their_offsets() {
        let stops = [GradientStop::new(0.7, Color::BLACK)];
        let out = transform_stops(&stops, &FnTransform(|_| Color::WHITE));
        assert_eq!(out, vec![GradientStop::new(0.7, Color::WHITE)]);
    }
}
