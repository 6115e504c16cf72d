// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved brushes: what a fill or stroke is painted with.

use alloc::vec::Vec;

use kurbo::{Affine, Point};
use peniko::{
    Blob, Color, ColorStop, ColorStops, Gradient, GradientKind, ImageAlphaType, ImageData,
    ImageFormat, ImageSampler, LinearGradientPosition, RadialGradientPosition,
    SweepGradientPosition,
};

pub use peniko::{Extend, ImageQuality};

use crate::image::{AlphaMode, ImageBuffer};
use crate::transform::{FnTransform, transform_brush};

/// One color of a gradient ramp.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the ramp, in `[0, 1]` once sorted.
    pub offset: f32,
    /// Straight-alpha color.
    pub color: Color,
}

impl GradientStop {
    /// Creates a stop.
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// An image used as a paint source.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBrush {
    /// The pixels.
    pub image: ImageBuffer,
    /// Horizontal tiling outside the image.
    pub x_extend: Extend,
    /// Vertical tiling outside the image.
    pub y_extend: Extend,
    /// Sampling filter.
    pub quality: ImageQuality,
    /// Opacity multiplier.
    pub alpha: f32,
    /// Image space to paint space, applied before the draw transform.
    pub transform: Option<Affine>,
}

impl ImageBrush {
    /// An untiled, fully opaque image brush.
    pub fn new(image: ImageBuffer) -> Self {
        Self {
            image,
            x_extend: Extend::Pad,
            y_extend: Extend::Pad,
            quality: ImageQuality::Medium,
            alpha: 1.0,
            transform: None,
        }
    }

    /// Builder method for setting both extend modes.
    #[must_use]
    pub fn with_extend(mut self, extend: Extend) -> Self {
        self.x_extend = extend;
        self.y_extend = extend;
        self
    }

    /// Builder method for setting the sampling quality.
    #[must_use]
    pub fn with_quality(mut self, quality: ImageQuality) -> Self {
        self.quality = quality;
        self
    }

    /// Converts to a renderer image brush with tightly packed RGBA pixels.
    pub fn to_peniko(&self) -> peniko::ImageBrush {
        let (data, alpha_type) = match self.image.alpha_mode() {
            AlphaMode::Premultiplied => (
                self.image.to_rgba8_premultiplied(),
                ImageAlphaType::AlphaPremultiplied,
            ),
            AlphaMode::Straight | AlphaMode::Opaque => {
                (self.image.to_rgba8_straight(), ImageAlphaType::Alpha)
            }
        };
        peniko::ImageBrush {
            image: ImageData {
                data: Blob::from(data),
                format: ImageFormat::Rgba8,
                alpha_type,
                width: self.image.width(),
                height: self.image.height(),
            },
            sampler: ImageSampler {
                x_extend: self.x_extend,
                y_extend: self.y_extend,
                quality: self.quality,
                alpha: self.alpha,
            },
        }
    }
}

/// A closed set of paint sources.
///
/// Brushes are values: color filters build new brushes instead of changing
/// an existing one.
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    /// A single color.
    Solid(Color),
    /// Colors varying along the line from `start` to `end`.
    LinearGradient {
        /// Point at offset 0.
        start: Point,
        /// Point at offset 1.
        end: Point,
        /// Color ramp, in producer order.
        stops: Vec<GradientStop>,
        /// Behavior outside `[0, 1]`.
        extend: Extend,
    },
    /// Colors varying between two circles.
    RadialGradient {
        /// Center of the offset 0 circle.
        start_center: Point,
        /// Radius of the offset 0 circle.
        start_radius: f32,
        /// Center of the offset 1 circle.
        end_center: Point,
        /// Radius of the offset 1 circle.
        end_radius: f32,
        /// Color ramp, in producer order.
        stops: Vec<GradientStop>,
        /// Behavior outside `[0, 1]`.
        extend: Extend,
    },
    /// Colors varying with the angle around a center.
    SweepGradient {
        /// Center of rotation.
        center: Point,
        /// Angle of offset 0, in radians.
        start_angle: f32,
        /// Angle of offset 1, in radians.
        end_angle: f32,
        /// Color ramp, in producer order.
        stops: Vec<GradientStop>,
        /// Behavior outside `[0, 1]`.
        extend: Extend,
    },
    /// Pixels from an image.
    Image(ImageBrush),
}

impl Default for Brush {
    fn default() -> Self {
        Self::Solid(Color::BLACK)
    }
}

impl From<Color> for Brush {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

impl Brush {
    /// The gradient stops, if this is a gradient.
    pub fn stops(&self) -> Option<&[GradientStop]> {
        match self {
            Self::LinearGradient { stops, .. }
            | Self::RadialGradient { stops, .. }
            | Self::SweepGradient { stops, .. } => Some(stops),
            Self::Solid(_) | Self::Image(_) => None,
        }
    }

    /// The gradient stops as a monotonic ramp: stably sorted by offset and
    /// clamped into `[0, 1]`. A NaN offset is treated as 0.
    pub fn sorted_stops(&self) -> Vec<GradientStop> {
        let mut stops: Vec<GradientStop> = self
            .stops()
            .unwrap_or_default()
            .iter()
            .map(|s| {
                let offset = if s.offset.is_nan() {
                    0.0
                } else {
                    s.offset.clamp(0.0, 1.0)
                };
                GradientStop::new(offset, s.color)
            })
            .collect();
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        stops
    }

    /// Returns a copy with every color's alpha scaled by `alpha`.
    #[must_use]
    pub fn multiply_alpha(&self, alpha: f32) -> Self {
        if alpha == 1.0 {
            return self.clone();
        }
        match self {
            Self::Image(image) => {
                let mut image = image.clone();
                image.alpha *= alpha;
                Self::Image(image)
            }
            _ => transform_brush(self, &FnTransform(|c: Color| c.multiply_alpha(alpha))),
        }
    }

    /// Returns `true` if painting with this brush changes nothing.
    pub fn is_transparent(&self) -> bool {
        match self {
            Self::Solid(c) => c.components[3] <= 0.0,
            Self::Image(image) => image.alpha <= 0.0,
            _ => self
                .stops()
                .is_some_and(|stops| stops.iter().all(|s| s.color.components[3] <= 0.0)),
        }
    }

    /// Lowers the brush to a renderer brush.
    ///
    /// Gradients with a single stop become that solid color, and gradients
    /// without stops become transparent.
    pub fn to_peniko(&self) -> peniko::Brush {
        let (kind, extend) = match self {
            Self::Solid(color) => return peniko::Brush::Solid(*color),
            Self::Image(image) => return peniko::Brush::Image(image.to_peniko()),
            Self::LinearGradient {
                start, end, extend, ..
            } => (
                GradientKind::Linear(LinearGradientPosition::new(*start, *end)),
                *extend,
            ),
            Self::RadialGradient {
                start_center,
                start_radius,
                end_center,
                end_radius,
                extend,
                ..
            } => (
                GradientKind::Radial(RadialGradientPosition::new_two_point(
                    *start_center,
                    *start_radius,
                    *end_center,
                    *end_radius,
                )),
                *extend,
            ),
            Self::SweepGradient {
                center,
                start_angle,
                end_angle,
                extend,
                ..
            } => (
                GradientKind::Sweep(SweepGradientPosition::new(
                    *center,
                    *start_angle,
                    *end_angle,
                )),
                *extend,
            ),
        };
        let sorted = self.sorted_stops();
        match sorted.as_slice() {
            [] => peniko::Brush::Solid(Color::TRANSPARENT),
            [only] => peniko::Brush::Solid(only.color),
            stops => {
                let stops: Vec<ColorStop> = stops
                    .iter()
                    .map(|s| ColorStop::from((s.offset, s.color)))
                    .collect();
                peniko::Brush::Gradient(Gradient {
                    kind,
                    extend,
                    stops: ColorStops::from(stops.as_slice()),
                    ..Gradient::default()
                })
            }
        }
    }
}
