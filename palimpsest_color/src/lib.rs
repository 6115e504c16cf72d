// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=palimpsest_color --heading-base-level=0

//! Palimpsest Color: brushes and the color/blend compositor.
//!
//! A [`Brush`] is a closed set of paint sources (solid color, linear, radial
//! and sweep gradients, images). Color filters never mutate a brush; they
//! build a new one by pushing every color through a [`ColorTransform`]:
//!
//! - a solid color is transformed directly,
//! - each gradient stop is transformed independently,
//! - each pixel of an [`ImageBuffer`] is unpremultiplied, transformed, clamped
//!   and premultiplied again.
//!
//! Two transforms are provided: [`ColorMatrix`], a 4×5 matrix over straight
//! RGBA, and [`BlendColor`], which composites a fixed color with one of the
//! twelve [`PorterDuff`] operators.
//!
//! ## Example
//!
//! ```rust
//! use palimpsest_color::{Brush, Color, ColorMatrix, transform_brush};
//!
//! let brush = Brush::Solid(Color::new([1.0, 0.0, 0.0, 1.0]));
//! let gray = transform_brush(&brush, &ColorMatrix::saturation(0.0));
//! let Brush::Solid(c) = gray else { unreachable!() };
//! assert_eq!(c.components[0], c.components[1]);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod blend;
mod brush;
mod error;
mod filter;
mod image;
mod matrix;
mod transform;

pub use blend::PorterDuff;
pub use brush::{Brush, Extend, GradientStop, ImageBrush, ImageQuality};
pub use error::ColorError;
pub use filter::ColorFilter;
pub use image::{AlphaMode, ImageBuffer, PixelFormat};
pub use matrix::ColorMatrix;
pub use transform::{
    BlendColor, ColorTransform, ComposedTransform, FnTransform, transform_brush, transform_image,
    transform_stops,
};

pub use peniko::Color;
