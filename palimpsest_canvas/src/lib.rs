// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=palimpsest_canvas --heading-base-level=0

//! Palimpsest Canvas: an immediate-mode canvas over a retained scene renderer.
//!
//! A [`Canvas`] keeps the state an immediate-mode drawing API expects (a
//! current transform, a clip and a save stack) and lowers every call onto a
//! [`SceneRenderer`], whose only primitives are filled or stroked paths,
//! images, glyph runs and nested layers.
//!
//! - Clips become clip layers. Difference clips and inverse even-odd fills are
//!   emulated with a canvas-covering rectangle holding the shape as a hole.
//! - Saved layers become blend layers with the paint's opacity.
//! - Each save-stack entry records the layer depth at the time of the save, so
//!   [`Canvas::restore`] pops exactly the layers opened since, and dropping
//!   the canvas leaves the renderer balanced.
//! - A [`Paint`] is resolved to a plain [`Brush`](palimpsest_color::Brush)
//!   before it reaches the renderer: color filters and opacity are applied to
//!   the brush, dashed strokes are expanded into fills.
//!
//! Operations with no reasonable emulation report
//! [`CanvasError::NotImplemented`] instead of drawing something different.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use palimpsest_canvas::{Canvas, CanvasConfig, ClipOperation, Paint, RenderCommand};
//! use palimpsest_canvas_ref::RecordingRenderer;
//! use palimpsest_color::Color;
//!
//! let mut renderer = RecordingRenderer::new();
//! {
//!     let mut canvas = Canvas::new(&mut renderer, CanvasConfig::new(64, 64));
//!     canvas.save();
//!     canvas
//!         .clip_rect(Rect::new(8.0, 8.0, 32.0, 32.0), ClipOperation::Intersect, true)
//!         .unwrap();
//!     canvas
//!         .draw_rect(Rect::new(0.0, 0.0, 64.0, 64.0), &Paint::new(Color::WHITE))
//!         .unwrap();
//!     canvas.restore();
//!     assert_eq!(canvas.layer_depth(), 0);
//! }
//! assert!(matches!(renderer.commands()[0], RenderCommand::PushLayer(_)));
//! assert_eq!(renderer.layer_depth(), 0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod canvas;
mod config;
mod error;
mod font;
mod paint;
mod renderer;

pub use canvas::{Canvas, ClipOperation, PointMode};
pub use config::{CanvasConfig, UNSIZED_DEVICE_EXTENT};
pub use error::CanvasError;
pub use font::{
    DEFAULT_FONT_CACHE_LIMIT, Font, FontCache, FontMetrics, GlyphMetrics, TextSpan,
};
pub use paint::{Paint, PaintStyle};
pub use renderer::{
    FontId, GlyphRun, LayerBlend, LayerDesc, PositionedGlyph, RenderCommand, SceneRenderer,
    replay,
};
