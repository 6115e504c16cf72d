// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=palimpsest_canvas_vello --heading-base-level=0

//! Vello renderer for `palimpsest_canvas`.
//!
//! This crate implements [`SceneRenderer`] on top of a Vello [`vello::Scene`],
//! so a [`Canvas`](palimpsest_canvas::Canvas) can draw straight into a scene.
//!
//! ## Notes
//!
//! - This renderer only encodes scene commands; your application is still
//!   responsible for rendering the resulting [`vello::Scene`] using Vello’s
//!   renderer.
//! - Fonts are resources owned by the renderer: register the font data with
//!   [`VelloSceneRenderer::register_font`] and refer to it by the returned
//!   [`FontId`]. Glyph runs naming an unknown or released font are skipped.
//! - Vello clip layers are always non-zero. The canvas only pushes non-zero
//!   clips; even-odd layers from other callers are rewritten with
//!   [`to_unit_winding`](palimpsest_path::to_unit_winding), which is exact
//!   unless contours cross.
//! - Dashed strokes are dashed on the CPU at the renderer's resolution scale
//!   (see [`VelloSceneRenderer::with_resolution_scale`]).

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use kurbo::Affine;
use palimpsest_canvas::{FontId, GlyphRun, LayerBlend, LayerDesc, SceneRenderer};
use palimpsest_color::{Brush, ImageBrush};
use palimpsest_path::{FillRule, Path, PathDirection, StrokeStyle, dash_path, to_unit_winding};
use vello::Scene;
use vello::peniko::{self, Fill, FontData};

/// Vello-backed scene renderer that draws into a Vello [`Scene`].
pub struct VelloSceneRenderer<'s> {
    /// Underlying Vello scene to draw into.
    pub scene: &'s mut Scene,
    fonts: Vec<Option<FontData>>,
    layers: Vec<LayerBlend>,
    res_scale: f64,
}

impl fmt::Debug for VelloSceneRenderer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VelloSceneRenderer { .. }")
    }
}

impl<'s> VelloSceneRenderer<'s> {
    /// Create a new renderer that draws into the given scene.
    pub fn new(scene: &'s mut Scene) -> Self {
        Self {
            scene,
            fonts: Vec::new(),
            layers: Vec::new(),
            res_scale: 1.0,
        }
    }

    /// Sets the resolution scale curves are flattened at before dashing.
    #[must_use]
    pub fn with_resolution_scale(mut self, res_scale: f64) -> Self {
        self.res_scale = res_scale;
        self
    }

    /// Takes ownership of font data and returns its handle.
    pub fn register_font(&mut self, font: FontData) -> FontId {
        let id = u32::try_from(self.fonts.len())
            .expect("VelloSceneRenderer: too many fonts for u32 FontId");
        self.fonts.push(Some(font));
        FontId(id)
    }

    /// Drops a registered font. Releasing an unknown or released font does nothing.
    pub fn release_font(&mut self, id: FontId) {
        let idx = id.0 as usize;
        if let Some(slot) = self.fonts.get_mut(idx) {
            *slot = None;
        }
    }

    /// The font registered under `id`, unless released.
    pub fn font(&self, id: FontId) -> Option<&FontData> {
        self.fonts.get(id.0 as usize)?.as_ref()
    }

    /// Number of layers currently open.
    pub fn layer_depth(&self) -> usize {
        self.layers.len()
    }
}

fn to_fill(rule: FillRule) -> Fill {
    if rule.is_even_odd() {
        Fill::EvenOdd
    } else {
        Fill::NonZero
    }
}

fn brush_transform(brush: &Brush) -> Option<Affine> {
    match brush {
        Brush::Image(image) => image.transform,
        _ => None,
    }
}

impl SceneRenderer for VelloSceneRenderer<'_> {
    fn fill_path(&mut self, path: &Path, fill_rule: FillRule, transform: Affine, brush: &Brush) {
        let shape = path.to_bez_path();
        self.scene.fill(
            to_fill(fill_rule),
            transform,
            &brush.to_peniko(),
            brush_transform(brush),
            &shape,
        );
    }

    fn stroke_path(&mut self, path: &Path, style: &StrokeStyle, transform: Affine, brush: &Brush) {
        // Dash here so the intervals follow the same arc-length walk as fills.
        let shape = match &style.dash {
            Some(pattern) => dash_path(path, pattern, self.res_scale).to_bez_path(),
            None => path.to_bez_path(),
        };
        self.scene.stroke(
            &style.to_kurbo(),
            transform,
            &brush.to_peniko(),
            brush_transform(brush),
            &shape,
        );
    }

    fn push_layer(&mut self, layer: &LayerDesc) {
        let clip = if layer.fill_rule.is_even_odd() {
            let mut even_odd = layer.clip.clone();
            even_odd.set_fill_rule(layer.fill_rule.base());
            to_unit_winding(&even_odd, PathDirection::Clockwise, self.res_scale).to_bez_path()
        } else {
            layer.clip.to_bez_path()
        };
        match layer.blend {
            LayerBlend::Clip => self.scene.push_clip_layer(layer.transform, &clip),
            LayerBlend::Blend(mode) => self.scene.push_layer(
                mode.to_peniko(),
                layer.alpha.clamp(0.0, 1.0),
                layer.transform,
                &clip,
            ),
        }
        self.layers.push(layer.blend);
    }

    fn pop_layer(&mut self) {
        match self.layers.pop() {
            Some(_) => self.scene.pop_layer(),
            None => panic!("pop_layer with no open layer"),
        }
    }

    fn draw_image(&mut self, brush: &ImageBrush, transform: Affine) {
        let owned = brush.to_peniko();
        let transform = transform * brush.transform.unwrap_or(Affine::IDENTITY);
        let image = peniko::ImageBrush {
            image: &owned.image,
            sampler: owned.sampler,
        };
        self.scene.draw_image(image, transform);
    }

    fn draw_glyph_run(&mut self, run: &GlyphRun) {
        let Some(font) = self.fonts.get(run.font.0 as usize).and_then(Option::as_ref) else {
            tracing::debug!(font = run.font.0, "glyph run for an unknown font skipped");
            return;
        };
        let brush = run.brush.to_peniko();
        self.scene
            .draw_glyphs(font)
            .font_size(run.font_size)
            .transform(run.transform)
            .brush(&brush)
            .draw(
                Fill::NonZero,
                run.glyphs.iter().map(|g| vello::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }),
            );
    }

    fn reset(&mut self) {
        self.scene.reset();
        self.layers.clear();
    }
}
