// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The retained scene renderer a [`Canvas`](crate::Canvas) draws into.

use alloc::vec::Vec;

use kurbo::Affine;
use palimpsest_color::{Brush, ImageBrush, PorterDuff};
use palimpsest_path::{FillRule, Path, StrokeStyle};

/// Identifier for a font resource owned by the renderer.
///
/// This is a small, opaque handle; the renderer decides what it refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(pub u32);

/// How a pushed layer is composited into its parent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayerBlend {
    /// The layer only clips; contents draw straight into the parent.
    Clip,
    /// The layer is isolated and composited with the given operator.
    Blend(PorterDuff),
}

/// Parameters of a pushed layer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerDesc {
    /// Shape outside of which the layer contents are discarded.
    pub clip: Path,
    /// Rule deciding the inside of `clip`.
    pub fill_rule: FillRule,
    /// Compositing of the layer.
    pub blend: LayerBlend,
    /// Transform applied to `clip`.
    pub transform: Affine,
    /// Opacity applied when compositing, in `[0, 1]`.
    pub alpha: f32,
}

impl LayerDesc {
    /// A clip-only layer.
    pub fn clip(clip: Path, fill_rule: FillRule, transform: Affine) -> Self {
        Self {
            clip,
            fill_rule,
            blend: LayerBlend::Clip,
            transform,
            alpha: 1.0,
        }
    }

    /// Returns `true` if the layer only clips.
    #[inline]
    pub fn is_clip(&self) -> bool {
        self.blend == LayerBlend::Clip
    }
}

/// A glyph and its pen position relative to the run origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionedGlyph {
    /// Glyph index in the font.
    pub id: u32,
    /// Horizontal offset.
    pub x: f32,
    /// Vertical offset.
    pub y: f32,
}

/// A sequence of glyphs sharing a font, size and brush.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRun {
    /// Font the glyph indices refer to.
    pub font: FontId,
    /// Font size in local units.
    pub font_size: f32,
    /// Positioned glyphs, in drawing order.
    pub glyphs: Vec<PositionedGlyph>,
    /// Run space to device space; the run origin is the baseline start.
    pub transform: Affine,
    /// Glyph fill.
    pub brush: Brush,
}

/// A retained renderer the canvas lowers its operations onto.
///
/// Every argument is already resolved: paths carry no inverse fill rules,
/// brushes have color filters and opacity applied, and strokes are either
/// native or already expanded into fills. Implementations must keep layers
/// strictly nested; the canvas never pops a layer it did not push.
pub trait SceneRenderer {
    /// Fills `path` with `brush`.
    fn fill_path(&mut self, path: &Path, fill_rule: FillRule, transform: Affine, brush: &Brush);

    /// Strokes `path` with `brush`. A zero width is never passed.
    fn stroke_path(&mut self, path: &Path, style: &StrokeStyle, transform: Affine, brush: &Brush);

    /// Opens a layer.
    fn push_layer(&mut self, layer: &LayerDesc);

    /// Closes the most recently opened layer.
    fn pop_layer(&mut self);

    /// Draws an image, mapping image pixels through `transform`.
    fn draw_image(&mut self, brush: &ImageBrush, transform: Affine);

    /// Draws a glyph run.
    fn draw_glyph_run(&mut self, run: &GlyphRun);

    /// Discards everything drawn so far.
    fn reset(&mut self);
}

/// One renderer call, as data.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCommand {
    /// [`SceneRenderer::fill_path`].
    FillPath {
        /// Shape to fill.
        path: Path,
        /// Inside rule.
        fill_rule: FillRule,
        /// Local to device transform.
        transform: Affine,
        /// Fill.
        brush: Brush,
    },
    /// [`SceneRenderer::stroke_path`].
    StrokePath {
        /// Shape to stroke.
        path: Path,
        /// Stroke parameters.
        style: StrokeStyle,
        /// Local to device transform.
        transform: Affine,
        /// Fill of the stroke.
        brush: Brush,
    },
    /// [`SceneRenderer::push_layer`].
    PushLayer(LayerDesc),
    /// [`SceneRenderer::pop_layer`].
    PopLayer,
    /// [`SceneRenderer::draw_image`].
    DrawImage {
        /// Image and sampling.
        brush: ImageBrush,
        /// Image to device transform.
        transform: Affine,
    },
    /// [`SceneRenderer::draw_glyph_run`].
    DrawGlyphRun(GlyphRun),
    /// [`SceneRenderer::reset`].
    Reset,
}

impl RenderCommand {
    /// Issues this command against `renderer`.
    pub fn apply<R: SceneRenderer + ?Sized>(&self, renderer: &mut R) {
        match self {
            Self::FillPath {
                path,
                fill_rule,
                transform,
                brush,
            } => renderer.fill_path(path, *fill_rule, *transform, brush),
            Self::StrokePath {
                path,
                style,
                transform,
                brush,
            } => renderer.stroke_path(path, style, *transform, brush),
            Self::PushLayer(layer) => renderer.push_layer(layer),
            Self::PopLayer => renderer.pop_layer(),
            Self::DrawImage { brush, transform } => renderer.draw_image(brush, *transform),
            Self::DrawGlyphRun(run) => renderer.draw_glyph_run(run),
            Self::Reset => renderer.reset(),
        }
    }
}

/// Issues every command in order, for example to move a recording into
/// another renderer.
pub fn replay<R: SceneRenderer + ?Sized>(commands: &[RenderCommand], renderer: &mut R) {
    for command in commands {
        command.apply(renderer);
    }
}
