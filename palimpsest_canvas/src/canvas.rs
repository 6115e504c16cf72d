// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The canvas state machine.

use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Rect};
use palimpsest_color::{
    Brush, Color, ImageBrush, ImageBuffer, ImageQuality, PorterDuff, transform_image,
};
use palimpsest_path::{
    Cap, FillRule, Path, PathDirection, RoundRect, StrokeStyle, dash_path, fill_path_for_stroke,
    to_unit_winding,
};
use palimpsest_region::{IRect, Region};

use crate::config::CanvasConfig;
use crate::error::CanvasError;
use crate::font::{FontCache, TextSpan};
use crate::paint::{Paint, PaintStyle};
use crate::renderer::{GlyphRun, LayerBlend, LayerDesc, PositionedGlyph, SceneRenderer};

/// How a clip shape combines with the current clip.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClipOperation {
    /// Keep only what is inside the shape.
    #[default]
    Intersect,
    /// Keep only what is outside the shape.
    Difference,
}

/// How [`Canvas::draw_points`] interprets its points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointMode {
    /// Each point is a dot shaped by the stroke cap.
    Points,
    /// Each pair of points is a line segment.
    Lines,
    /// The points form one open polyline.
    Polygon,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct SaveState {
    transform: Affine,
    layer_depth: usize,
    clip_bounds: Rect,
}

/// An immediate-mode canvas drawing into a [`SceneRenderer`].
///
/// The canvas owns a transform, a conservative device clip bound and a save
/// stack. Clips and saved layers become renderer layers; each save-stack
/// entry remembers how many layers were open when it was pushed, so
/// [`restore`](Self::restore) pops exactly the layers opened since, whatever
/// mix of clips and layers that was.
///
/// The renderer is borrowed exclusively. Dropping the canvas restores to a
/// save count of one and pops every remaining layer, so the renderer is left
/// balanced.
pub struct Canvas<'r, R: SceneRenderer> {
    renderer: &'r mut R,
    config: CanvasConfig,
    transform: Affine,
    clip_bounds: Rect,
    layer_depth: usize,
    stack: Vec<SaveState>,
}

impl<R: SceneRenderer> fmt::Debug for Canvas<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("config", &self.config)
            .field("transform", &self.transform)
            .field("clip_bounds", &self.clip_bounds)
            .field("layer_depth", &self.layer_depth)
            .field("save_count", &self.save_count())
            .finish_non_exhaustive()
    }
}

impl<'r, R: SceneRenderer> Canvas<'r, R> {
    /// Creates a canvas drawing into `renderer`.
    pub fn new(renderer: &'r mut R, config: CanvasConfig) -> Self {
        Self {
            renderer,
            config,
            transform: Affine::IDENTITY,
            clip_bounds: config.device_rect(),
            layer_depth: 0,
            stack: Vec::new(),
        }
    }

    /// The configuration.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// The renderer being drawn into.
    pub fn renderer(&self) -> &R {
        &*self.renderer
    }

    // --- Matrix ---

    /// Pre-concatenates a translation.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.transform *= Affine::translate((dx, dy));
    }

    /// Pre-concatenates a scale.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.transform *= Affine::scale_non_uniform(sx, sy);
    }

    /// Pre-concatenates a rotation about the origin, in degrees.
    pub fn rotate_degrees(&mut self, degrees: f64) {
        self.transform *= Affine::rotate(degrees.to_radians());
    }

    /// Pre-concatenates a skew.
    pub fn skew(&mut self, sx: f64, sy: f64) {
        self.transform *= Affine::skew(sx, sy);
    }

    /// Pre-concatenates `matrix`.
    pub fn concat(&mut self, matrix: Affine) {
        self.transform *= matrix;
    }

    /// Replaces the transform.
    pub fn set_matrix(&mut self, matrix: Affine) {
        self.transform = matrix;
    }

    /// Resets the transform to identity.
    pub fn reset_matrix(&mut self) {
        self.transform = Affine::IDENTITY;
    }

    /// Local to device transform.
    pub fn total_matrix(&self) -> Affine {
        self.transform
    }

    // --- Save stack ---

    /// Number of save-stack entries plus one.
    pub fn save_count(&self) -> usize {
        self.stack.len() + 1
    }

    /// Number of renderer layers currently open.
    pub fn layer_depth(&self) -> usize {
        self.layer_depth
    }

    /// Pushes the transform and clip; returns the save count before the push.
    pub fn save(&mut self) -> usize {
        let count = self.save_count();
        self.stack.push(SaveState {
            transform: self.transform,
            layer_depth: self.layer_depth,
            clip_bounds: self.clip_bounds,
        });
        count
    }

    /// Saves, then opens an isolated layer.
    ///
    /// The layer is bounded by `bounds` (local coordinates) or covers the
    /// device. Its opacity is the paint's [`layer_alpha`](Paint::layer_alpha)
    /// and it is composited with the paint's blend mode. Returns the save
    /// count before the call.
    pub fn save_layer(
        &mut self,
        bounds: Option<Rect>,
        paint: Option<&Paint>,
    ) -> Result<usize, CanvasError> {
        if let Some(paint) = paint {
            paint.validate()?;
            if paint.color_filter.is_some() {
                return Err(CanvasError::NotImplemented("save_layer with a color filter"));
            }
        }
        let count = self.save();
        let clip = match bounds {
            Some(rect) => {
                self.intersect_clip_bounds(rect.abs());
                Path::from_rect(rect.abs())
            }
            None => self.covering_path(),
        };
        let layer = LayerDesc {
            clip,
            fill_rule: FillRule::NonZero,
            blend: LayerBlend::Blend(paint.map_or(PorterDuff::SrcOver, |p| p.blend_mode)),
            transform: self.transform,
            alpha: paint.map_or(1.0, Paint::layer_alpha),
        };
        self.push_layer(&layer);
        Ok(count)
    }

    /// Saves, then opens a layer with the given 8-bit opacity.
    pub fn save_layer_alpha(&mut self, bounds: Option<Rect>, alpha: u8) -> usize {
        let count = self.save();
        let clip = match bounds {
            Some(rect) => {
                self.intersect_clip_bounds(rect.abs());
                Path::from_rect(rect.abs())
            }
            None => self.covering_path(),
        };
        self.push_layer(&LayerDesc {
            clip,
            fill_rule: FillRule::NonZero,
            blend: LayerBlend::Blend(PorterDuff::SrcOver),
            transform: self.transform,
            alpha: f32::from(alpha) / 255.0,
        });
        count
    }

    /// Pops the save stack, closing every layer opened since the matching save.
    ///
    /// Restoring with nothing saved does nothing.
    pub fn restore(&mut self) {
        let Some(state) = self.stack.pop() else {
            tracing::debug!("restore with an empty save stack ignored");
            return;
        };
        self.pop_layers_to(state.layer_depth);
        self.transform = state.transform;
        self.clip_bounds = state.clip_bounds;
    }

    /// Restores until the save count is `count` (at least one).
    pub fn restore_to_count(&mut self, count: usize) {
        let count = count.max(1);
        while self.save_count() > count {
            self.restore();
        }
    }

    fn push_layer(&mut self, layer: &LayerDesc) {
        self.renderer.push_layer(layer);
        self.layer_depth += 1;
        tracing::trace!(depth = self.layer_depth, blend = ?layer.blend, "layer pushed");
    }

    fn pop_layers_to(&mut self, depth: usize) {
        while self.layer_depth > depth {
            self.renderer.pop_layer();
            self.layer_depth -= 1;
            tracing::trace!(depth = self.layer_depth, "layer popped");
        }
    }

    // --- Clipping ---

    /// Clips to a rectangle.
    pub fn clip_rect(
        &mut self,
        rect: Rect,
        op: ClipOperation,
        anti_alias: bool,
    ) -> Result<(), CanvasError> {
        self.clip_path(&Path::from_rect(rect.abs()), op, anti_alias)
    }

    /// Clips to a rounded rectangle.
    pub fn clip_round_rect(
        &mut self,
        rrect: &RoundRect,
        op: ClipOperation,
        anti_alias: bool,
    ) -> Result<(), CanvasError> {
        self.clip_path(&rrect.to_path(), op, anti_alias)
    }

    /// Clips to a path, honoring its fill rule.
    ///
    /// Clip layers are always pushed with [`FillRule::NonZero`]. Even-odd
    /// paths are rewritten to wind once over the area they fill, and a
    /// difference clip is a canvas-covering rectangle with that area wound
    /// the other way as a hole. The rewrite is exact as long as the path's
    /// contours do not cross each other. Inverse even-odd paths are emulated
    /// as a difference; inverse non-zero paths are not supported.
    pub fn clip_path(
        &mut self,
        path: &Path,
        op: ClipOperation,
        anti_alias: bool,
    ) -> Result<(), CanvasError> {
        let mut rule = path.fill_rule();
        let mut op = op;
        // Removing the outside of a path keeps its inside.
        if rule.is_inverse() && op == ClipOperation::Difference {
            rule = rule.base();
            op = ClipOperation::Intersect;
        }
        let res_scale = self.config.resolution_scale;
        let clip = match (op, rule) {
            (_, FillRule::InverseNonZero) => {
                return Err(CanvasError::NotImplemented("clip to an inverse non-zero path"));
            }
            (ClipOperation::Intersect, FillRule::NonZero) => {
                self.intersect_clip_bounds(path.bounds());
                path.clone()
            }
            (ClipOperation::Intersect, FillRule::EvenOdd) => {
                self.intersect_clip_bounds(path.bounds());
                to_unit_winding(path, PathDirection::Clockwise, res_scale)
            }
            (ClipOperation::Difference, _) | (_, FillRule::InverseEvenOdd) => {
                let mut covering = self.covering_path();
                let hole = to_unit_winding(path, PathDirection::CounterClockwise, res_scale);
                covering.add_path(&hole, &Affine::IDENTITY);
                covering
            }
        };
        self.push_layer(&LayerDesc::clip(clip, FillRule::NonZero, self.transform));
        tracing::trace!(?op, anti_alias, "clip applied");
        Ok(())
    }

    /// Clips to a region given in device pixels.
    ///
    /// The region's rectangles become clockwise contours of one path, or
    /// counter-clockwise holes in a device-covering rectangle for a
    /// difference; an empty region intersected clips everything.
    pub fn clip_region(&mut self, region: &Region, op: ClipOperation) -> Result<(), CanvasError> {
        let clip = match op {
            ClipOperation::Intersect => {
                let device = irect_to_rect(region.bounds());
                self.clip_bounds = self.clip_bounds.intersect(device);
                region_path(region)
            }
            ClipOperation::Difference => {
                let mut covering = Path::new();
                covering.add_rect(self.config.device_rect(), PathDirection::Clockwise);
                for r in region {
                    covering.add_rect(irect_to_rect(*r), PathDirection::CounterClockwise);
                }
                covering
            }
        };
        self.push_layer(&LayerDesc::clip(clip, FillRule::NonZero, Affine::IDENTITY));
        Ok(())
    }

    /// Clipping to a shader has no layer equivalent.
    pub fn clip_shader(&mut self, _shader: &Brush, _op: ClipOperation) -> Result<(), CanvasError> {
        Err(CanvasError::NotImplemented("clip_shader"))
    }

    /// Conservative bounds of the clip, in whole device pixels.
    pub fn device_clip_bounds(&self) -> IRect {
        if self.clip_is_empty() {
            return IRect::EMPTY;
        }
        let r = self.clip_bounds.expand();
        IRect::new(to_i32(r.x0), to_i32(r.y0), to_i32(r.x1), to_i32(r.y1))
    }

    /// Conservative bounds of the clip, in local coordinates.
    pub fn local_clip_bounds(&self) -> Rect {
        if self.clip_is_empty() || !is_invertible(&self.transform) {
            return Rect::ZERO;
        }
        self.transform.inverse().transform_rect_bbox(self.clip_bounds)
    }

    /// Returns `true` if `rect` (local coordinates) certainly draws nothing.
    pub fn quick_reject(&self, rect: Rect) -> bool {
        let device = self.transform.transform_rect_bbox(rect.abs());
        if self.clip_is_empty() || !device.is_finite() {
            return true;
        }
        let clip = self.clip_bounds;
        !(device.x0 < clip.x1 && device.x1 > clip.x0 && device.y0 < clip.y1 && device.y1 > clip.y0)
    }

    fn clip_is_empty(&self) -> bool {
        self.clip_bounds.width() <= 0.0 || self.clip_bounds.height() <= 0.0
    }

    fn intersect_clip_bounds(&mut self, local: Rect) {
        let device = self.transform.transform_rect_bbox(local);
        self.clip_bounds = self.clip_bounds.intersect(device);
    }

    /// The device area in local coordinates.
    fn covering_rect(&self) -> Rect {
        let device = self.config.device_rect();
        if is_invertible(&self.transform) {
            self.transform.inverse().transform_rect_bbox(device)
        } else {
            device
        }
    }

    fn covering_path(&self) -> Path {
        Path::from_rect(self.covering_rect())
    }

    // --- Drawing ---

    /// Fills the whole clip with `paint`, whatever its style.
    pub fn draw_paint(&mut self, paint: &Paint) -> Result<(), CanvasError> {
        paint.validate()?;
        let brush = paint.resolve_brush();
        let covering = self.covering_path();
        let pushed = self.begin_blend(paint.blend_mode);
        self.renderer
            .fill_path(&covering, FillRule::NonZero, self.transform, &brush);
        self.end_blend(pushed);
        Ok(())
    }

    /// Fills the whole clip with `color` composited with `mode`.
    pub fn draw_color(&mut self, color: Color, mode: PorterDuff) -> Result<(), CanvasError> {
        self.draw_paint(&Paint::new(color).with_blend_mode(mode))
    }

    /// Replaces every pixel inside the clip with `color`.
    ///
    /// With no layer open and an identity transform the renderer is reset
    /// outright. Otherwise the device is painted over; translucent colors go
    /// through a copy-compose layer so covered pixels are replaced rather
    /// than blended.
    #[tracing::instrument(skip_all, fields(depth = self.layer_depth))]
    pub fn clear(&mut self, color: Color) {
        let device = Path::from_rect(self.config.device_rect());
        let brush = Brush::Solid(color);
        let alpha = color.components[3];
        if self.layer_depth == 0 && self.transform == Affine::IDENTITY {
            self.renderer.reset();
            if alpha > 0.0 {
                self.renderer
                    .fill_path(&device, FillRule::NonZero, Affine::IDENTITY, &brush);
            }
            return;
        }
        if alpha < 1.0 {
            self.push_layer(&LayerDesc {
                clip: device.clone(),
                fill_rule: FillRule::NonZero,
                blend: LayerBlend::Blend(PorterDuff::Src),
                transform: Affine::IDENTITY,
                alpha: 1.0,
            });
            self.renderer
                .fill_path(&device, FillRule::NonZero, Affine::IDENTITY, &brush);
            self.pop_layers_to(self.layer_depth - 1);
        } else {
            self.renderer
                .fill_path(&device, FillRule::NonZero, Affine::IDENTITY, &brush);
        }
    }

    /// Draws a rectangle.
    pub fn draw_rect(&mut self, rect: Rect, paint: &Paint) -> Result<(), CanvasError> {
        self.draw_path(&Path::from_rect(rect.abs()), paint)
    }

    /// Draws an oval inscribed in `rect`.
    pub fn draw_oval(&mut self, rect: Rect, paint: &Paint) -> Result<(), CanvasError> {
        self.draw_path(&Path::from_oval(rect), paint)
    }

    /// Draws a circle.
    pub fn draw_circle(
        &mut self,
        center: Point,
        radius: f64,
        paint: &Paint,
    ) -> Result<(), CanvasError> {
        let mut path = Path::new();
        path.add_circle(center, radius, PathDirection::Clockwise);
        self.draw_path(&path, paint)
    }

    /// Draws a rounded rectangle.
    pub fn draw_round_rect(&mut self, rrect: &RoundRect, paint: &Paint) -> Result<(), CanvasError> {
        self.draw_path(&rrect.to_path(), paint)
    }

    /// Strokes a line segment, whatever the paint style.
    pub fn draw_line(&mut self, p0: Point, p1: Point, paint: &Paint) -> Result<(), CanvasError> {
        let mut path = Path::new();
        path.move_to(p0);
        path.line_to(p1);
        self.draw_path(&path, &stroking(paint))
    }

    /// Draws points, segments or a polyline.
    ///
    /// Dots are squares, or circles with a round cap, one stroke width across.
    pub fn draw_points(
        &mut self,
        mode: PointMode,
        points: &[Point],
        paint: &Paint,
    ) -> Result<(), CanvasError> {
        let mut path = Path::new();
        match mode {
            PointMode::Points => {
                let width = if paint.stroke.is_hairline() {
                    self.hairline_width()
                } else {
                    paint.stroke.width
                };
                let r = width * 0.5;
                for p in points {
                    if paint.stroke.start_cap == Cap::Round {
                        path.add_circle(*p, r, PathDirection::Clockwise);
                    } else {
                        path.add_rect(
                            Rect::new(p.x - r, p.y - r, p.x + r, p.y + r),
                            PathDirection::Clockwise,
                        );
                    }
                }
                let mut dots = paint.clone();
                dots.style = PaintStyle::Fill;
                return self.draw_path(&path, &dots);
            }
            PointMode::Lines => {
                for pair in points.chunks_exact(2) {
                    path.move_to(pair[0]);
                    path.line_to(pair[1]);
                }
            }
            PointMode::Polygon => path.add_poly(points, false),
        }
        self.draw_path(&path, &stroking(paint))
    }

    /// Fills and/or strokes `path` according to the paint style.
    pub fn draw_path(&mut self, path: &Path, paint: &Paint) -> Result<(), CanvasError> {
        paint.validate()?;
        if paint.style.fills() && path.fill_rule() == FillRule::InverseNonZero {
            return Err(CanvasError::NotImplemented("fill with an inverse non-zero rule"));
        }
        let brush = paint.resolve_brush();
        let pushed = self.begin_blend(paint.blend_mode);
        if paint.style.fills() {
            self.emit_fill(path, &brush);
        }
        if paint.style.strokes() {
            self.emit_stroke(path, &paint.stroke, &brush);
        }
        self.end_blend(pushed);
        Ok(())
    }

    /// Draws the rectangles of a device-space region with the current transform.
    pub fn draw_region(&mut self, region: &Region, paint: &Paint) -> Result<(), CanvasError> {
        self.draw_path(&region_path(region), paint)
    }

    /// Draws an image with its top left corner at `(left, top)`.
    pub fn draw_image(
        &mut self,
        image: &ImageBuffer,
        left: f64,
        top: f64,
        paint: Option<&Paint>,
    ) -> Result<(), CanvasError> {
        let dst = Rect::new(
            left,
            top,
            left + f64::from(image.width()),
            top + f64::from(image.height()),
        );
        self.draw_image_rect(image, None, dst, paint)
    }

    /// Draws the `src` part of an image (whole image if `None`) into `dst`.
    ///
    /// `src` is clamped to the image and `dst` shrunk by the same proportion.
    /// When only part of the image is drawn the draw is wrapped in a clip
    /// layer bounded by the destination.
    pub fn draw_image_rect(
        &mut self,
        image: &ImageBuffer,
        src: Option<Rect>,
        dst: Rect,
        paint: Option<&Paint>,
    ) -> Result<(), CanvasError> {
        if let Some(paint) = paint {
            paint.validate()?;
        }
        let full = Rect::new(0.0, 0.0, f64::from(image.width()), f64::from(image.height()));
        let requested = src.map_or(full, |r| r.abs());
        let clamped = requested.intersect(full);
        let dst = dst.abs();
        if clamped.width() <= 0.0
            || clamped.height() <= 0.0
            || dst.width() <= 0.0
            || dst.height() <= 0.0
        {
            tracing::debug!("image draw with an empty source or destination skipped");
            return Ok(());
        }
        let sx = dst.width() / requested.width();
        let sy = dst.height() / requested.height();
        let dst = Rect::new(
            dst.x0 + (clamped.x0 - requested.x0) * sx,
            dst.y0 + (clamped.y0 - requested.y0) * sy,
            dst.x0 + (clamped.x1 - requested.x0) * sx,
            dst.y0 + (clamped.y1 - requested.y0) * sy,
        );
        let local = Affine::translate((dst.x0, dst.y0))
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate((-clamped.x0, -clamped.y0));

        let pixels = match paint.and_then(|p| p.color_filter.as_ref()) {
            Some(filter) => transform_image(image, filter),
            None => image.clone(),
        };
        let mut brush = ImageBrush::new(pixels);
        brush.alpha = paint.map_or(1.0, Paint::layer_alpha);
        brush.quality = if paint.is_none_or(|p| p.anti_alias) {
            ImageQuality::Medium
        } else {
            ImageQuality::Low
        };

        let pushed = self.begin_blend(paint.map_or(PorterDuff::SrcOver, |p| p.blend_mode));
        let partial = clamped != full;
        if partial {
            self.push_layer(&LayerDesc::clip(
                Path::from_rect(dst),
                FillRule::NonZero,
                self.transform,
            ));
        }
        self.renderer.draw_image(&brush, self.transform * local);
        if partial {
            self.pop_layers_to(self.layer_depth - 1);
        }
        self.end_blend(pushed);
        Ok(())
    }

    /// Draws `text` with its baseline starting at `origin`.
    pub fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        font: crate::font::Font<'_>,
        paint: &Paint,
        cache: &mut FontCache,
    ) -> Result<(), CanvasError> {
        self.draw_text_spans(&[TextSpan::new(text, font)], origin, paint, cache)
    }

    /// Lays out spans on one baseline and draws them as glyph runs.
    ///
    /// Characters without a glyph or without metrics are skipped. Consecutive
    /// spans sharing a font and size become one run.
    #[tracing::instrument(skip_all, fields(spans = spans.len()))]
    pub fn draw_text_spans(
        &mut self,
        spans: &[TextSpan<'_>],
        origin: Point,
        paint: &Paint,
        cache: &mut FontCache,
    ) -> Result<(), CanvasError> {
        paint.validate()?;
        if paint.style.strokes() {
            return Err(CanvasError::NotImplemented("stroked text"));
        }
        let brush = paint.resolve_brush();
        let transform = self.transform * Affine::translate(origin.to_vec2());
        let runs = layout_glyph_runs(spans, transform, &brush, cache);
        let pushed = self.begin_blend(paint.blend_mode);
        for run in &runs {
            self.renderer.draw_glyph_run(run);
        }
        self.end_blend(pushed);
        Ok(())
    }

    /// Triangle meshes have no scene equivalent.
    pub fn draw_vertices(&mut self, _vertices: &[Point], _paint: &Paint) -> Result<(), CanvasError> {
        Err(CanvasError::NotImplemented("draw_vertices"))
    }

    /// Coons patches have no scene equivalent.
    pub fn draw_patch(&mut self, _cubics: &[Point; 12], _paint: &Paint) -> Result<(), CanvasError> {
        Err(CanvasError::NotImplemented("draw_patch"))
    }

    /// Sprite atlases have no scene equivalent.
    pub fn draw_atlas(
        &mut self,
        _atlas: &ImageBuffer,
        _transforms: &[Affine],
        _sprites: &[Rect],
        _paint: Option<&Paint>,
    ) -> Result<(), CanvasError> {
        Err(CanvasError::NotImplemented("draw_atlas"))
    }

    /// Width in local units of a one device pixel hairline.
    fn hairline_width(&self) -> f64 {
        let det = self.transform.determinant().abs();
        if det > 0.0 && det.is_finite() {
            1.0 / det.sqrt()
        } else {
            1.0
        }
    }

    fn emit_fill(&mut self, path: &Path, brush: &Brush) {
        match path.fill_rule() {
            FillRule::InverseEvenOdd => {
                let mut shape = self.covering_path();
                shape.add_path(path, &Affine::IDENTITY);
                shape.set_fill_rule(FillRule::EvenOdd);
                self.renderer
                    .fill_path(&shape, FillRule::EvenOdd, self.transform, brush);
            }
            rule => {
                if !path.is_empty() {
                    self.renderer
                        .fill_path(path, rule.base(), self.transform, brush);
                }
            }
        }
    }

    fn emit_stroke(&mut self, path: &Path, style: &StrokeStyle, brush: &Brush) {
        if path.is_empty() {
            return;
        }
        if style.is_hairline() {
            let source = match &style.dash {
                Some(dash) => Cow::Owned(dash_path(path, dash, self.config.resolution_scale)),
                None => Cow::Borrowed(path),
            };
            let hairline = StrokeStyle {
                width: self.hairline_width(),
                dash: None,
                ..style.clone()
            };
            self.renderer
                .stroke_path(&source, &hairline, self.transform, brush);
        } else if style.dash.is_some() {
            let outline = fill_path_for_stroke(
                path,
                style,
                self.config.stroke_tolerance,
                self.config.resolution_scale,
            );
            self.renderer
                .fill_path(&outline, FillRule::NonZero, self.transform, brush);
        } else {
            self.renderer
                .stroke_path(path, style, self.transform, brush);
        }
    }

    /// Opens a device-covering layer for non-default blend modes.
    fn begin_blend(&mut self, mode: PorterDuff) -> bool {
        if mode == PorterDuff::SrcOver {
            return false;
        }
        let clip = self.covering_path();
        self.push_layer(&LayerDesc {
            clip,
            fill_rule: FillRule::NonZero,
            blend: LayerBlend::Blend(mode),
            transform: self.transform,
            alpha: 1.0,
        });
        true
    }

    fn end_blend(&mut self, pushed: bool) {
        if pushed {
            self.pop_layers_to(self.layer_depth - 1);
        }
    }
}

impl<R: SceneRenderer> Drop for Canvas<'_, R> {
    fn drop(&mut self) {
        self.restore_to_count(1);
        self.pop_layers_to(0);
    }
}

/// Maps characters to glyphs, splitting runs where the font changes.
fn layout_glyph_runs(
    spans: &[TextSpan<'_>],
    transform: Affine,
    brush: &Brush,
    cache: &mut FontCache,
) -> Vec<GlyphRun> {
    let mut runs: Vec<GlyphRun> = Vec::new();
    let mut pen = 0.0_f32;
    for (i, span) in spans.iter().enumerate() {
        let font = span.font;
        let continues = i > 0 && spans[i - 1].font.same_face(&font) && !runs.is_empty();
        if !continues {
            runs.push(GlyphRun {
                font: font.id,
                font_size: font.size,
                glyphs: Vec::new(),
                transform,
                brush: brush.clone(),
            });
        }
        let Some(run) = runs.last_mut() else {
            continue;
        };
        let before = run.glyphs.len();
        for ch in span.text.chars() {
            let Some(glyph) = font.metrics.glyph_index(ch) else {
                tracing::debug!(?ch, "no glyph for character, skipped");
                continue;
            };
            let Some(metrics) = font.metrics.glyph_metrics(glyph, font.size) else {
                tracing::debug!(glyph, "no metrics for glyph, skipped");
                continue;
            };
            run.glyphs.push(PositionedGlyph {
                id: glyph,
                x: pen,
                y: 0.0,
            });
            pen += metrics.advance;
        }
        let added = run.glyphs.len() - before;
        cache.record(font.id, added * size_of::<PositionedGlyph>());
    }
    runs.retain(|run| !run.glyphs.is_empty());
    runs
}

/// A paint that strokes, keeping everything else.
fn stroking(paint: &Paint) -> Paint {
    let mut paint = paint.clone();
    paint.style = PaintStyle::Stroke;
    paint
}

/// The rectangles of a region as clockwise contours of one path.
///
/// The rectangles are disjoint, so either fill rule covers the region.
fn region_path(region: &Region) -> Path {
    let mut path = Path::new();
    for r in region {
        path.add_rect(irect_to_rect(*r), PathDirection::Clockwise);
    }
    path
}

fn irect_to_rect(r: IRect) -> Rect {
    Rect::new(
        f64::from(r.left),
        f64::from(r.top),
        f64::from(r.right),
        f64::from(r.bottom),
    )
}

fn is_invertible(transform: &Affine) -> bool {
    let det = transform.determinant();
    det != 0.0 && det.is_finite()
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "saturating conversion of whole-pixel device coordinates"
)]
fn to_i32(v: f64) -> i32 {
    v as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderCommand;

    /// Minimal renderer that logs commands and checks nesting.
    #[derive(Default)]
    struct Log {
        commands: Vec<RenderCommand>,
        depth: usize,
    }

    impl SceneRenderer for Log {
        fn fill_path(&mut self, path: &Path, fill_rule: FillRule, transform: Affine, brush: &Brush) {
            self.commands.push(RenderCommand::FillPath {
                path: path.clone(),
                fill_rule,
                transform,
                brush: brush.clone(),
            });
        }
        fn stroke_path(&mut self, path: &Path, style: &StrokeStyle, transform: Affine, brush: &Brush) {
            self.commands.push(RenderCommand::StrokePath {
                path: path.clone(),
                style: style.clone(),
                transform,
                brush: brush.clone(),
            });
        }
        fn push_layer(&mut self, layer: &LayerDesc) {
            self.depth += 1;
            self.commands.push(RenderCommand::PushLayer(layer.clone()));
        }
        fn pop_layer(&mut self) {
            assert!(self.depth > 0, "pop without push");
            self.depth -= 1;
            self.commands.push(RenderCommand::PopLayer);
        }
        fn draw_image(&mut self, brush: &ImageBrush, transform: Affine) {
            self.commands.push(RenderCommand::DrawImage {
                brush: brush.clone(),
                transform,
            });
        }
        fn draw_glyph_run(&mut self, run: &GlyphRun) {
            self.commands.push(RenderCommand::DrawGlyphRun(run.clone()));
        }
        fn reset(&mut self) {
            self.commands.push(RenderCommand::Reset);
        }
    }

    #[test]
    fn hairline_width_tracks_scale() {
        let mut log = Log::default();
        let mut canvas = Canvas::new(&mut log, CanvasConfig::new(100, 100));
        assert_eq!(canvas.hairline_width(), 1.0);
        canvas.scale(4.0, 4.0);
        assert_eq!(canvas.hairline_width(), 0.25);
        canvas.scale(0.0, 1.0);
        assert_eq!(canvas.hairline_width(), 1.0, "singular transforms fall back to 1");
    }

    #[test]
    fn hairline_strokes_are_sent_with_device_pixel_width() {
        let mut log = Log::default();
        {
            let mut canvas = Canvas::new(&mut log, CanvasConfig::new(100, 100));
            canvas.scale(2.0, 2.0);
            let paint = Paint::default().with_stroke(StrokeStyle::default());
            canvas
                .draw_line(Point::ZERO, Point::new(10.0, 0.0), &paint)
                .unwrap();
        }
        let RenderCommand::StrokePath { style, .. } = &log.commands[0] else {
            panic!("expected a stroke, got {:?}", log.commands[0]);
        };
        assert_eq!(style.width, 0.5);
    }

    #[test]
    fn dashed_strokes_are_expanded_to_fills() {
        let mut log = Log::default();
        {
            let mut canvas = Canvas::new(&mut log, CanvasConfig::new(100, 100));
            let dash = palimpsest_path::DashPattern::new(&[2.0, 2.0], 0.0).unwrap();
            let paint = Paint::default().with_stroke(StrokeStyle::new(1.0).with_dash(dash));
            canvas
                .draw_line(Point::ZERO, Point::new(10.0, 0.0), &paint)
                .unwrap();
        }
        assert!(
            matches!(
                &log.commands[0],
                RenderCommand::FillPath {
                    fill_rule: FillRule::NonZero,
                    ..
                }
            ),
            "{:?}",
            log.commands
        );
    }

    #[test]
    fn dashed_outlines_follow_the_resolution_scale() {
        let outline_points = |res_scale: f64| {
            let mut log = Log::default();
            {
                let config = CanvasConfig::new(100, 100).with_resolution_scale(res_scale);
                let mut canvas = Canvas::new(&mut log, config);
                let dash = palimpsest_path::DashPattern::new(&[6.0, 3.0], 0.0).unwrap();
                let paint = Paint::default().with_stroke(StrokeStyle::new(2.0).with_dash(dash));
                canvas
                    .draw_circle(Point::new(50.0, 50.0), 30.0, &paint)
                    .unwrap();
            }
            match &log.commands[0] {
                RenderCommand::FillPath { path, .. } => path.point_count(),
                other => panic!("expected the expanded outline, got {other:?}"),
            }
        };
        assert!(outline_points(4.0) > outline_points(1.0));
    }

    #[test]
    fn blend_modes_wrap_the_draw_in_a_layer() {
        let mut log = Log::default();
        {
            let mut canvas = Canvas::new(&mut log, CanvasConfig::new(10, 10));
            let paint = Paint::new(Color::WHITE).with_blend_mode(PorterDuff::Xor);
            canvas
                .draw_rect(Rect::new(0.0, 0.0, 5.0, 5.0), &paint)
                .unwrap();
            assert_eq!(canvas.layer_depth(), 0);
        }
        assert!(matches!(
            &log.commands[0],
            RenderCommand::PushLayer(LayerDesc {
                blend: LayerBlend::Blend(PorterDuff::Xor),
                ..
            })
        ));
        assert!(matches!(log.commands[1], RenderCommand::FillPath { .. }));
        assert_eq!(log.commands[2], RenderCommand::PopLayer);
        assert_eq!(log.depth, 0);
    }

    #[test]
    fn inverse_even_odd_fill_is_emulated() {
        let mut log = Log::default();
        {
            let mut canvas = Canvas::new(&mut log, CanvasConfig::new(10, 10));
            let mut path = Path::from_rect(Rect::new(2.0, 2.0, 4.0, 4.0));
            path.set_fill_rule(FillRule::InverseEvenOdd);
            canvas.draw_path(&path, &Paint::default()).unwrap();

            path.set_fill_rule(FillRule::InverseNonZero);
            assert_eq!(
                canvas.draw_path(&path, &Paint::default()),
                Err(CanvasError::NotImplemented("fill with an inverse non-zero rule"))
            );
        }
        let RenderCommand::FillPath {
            path, fill_rule, ..
        } = &log.commands[0]
        else {
            panic!("expected a fill");
        };
        assert_eq!(*fill_rule, FillRule::EvenOdd);
        assert!(path.contains((8.0, 8.0)));
        assert!(!path.contains((3.0, 3.0)));
        assert_eq!(log.commands.len(), 1);
    }

    #[test]
    fn difference_clip_punches_a_hole() {
        let mut log = Log::default();
        {
            let mut canvas = Canvas::new(&mut log, CanvasConfig::new(20, 20));
            canvas
                .clip_rect(Rect::new(5.0, 5.0, 10.0, 10.0), ClipOperation::Difference, true)
                .unwrap();
            assert_eq!(
                canvas.device_clip_bounds(),
                IRect::new(0, 0, 20, 20),
                "difference clips keep conservative bounds"
            );
        }
        let RenderCommand::PushLayer(layer) = &log.commands[0] else {
            panic!("expected a clip layer");
        };
        assert!(layer.is_clip());
        let mut clip = layer.clip.clone();
        clip.set_fill_rule(layer.fill_rule);
        assert!(clip.contains((1.0, 1.0)));
        assert!(!clip.contains((7.0, 7.0)));
        assert_eq!(log.depth, 0, "drop pops the clip layer");
    }

    #[test]
    fn clip_bounds_and_quick_reject() {
        let mut log = Log::default();
        let mut canvas = Canvas::new(&mut log, CanvasConfig::new(100, 100));
        canvas.translate(10.0, 0.0);
        canvas
            .clip_rect(Rect::new(0.0, 0.0, 20.5, 20.0), ClipOperation::Intersect, true)
            .unwrap();
        assert_eq!(canvas.device_clip_bounds(), IRect::new(10, 0, 31, 20));
        assert_eq!(canvas.local_clip_bounds(), Rect::new(0.0, 0.0, 20.5, 20.0));
        assert!(canvas.quick_reject(Rect::new(30.0, 30.0, 40.0, 40.0)));
        assert!(!canvas.quick_reject(Rect::new(5.0, 5.0, 6.0, 6.0)));
    }

    #[test]
    fn unsupported_operations_are_reported() {
        let mut log = Log::default();
        let mut canvas = Canvas::new(&mut log, CanvasConfig::default());
        let paint = Paint::default();
        assert!(matches!(
            canvas.draw_vertices(&[], &paint),
            Err(CanvasError::NotImplemented(_))
        ));
        assert!(matches!(
            canvas.draw_patch(&[Point::ZERO; 12], &paint),
            Err(CanvasError::NotImplemented(_))
        ));
        assert!(matches!(
            canvas.clip_shader(&Brush::default(), ClipOperation::Intersect),
            Err(CanvasError::NotImplemented(_))
        ));
        let mut inverse = Path::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        inverse.set_fill_rule(FillRule::InverseNonZero);
        assert!(matches!(
            canvas.clip_path(&inverse, ClipOperation::Intersect, true),
            Err(CanvasError::NotImplemented(_))
        ));
        assert_eq!(canvas.layer_depth(), 0);
    }
}
