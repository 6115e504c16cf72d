// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use palimpsest_color::{Brush, Color, ColorFilter, PorterDuff, transform_brush};
use palimpsest_path::{DEFAULT_STROKE_TOLERANCE, Path, StrokeStyle, fill_path_for_stroke};

use crate::error::CanvasError;

/// Which geometry a paint covers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaintStyle {
    /// The interior.
    #[default]
    Fill,
    /// The outline.
    Stroke,
    /// The interior, then the outline.
    StrokeAndFill,
}

impl PaintStyle {
    /// Returns `true` if the interior is painted.
    pub fn fills(self) -> bool {
        matches!(self, Self::Fill | Self::StrokeAndFill)
    }

    /// Returns `true` if the outline is painted.
    pub fn strokes(self) -> bool {
        matches!(self, Self::Stroke | Self::StrokeAndFill)
    }
}

/// How to draw: color or shader, stroke, filter and compositing.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    /// Fill, stroke or both.
    pub style: PaintStyle,
    /// Color used when there is no shader; its alpha also modulates a shader.
    pub color: Color,
    /// Extra opacity multiplier in `[0, 1]`.
    pub opacity: f32,
    /// Paint source replacing the color.
    pub shader: Option<Brush>,
    /// Outline parameters, used by the stroke styles.
    pub stroke: StrokeStyle,
    /// Filter applied to every color of the resolved brush.
    pub color_filter: Option<ColorFilter>,
    /// How drawing is composited with what is below.
    pub blend_mode: PorterDuff,
    /// Whether edges are antialiased. Recorded only; renderers decide.
    pub anti_alias: bool,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            style: PaintStyle::Fill,
            color: Color::BLACK,
            opacity: 1.0,
            shader: None,
            stroke: StrokeStyle::default(),
            color_filter: None,
            blend_mode: PorterDuff::SrcOver,
            anti_alias: true,
        }
    }
}

impl Paint {
    /// A fill paint of the given color.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Builder method for setting the style.
    #[must_use]
    pub fn with_style(mut self, style: PaintStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder method for setting the stroke, switching to [`PaintStyle::Stroke`].
    #[must_use]
    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = stroke;
        self.style = PaintStyle::Stroke;
        self
    }

    /// Builder method for setting the shader.
    #[must_use]
    pub fn with_shader(mut self, shader: Brush) -> Self {
        self.shader = Some(shader);
        self
    }

    /// Builder method for setting the color filter.
    #[must_use]
    pub fn with_color_filter(mut self, filter: ColorFilter) -> Self {
        self.color_filter = Some(filter);
        self
    }

    /// Builder method for setting the blend mode.
    #[must_use]
    pub fn with_blend_mode(mut self, mode: PorterDuff) -> Self {
        self.blend_mode = mode;
        self
    }

    /// Builder method for setting the opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Checks the opacity and the stroke style.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if !self.opacity.is_finite() {
            return Err(CanvasError::InvalidArgument("paint opacity must be finite"));
        }
        self.stroke.validate()?;
        Ok(())
    }

    /// Alpha of a layer saved with this paint: opacity times color alpha.
    pub fn layer_alpha(&self) -> f32 {
        (self.opacity * self.color.components[3]).clamp(0.0, 1.0)
    }

    /// The brush to draw with.
    ///
    /// A shader is modulated by the color's alpha. The color filter is applied
    /// next, then the opacity.
    pub fn resolve_brush(&self) -> Brush {
        let base = match &self.shader {
            Some(shader) => shader.multiply_alpha(self.color.components[3]),
            None => Brush::Solid(self.color),
        };
        let filtered = match &self.color_filter {
            Some(filter) => transform_brush(&base, filter),
            None => base,
        };
        filtered.multiply_alpha(self.opacity.clamp(0.0, 1.0))
    }

    /// The area this paint covers when drawing `path`.
    ///
    /// Fill paints return the path itself. Stroke paints return the expanded
    /// outline, or the path unchanged when the stroke cannot be expanded.
    pub fn fill_path(&self, path: &Path) -> Path {
        self.fill_path_with_tolerance(path, DEFAULT_STROKE_TOLERANCE, 1.0)
    }

    /// Like [`fill_path`](Self::fill_path) with an explicit stroke tolerance
    /// and the resolution scale dashes are flattened at.
    pub fn fill_path_with_tolerance(&self, path: &Path, tolerance: f64, res_scale: f64) -> Path {
        if self.style == PaintStyle::Fill {
            return path.clone();
        }
        fill_path_for_stroke(path, &self.stroke, tolerance, res_scale)
    }
}
