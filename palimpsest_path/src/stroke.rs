// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke styles and stroke-to-fill expansion.

use kurbo::StrokeOpts;

use crate::dash::{DashPattern, dash_path};
use crate::error::StrokeError;
use crate::path::{FillRule, Path};

/// Flattening tolerance used when expanding strokes into fills.
pub const DEFAULT_STROKE_TOLERANCE: f64 = 0.1;

/// Shape at the open ends of a stroked contour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cap {
    /// Ends exactly at the end point.
    #[default]
    Butt,
    /// Half-circle around the end point.
    Round,
    /// Half-square extending past the end point.
    Square,
}

/// Shape where two stroked segments meet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Join {
    /// Extend the outer edges to their intersection, up to the miter limit.
    #[default]
    Miter,
    /// Circular arc around the joint.
    Round,
    /// Straight line across the outer corners.
    Bevel,
}

impl From<Cap> for kurbo::Cap {
    fn from(cap: Cap) -> Self {
        match cap {
            Cap::Butt => Self::Butt,
            Cap::Round => Self::Round,
            Cap::Square => Self::Square,
        }
    }
}

impl From<Join> for kurbo::Join {
    fn from(join: Join) -> Self {
        match join {
            Join::Miter => Self::Miter,
            Join::Round => Self::Round,
            Join::Bevel => Self::Bevel,
        }
    }
}

/// How a path is stroked.
///
/// A width of zero is a hairline: one device pixel wide whatever the
/// transform. Hairlines are left to the renderer and never expanded here.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke width in local units.
    pub width: f64,
    /// Miter length limit, as a multiple of the half width.
    pub miter_limit: f64,
    /// Cap at the start of open contours.
    pub start_cap: Cap,
    /// Cap at the end of open contours.
    pub end_cap: Cap,
    /// Join between segments.
    pub join: Join,
    /// Optional dash pattern applied before expansion.
    pub dash: Option<DashPattern>,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 0.0,
            miter_limit: 4.0,
            start_cap: Cap::Butt,
            end_cap: Cap::Butt,
            join: Join::Miter,
            dash: None,
        }
    }
}

impl StrokeStyle {
    /// A solid stroke of the given width with default caps and joins.
    pub fn new(width: f64) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Builder method for setting both caps.
    #[must_use]
    pub fn with_caps(mut self, cap: Cap) -> Self {
        self.start_cap = cap;
        self.end_cap = cap;
        self
    }

    /// Builder method for setting the join.
    #[must_use]
    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    /// Builder method for setting the miter limit.
    #[must_use]
    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = limit;
        self
    }

    /// Builder method for setting the dash pattern.
    #[must_use]
    pub fn with_dash(mut self, dash: DashPattern) -> Self {
        self.dash = Some(dash);
        self
    }

    /// Returns `true` for a zero-width stroke.
    #[inline]
    pub fn is_hairline(&self) -> bool {
        self.width == 0.0
    }

    /// Checks the width and miter limit.
    ///
    /// Dash patterns are validated when they are built.
    pub fn validate(&self) -> Result<(), StrokeError> {
        if !self.width.is_finite() {
            return Err(StrokeError::NonFiniteWidth);
        }
        if self.width < 0.0 {
            return Err(StrokeError::NegativeWidth);
        }
        if !self.miter_limit.is_finite() || self.miter_limit < 0.0 {
            return Err(StrokeError::InvalidMiterLimit);
        }
        Ok(())
    }

    /// The equivalent kurbo stroke, without the dash pattern.
    ///
    /// Dashing is done by [`dash_path`] so that it follows the arc-length rules
    /// of this crate rather than kurbo's.
    pub fn to_kurbo(&self) -> kurbo::Stroke {
        kurbo::Stroke::new(self.width)
            .with_join(self.join.into())
            .with_miter_limit(self.miter_limit)
            .with_start_cap(self.start_cap.into())
            .with_end_cap(self.end_cap.into())
    }
}

/// Expands `path` stroked with `style` into a path to be filled with non-zero.
///
/// Dash intervals are laid out on the path flattened at `res_scale`.
/// Returns `None` when the stroke cannot be expanded: hairlines, malformed
/// styles and paths with non-finite coordinates. Callers fall back to treating
/// the original path as the fill shape; see [`fill_path_for_stroke`].
#[tracing::instrument(skip_all)]
pub fn stroke_to_fill(
    path: &Path,
    style: &StrokeStyle,
    tolerance: f64,
    res_scale: f64,
) -> Option<Path> {
    if style.is_hairline() || style.validate().is_err() || !path.is_finite() {
        return None;
    }
    let dashed;
    let source = match &style.dash {
        Some(pattern) => {
            dashed = dash_path(path, pattern, res_scale);
            &dashed
        }
        None => path,
    };
    let bez = source.to_bez_path();
    let outline = kurbo::stroke(
        bez.iter(),
        &style.to_kurbo(),
        &StrokeOpts::default(),
        tolerance,
    );
    let mut fill = Path::from_bez_path(&outline);
    fill.set_fill_rule(FillRule::NonZero);
    Some(fill)
}

/// Like [`stroke_to_fill`], falling back to a copy of `path` on failure.
pub fn fill_path_for_stroke(
    path: &Path,
    style: &StrokeStyle,
    tolerance: f64,
    res_scale: f64,
) -> Path {
    stroke_to_fill(path, style, tolerance, res_scale).unwrap_or_else(|| {
        tracing::debug!(
            width = style.width,
            "stroke expansion unavailable, using path as fill"
        );
        path.clone()
    })
}
