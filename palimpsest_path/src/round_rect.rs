// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rounded rectangles with independent elliptical corners.

use kurbo::{Point, Rect, Vec2};

use crate::path::{Path, PathDirection};

/// Control-point offset, as a fraction of the radius, of a cubic quarter circle.
pub const CUBIC_ARC_FACTOR: f64 = 0.552284749831;

/// Per-corner elliptical radii.
///
/// `x` is the horizontal radius and `y` the vertical one.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RoundRectRadii {
    /// Top-left corner.
    pub top_left: Vec2,
    /// Top-right corner.
    pub top_right: Vec2,
    /// Bottom-right corner.
    pub bottom_right: Vec2,
    /// Bottom-left corner.
    pub bottom_left: Vec2,
}

impl RoundRectRadii {
    /// Radii given clockwise from the top-left corner.
    pub const fn new(top_left: Vec2, top_right: Vec2, bottom_right: Vec2, bottom_left: Vec2) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// The same radii on every corner.
    pub const fn uniform(rx: f64, ry: f64) -> Self {
        let r = Vec2::new(rx, ry);
        Self::new(r, r, r, r)
    }

    /// Returns `true` if every corner is square.
    pub fn is_zero(&self) -> bool {
        self.corners().iter().all(|r| r.x == 0.0 || r.y == 0.0)
    }

    fn corners(&self) -> [Vec2; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }
}

/// Shape classification of a [`RoundRect`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoundRectKind {
    /// The rectangle has no area.
    Empty,
    /// Every corner is square.
    Rect,
    /// The radii are half the width and height on every corner.
    Oval,
    /// Every corner has the same radii.
    Simple,
    /// Corners have different radii.
    Complex,
}

/// A rectangle with four elliptical corners.
///
/// Construction normalizes the input: the rectangle is made non-negative, any
/// negative or non-finite radius becomes zero, a corner with one zero component
/// becomes fully square, and radii that would overlap along an edge are scaled
/// down so the two corners on that edge meet at its midpoint at worst.
///
/// Horizontal radii are fitted first, per top and bottom edge, then vertical
/// radii per left and right edge. Each pass only touches its own axis, so a
/// corner can end up with a different aspect ratio than requested.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RoundRect {
    rect: Rect,
    radii: RoundRectRadii,
}

impl RoundRect {
    /// Creates a normalized round rectangle.
    pub fn new(rect: Rect, radii: RoundRectRadii) -> Self {
        let rect = rect.abs();
        let clean = |r: Vec2| {
            let x = if r.x.is_finite() && r.x > 0.0 { r.x } else { 0.0 };
            let y = if r.y.is_finite() && r.y > 0.0 { r.y } else { 0.0 };
            if x == 0.0 || y == 0.0 {
                Vec2::ZERO
            } else {
                Vec2::new(x, y)
            }
        };
        let mut radii = RoundRectRadii {
            top_left: clean(radii.top_left),
            top_right: clean(radii.top_right),
            bottom_right: clean(radii.bottom_right),
            bottom_left: clean(radii.bottom_left),
        };

        let width = rect.width();
        let height = rect.height();
        fit_edge(&mut radii.top_left.x, &mut radii.top_right.x, width);
        fit_edge(&mut radii.bottom_left.x, &mut radii.bottom_right.x, width);
        fit_edge(&mut radii.top_left.y, &mut radii.bottom_left.y, height);
        fit_edge(&mut radii.top_right.y, &mut radii.bottom_right.y, height);

        Self { rect, radii }
    }

    /// A round rectangle with the same radii on every corner.
    pub fn from_rect_xy(rect: Rect, rx: f64, ry: f64) -> Self {
        Self::new(rect, RoundRectRadii::uniform(rx, ry))
    }

    /// A round rectangle with square corners.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect, RoundRectRadii::default())
    }

    /// A round rectangle shaped as the oval inscribed in `rect`.
    pub fn from_oval(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::from_rect_xy(rect, rect.width() * 0.5, rect.height() * 0.5)
    }

    /// The bounding rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The normalized radii.
    #[inline]
    pub fn radii(&self) -> &RoundRectRadii {
        &self.radii
    }

    /// Classifies the shape.
    pub fn kind(&self) -> RoundRectKind {
        if self.rect.width() <= 0.0 || self.rect.height() <= 0.0 {
            return RoundRectKind::Empty;
        }
        if self.radii.is_zero() {
            return RoundRectKind::Rect;
        }
        let [tl, tr, br, bl] = self.radii.corners();
        if tl == tr && tl == br && tl == bl {
            let half = Vec2::new(self.rect.width() * 0.5, self.rect.height() * 0.5);
            if tl == half {
                RoundRectKind::Oval
            } else {
                RoundRectKind::Simple
            }
        } else {
            RoundRectKind::Complex
        }
    }

    /// Builds a closed clockwise path.
    pub fn to_path(&self) -> Path {
        let mut path = Path::new();
        self.append_to(&mut path, PathDirection::Clockwise);
        path
    }

    /// Appends a closed contour to `path`.
    ///
    /// The clockwise contour starts where the top-left corner meets the top
    /// edge. With square corners the emitted commands are exactly those of
    /// [`Path::add_rect`].
    pub(crate) fn append_to(&self, path: &mut Path, direction: PathDirection) {
        match direction {
            PathDirection::Clockwise => self.emit_clockwise(path),
            PathDirection::CounterClockwise => {
                let mut cw = Path::new();
                self.emit_clockwise(&mut cw);
                path.extend(cw.reversed().iter());
            }
        }
    }

    fn emit_clockwise(&self, path: &mut Path) {
        let Rect { x0, y0, x1, y1 } = self.rect;
        let RoundRectRadii {
            top_left: tl,
            top_right: tr,
            bottom_right: br,
            bottom_left: bl,
        } = self.radii;

        let start = Point::new(x0 + tl.x, y0);
        path.move_to(start);
        line_if_moved(path, Point::new(x1 - tr.x, y0));
        corner(path, tr, Point::new(x1, y0), Point::new(x1, y0 + tr.y));
        line_if_moved(path, Point::new(x1, y1 - br.y));
        corner(path, br, Point::new(x1, y1), Point::new(x1 - br.x, y1));
        line_if_moved(path, Point::new(x0 + bl.x, y1));
        corner(path, bl, Point::new(x0, y1), Point::new(x0, y1 - bl.y));
        // A square top-left corner is drawn by the close itself.
        let left_top = Point::new(x0, y0 + tl.y);
        if left_top != start {
            line_if_moved(path, left_top);
        }
        if tl.x > 0.0 && tl.y > 0.0 {
            corner(path, tl, Point::new(x0, y0), start);
        }
        path.close();
    }
}

/// Scales `a` and `b` down together so they sum to at most `extent`.
fn fit_edge(a: &mut f64, b: &mut f64, extent: f64) {
    let sum = *a + *b;
    if sum > extent {
        let scale = extent / sum;
        *a *= scale;
        *b *= scale;
    }
}

fn line_if_moved(path: &mut Path, p: Point) {
    if path.current_point() != Some(p) {
        path.line_to(p);
    }
}

/// Emits one quarter-ellipse corner from the current point to `end`.
///
/// `vertex` is the square corner of the rectangle the arc is tangent to.
fn corner(path: &mut Path, radius: Vec2, vertex: Point, end: Point) {
    let Some(from) = path.current_point() else {
        return;
    };
    if radius.x > 0.0 && radius.y > 0.0 {
        let c1 = from + (vertex - from) * CUBIC_ARC_FACTOR;
        let c2 = end + (vertex - end) * CUBIC_ARC_FACTOR;
        path.cubic_to(c1, c2, end);
    } else {
        line_if_moved(path, end);
    }
}
