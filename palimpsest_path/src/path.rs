// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The path model: commands, fill rules, builders and bounds.

use alloc::vec::Vec;
use core::f64::consts::{FRAC_PI_2, PI, SQRT_2, TAU};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, BezPath, PathEl, Point, Rect};

use crate::conic::Conic;
use crate::flatten::flatten;
use crate::round_rect::RoundRect;

/// Number of times a conic is halved when lowered to quadratic Béziers.
///
/// `2^2 = 4` quadratics per conic keeps quarter-circle arcs well below a
/// hundredth of a unit of error at typical UI radii.
const CONIC_QUAD_POW2: u32 = 2;

/// Rule used to decide which points are inside a path.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    /// A point is inside when its winding number is non-zero.
    #[default]
    NonZero,
    /// A point is inside when its winding number is odd.
    EvenOdd,
    /// The complement of [`FillRule::NonZero`].
    InverseNonZero,
    /// The complement of [`FillRule::EvenOdd`].
    InverseEvenOdd,
}

impl FillRule {
    /// Returns `true` for the inverse variants.
    #[inline]
    pub const fn is_inverse(self) -> bool {
        matches!(self, Self::InverseNonZero | Self::InverseEvenOdd)
    }

    /// Returns `true` if this rule counts crossings modulo two.
    #[inline]
    pub const fn is_even_odd(self) -> bool {
        matches!(self, Self::EvenOdd | Self::InverseEvenOdd)
    }

    /// Returns the rule without its inverse flag.
    #[inline]
    pub const fn base(self) -> Self {
        match self {
            Self::NonZero | Self::InverseNonZero => Self::NonZero,
            Self::EvenOdd | Self::InverseEvenOdd => Self::EvenOdd,
        }
    }

    /// Flips between the plain and inverse variant of the same rule.
    #[inline]
    #[must_use]
    pub const fn toggle_inverse(self) -> Self {
        match self {
            Self::NonZero => Self::InverseNonZero,
            Self::EvenOdd => Self::InverseEvenOdd,
            Self::InverseNonZero => Self::NonZero,
            Self::InverseEvenOdd => Self::EvenOdd,
        }
    }

    /// Returns `true` if a point with the given winding number is filled.
    #[inline]
    pub const fn is_inside(self, winding: i32) -> bool {
        let inside = if self.is_even_odd() {
            winding & 1 != 0
        } else {
            winding != 0
        };
        inside != self.is_inverse()
    }
}

/// Winding direction used by the shape builders.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PathDirection {
    /// Clockwise in a y-down coordinate system.
    #[default]
    Clockwise,
    /// Counter-clockwise in a y-down coordinate system.
    CounterClockwise,
}

/// A single path command with its control points in local coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathCommand {
    /// Start a new contour at the point.
    MoveTo(Point),
    /// Straight line to the point.
    LineTo(Point),
    /// Quadratic Bézier with one control point.
    QuadTo(Point, Point),
    /// Rational quadratic with one control point and a weight.
    ConicTo(Point, Point, f64),
    /// Cubic Bézier with two control points.
    CubicTo(Point, Point, Point),
    /// Close the current contour back to its start point.
    Close,
}

impl PathCommand {
    /// The on-curve end point of the command, if it has one.
    #[inline]
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            Self::MoveTo(p)
            | Self::LineTo(p)
            | Self::QuadTo(_, p)
            | Self::ConicTo(_, p, _)
            | Self::CubicTo(_, _, p) => Some(p),
            Self::Close => None,
        }
    }

    /// Calls `f` for every point stored in the command, control points included.
    #[inline]
    pub fn for_each_point(&self, mut f: impl FnMut(Point)) {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => f(p),
            Self::QuadTo(c, p) | Self::ConicTo(c, p, _) => {
                f(c);
                f(p);
            }
            Self::CubicTo(c1, c2, p) => {
                f(c1);
                f(c2);
                f(p);
            }
            Self::Close => {}
        }
    }

    fn map_points(&self, mut f: impl FnMut(Point) -> Point) -> Self {
        match *self {
            Self::MoveTo(p) => Self::MoveTo(f(p)),
            Self::LineTo(p) => Self::LineTo(f(p)),
            Self::QuadTo(c, p) => Self::QuadTo(f(c), f(p)),
            Self::ConicTo(c, p, w) => Self::ConicTo(f(c), f(p), w),
            Self::CubicTo(c1, c2, p) => Self::CubicTo(f(c1), f(c2), f(p)),
            Self::Close => Self::Close,
        }
    }
}

/// An ordered list of path commands plus a fill rule.
///
/// Paths are plain values: cloning copies the command list and nothing ties a
/// path to a renderer.
///
/// Every contour starts with [`PathCommand::MoveTo`]. Drawing commands appended
/// while a move is required (on a new path, or right after
/// [`close`](Self::close)) get an implicit move inserted at the start point of
/// the previous contour, or at the origin when there is none. Coordinates are
/// stored as given; NaN and infinities are not rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
    fill_rule: FillRule,
    last_move: Option<Point>,
    needs_move: bool,
}

impl Default for Path {
    fn default() -> Self {
        Self::new()
    }
}

impl Path {
    /// Creates an empty path with [`FillRule::NonZero`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_fill_rule(FillRule::NonZero)
    }

    /// Creates an empty path with the given fill rule.
    #[must_use]
    pub const fn with_fill_rule(fill_rule: FillRule) -> Self {
        Self {
            commands: Vec::new(),
            fill_rule,
            last_move: None,
            needs_move: true,
        }
    }

    /// Creates a closed rectangle path.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        let mut path = Self::new();
        path.add_rect(rect, PathDirection::Clockwise);
        path
    }

    /// Creates a closed oval path inscribed in `rect`.
    #[must_use]
    pub fn from_oval(rect: Rect) -> Self {
        let mut path = Self::new();
        path.add_oval(rect, PathDirection::Clockwise);
        path
    }

    /// The fill rule.
    #[inline]
    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    /// Replaces the fill rule.
    #[inline]
    pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
        self.fill_rule = fill_rule;
    }

    /// Switches between the plain and inverse variant of the fill rule.
    #[inline]
    pub fn toggle_inverse_fill_rule(&mut self) {
        self.fill_rule = self.fill_rule.toggle_inverse();
    }

    /// The command list.
    #[inline]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Exposes the command list to the geometry algorithms without copying.
    #[inline]
    pub fn to_flattenable(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Iterates over the commands.
    ///
    /// The iterator never yields a drawing command before a `MoveTo`.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = PathCommand> + '_ {
        self.commands.iter().copied()
    }

    /// Returns `true` if the path has no commands.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Removes every command, keeping the fill rule.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.last_move = None;
        self.needs_move = true;
    }

    /// Number of stored points, control points included.
    pub fn point_count(&self) -> usize {
        let mut n = 0;
        for cmd in &self.commands {
            cmd.for_each_point(|_| n += 1);
        }
        n
    }

    /// Number of contours (one per `MoveTo`).
    pub fn contour_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count()
    }

    /// The last explicitly stored on-curve point.
    pub fn last_point(&self) -> Option<Point> {
        self.commands.iter().rev().find_map(PathCommand::end_point)
    }

    /// The pen position after the last command.
    ///
    /// After a `Close` this is the start point of the closed contour.
    pub fn current_point(&self) -> Option<Point> {
        match self.commands.last()? {
            PathCommand::Close => self.last_move,
            cmd => cmd.end_point(),
        }
    }

    /// Returns `true` if every stored coordinate and conic weight is finite.
    pub fn is_finite(&self) -> bool {
        self.commands.iter().all(|cmd| {
            let mut finite = match cmd {
                PathCommand::ConicTo(_, _, w) => w.is_finite(),
                _ => true,
            };
            cmd.for_each_point(|p| finite &= p.is_finite());
            finite
        })
    }

    fn ensure_move(&mut self) {
        if self.needs_move {
            let p = self.last_move.unwrap_or(Point::ZERO);
            self.commands.push(PathCommand::MoveTo(p));
            self.last_move = Some(p);
            self.needs_move = false;
        }
    }

    /// Starts a new contour at `p`.
    pub fn move_to(&mut self, p: impl Into<Point>) {
        let p = p.into();
        self.commands.push(PathCommand::MoveTo(p));
        self.last_move = Some(p);
        self.needs_move = false;
    }

    /// Adds a straight line to `p`.
    pub fn line_to(&mut self, p: impl Into<Point>) {
        self.ensure_move();
        self.commands.push(PathCommand::LineTo(p.into()));
    }

    /// Adds a quadratic Bézier through control point `c` to `p`.
    pub fn quad_to(&mut self, c: impl Into<Point>, p: impl Into<Point>) {
        self.ensure_move();
        self.commands.push(PathCommand::QuadTo(c.into(), p.into()));
    }

    /// Adds a conic through control point `c` to `p` with the given weight.
    pub fn conic_to(&mut self, c: impl Into<Point>, p: impl Into<Point>, weight: f64) {
        self.ensure_move();
        self.commands
            .push(PathCommand::ConicTo(c.into(), p.into(), weight));
    }

    /// Adds a cubic Bézier through `c1` and `c2` to `p`.
    pub fn cubic_to(&mut self, c1: impl Into<Point>, c2: impl Into<Point>, p: impl Into<Point>) {
        self.ensure_move();
        self.commands
            .push(PathCommand::CubicTo(c1.into(), c2.into(), p.into()));
    }

    /// Closes the current contour.
    ///
    /// Closing an empty path, or a contour that is already closed, does nothing.
    pub fn close(&mut self) {
        if self.needs_move {
            return;
        }
        self.commands.push(PathCommand::Close);
        self.needs_move = true;
    }

    /// Appends one command, routing it through the builder methods.
    pub fn push(&mut self, cmd: PathCommand) {
        match cmd {
            PathCommand::MoveTo(p) => self.move_to(p),
            PathCommand::LineTo(p) => self.line_to(p),
            PathCommand::QuadTo(c, p) => self.quad_to(c, p),
            PathCommand::ConicTo(c, p, w) => self.conic_to(c, p, w),
            PathCommand::CubicTo(c1, c2, p) => self.cubic_to(c1, c2, p),
            PathCommand::Close => self.close(),
        }
    }

    /// Adds a closed rectangle contour starting at the top-left corner.
    pub fn add_rect(&mut self, rect: Rect, direction: PathDirection) {
        let Rect { x0, y0, x1, y1 } = rect;
        self.move_to((x0, y0));
        match direction {
            PathDirection::Clockwise => {
                self.line_to((x1, y0));
                self.line_to((x1, y1));
                self.line_to((x0, y1));
            }
            PathDirection::CounterClockwise => {
                self.line_to((x0, y1));
                self.line_to((x1, y1));
                self.line_to((x1, y0));
            }
        }
        self.close();
    }

    /// Adds a closed oval inscribed in `rect`, made of four quarter conics.
    ///
    /// The contour starts at the middle of the right edge.
    pub fn add_oval(&mut self, rect: Rect, direction: PathDirection) {
        let rect = rect.abs();
        let Rect { x0, y0, x1, y1 } = rect;
        let c = rect.center();
        let w = SQRT_2 / 2.0;
        self.move_to((x1, c.y));
        match direction {
            PathDirection::Clockwise => {
                self.conic_to((x1, y1), (c.x, y1), w);
                self.conic_to((x0, y1), (x0, c.y), w);
                self.conic_to((x0, y0), (c.x, y0), w);
                self.conic_to((x1, y0), (x1, c.y), w);
            }
            PathDirection::CounterClockwise => {
                self.conic_to((x1, y0), (c.x, y0), w);
                self.conic_to((x0, y0), (x0, c.y), w);
                self.conic_to((x0, y1), (c.x, y1), w);
                self.conic_to((x1, y1), (x1, c.y), w);
            }
        }
        self.close();
    }

    /// Adds a closed circle.
    pub fn add_circle(&mut self, center: impl Into<Point>, radius: f64, direction: PathDirection) {
        let c = center.into();
        let r = radius.abs();
        self.add_oval(Rect::new(c.x - r, c.y - r, c.x + r, c.y + r), direction);
    }

    /// Adds a closed rounded rectangle.
    pub fn add_round_rect(&mut self, rrect: &RoundRect, direction: PathDirection) {
        rrect.append_to(self, direction);
    }

    /// Adds a polyline through `points`, optionally closing it.
    pub fn add_poly(&mut self, points: &[Point], close: bool) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.move_to(*first);
        for p in rest {
            self.line_to(*p);
        }
        if close {
            self.close();
        }
    }

    /// Appends every command of `other`, mapped through `transform`.
    pub fn add_path(&mut self, other: &Self, transform: &Affine) {
        for cmd in other.iter() {
            self.push(cmd.map_points(|p| *transform * p));
        }
    }

    /// Splits the path into one path per contour, each with this fill rule.
    pub fn contours(&self) -> Vec<Self> {
        let mut out: Vec<Self> = Vec::new();
        for cmd in self.iter() {
            if matches!(cmd, PathCommand::MoveTo(_)) || out.is_empty() {
                out.push(Self::with_fill_rule(self.fill_rule));
            }
            if let Some(contour) = out.last_mut() {
                contour.push(cmd);
            }
        }
        out
    }

    /// Adds an elliptical arc of `oval` as conics.
    ///
    /// Angles are in degrees, measured clockwise from the positive x axis in a
    /// y-down coordinate system; `sweep_angle` is clamped to one full turn. The
    /// arc starts a new contour when `force_move_to` is set or no contour is
    /// open, and is otherwise connected to the current point with a line.
    pub fn arc_to(&mut self, oval: Rect, start_angle: f64, sweep_angle: f64, force_move_to: bool) {
        let oval = oval.abs();
        let center = oval.center();
        let rx = oval.width() * 0.5;
        let ry = oval.height() * 0.5;
        let start = start_angle * (PI / 180.0);
        let sweep = (sweep_angle * (PI / 180.0)).clamp(-TAU, TAU);
        let point_at = |angle: f64| {
            let (s, c) = angle.sin_cos();
            Point::new(center.x + rx * c, center.y + ry * s)
        };

        let start_pt = point_at(start);
        if force_move_to || self.needs_move {
            self.move_to(start_pt);
        } else if self.current_point() != Some(start_pt) {
            self.line_to(start_pt);
        }
        if sweep == 0.0 || !sweep.is_finite() {
            return;
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "the sweep is clamped to one turn, so at most four segments"
        )]
        let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = sweep / segments as f64;
        let half = step * 0.5;
        let weight = half.sin_cos().1;
        for i in 0..segments {
            let a0 = start + step * i as f64;
            let (s, c) = (a0 + half).sin_cos();
            let ctrl = Point::new(center.x + rx * c / weight, center.y + ry * s / weight);
            self.conic_to(ctrl, point_at(a0 + step), weight);
        }
    }

    /// Bounds over every stored point, control points included.
    ///
    /// This is looser than the geometric bounds of curves. An empty path has
    /// zero bounds.
    pub fn bounds(&self) -> Rect {
        let mut bounds: Option<Rect> = None;
        for cmd in &self.commands {
            cmd.for_each_point(|p| {
                bounds = Some(match bounds {
                    Some(b) => b.union_pt(p),
                    None => Rect::from_points(p, p),
                });
            });
        }
        bounds.unwrap_or(Rect::ZERO)
    }

    /// Same as [`bounds`](Self::bounds).
    ///
    /// The legacy API distinguishes the two, but both walk control points.
    pub fn tight_bounds(&self) -> Rect {
        self.bounds()
    }

    /// Returns a copy with every point mapped through `transform`.
    ///
    /// Conic weights are kept: an affine image of a conic is a conic with the
    /// same weight.
    #[must_use]
    pub fn transform(&self, transform: &Affine) -> Self {
        Self {
            commands: self
                .commands
                .iter()
                .map(|cmd| cmd.map_points(|p| *transform * p))
                .collect(),
            fill_rule: self.fill_rule,
            last_move: self.last_move.map(|p| *transform * p),
            needs_move: self.needs_move,
        }
    }

    /// Returns a copy with every contour traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut out = Self::with_fill_rule(self.fill_rule);
        // Each drawing command paired with the point it starts from.
        let mut contour: Vec<(Point, PathCommand)> = Vec::new();
        let mut start = Point::ZERO;
        let mut current = Point::ZERO;
        let mut open = false;
        for cmd in self.iter() {
            match cmd {
                PathCommand::MoveTo(p) => {
                    if open {
                        out.push_reversed_contour(&mut contour, current, false);
                    }
                    start = p;
                    current = p;
                    open = true;
                }
                PathCommand::Close => {
                    out.push_reversed_contour(&mut contour, current, true);
                    current = start;
                    open = false;
                }
                _ => {
                    contour.push((current, cmd));
                    current = cmd.end_point().unwrap_or(current);
                }
            }
        }
        if open {
            out.push_reversed_contour(&mut contour, current, false);
        }
        out
    }

    fn push_reversed_contour(
        &mut self,
        contour: &mut Vec<(Point, PathCommand)>,
        end: Point,
        closed: bool,
    ) {
        self.move_to(end);
        for (from, cmd) in contour.drain(..).rev() {
            match cmd {
                PathCommand::LineTo(_) => self.line_to(from),
                PathCommand::QuadTo(c, _) => self.quad_to(c, from),
                PathCommand::ConicTo(c, _, w) => self.conic_to(c, from, w),
                PathCommand::CubicTo(c1, c2, _) => self.cubic_to(c2, c1, from),
                PathCommand::MoveTo(_) | PathCommand::Close => {}
            }
        }
        if closed {
            self.close();
        }
    }

    /// Returns `true` if `point` is inside the path under its fill rule.
    ///
    /// Every contour is treated as closed. Curves are flattened at unit
    /// resolution before the winding number is computed.
    pub fn contains(&self, point: impl Into<Point>) -> bool {
        let p = point.into();
        let winding: i32 = flatten(self, 1.0).iter().map(|c| c.winding(p)).sum();
        self.fill_rule.is_inside(winding)
    }

    /// Lowers the path to a kurbo [`BezPath`]; conics become quadratics.
    pub fn to_bez_path(&self) -> BezPath {
        let mut out = BezPath::new();
        let mut current = Point::ZERO;
        for cmd in self.iter() {
            match cmd {
                PathCommand::MoveTo(p) => out.move_to(p),
                PathCommand::LineTo(p) => out.line_to(p),
                PathCommand::QuadTo(c, p) => out.quad_to(c, p),
                PathCommand::ConicTo(c, p, w) => {
                    Conic::new(current, c, p, w)
                        .to_quads(CONIC_QUAD_POW2, |qc, qp| out.quad_to(qc, qp));
                }
                PathCommand::CubicTo(c1, c2, p) => out.curve_to(c1, c2, p),
                PathCommand::Close => out.close_path(),
            }
            if let Some(p) = cmd.end_point() {
                current = p;
            }
        }
        out
    }

    /// Builds a path from a kurbo [`BezPath`] with [`FillRule::NonZero`].
    pub fn from_bez_path(bez: &BezPath) -> Self {
        let mut out = Self::new();
        for el in bez.iter() {
            match el {
                PathEl::MoveTo(p) => out.move_to(p),
                PathEl::LineTo(p) => out.line_to(p),
                PathEl::QuadTo(c, p) => out.quad_to(c, p),
                PathEl::CurveTo(c1, c2, p) => out.cubic_to(c1, c2, p),
                PathEl::ClosePath => out.close(),
            }
        }
        out
    }
}

impl Extend<PathCommand> for Path {
    fn extend<I: IntoIterator<Item = PathCommand>>(&mut self, iter: I) {
        for cmd in iter {
            self.push(cmd);
        }
    }
}

impl FromIterator<PathCommand> for Path {
    fn from_iter<I: IntoIterator<Item = PathCommand>>(iter: I) -> Self {
        let mut path = Self::new();
        path.extend(iter);
        path
    }
}
