// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=palimpsest_canvas_ref --heading-base-level=0

//! Palimpsest Canvas Reference Renderer.
//!
//! This crate provides [`RecordingRenderer`], a [`SceneRenderer`] that keeps
//! every call as a [`RenderCommand`] together with the layer depth at which it
//! was issued.
//!
//! It is intentionally *not* a rasterizer:
//! - It does **not** produce pixels.
//! - It checks the nesting contract: popping a layer that was never pushed
//!   panics, like a real scene would.
//! - It is intended for tests and debugging that want to assert on what a
//!   [`Canvas`](palimpsest_canvas::Canvas) emitted.
//!
//! A recording can be moved into another renderer with
//! [`replay`](palimpsest_canvas::replay).

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Affine;
use palimpsest_canvas::{GlyphRun, LayerDesc, RenderCommand, SceneRenderer};
use palimpsest_color::{Brush, ImageBrush};
use palimpsest_path::{FillRule, Path, StrokeStyle};

/// A command and the number of layers open when it was issued.
///
/// For [`RenderCommand::PushLayer`] the depth includes the new layer; for
/// [`RenderCommand::PopLayer`] it is the depth after the pop.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// The renderer call.
    pub command: RenderCommand,
    /// Layer depth after the call.
    pub layer_depth: usize,
}

/// Renderer that records calls instead of drawing.
#[derive(Default, Debug)]
pub struct RecordingRenderer {
    events: Vec<Event>,
    commands: Vec<RenderCommand>,
    layers: Vec<LayerDesc>,
    max_layer_depth: usize,
    recording_start: Option<usize>,
}

impl RecordingRenderer {
    /// An empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands, in call order.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Recorded commands with their layer depths.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of layers currently open.
    pub fn layer_depth(&self) -> usize {
        self.layers.len()
    }

    /// Layers currently open, outermost first.
    pub fn open_layers(&self) -> &[LayerDesc] {
        &self.layers
    }

    /// Deepest layer nesting seen since creation or the last clear.
    pub fn max_layer_depth(&self) -> usize {
        self.max_layer_depth
    }

    /// Number of recorded commands matching `pred`.
    pub fn count(&self, pred: impl Fn(&RenderCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Clears the recorded commands, keeping open layers.
    pub fn clear_commands(&mut self) {
        self.events.clear();
        self.commands.clear();
        self.max_layer_depth = self.layers.len();
        self.recording_start = None;
    }

    /// Marks the start of a recording; a later mark replaces an earlier one.
    pub fn begin_record(&mut self) {
        self.recording_start = Some(self.commands.len());
    }

    /// Returns the commands issued since [`begin_record`](Self::begin_record).
    ///
    /// Without a mark the result is empty.
    pub fn end_record(&mut self) -> Vec<RenderCommand> {
        let start = self.recording_start.take().unwrap_or(self.commands.len());
        self.commands[start..].to_vec()
    }

    fn push(&mut self, command: RenderCommand) {
        self.events.push(Event {
            command: command.clone(),
            layer_depth: self.layers.len(),
        });
        self.commands.push(command);
    }
}

impl SceneRenderer for RecordingRenderer {
    fn fill_path(&mut self, path: &Path, fill_rule: FillRule, transform: Affine, brush: &Brush) {
        self.push(RenderCommand::FillPath {
            path: path.clone(),
            fill_rule,
            transform,
            brush: brush.clone(),
        });
    }

    fn stroke_path(&mut self, path: &Path, style: &StrokeStyle, transform: Affine, brush: &Brush) {
        self.push(RenderCommand::StrokePath {
            path: path.clone(),
            style: style.clone(),
            transform,
            brush: brush.clone(),
        });
    }

    fn push_layer(&mut self, layer: &LayerDesc) {
        self.layers.push(layer.clone());
        self.max_layer_depth = self.max_layer_depth.max(self.layers.len());
        self.push(RenderCommand::PushLayer(layer.clone()));
    }

    fn pop_layer(&mut self) {
        if self.layers.pop().is_none() {
            panic!("RecordingRenderer: pop_layer with no open layer");
        }
        self.push(RenderCommand::PopLayer);
    }

    fn draw_image(&mut self, brush: &ImageBrush, transform: Affine) {
        self.push(RenderCommand::DrawImage {
            brush: brush.clone(),
            transform,
        });
    }

    fn draw_glyph_run(&mut self, run: &GlyphRun) {
        self.push(RenderCommand::DrawGlyphRun(run.clone()));
    }

    fn reset(&mut self) {
        self.push(RenderCommand::Reset);
    }
}
