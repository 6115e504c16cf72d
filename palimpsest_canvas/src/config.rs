// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;
use palimpsest_path::DEFAULT_STROKE_TOLERANCE;

/// Half extent of the device area assumed when no device size is configured.
pub const UNSIZED_DEVICE_EXTENT: f64 = 1.0e6;

/// Run-time settings for a [`Canvas`](crate::Canvas).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanvasConfig {
    /// Device width in pixels; zero means unsized.
    pub width: u32,
    /// Device height in pixels; zero means unsized.
    pub height: u32,
    /// Scale applied to curve subdivision counts when measuring and dashing.
    pub resolution_scale: f64,
    /// Flattening tolerance used when strokes are expanded into fills.
    pub stroke_tolerance: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            resolution_scale: 1.0,
            stroke_tolerance: DEFAULT_STROKE_TOLERANCE,
        }
    }
}

impl CanvasConfig {
    /// A configuration for a device of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Builder method for setting the device size.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder method for setting the resolution scale.
    #[must_use]
    pub fn with_resolution_scale(mut self, scale: f64) -> Self {
        self.resolution_scale = scale;
        self
    }

    /// Builder method for setting the stroke expansion tolerance.
    #[must_use]
    pub fn with_stroke_tolerance(mut self, tolerance: f64) -> Self {
        self.stroke_tolerance = tolerance;
        self
    }

    /// The device area in device pixels.
    ///
    /// An unsized device is treated as a large square centered on the origin.
    pub fn device_rect(&self) -> Rect {
        if self.width == 0 || self.height == 0 {
            Rect::new(
                -UNSIZED_DEVICE_EXTENT,
                -UNSIZED_DEVICE_EXTENT,
                UNSIZED_DEVICE_EXTENT,
                UNSIZED_DEVICE_EXTENT,
            )
        } else {
            Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
        }
    }
}
