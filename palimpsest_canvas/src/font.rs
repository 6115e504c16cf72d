// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font metrics and glyph cache accounting for text drawing.

use core::fmt;

use hashbrown::HashMap;
use kurbo::{Size, Vec2};

use crate::renderer::FontId;

/// Default glyph cache budget, in bytes.
pub const DEFAULT_FONT_CACHE_LIMIT: usize = 2 * 1024 * 1024;

/// Metrics of one glyph at one size.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GlyphMetrics {
    /// Horizontal pen advance.
    pub advance: f32,
    /// Offset from the pen position to the top left of the glyph box.
    pub bearing: Vec2,
    /// Size of the glyph box.
    pub extent: Size,
}

/// Maps characters to glyphs and measures them.
///
/// Missing mappings are not errors: text layout skips the character.
pub trait FontMetrics {
    /// The glyph for `ch`, if the font has one.
    fn glyph_index(&self, ch: char) -> Option<u32>;

    /// Metrics of `glyph` at `font_size`, if known.
    fn glyph_metrics(&self, glyph: u32, font_size: f32) -> Option<GlyphMetrics>;
}

/// A font at a size: the renderer resource plus its metrics.
#[derive(Copy, Clone)]
pub struct Font<'a> {
    /// Renderer-side font resource.
    pub id: FontId,
    /// Glyph mapping and measurement.
    pub metrics: &'a dyn FontMetrics,
    /// Font size in local units.
    pub size: f32,
}

impl fmt::Debug for Font<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("id", &self.id)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl<'a> Font<'a> {
    /// Pairs a font resource with its metrics.
    pub fn new(id: FontId, metrics: &'a dyn FontMetrics, size: f32) -> Self {
        Self { id, metrics, size }
    }

    /// Returns `true` if both refer to the same resource at the same size.
    pub fn same_face(&self, other: &Self) -> bool {
        self.id == other.id && self.size == other.size
    }
}

/// A piece of text drawn with one font.
#[derive(Copy, Clone, Debug)]
pub struct TextSpan<'a> {
    /// The characters.
    pub text: &'a str,
    /// The font.
    pub font: Font<'a>,
}

impl<'a> TextSpan<'a> {
    /// Creates a span.
    pub fn new(text: &'a str, font: Font<'a>) -> Self {
        Self { text, font }
    }
}

#[derive(Debug)]
struct Counters {
    limit: usize,
    used: usize,
    per_font: HashMap<FontId, usize>,
}

/// Glyph cache budget shared by every canvas of a process.
///
/// The counters are created on first use with [`DEFAULT_FONT_CACHE_LIMIT`]
/// and can be dropped again with [`reset`](Self::reset). Callers own the
/// value and pass it to the canvas text calls; nothing here is global.
#[derive(Debug, Default)]
pub struct FontCache {
    counters: Option<Counters>,
}

impl FontCache {
    /// An uninitialized cache.
    pub const fn new() -> Self {
        Self { counters: None }
    }

    fn counters(&mut self) -> &mut Counters {
        self.counters.get_or_insert_with(|| Counters {
            limit: DEFAULT_FONT_CACHE_LIMIT,
            used: 0,
            per_font: HashMap::new(),
        })
    }

    /// Returns `true` once the counters exist.
    pub fn is_initialized(&self) -> bool {
        self.counters.is_some()
    }

    /// The budget in bytes.
    pub fn limit(&self) -> usize {
        self.counters
            .as_ref()
            .map_or(DEFAULT_FONT_CACHE_LIMIT, |c| c.limit)
    }

    /// Sets the budget and returns the previous one.
    ///
    /// Usage above the new budget is purged.
    pub fn set_limit(&mut self, limit: usize) -> usize {
        let counters = self.counters();
        let old = core::mem::replace(&mut counters.limit, limit);
        if counters.used > limit {
            self.purge();
        }
        old
    }

    /// Bytes currently accounted for.
    pub fn used(&self) -> usize {
        self.counters.as_ref().map_or(0, |c| c.used)
    }

    /// Bytes accounted for one font.
    pub fn used_by(&self, font: FontId) -> usize {
        self.counters
            .as_ref()
            .and_then(|c| c.per_font.get(&font).copied())
            .unwrap_or(0)
    }

    /// Accounts for `bytes` of glyph data for `font`.
    ///
    /// If the total would exceed the budget the cache is purged first.
    pub fn record(&mut self, font: FontId, bytes: usize) {
        let counters = self.counters();
        if counters.used.saturating_add(bytes) > counters.limit {
            tracing::debug!(
                used = counters.used,
                limit = counters.limit,
                "font cache over budget, purging"
            );
            counters.used = 0;
            counters.per_font.clear();
        }
        counters.used = counters.used.saturating_add(bytes);
        let entry = counters.per_font.entry(font).or_insert(0);
        *entry = entry.saturating_add(bytes);
    }

    /// Drops all accounted usage, keeping the budget.
    pub fn purge(&mut self) {
        if let Some(counters) = &mut self.counters {
            counters.used = 0;
            counters.per_font.clear();
        }
    }

    /// Returns to the uninitialized state.
    pub fn reset(&mut self) {
        self.counters = None;
    }
}
