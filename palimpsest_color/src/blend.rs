// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Porter-Duff compositing of single colors.

use peniko::{BlendMode, Color, Compose, Mix};

/// The twelve Porter-Duff compositing operators.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PorterDuff {
    /// Neither source nor destination.
    Clear,
    /// Source only.
    Src,
    /// Destination only.
    Dst,
    /// Source over destination.
    #[default]
    SrcOver,
    /// Destination over source.
    DstOver,
    /// Source where the destination is.
    SrcIn,
    /// Destination where the source is.
    DstIn,
    /// Source where the destination is not.
    SrcOut,
    /// Destination where the source is not.
    DstOut,
    /// Source over destination, only where the destination is.
    SrcATop,
    /// Destination over source, only where the source is.
    DstATop,
    /// Source and destination where the other is not.
    Xor,
}

impl PorterDuff {
    /// All operators, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Clear,
        Self::Src,
        Self::Dst,
        Self::SrcOver,
        Self::DstOver,
        Self::SrcIn,
        Self::DstIn,
        Self::SrcOut,
        Self::DstOut,
        Self::SrcATop,
        Self::DstATop,
        Self::Xor,
    ];

    /// The `(Fa, Fb)` weights applied to premultiplied source and destination.
    fn factors(self, src_alpha: f32, dst_alpha: f32) -> (f32, f32) {
        match self {
            Self::Clear => (0.0, 0.0),
            Self::Src => (1.0, 0.0),
            Self::Dst => (0.0, 1.0),
            Self::SrcOver => (1.0, 1.0 - src_alpha),
            Self::DstOver => (1.0 - dst_alpha, 1.0),
            Self::SrcIn => (dst_alpha, 0.0),
            Self::DstIn => (0.0, src_alpha),
            Self::SrcOut => (1.0 - dst_alpha, 0.0),
            Self::DstOut => (0.0, 1.0 - src_alpha),
            Self::SrcATop => (dst_alpha, 1.0 - src_alpha),
            Self::DstATop => (1.0 - dst_alpha, src_alpha),
            Self::Xor => (1.0 - dst_alpha, 1.0 - src_alpha),
        }
    }

    /// Composites `src` onto `dst`; both and the result are straight alpha.
    ///
    /// The colors are premultiplied, weighted, summed and unpremultiplied.
    /// Alpha is clamped to `[0, 1]`; a result with no alpha is transparent
    /// black.
    pub fn blend(self, src: Color, dst: Color) -> Color {
        let s = premultiply(src.components);
        let d = premultiply(dst.components);
        let (fa, fb) = self.factors(s[3], d[3]);
        let alpha = (s[3] * fa + d[3] * fb).clamp(0.0, 1.0);
        if alpha.is_nan() || alpha <= 0.0 {
            return Color::TRANSPARENT;
        }
        let channel = |i: usize| ((s[i] * fa + d[i] * fb) / alpha).clamp(0.0, 1.0);
        Color::new([channel(0), channel(1), channel(2), alpha])
    }

    /// The matching renderer blend mode.
    pub fn to_peniko(self) -> BlendMode {
        let compose = match self {
            Self::Clear => Compose::Clear,
            Self::Src => Compose::Copy,
            Self::Dst => Compose::Dest,
            Self::SrcOver => Compose::SrcOver,
            Self::DstOver => Compose::DestOver,
            Self::SrcIn => Compose::SrcIn,
            Self::DstIn => Compose::DestIn,
            Self::SrcOut => Compose::SrcOut,
            Self::DstOut => Compose::DestOut,
            Self::SrcATop => Compose::SrcAtop,
            Self::DstATop => Compose::DestAtop,
            Self::Xor => Compose::Xor,
        };
        BlendMode::new(Mix::Normal, compose)
    }
}

fn premultiply([r, g, b, a]: [f32; 4]) -> [f32; 4] {
    let a = a.clamp(0.0, 1.0);
    [r * a, g * a, b * a, a]
}
