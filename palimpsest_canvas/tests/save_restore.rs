// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the canvas save stack and clip layers.
//!
//! These drive a `Canvas` against the recording renderer and check that every
//! layer the canvas opens is closed again, whichever way the stack unwinds.

use kurbo::{Affine, Rect};
use palimpsest_canvas::{
    Canvas, CanvasConfig, CanvasError, ClipOperation, LayerBlend, LayerDesc, Paint,
    RenderCommand,
};
use palimpsest_canvas_ref::RecordingRenderer;
use palimpsest_color::{Color, ColorFilter, ColorMatrix, PorterDuff};
use palimpsest_path::{FillRule, Path, PathDirection, RoundRect};
use palimpsest_region::{IRect, Region, RegionOp};

fn config() -> CanvasConfig {
    CanvasConfig::new(100, 100)
}

#[test]
fn clip_inside_save_restore_returns_to_previous_depth() {
    let mut renderer = RecordingRenderer::new();
    {
        let mut canvas = Canvas::new(&mut renderer, config());
        canvas
            .draw_rect(Rect::new(0.0, 0.0, 10.0, 10.0), &Paint::new(Color::WHITE))
            .unwrap();
        let depth = canvas.layer_depth();

        canvas.save();
        canvas
            .clip_rect(Rect::new(5.0, 5.0, 15.0, 15.0), ClipOperation::Intersect, true)
            .unwrap();
        assert_eq!(canvas.layer_depth(), depth + 1);
        assert_eq!(canvas.device_clip_bounds(), IRect::new(5, 5, 15, 15));
        canvas.restore();

        assert_eq!(canvas.layer_depth(), depth);
        assert_eq!(canvas.device_clip_bounds(), IRect::new(0, 0, 100, 100));
    }

    let commands = renderer.commands();
    assert_eq!(commands.len(), 3);
    assert!(matches!(commands[0], RenderCommand::FillPath { .. }));
    let RenderCommand::PushLayer(layer) = &commands[1] else {
        panic!("expected the clip layer, got {:?}", commands[1]);
    };
    assert!(layer.is_clip());
    assert_eq!(layer.clip.bounds(), Rect::new(5.0, 5.0, 15.0, 15.0));
    assert_eq!(commands[2], RenderCommand::PopLayer);
}

#[test]
fn save_layer_then_restore_pops_exactly_one_layer() {
    let mut renderer = RecordingRenderer::new();
    {
        let mut canvas = Canvas::new(&mut renderer, config());
        let before = canvas.save_count();
        assert_eq!(canvas.save_layer(None, None), Ok(before));
        assert_eq!(canvas.save_count(), before + 1);
        canvas.restore();
        assert_eq!(canvas.save_count(), before);
        assert_eq!(canvas.layer_depth(), 0);
    }

    let pushes = renderer.count(|c| matches!(c, RenderCommand::PushLayer(_)));
    let pops = renderer.count(|c| *c == RenderCommand::PopLayer);
    assert_eq!((pushes, pops), (1, 1));
}

#[test]
fn save_layer_alpha_comes_from_paint_opacity_and_color() {
    let mut renderer = RecordingRenderer::new();
    {
        let mut canvas = Canvas::new(&mut renderer, config());
        let paint = Paint::new(Color::new([0.0, 0.0, 0.0, 0.5]))
            .with_opacity(0.5)
            .with_blend_mode(PorterDuff::DstOver);
        canvas
            .save_layer(Some(Rect::new(10.0, 10.0, 20.0, 20.0)), Some(&paint))
            .unwrap();
        assert_eq!(canvas.device_clip_bounds(), IRect::new(10, 10, 20, 20));
        assert_eq!(canvas.save_layer_alpha(None, 51), 2);
    }

    let layers: Vec<&LayerDesc> = renderer
        .commands()
        .iter()
        .filter_map(|c| match c {
            RenderCommand::PushLayer(layer) => Some(layer),
            _ => None,
        })
        .collect();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0].alpha, 0.25);
    assert_eq!(layers[0].blend, LayerBlend::Blend(PorterDuff::DstOver));
    assert_eq!(layers[1].alpha, 0.2);
    assert_eq!(layers[1].blend, LayerBlend::Blend(PorterDuff::SrcOver));
    assert_eq!(renderer.layer_depth(), 0, "dropping the canvas closes both layers");
}

#[test]
fn save_layer_with_color_filter_is_not_implemented() {
    let mut renderer = RecordingRenderer::new();
    let mut canvas = Canvas::new(&mut renderer, config());
    let paint =
        Paint::default().with_color_filter(ColorFilter::Matrix(ColorMatrix::saturation(0.0)));
    assert!(matches!(
        canvas.save_layer(None, Some(&paint)),
        Err(CanvasError::NotImplemented(_))
    ));
    assert_eq!(canvas.save_count(), 1, "a failed save_layer does not save");
    assert_eq!(canvas.layer_depth(), 0);
}

#[test]
fn restore_pops_every_layer_opened_since_save() {
    let mut renderer = RecordingRenderer::new();
    let mut canvas = Canvas::new(&mut renderer, config());

    canvas.save();
    canvas
        .clip_rect(Rect::new(0.0, 0.0, 50.0, 50.0), ClipOperation::Intersect, true)
        .unwrap();
    canvas
        .clip_round_rect(
            &RoundRect::from_rect_xy(Rect::new(0.0, 0.0, 40.0, 40.0), 4.0, 4.0),
            ClipOperation::Intersect,
            true,
        )
        .unwrap();
    canvas.save_layer(None, None).unwrap();
    assert_eq!(canvas.layer_depth(), 3);
    assert_eq!(canvas.save_count(), 3);

    canvas.restore();
    assert_eq!(canvas.layer_depth(), 2, "only the saved layer is closed");
    canvas.restore();
    assert_eq!(canvas.layer_depth(), 0);
    assert_eq!(canvas.save_count(), 1);

    // Restoring with nothing saved is ignored.
    canvas.restore();
    assert_eq!(canvas.save_count(), 1);
    assert_eq!(canvas.renderer().layer_depth(), 0);
}

#[test]
fn restore_to_count_unwinds_several_entries() {
    let mut renderer = RecordingRenderer::new();
    let mut canvas = Canvas::new(&mut renderer, config());

    let outer = canvas.save();
    canvas.translate(10.0, 10.0);
    canvas
        .clip_rect(Rect::new(0.0, 0.0, 10.0, 10.0), ClipOperation::Intersect, true)
        .unwrap();
    canvas.save();
    canvas.scale(2.0, 2.0);
    canvas
        .clip_rect(Rect::new(0.0, 0.0, 2.0, 2.0), ClipOperation::Intersect, true)
        .unwrap();

    canvas.restore_to_count(outer + 1);
    assert_eq!(canvas.save_count(), outer + 1);
    assert_eq!(canvas.layer_depth(), 1);
    assert_eq!(canvas.total_matrix(), Affine::translate((10.0, 10.0)));

    canvas.restore_to_count(0);
    assert_eq!(canvas.save_count(), 1);
    assert_eq!(canvas.layer_depth(), 0);
    assert_eq!(canvas.total_matrix(), Affine::IDENTITY);
}

#[test]
fn dropping_the_canvas_balances_the_renderer() {
    let mut renderer = RecordingRenderer::new();
    {
        let mut canvas = Canvas::new(&mut renderer, config());
        canvas
            .clip_rect(Rect::new(0.0, 0.0, 50.0, 50.0), ClipOperation::Intersect, true)
            .unwrap();
        canvas.save();
        canvas.save_layer_alpha(None, 128);
        canvas
            .clip_rect(Rect::new(0.0, 0.0, 5.0, 5.0), ClipOperation::Difference, false)
            .unwrap();
        assert_eq!(canvas.layer_depth(), 3);
    }
    assert_eq!(renderer.layer_depth(), 0);
    assert_eq!(renderer.max_layer_depth(), 3);
    assert_eq!(renderer.count(|c| *c == RenderCommand::PopLayer), 3);
}

#[test]
fn clip_to_region_uses_device_space() {
    let mut region = Region::from_rect(IRect::new(0, 0, 10, 10));
    region.op(IRect::new(20, 0, 30, 10), RegionOp::Union);

    let mut renderer = RecordingRenderer::new();
    {
        let mut canvas = Canvas::new(&mut renderer, config());
        canvas.translate(50.0, 50.0);
        canvas.clip_region(&region, ClipOperation::Intersect).unwrap();
        assert_eq!(canvas.device_clip_bounds(), IRect::new(0, 0, 30, 10));
    }

    let RenderCommand::PushLayer(layer) = &renderer.commands()[0] else {
        panic!("expected a clip layer");
    };
    assert_eq!(layer.transform, Affine::IDENTITY);
    assert_eq!(layer.fill_rule, FillRule::NonZero);
    assert_eq!(layer.clip.contour_count(), 2);
}

#[test]
fn inverse_even_odd_clip_keeps_the_outside() {
    let mut renderer = RecordingRenderer::new();
    {
        let mut canvas = Canvas::new(&mut renderer, config());
        let mut path = Path::from_rect(Rect::new(10.0, 10.0, 20.0, 20.0));
        path.set_fill_rule(FillRule::InverseEvenOdd);
        canvas
            .clip_path(&path, ClipOperation::Intersect, true)
            .unwrap();
    }

    let RenderCommand::PushLayer(layer) = &renderer.commands()[0] else {
        panic!("expected a clip layer");
    };
    let mut clip = layer.clip.clone();
    clip.set_fill_rule(layer.fill_rule);
    assert!(clip.contains((50.0, 50.0)));
    assert!(!clip.contains((15.0, 15.0)));
}

#[test]
fn difference_of_an_inverse_path_keeps_the_inside() {
    let mut renderer = RecordingRenderer::new();
    {
        let mut canvas = Canvas::new(&mut renderer, config());
        let mut path = Path::from_rect(Rect::new(10.0, 10.0, 20.0, 20.0));
        path.set_fill_rule(FillRule::InverseNonZero);
        canvas
            .clip_path(&path, ClipOperation::Difference, true)
            .unwrap();
        assert_eq!(canvas.device_clip_bounds(), IRect::new(10, 10, 20, 20));
    }

    let RenderCommand::PushLayer(layer) = &renderer.commands()[0] else {
        panic!("expected a clip layer");
    };
    assert_eq!(layer.fill_rule, FillRule::NonZero);
}

#[test]
fn local_clip_bounds_follow_the_transform() {
    let mut renderer = RecordingRenderer::new();
    let mut canvas = Canvas::new(&mut renderer, config());
    canvas
        .clip_rect(Rect::new(20.0, 20.0, 60.0, 60.0), ClipOperation::Intersect, true)
        .unwrap();
    canvas.scale(2.0, 2.0);
    assert_eq!(canvas.local_clip_bounds(), Rect::new(10.0, 10.0, 30.0, 30.0));
    assert!(canvas.quick_reject(Rect::new(0.0, 0.0, 5.0, 5.0)));
    assert!(!canvas.quick_reject(Rect::new(0.0, 0.0, 15.0, 15.0)));
}

/// The first layer a clip pushed, with the layer's fill rule applied.
fn clip_layer_of(path: &Path, op: ClipOperation) -> Path {
    let mut renderer = RecordingRenderer::new();
    {
        let mut canvas = Canvas::new(&mut renderer, config());
        canvas.clip_path(path, op, true).unwrap();
    }
    let RenderCommand::PushLayer(layer) = &renderer.commands()[0] else {
        panic!("expected a clip layer");
    };
    assert_eq!(layer.fill_rule, FillRule::NonZero, "clip layers are non-zero");
    let mut clip = layer.clip.clone();
    clip.set_fill_rule(layer.fill_rule);
    clip
}

fn ring(rule: FillRule, inner: PathDirection) -> Path {
    let mut path = Path::with_fill_rule(rule);
    path.add_rect(Rect::new(10.0, 10.0, 40.0, 40.0), PathDirection::Clockwise);
    path.add_rect(Rect::new(20.0, 20.0, 30.0, 30.0), inner);
    path
}

#[test]
fn difference_of_a_counter_clockwise_path_cuts_a_hole() {
    let mut path = Path::new();
    path.add_rect(Rect::new(5.0, 5.0, 10.0, 10.0), PathDirection::CounterClockwise);
    let clip = clip_layer_of(&path, ClipOperation::Difference);
    assert!(!clip.contains((7.0, 7.0)));
    assert!(clip.contains((50.0, 50.0)));
}

#[test]
fn difference_of_an_even_odd_path_cuts_a_hole() {
    let mut path = Path::with_fill_rule(FillRule::EvenOdd);
    path.add_rect(Rect::new(5.0, 5.0, 10.0, 10.0), PathDirection::Clockwise);
    let clip = clip_layer_of(&path, ClipOperation::Difference);
    assert!(!clip.contains((7.0, 7.0)));
    assert!(clip.contains((50.0, 50.0)));
}

#[test]
fn difference_of_an_even_odd_ring_keeps_the_ring_hole() {
    let clip = clip_layer_of(
        &ring(FillRule::EvenOdd, PathDirection::Clockwise),
        ClipOperation::Difference,
    );
    assert!(!clip.contains((15.0, 15.0)), "the ring itself is removed");
    assert!(clip.contains((25.0, 25.0)), "the ring's hole stays visible");
    assert!(clip.contains((50.0, 50.0)));
}

#[test]
fn difference_of_nested_non_zero_contours_removes_both() {
    let clip = clip_layer_of(
        &ring(FillRule::NonZero, PathDirection::Clockwise),
        ClipOperation::Difference,
    );
    assert!(!clip.contains((15.0, 15.0)));
    assert!(!clip.contains((25.0, 25.0)), "same-direction nesting winds twice");
    assert!(clip.contains((50.0, 50.0)));

    let clip = clip_layer_of(
        &ring(FillRule::NonZero, PathDirection::CounterClockwise),
        ClipOperation::Difference,
    );
    assert!(!clip.contains((15.0, 15.0)));
    assert!(clip.contains((25.0, 25.0)), "opposite nesting leaves a hole");
}

#[test]
fn even_odd_intersect_clip_is_emitted_as_non_zero() {
    let clip = clip_layer_of(
        &ring(FillRule::EvenOdd, PathDirection::Clockwise),
        ClipOperation::Intersect,
    );
    assert!(clip.contains((15.0, 15.0)));
    assert!(!clip.contains((25.0, 25.0)));
    assert!(!clip.contains((50.0, 50.0)));
}
