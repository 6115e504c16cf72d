// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use palimpsest_canvas::{Canvas, CanvasConfig, ClipOperation, Paint};
use palimpsest_canvas_ref::RecordingRenderer;
use palimpsest_color::{
    AlphaMode, Color, ColorFilter, ColorMatrix, ImageBuffer, transform_image,
};
use palimpsest_path::{DashPattern, StrokeStyle};

fn bench_canvas(c: &mut Criterion) {
    let mut group = c.benchmark_group("palimpsest_canvas");
    group.sample_size(50);

    group.bench_function("nested_clips_and_restore(depth=32)", |b| {
        let mut renderer = RecordingRenderer::new();
        b.iter(|| {
            renderer.clear_commands();
            let mut canvas = Canvas::new(&mut renderer, CanvasConfig::new(512, 512));
            for i in 0..32 {
                let inset = f64::from(i);
                canvas.save();
                let _ = canvas.clip_rect(
                    Rect::new(inset, inset, 512.0 - inset, 512.0 - inset),
                    ClipOperation::Intersect,
                    true,
                );
                let _ = canvas.draw_rect(
                    Rect::new(inset, inset, inset + 4.0, inset + 4.0),
                    &Paint::new(Color::BLACK),
                );
            }
            canvas.restore_to_count(1);
            black_box(canvas.layer_depth())
        });
    });

    let dashed = Paint::default().with_stroke(
        StrokeStyle::new(2.0).with_dash(DashPattern::new(&[4.0, 2.0], 0.0).expect("valid dash")),
    );
    group.bench_function("dashed_oval", |b| {
        let mut renderer = RecordingRenderer::new();
        b.iter(|| {
            renderer.clear_commands();
            let mut canvas = Canvas::new(&mut renderer, CanvasConfig::new(512, 512));
            let _ = canvas.draw_oval(black_box(Rect::new(10.0, 10.0, 300.0, 200.0)), &dashed);
        });
    });

    let pixels = vec![200_u8; 256 * 256 * 4];
    let image = ImageBuffer::from_rgba8(256, 256, AlphaMode::Premultiplied, pixels)
        .expect("valid image");
    let filter = ColorFilter::Matrix(ColorMatrix::saturation(0.2));
    group.bench_function("transform_image(256x256)", |b| {
        b.iter(|| black_box(transform_image(black_box(&image), &filter)));
    });

    group.finish();
}

criterion_group!(benches, bench_canvas);
criterion_main!(benches);
