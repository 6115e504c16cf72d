// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use palimpsest_path::{
    Cap, DashPattern, Join, Path, PathDirection, PathMeasure, RoundRect, StrokeStyle, dash_path,
    flatten, stroke_to_fill,
};

/// A wavy open contour of `n` cubic segments.
fn wave(n: usize) -> Path {
    let mut path = Path::new();
    path.move_to((0.0, 0.0));
    for i in 0..n {
        let x = i as f64 * 10.0;
        path.cubic_to((x + 3.0, 8.0), (x + 7.0, -8.0), (x + 10.0, 0.0));
    }
    path
}

fn shapes() -> Path {
    let mut path = Path::new();
    for i in 0..32 {
        let o = f64::from(i) * 12.0;
        path.add_oval(Rect::new(o, 0.0, o + 10.0, 6.0), PathDirection::Clockwise);
        path.add_round_rect(
            &RoundRect::from_rect_xy(Rect::new(o, 10.0, o + 10.0, 20.0), 3.0, 2.0),
            PathDirection::CounterClockwise,
        );
    }
    path
}

fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("palimpsest_path");
    group.sample_size(50);

    for n in [16_usize, 256] {
        let path = wave(n);
        group.bench_function(format!("flatten(n={n})"), |b| {
            b.iter(|| black_box(flatten(black_box(&path), 1.0)));
        });
        group.bench_function(format!("measure_build(n={n})"), |b| {
            b.iter(|| black_box(PathMeasure::new(black_box(&path), false, 1.0)));
        });

        let measure = PathMeasure::new(&path, false, 1.0);
        let length = measure.length();
        group.bench_function(format!("measure_query(n={n})"), |b| {
            let mut d = 0.0;
            b.iter(|| {
                d = (d + 7.3) % length;
                black_box(measure.position_and_tangent(black_box(d)))
            });
        });

        let pattern = DashPattern::new(&[6.0, 3.0, 1.0, 3.0], 2.0).expect("valid dash");
        group.bench_function(format!("dash(n={n})"), |b| {
            b.iter(|| black_box(dash_path(black_box(&path), &pattern, 1.0)));
        });
    }

    let outlines = shapes();
    let style = StrokeStyle::new(2.0)
        .with_caps(Cap::Round)
        .with_join(Join::Round);
    group.bench_function("stroke_to_fill(shapes)", |b| {
        b.iter(|| black_box(stroke_to_fill(black_box(&outlines), &style, 0.1, 1.0)));
    });
    group.bench_function("contains(shapes)", |b| {
        b.iter(|| black_box(outlines.contains(black_box(Point::new(55.0, 15.0)))));
    });

    group.finish();
}

criterion_group!(benches, bench_geometry);
criterion_main!(benches);
