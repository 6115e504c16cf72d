// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use palimpsest_region::{IRect, Region, RegionOp};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn next_i32(&mut self, upper_exclusive: i32) -> i32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((self.0 >> 33) as i32).rem_euclid(upper_exclusive)
    }

    fn rect(&mut self) -> IRect {
        let x = self.next_i32(900);
        let y = self.next_i32(900);
        let w = 1 + self.next_i32(100);
        let h = 1 + self.next_i32(100);
        IRect::from_xywh(x, y, w, h)
    }
}

fn build_region(n: usize, seed: u64) -> Region {
    let mut rng = Lcg(seed);
    let mut region = Region::new();
    for _ in 0..n {
        region.op(rng.rect(), RegionOp::Union);
    }
    region
}

fn bench_region(c: &mut Criterion) {
    let mut group = c.benchmark_group("palimpsest_region");
    group.sample_size(50);

    for n in [16_usize, 128] {
        for op in [
            RegionOp::Union,
            RegionOp::Intersect,
            RegionOp::Difference,
            RegionOp::Xor,
            RegionOp::ReverseDifference,
        ] {
            group.bench_function(format!("{op:?}(n={n})"), |b| {
                let base = build_region(n, 0x5eed);
                let mut rng = Lcg(7);
                b.iter_batched(
                    || (base.clone(), rng.rect()),
                    |(mut region, rect)| {
                        region.op(rect, op);
                        black_box(region)
                    },
                    BatchSize::SmallInput,
                );
            });
        }

        group.bench_function(format!("op_region_xor(n={n})"), |b| {
            let a = build_region(n, 1);
            let other = build_region(n, 2);
            b.iter_batched(
                || a.clone(),
                |mut region| {
                    region.op_region(&other, RegionOp::Xor);
                    black_box(region)
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_region);
criterion_main!(benches);
