//! Benchmarks for display point smoothing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use silhouette::dsp::{
    curve::{DisplayPoint, DISPLAY_POINTS},
    smoothing,
};

pub fn bench_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/smoothing");

    let original: Vec<DisplayPoint> = (0..DISPLAY_POINTS)
        .map(|i| DisplayPoint {
            x: i as f32,
            y: ((i * 13) % 29) as f32,
        })
        .collect();
    let mut points = original.clone();

    for passes in [1usize, 3, 6] {
        group.bench_with_input(BenchmarkId::new("smooth", passes), &passes, |b, &passes| {
            b.iter(|| {
                points.copy_from_slice(&original);
                smoothing::smooth(black_box(&mut points), passes)
            })
        });
    }

    group.finish();
}
