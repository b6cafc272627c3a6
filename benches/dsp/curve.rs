//! Benchmarks for the perceptual curve mapper.

use std::hint::black_box;

use criterion::Criterion;
use silhouette::dsp::curve::{map_to_display_points, DisplayPoint, DISPLAY_POINTS};

pub fn bench_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/curve");

    let bins: Vec<u8> = (0..2048).map(|i| (i * 37 % 256) as u8).collect();
    let mut points = [DisplayPoint::default(); DISPLAY_POINTS];

    group.bench_function("map_to_display_points", |b| {
        b.iter(|| {
            map_to_display_points(
                black_box(&bins),
                black_box(48_000.0),
                1280.0,
                400.0,
                black_box(&mut points),
            )
        })
    });

    group.finish();
}
