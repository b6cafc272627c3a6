//! Benchmarks for gain and fade automation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use silhouette::dsp::{automation::ParamTimeline, gain};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_gain(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/gain");

    for &size in BLOCK_SIZES {
        // Stereo interleaved
        let signal: Vec<f32> = (0..size * 2)
            .map(|i| (i as f32 / size as f32) - 1.0)
            .collect();
        let mut block = signal.clone();
        let mut gains = vec![0.0f32; size];
        let mut mono = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("apply_gain", size), &size, |b, _| {
            b.iter(|| {
                block.copy_from_slice(&signal);
                gain::apply_gain(black_box(&mut block), black_box(0.5))
            })
        });

        group.bench_with_input(BenchmarkId::new("fade_in_ramp", size), &size, |b, _| {
            let mut timeline = ParamTimeline::new(0.0);
            b.iter(|| {
                timeline.reset(0.0);
                timeline.set_value_at_time(0.0, 0.0);
                timeline.linear_ramp_to_value_at_time(1.0, 0.8);
                timeline.render(black_box(&mut gains), 0.4, SAMPLE_RATE);
                block.copy_from_slice(&signal);
                gain::apply_frame_gains(black_box(&mut block), 2, &gains)
            })
        });

        group.bench_with_input(BenchmarkId::new("downmix", size), &size, |b, _| {
            b.iter(|| gain::downmix(black_box(&signal), 2, black_box(&mut mono)))
        });
    }

    group.finish();
}
