//! Benchmarks for the frequency analyser.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use silhouette::{config::AnalyserConfig, dsp::analyser::FrequencyAnalyser};

const FFT_SIZES: &[usize] = &[1024, 2048, 4096];

pub fn bench_analyser(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/analyser");

    for &size in FFT_SIZES {
        let config = AnalyserConfig {
            fft_size: size,
            ..AnalyserConfig::default()
        };
        let Ok(mut analyser) = FrequencyAnalyser::new(config) else {
            continue;
        };
        let signal: Vec<f32> = (0..size)
            .map(|i| (std::f32::consts::TAU * 440.0 * i as f32 / 48_000.0).sin())
            .collect();
        let mut bytes = vec![0u8; size / 2];

        group.bench_with_input(BenchmarkId::new("analyse_to_bytes", size), &size, |b, _| {
            b.iter(|| {
                analyser.analyse(black_box(&signal));
                analyser.byte_frequency_data(black_box(&mut bytes));
            })
        });
    }

    group.finish();
}
