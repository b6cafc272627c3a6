//! Benchmark one output callback: source, fade, analyser tap.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use silhouette::{
    config::AnalyserConfig,
    graph::{analyser_pair, OutputFormat, SignalChain},
    io::{DecodedAudio, MediaStore},
};

use crate::BLOCK_SIZES;

pub fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/chain");

    // 44.1 kHz stereo file on a 48 kHz device exercises rate conversion.
    let samples: Vec<f32> = (0..44_100 * 2 * 60)
        .map(|i| ((i / 2) as f32 * 0.01).sin() * 0.5)
        .collect();
    let mut store = MediaStore::new();
    let url = store.register_decoded(DecodedAudio::from_samples(samples, 2, 44_100));

    for &size in BLOCK_SIZES {
        let Ok((tap, mut node)) = analyser_pair(AnalyserConfig::default()) else {
            continue;
        };
        let Ok(media) = store.resolve(&url) else {
            continue;
        };
        let mut chain = SignalChain::new(
            OutputFormat {
                sample_rate: 48_000,
                channels: 2,
            },
            Some(tap),
        );
        chain.element_mut().load(url.clone(), media);
        if chain.element_mut().play().is_err() {
            continue;
        }
        let fade = chain.gain_mut().gain_mut();
        fade.set_value_at_time(0.0, 0.0);
        fade.linear_ramp_to_value_at_time(1.0, 30.0);

        let mut out = vec![0.0f32; size * 2];
        let mut bytes = vec![0u8; node.frequency_bin_count()];

        group.bench_with_input(BenchmarkId::new("render", size), &size, |b, _| {
            b.iter(|| {
                chain.render(black_box(&mut out));
                if chain.element().has_ended() {
                    chain.element_mut().seek(0.0);
                    let _ = chain.element_mut().play();
                }
            });
            // Keep the tap ring from filling across iterations
            node.get_byte_frequency_data(&mut bytes);
        });
    }

    group.finish();
}
