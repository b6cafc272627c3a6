//! Benchmark one display frame from analyser bytes to filled raster.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use silhouette::{
    dsp::curve::{map_to_display_points, DisplayPoint, DISPLAY_POINTS},
    visual::{Raster, SilhouetteRenderer},
};

const SURFACES: &[(usize, usize)] = &[(160, 60), (320, 120), (1280, 400)];

pub fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/frame");

    let bins: Vec<u8> = (0..2048)
        .map(|i| 255u8.saturating_sub((i / 8) as u8))
        .collect();

    for &(width, height) in SURFACES {
        let mut raster = Raster::new(width, height);
        let mut renderer = SilhouetteRenderer::new(3, 0.9);
        let mut points = [DisplayPoint::default(); DISPLAY_POINTS];
        let label = format!("{width}x{height}");

        group.bench_with_input(BenchmarkId::new("draw", &label), &label, |b, _| {
            b.iter(|| {
                map_to_display_points(
                    black_box(&bins),
                    48_000.0,
                    width as f32,
                    height as f32,
                    &mut points,
                );
                renderer.render(&mut points, black_box(&mut raster));
            })
        });
    }

    group.finish();
}
