//! Perceptual mapping from analyser bins to display points.

/*
Perceptual Curve
================

Raw FFT bins are linearly spaced: with a 4096 window at 48 kHz, bins 0-5
cover everything below 60 Hz while bins 340-2048 are all above 4 kHz.
Plotted directly, the bass would be a sliver at the left edge and the
treble would fill most of the screen. The mapper resamples the bins onto
a perceptual axis and reshapes their heights.

Steps, per display step i of 180:

1. Log-frequency axis
   ------------------
   percent = i / 180
   freq    = exp(ln 20 + (ln 16000 - ln 20) * percent)

   Equal horizontal distance = equal frequency *ratio*. Each octave gets
   the same width (about 18 steps).

2. Bin lookup
   ----------
   bin = floor(freq / (sample_rate / fft_size))

   A step whose bin lies past the end of the snapshot reads 0.

3. Noise gate and compression
   --------------------------
          ┌ 0                                   if m < 10
   g(m) = ┤
          └ ((m - 10) / (255 - 10)) ^ 2         otherwise

   The square keeps quiet bins low and lets loud bins dominate, so the
   shape reads as "music" rather than "hiss".

4. Band weighting
   --------------
   weight starts at 1.0.

     freq < 60 Hz             weight  = max(0.1, (freq - 20) / 40)
     200 Hz ≤ freq ≤ 4 kHz    weight += 0.6 * max(0, 1.2 - |freq - 1000| / 2000)
     freq > 6 kHz             weight *= 1.3

            weight
      1.72 ┤            ╱╲
           │          ╱    ╲___
       1.3 ┤        ╱           ╲          ┌──────
       1.0 ┤  ╭────╯              ╲────────┘
           │ ╱
       0.1 ┤╯
           └──┬────┬───────┬─────────┬─────┬─────→ Hz
             60   200    1000      4000  6000

   Sub-bass rumble is tamed, vocals are lifted, treble gets a little air.

5. Placement
   ---------
   x = width * percent
   y = min(g * weight, 1) * height * 0.25

   The weighted value is capped at 1 so no point rises above a quarter of
   the canvas height; the silhouette is mirrored, so the full figure spans
   at most half the canvas.
*/

pub const DISPLAY_STEPS: usize = 180;
pub const DISPLAY_POINTS: usize = DISPLAY_STEPS + 1;
pub const MIN_FREQUENCY: f32 = 20.0;
pub const MAX_FREQUENCY: f32 = 16_000.0;
pub const NOISE_FLOOR: f32 = 10.0;
pub const COMPRESSION_EXPONENT: f32 = 2.0;
pub const AMPLITUDE_SCALE: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayPoint {
    pub x: f32,
    pub y: f32,
}

/// Frequency sampled at display step `step` (0..=DISPLAY_STEPS).
#[inline]
pub fn step_frequency(step: usize) -> f32 {
    let percent = step as f32 / DISPLAY_STEPS as f32;
    let (low, high) = (MIN_FREQUENCY.ln(), MAX_FREQUENCY.ln());
    (low + (high - low) * percent).exp()
}

/// Gate and compress a byte magnitude into 0..=1.
#[inline]
pub fn noise_gate(magnitude: u8) -> f32 {
    let m = magnitude as f32;
    if m < NOISE_FLOOR {
        return 0.0;
    }
    ((m - NOISE_FLOOR) / (255.0 - NOISE_FLOOR)).powf(COMPRESSION_EXPONENT)
}

/// Equalization weight for `freq`.
#[inline]
pub fn band_weight(freq: f32) -> f32 {
    let mut weight = 1.0f32;

    if freq < 60.0 {
        weight = ((freq - 20.0) / 40.0).max(0.1);
    }
    if (200.0..=4000.0).contains(&freq) {
        weight += 0.6 * (1.2 - (freq - 1000.0).abs() / 2000.0).max(0.0);
    }
    if freq > 6000.0 {
        weight *= 1.3;
    }

    weight
}

/// Map one snapshot of analyser bytes onto `DISPLAY_POINTS` points.
///
/// `bins` holds `fft_size / 2` magnitudes, so the bin width is
/// `sample_rate / (2 * bins.len())`.
pub fn map_to_display_points(
    bins: &[u8],
    sample_rate: f32,
    width: f32,
    height: f32,
    out: &mut [DisplayPoint; DISPLAY_POINTS],
) {
    let fft_size = (bins.len() * 2) as f32;
    let bin_width = sample_rate / fft_size;

    for (step, point) in out.iter_mut().enumerate() {
        let percent = step as f32 / DISPLAY_STEPS as f32;
        let freq = step_frequency(step);

        let magnitude = if bin_width > 0.0 && bin_width.is_finite() {
            let index = (freq / bin_width).floor() as usize;
            bins.get(index).copied().unwrap_or(0)
        } else {
            0
        };

        let value = (noise_gate(magnitude) * band_weight(freq)).min(1.0);

        point.x = width * percent;
        point.y = value * height * AMPLITUDE_SCALE;
    }
}
