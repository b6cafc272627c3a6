//! Windowed FFT magnitude analysis with temporal smoothing.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::{config::AnalyserConfig, error::Result};

/*
Frequency Analysis
==================

The analyser turns the last `fft_size` samples of the output into
`fft_size / 2` bytes, one per frequency bin, scaled so that loud music
lands in the upper half of 0..=255 and the noise floor sits near zero.

Vocabulary
----------

  bin           One FFT output slot. Bin k covers the frequency
                k * sample_rate / fft_size. At 48 kHz with a 4096 window,
                each bin is ~11.7 Hz wide.

  window        A bell-shaped weighting applied to the block before the
                FFT so the block edges fade to zero. Without it, the hard
                cut at each edge smears energy into every bin ("leakage").

  smoothing     Exponential average of each bin with its previous value.
                0.0 = no memory, 0.88 = slow, fluid decay.


Pipeline
--------

    time domain ──× Blackman──→ FFT ──|X|/N──→ smooth ──→ dB ──→ byte

1. Blackman window (α = 0.16):

       a0 = (1 - α) / 2,  a1 = 1/2,  a2 = α / 2
       w[n] = a0 - a1·cos(2πn/N) + a2·cos(4πn/N)

2. Magnitude, normalised by the window length so a full-scale sine does
   not grow with N:

       m[k] = |X[k]| / N

3. Temporal smoothing with time constant τ:

       s[k] = τ · s_prev[k] + (1 - τ) · m[k]

4. Decibels and byte scaling over [min_db, max_db]:

       db   = 20 · log10(s[k])
       byte = floor(255 · (db - min_db) / (max_db - min_db)),  clamped

Silence (s = 0) gives -∞ dB, which clamps to byte 0.


Implementation Notes
--------------------

All buffers (window, complex input, FFT scratch, smoothed magnitudes) are
allocated once in `new`. `analyse` and the readers are allocation-free.
*/

const BLACKMAN_ALPHA: f32 = 0.16;

/// Blackman window coefficients for a block of `len` samples.
pub fn blackman_window(len: usize) -> Vec<f32> {
    let a0 = (1.0 - BLACKMAN_ALPHA) / 2.0;
    let a1 = 0.5;
    let a2 = BLACKMAN_ALPHA / 2.0;
    let n = len as f32;

    (0..len)
        .map(|i| {
            let phase = std::f32::consts::TAU * i as f32 / n;
            a0 - a1 * phase.cos() + a2 * (2.0 * phase).cos()
        })
        .collect()
}

/// Scale a decibel value into the 0..=255 byte range.
#[inline]
pub fn decibels_to_byte(db: f32, min_db: f32, max_db: f32) -> u8 {
    let scaled = 255.0 * (db - min_db) / (max_db - min_db);
    if scaled.is_nan() {
        return 0;
    }
    scaled.floor().clamp(0.0, 255.0) as u8
}

pub struct FrequencyAnalyser {
    config: AnalyserConfig,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
}

impl FrequencyAnalyser {
    pub fn new(config: AnalyserConfig) -> Result<Self> {
        config.validate()?;

        let size = config.fft_size;
        let fft = FftPlanner::new().plan_fft_forward(size);
        let scratch_len = fft.get_inplace_scratch_len();

        Ok(Self {
            config,
            window: blackman_window(size),
            fft,
            buffer: vec![Complex::new(0.0, 0.0); size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            smoothed: vec![0.0; config.frequency_bin_count()],
        })
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.smoothed.len()
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    /// Run one analysis over `time_domain` (exactly `fft_size` samples,
    /// oldest first) and fold the result into the smoothed magnitudes.
    pub fn analyse(&mut self, time_domain: &[f32]) {
        debug_assert_eq!(time_domain.len(), self.window.len());

        for ((slot, &sample), &w) in self
            .buffer
            .iter_mut()
            .zip(time_domain.iter())
            .zip(self.window.iter())
        {
            *slot = Complex::new(sample * w, 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let norm = 1.0 / self.config.fft_size as f32;
        let tau = self.config.smoothing_time_constant;
        for (smoothed, bin) in self.smoothed.iter_mut().zip(self.buffer.iter()) {
            let magnitude = bin.norm() * norm;
            let next = tau * *smoothed + (1.0 - tau) * magnitude;
            *smoothed = if next.is_finite() { next } else { 0.0 };
        }
    }

    /// Smoothed magnitudes as bytes. Writes `min(out.len(), bin count)` bins.
    pub fn byte_frequency_data(&self, out: &mut [u8]) {
        let (min_db, max_db) = (self.config.min_decibels, self.config.max_decibels);
        for (byte, &magnitude) in out.iter_mut().zip(self.smoothed.iter()) {
            *byte = decibels_to_byte(20.0 * magnitude.log10(), min_db, max_db);
        }
    }

    /// Smoothed magnitudes in decibels.
    pub fn float_frequency_data(&self, out: &mut [f32]) {
        for (db, &magnitude) in out.iter_mut().zip(self.smoothed.iter()) {
            *db = 20.0 * magnitude.log10();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn sine(freq: f32, len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (std::f32::consts::TAU * freq * i as f32 / SAMPLE_RATE).sin())
            .collect()
    }

    fn analyser(smoothing: f32) -> FrequencyAnalyser {
        FrequencyAnalyser::new(AnalyserConfig {
            smoothing_time_constant: smoothing,
            ..AnalyserConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn window_is_zero_at_edges_and_one_at_center() {
        let window = blackman_window(4096);
        assert!(window[0].abs() < 1e-6);
        assert!((window[2048] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn silence_maps_to_zero_bytes() {
        let mut analyser = analyser(0.0);
        analyser.analyse(&vec![0.0; 4096]);

        let mut bytes = vec![255u8; analyser.frequency_bin_count()];
        analyser.byte_frequency_data(&mut bytes);
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn sine_peaks_at_its_bin() {
        let mut analyser = analyser(0.0);
        // Bin 64 at 48 kHz / 4096 = 750 Hz.
        analyser.analyse(&sine(750.0, 4096, 0.5));

        let mut db = vec![0.0f32; analyser.frequency_bin_count()];
        analyser.float_frequency_data(&mut db);
        let peak = db
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 64);

        let mut bytes = vec![0u8; analyser.frequency_bin_count()];
        analyser.byte_frequency_data(&mut bytes);
        assert_eq!(bytes[64], 255, "a loud sine saturates the byte range");
        assert_eq!(bytes[1000], 0, "distant bins stay at the floor");
    }

    #[test]
    fn smoothing_blends_with_previous_frame() {
        let input = sine(750.0, 4096, 0.5);

        let mut raw = analyser(0.0);
        raw.analyse(&input);
        let mut raw_db = vec![0.0; raw.frequency_bin_count()];
        raw.float_frequency_data(&mut raw_db);

        let mut smooth = analyser(0.88);
        smooth.analyse(&input);
        let mut smooth_db = vec![0.0; smooth.frequency_bin_count()];
        smooth.float_frequency_data(&mut smooth_db);

        // One frame from silence keeps 12% of the magnitude: about -18.4 dB.
        let expected = raw_db[64] + 20.0 * 0.12f32.log10();
        assert!((smooth_db[64] - expected).abs() < 0.01);

        for _ in 0..200 {
            smooth.analyse(&input);
        }
        smooth.float_frequency_data(&mut smooth_db);
        assert!((smooth_db[64] - raw_db[64]).abs() < 0.01, "converges to the raw level");
    }

    #[test]
    fn byte_scaling_clamps_to_range() {
        assert_eq!(decibels_to_byte(-120.0, -100.0, -30.0), 0);
        assert_eq!(decibels_to_byte(f32::NEG_INFINITY, -100.0, -30.0), 0);
        assert_eq!(decibels_to_byte(-30.0, -100.0, -30.0), 255);
        assert_eq!(decibels_to_byte(0.0, -100.0, -30.0), 255);
        assert_eq!(decibels_to_byte(-65.0, -100.0, -30.0), 127);
    }
}
