//! Player configuration.
//!
//! Defaults reproduce the reference look: 4096-sample analysis window with
//! 0.88 temporal smoothing, 0.8 s fade-in, 0.5 s fade-out, three smoothing
//! passes and a 0.9 peak fill opacity.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PlayerError, Result};

pub const MIN_FFT_SIZE: usize = 32;
pub const MAX_FFT_SIZE: usize = 32_768;

/// Settings for the frequency analyser attached to the output chain.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyserConfig {
    /// Analysis window in samples. Must be a power of two.
    pub fft_size: usize,
    /// Weight of the previous frame in the per-bin exponential average (0..=1).
    pub smoothing_time_constant: f32,
    /// Magnitude mapped to byte 0.
    pub min_decibels: f32,
    /// Magnitude mapped to byte 255.
    pub max_decibels: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 4096,
            smoothing_time_constant: 0.88,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyserConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two()
            || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&self.fft_size)
        {
            return Err(PlayerError::InvalidAnalyser(format!(
                "fft size {} must be a power of two in {MIN_FFT_SIZE}..={MAX_FFT_SIZE}",
                self.fft_size
            )));
        }
        if !(0.0..=1.0).contains(&self.smoothing_time_constant) {
            return Err(PlayerError::InvalidAnalyser(format!(
                "smoothing time constant {} outside 0..=1",
                self.smoothing_time_constant
            )));
        }
        if !(self.min_decibels < self.max_decibels) {
            return Err(PlayerError::InvalidAnalyser(format!(
                "min decibels {} must be below max decibels {}",
                self.min_decibels, self.max_decibels
            )));
        }
        Ok(())
    }

    /// Number of magnitude bins produced per analysis (half the window).
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }
}

/// Top-level player settings.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// Gain ramp 0 → 1 when playback starts, in seconds.
    pub fade_in: f64,
    /// Gain ramp current → 0 when pausing, in seconds.
    pub fade_out: f64,
    pub analyser: AnalyserConfig,
    /// Neighbor-averaging passes applied to the display points.
    pub smoothing_passes: usize,
    /// Fill opacity at the vertical center of the silhouette.
    pub peak_opacity: f32,
    /// Display refresh cadence the front end drives the render loop at.
    pub frame_interval: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            fade_in: 0.8,
            fade_out: 0.5,
            analyser: AnalyserConfig::default(),
            smoothing_passes: 3,
            peak_opacity: 0.9,
            frame_interval: Duration::from_millis(16),
        }
    }
}

impl PlayerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fade_in(mut self, seconds: f64) -> Self {
        self.fade_in = seconds.max(0.0);
        self
    }

    pub fn fade_out(mut self, seconds: f64) -> Self {
        self.fade_out = seconds.max(0.0);
        self
    }

    pub fn analyser(mut self, analyser: AnalyserConfig) -> Self {
        self.analyser = analyser;
        self
    }

    pub fn smoothing_passes(mut self, passes: usize) -> Self {
        self.smoothing_passes = passes;
        self
    }

    pub fn peak_opacity(mut self, opacity: f32) -> Self {
        self.peak_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }
}
