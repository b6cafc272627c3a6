//! Low-level DSP used by the playback chain and the visualization.
//!
//! Everything here is plain math over slices: no locking, no allocation on
//! the per-block and per-frame paths. The graph and visual layers decide
//! when it runs.

/// Windowed FFT magnitudes with temporal smoothing, as decibels or bytes.
pub mod analyser;
/// Scheduled parameter curves evaluated on the audio clock.
pub mod automation;
/// Log-frequency resampling, noise gate and band weighting for display.
pub mod curve;
/// Per-sample and per-frame gain, mono downmix.
pub mod gain;
/// Neighbor-averaging smoother for display points.
pub mod smoothing;

pub use analyser::FrequencyAnalyser;
pub use automation::ParamTimeline;
pub use curve::{map_to_display_points, DisplayPoint, DISPLAY_POINTS};
