//! Benchmarks for low-level DSP primitives.

mod analyser;
mod curve;
mod gain;
mod smoothing;

pub use analyser::bench_analyser;
pub use curve::bench_curve;
pub use gain::bench_gain;
pub use smoothing::bench_smoothing;
