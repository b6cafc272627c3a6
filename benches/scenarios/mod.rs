//! Benchmarks for whole render paths.

mod chain;
mod frame;

pub use chain::bench_chain;
pub use frame::bench_frame;
