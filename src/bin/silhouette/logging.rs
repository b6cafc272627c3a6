use std::{fs::File, path::Path};

use color_eyre::eyre::{Result, WrapErr};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Keeps the log writer thread alive; flushes on drop.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Send all logs to `path`. `RUST_LOG` takes precedence over `level`.
pub fn init(path: &Path, level: LevelFilter) -> Result<LogGuard> {
    let file = File::create(path).wrap_err_with(|| format!("failed to create log file {path:?}"))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(filter),
        )
        .init();

    tracing::info!(path = ?path, %level, "logging initialized");
    Ok(LogGuard { _guard: guard })
}
