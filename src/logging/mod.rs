//! Logging pipeline — sinks, the per-job buffer, and outcome rendering.
//!
//! Core components:
//! - `sink` — `LogLevel`, the `LogSink` trait, tracing and in-memory sinks
//! - `buffer` — `JobLog`, the per-job-run diagnostic accumulator
//! - `format` — `JobValue` rendering, truncation, structured flattening

pub mod buffer;
pub mod format;
pub mod sink;

pub use buffer::JobLog;
pub use format::{JobValue, SCALAR_TRUNCATE_AT, TRUNCATION_SUFFIX, log_result, render_entry};
pub use sink::{LogLevel, LogSink, MemorySink, TracingSink};

/// Install the default tracing subscriber for binaries embedding the
/// crate: env-filtered, target-less fmt output, `info` when `RUST_LOG`
/// is unset.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init();
}
