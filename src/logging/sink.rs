//! Log sink abstraction and built-in sinks.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::SinkError;

/// Verbosity level of a worker log line.
///
/// The derived ordering runs from least to most verbose:
/// `WorkerInfo < Debug < Crazy`. Sinks are free to map these onto their
/// own numeric scheme — the supervisor only relies on the relative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Job lifecycle events and buffered handler diagnostics.
    WorkerInfo,
    /// Workloads and raw job outcomes, which can be large.
    Debug,
    /// Per-poll staleness chatter.
    Crazy,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::WorkerInfo => "worker_info",
            Self::Debug => "debug",
            Self::Crazy => "crazy",
        };
        write!(f, "{s}")
    }
}

/// Destination for worker log lines.
///
/// Failures are deliberately not absorbed by callers: a sink that cannot
/// write takes the whole worker loop down with it.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str, level: LogLevel) -> Result<(), SinkError>;
}

/// Sink that forwards lines to the `tracing` ecosystem.
///
/// `WorkerInfo` maps to `info`, `Debug` to `debug`, and `Crazy` to
/// `trace`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for TracingSink {
    fn log(&self, message: &str, level: LogLevel) -> Result<(), SinkError> {
        match level {
            LogLevel::WorkerInfo => tracing::info!("{message}"),
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Crazy => tracing::trace!("{message}"),
        }
        Ok(())
    }
}

/// Sink that captures lines in memory.
///
/// Used by tests and by embedders that want to inspect the log stream
/// programmatically.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(String, LogLevel)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far, in emission order.
    pub fn entries(&self) -> Vec<(String, LogLevel)> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Messages logged at the given level, in emission order.
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(_, l)| *l == level)
            .map(|(m, _)| m)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl LogSink for MemorySink {
    fn log(&self, message: &str, level: LogLevel) -> Result<(), SinkError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| SinkError::Write("memory sink mutex poisoned".to_string()))?;
        entries.push((message.to_string(), level));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering_by_verbosity() {
        assert!(LogLevel::WorkerInfo < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Crazy);
    }

    #[test]
    fn level_display() {
        assert_eq!(LogLevel::WorkerInfo.to_string(), "worker_info");
        assert_eq!(LogLevel::Crazy.to_string(), "crazy");
    }

    #[test]
    fn level_serde_roundtrip() {
        let json = serde_json::to_string(&LogLevel::WorkerInfo).unwrap();
        assert_eq!(json, "\"worker_info\"");
        let parsed: LogLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, LogLevel::WorkerInfo);
    }

    #[test]
    fn memory_sink_captures_in_order() {
        let sink = MemorySink::new();
        sink.log("first", LogLevel::WorkerInfo).unwrap();
        sink.log("second", LogLevel::Debug).unwrap();
        sink.log("third", LogLevel::WorkerInfo).unwrap();

        let entries = sink.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], ("first".to_string(), LogLevel::WorkerInfo));
        assert_eq!(entries[1], ("second".to_string(), LogLevel::Debug));

        assert_eq!(sink.messages_at(LogLevel::WorkerInfo), vec!["first", "third"]);
    }

    #[test]
    fn memory_sink_clear() {
        let sink = MemorySink::new();
        sink.log("line", LogLevel::Debug).unwrap();
        sink.clear();
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn tracing_sink_never_fails() {
        let sink = TracingSink::new();
        assert!(sink.log("hello", LogLevel::Crazy).is_ok());
    }
}
