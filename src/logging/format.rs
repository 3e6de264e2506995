//! Rendering of handler diagnostics and job outcomes into log lines.

use serde_json::Value;

use crate::error::SinkError;
use crate::logging::sink::{LogLevel, LogSink};
use crate::worker::handler::JobFailure;

/// Scalar log values longer than this many characters are clipped.
pub const SCALAR_TRUNCATE_AT: usize = 256;

/// Suffix appended to clipped scalar values.
pub const TRUNCATION_SUFFIX: &str = "...(truncated)";

/// A value emitted by a handler: a buffered diagnostic or a job outcome.
///
/// The tag decides how the value is rendered — scalars are emitted
/// verbatim (clipped past [`SCALAR_TRUNCATE_AT`]), structured values are
/// flattened into one line per element.
#[derive(Debug, Clone, PartialEq)]
pub enum JobValue {
    Scalar(String),
    Structured(Value),
}

impl From<String> for JobValue {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

impl From<&str> for JobValue {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}

impl From<bool> for JobValue {
    fn from(b: bool) -> Self {
        Self::Scalar(b.to_string())
    }
}

impl From<i64> for JobValue {
    fn from(n: i64) -> Self {
        Self::Scalar(n.to_string())
    }
}

impl From<u64> for JobValue {
    fn from(n: u64) -> Self {
        Self::Scalar(n.to_string())
    }
}

impl From<f64> for JobValue {
    fn from(n: f64) -> Self {
        Self::Scalar(n.to_string())
    }
}

impl From<Value> for JobValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Scalar(s),
            Value::Bool(b) => Self::Scalar(b.to_string()),
            Value::Number(n) => Self::Scalar(n.to_string()),
            Value::Null => Self::Scalar("null".to_string()),
            v @ (Value::Array(_) | Value::Object(_)) => Self::Structured(v),
        }
    }
}

impl From<&JobFailure> for JobValue {
    fn from(failure: &JobFailure) -> Self {
        Self::Scalar(failure.message.clone())
    }
}

/// Render one value as a single log message keyed by the job handle.
///
/// Scalars produce one `"(<handle>) <text>"` line. Structured values are
/// flattened line by line, each line prefixed with the handle and joined
/// with trailing newlines, so the whole block still lands in one sink
/// call.
pub fn render_entry(handle: &str, value: &JobValue) -> String {
    match value {
        JobValue::Scalar(s) => format!("({handle}) {}", clip(s)),
        JobValue::Structured(v) => {
            let mut message = String::new();
            for line in pretty_lines(v) {
                message.push_str(&format!("({handle}) {line}\n"));
            }
            message
        }
    }
}

/// Emit the shared result log: every buffered entry at worker-info, then
/// the final outcome at debug. An empty buffer yields only the outcome
/// line.
pub fn log_result(
    sink: &dyn LogSink,
    handle: &str,
    entries: &[JobValue],
    outcome: &JobValue,
) -> Result<(), SinkError> {
    for entry in entries {
        sink.log(&render_entry(handle, entry), LogLevel::WorkerInfo)?;
    }
    sink.log(&render_entry(handle, outcome), LogLevel::Debug)
}

/// Clip a scalar to the first [`SCALAR_TRUNCATE_AT`] characters.
///
/// Counts characters rather than bytes so multi-byte text never splits.
fn clip(s: &str) -> String {
    if s.chars().count() > SCALAR_TRUNCATE_AT {
        let mut clipped: String = s.chars().take(SCALAR_TRUNCATE_AT).collect();
        clipped.push_str(TRUNCATION_SUFFIX);
        clipped
    } else {
        s.to_string()
    }
}

/// Flatten a structured value into human-readable lines.
///
/// Scalars render bare (strings unquoted), array elements one per line,
/// object entries as `key: value`. Nested containers indent two spaces
/// per depth. Empty containers keep their bracket notation so the result
/// is never an empty sequence.
fn pretty_lines(value: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    push_lines(value, 0, &mut lines);
    lines
}

fn push_lines(value: &Value, depth: usize, out: &mut Vec<String>) {
    let pad = "  ".repeat(depth);
    match value {
        Value::Null => out.push(format!("{pad}null")),
        Value::Bool(b) => out.push(format!("{pad}{b}")),
        Value::Number(n) => out.push(format!("{pad}{n}")),
        Value::String(s) => out.push(format!("{pad}{s}")),
        Value::Array(items) => {
            if items.is_empty() {
                out.push(format!("{pad}[]"));
                return;
            }
            for item in items {
                push_lines(item, depth, out);
            }
        }
        Value::Object(map) => {
            if map.is_empty() {
                out.push(format!("{pad}{{}}"));
                return;
            }
            for (key, item) in map {
                match item {
                    Value::Array(_) | Value::Object(_) => {
                        out.push(format!("{pad}{key}:"));
                        push_lines(item, depth + 1, out);
                    }
                    Value::String(s) => out.push(format!("{pad}{key}: {s}")),
                    other => out.push(format!("{pad}{key}: {other}")),
                }
            }
        }
    }
}
