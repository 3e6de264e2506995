//! Error types for jobminder.

use std::path::PathBuf;

/// Top-level error type for the worker supervisor.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Log sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broker client errors surfaced by the external queue collaborator.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("Failed to connect to broker {server}: {reason}")]
    ConnectFailed { server: String, reason: String },

    #[error("Failed to register ability {ability}: {reason}")]
    RegisterFailed { ability: String, reason: String },

    #[error("Broker protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pre-flight handler validation failures. Fatal — the owning process is
/// notified and no further registry entries are checked.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Job {name} failed validation: {source}")]
    Handler {
        name: String,
        #[source]
        source: LoadError,
    },
}

/// Errors reported by the handler loader collaborator for one module.
///
/// The validator treats every variant as the same fatal condition: the
/// entry point either exists and conforms to the execution interface, or
/// the module is unusable.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Entry point {entry} not found in {}", path.display())]
    EntryPointMissing { entry: String, path: PathBuf },

    #[error("Entry point {entry} in {} does not expose the execute method: {reason}", path.display())]
    NotConformant {
        entry: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Failed to load handler module {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Logging sink failures. Never caught inside the lifecycle hooks — a
/// sink that cannot write terminates the worker loop.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Failed to write log line: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the supervisor.
pub type Result<T> = std::result::Result<T, Error>;
