//! Configuration types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Registry entry for one job: where its handler module lives.
///
/// Relative paths resolve against [`WorkerConfig::worker_dir`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerSpec {
    pub path: PathBuf,
}

/// Worker supervisor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Broker endpoints, host:port.
    pub servers: Vec<String>,
    /// Base directory for handler modules.
    pub worker_dir: PathBuf,
    /// Maximum total run time for the worker loop in seconds (0 = unbounded).
    pub max_run_time_secs: u64,
    /// Job name to handler module registry.
    pub jobs: BTreeMap<String, HandlerSpec>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            servers: vec!["127.0.0.1:4730".to_string()],
            worker_dir: PathBuf::from("./workers"),
            max_run_time_secs: 0,
            jobs: BTreeMap::new(),
        }
    }
}

impl WorkerConfig {
    /// Build a config from the environment, starting from defaults.
    ///
    /// Recognized variables: `JOBMINDER_SERVERS` (comma-separated),
    /// `JOBMINDER_WORKER_DIR`, `JOBMINDER_MAX_RUN_TIME` (seconds).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(servers) = std::env::var("JOBMINDER_SERVERS") {
            let parsed: Vec<String> = servers
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if parsed.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "JOBMINDER_SERVERS".to_string(),
                    message: "expected a comma-separated list of host:port endpoints"
                        .to_string(),
                });
            }
            config.servers = parsed;
        }

        if let Ok(dir) = std::env::var("JOBMINDER_WORKER_DIR") {
            tracing::debug!("Taking worker dir from environment, not config file");
            config.worker_dir = PathBuf::from(dir);
        }

        if let Ok(secs) = std::env::var("JOBMINDER_MAX_RUN_TIME") {
            config.max_run_time_secs =
                secs.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "JOBMINDER_MAX_RUN_TIME".to_string(),
                    message: format!("expected a number of seconds, got {secs:?}"),
                })?;
        }

        Ok(config)
    }

    /// Load a config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Check invariants not expressible in the type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.servers.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "servers".to_string(),
                hint: "at least one broker endpoint is required".to_string(),
            });
        }
        for name in self.jobs.keys() {
            if name.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "jobs".to_string(),
                    message: "job names must not be empty".to_string(),
                });
            }
        }
        if self.jobs.is_empty() {
            tracing::warn!("No jobs configured; worker will register no abilities");
        }
        Ok(())
    }

    /// Maximum run time as a duration. Zero disables the limit.
    pub fn max_run_time(&self) -> Duration {
        Duration::from_secs(self.max_run_time_secs)
    }

    /// Resolve a handler module path against the worker dir.
    pub fn handler_path(&self, spec: &HandlerSpec) -> PathBuf {
        if spec.path.is_absolute() {
            spec.path.clone()
        } else {
            self.worker_dir.join(&spec.path)
        }
    }
}
