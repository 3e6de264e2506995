//! Job handler contract, loading seam, and registry.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LoadError;
use crate::logging::buffer::JobLog;
use crate::logging::format::JobValue;

/// Naming convention for handler entry points: a module registered for
/// job `resize` must expose `job_resize`.
pub const ENTRY_POINT_PREFIX: &str = "job_";

/// Entry point symbol for a job name.
pub fn entry_point_name(job: &str) -> String {
    format!("{ENTRY_POINT_PREFIX}{job}")
}

/// Business failure reported by a handler.
///
/// Absorbed at the lifecycle-hook boundary: logged through the failure
/// hook, never propagated as a worker error.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct JobFailure {
    pub message: String,
}

impl JobFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Execution interface every handler module must expose.
///
/// `log` is the diagnostic buffer for the current run — anything appended
/// there surfaces at worker-info level when the job completes or fails.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn execute(
        &self,
        args: &serde_json::Value,
        log: &mut JobLog,
    ) -> Result<JobValue, JobFailure>;
}

/// Collaborator that loads handler modules from disk paths.
///
/// Resolving the entry point by the [`ENTRY_POINT_PREFIX`] convention and
/// checking conformance to [`JobHandler`] is the loader's job; the
/// returned error covers both as a single predicate.
pub trait HandlerLoader: Send + Sync {
    fn load(&self, job: &str, path: &Path) -> Result<Arc<dyn JobHandler>, LoadError>;
}

/// Validated mapping from job name to its handler.
///
/// Built once by the pre-flight validator and read-only afterwards —
/// the single worker loop never mutates it.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<String, Arc<dyn JobHandler>>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, handler: Arc<dyn JobHandler>) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn JobHandler>> {
        self.handlers.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered ability names, in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
