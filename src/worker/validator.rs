//! Pre-flight validation of the configured handler registry.

use crate::config::WorkerConfig;
use crate::error::{Error, ValidationError};
use crate::logging::sink::{LogLevel, LogSink};
use crate::process::ProcessManager;
use crate::worker::handler::{HandlerLoader, HandlerRegistry};

/// Fail-fast gate run before the worker connects to the broker.
///
/// Every configured job must load into a usable handler. The first
/// module that does not is logged, escalated to the process manager, and
/// ends the pass — remaining entries are never checked. This is a
/// load-time check, not a per-job runtime one.
pub struct HandlerValidator<'a> {
    config: &'a WorkerConfig,
    loader: &'a dyn HandlerLoader,
    process: &'a dyn ProcessManager,
    sink: &'a dyn LogSink,
    pid: u32,
}

impl<'a> HandlerValidator<'a> {
    pub fn new(
        config: &'a WorkerConfig,
        loader: &'a dyn HandlerLoader,
        process: &'a dyn ProcessManager,
        sink: &'a dyn LogSink,
    ) -> Self {
        Self {
            config,
            loader,
            process,
            sink,
            pid: std::process::id(),
        }
    }

    /// Load and check every configured job, in registry order.
    pub fn validate(&self) -> Result<HandlerRegistry, Error> {
        let mut registry = HandlerRegistry::new();

        for (name, spec) in &self.config.jobs {
            let path = self.config.handler_path(spec);
            match self.loader.load(name, &path) {
                Ok(handler) => {
                    tracing::debug!(job = %name, path = %path.display(), "Handler validated");
                    registry.insert(name.clone(), handler);
                }
                Err(source) => {
                    self.sink.log(
                        &format!("Handler validation failed for job {name}: {source}"),
                        LogLevel::WorkerInfo,
                    )?;
                    self.process.signal_fatal(self.pid);
                    return Err(ValidationError::Handler {
                        name: name.clone(),
                        source,
                    }
                    .into());
                }
            }
        }

        Ok(registry)
    }
}
