//! Worker supervisor — wires the lifecycle hooks, monitor, and handler
//! registry to a broker.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::broker::{Broker, WorkerHooks};
use crate::config::WorkerConfig;
use crate::error::{Error, SinkError};
use crate::logging::format::JobValue;
use crate::logging::sink::{LogLevel, LogSink};
use crate::process::ProcessManager;
use crate::worker::handler::{HandlerLoader, HandlerRegistry, JobFailure};
use crate::worker::lifecycle::JobLifecycle;
use crate::worker::monitor::RunLoopMonitor;
use crate::worker::validator::HandlerValidator;

/// Per-process owner of the run state and job log.
///
/// One supervisor exists per worker process: it registers the validated
/// abilities with the broker, records the loop start time, and then acts
/// as the broker's [`WorkerHooks`] for the rest of the process lifetime.
pub struct WorkerSupervisor {
    worker_id: Uuid,
    sink: Arc<dyn LogSink>,
    handlers: HandlerRegistry,
    lifecycle: JobLifecycle,
    monitor: RunLoopMonitor,
}

impl WorkerSupervisor {
    /// Build a supervisor from an already validated registry.
    pub fn new(config: &WorkerConfig, handlers: HandlerRegistry, sink: Arc<dyn LogSink>) -> Self {
        Self {
            worker_id: Uuid::new_v4(),
            lifecycle: JobLifecycle::new(sink.clone()),
            monitor: RunLoopMonitor::new(sink.clone(), config.max_run_time()),
            sink,
            handlers,
        }
    }

    /// Run the pre-flight handler validation, then build the supervisor.
    pub fn bootstrap(
        config: &WorkerConfig,
        loader: &dyn HandlerLoader,
        process: &dyn ProcessManager,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self, Error> {
        let handlers =
            HandlerValidator::new(config, loader, process, sink.as_ref()).validate()?;
        Ok(Self::new(config, handlers, sink))
    }

    pub fn worker_id(&self) -> Uuid {
        self.worker_id
    }

    /// Request a cooperative stop; observed at the broker's next poll.
    pub fn request_stop(&mut self) {
        self.monitor.request_stop();
    }

    /// Register every ability and hand control to the broker's
    /// poll/execute loop. Returns when the monitor latches a stop or a
    /// fatal error crosses the loop boundary.
    pub async fn run(&mut self, broker: &dyn Broker) -> Result<(), Error> {
        tracing::info!(worker = %self.worker_id, "Worker supervisor starting");

        for name in self.handlers.names() {
            self.sink
                .log(&format!("Adding job {name}"), LogLevel::WorkerInfo)?;
            broker.add_ability(&name).await?;
        }

        self.monitor.begin();
        broker.begin_work(self).await
    }
}

#[async_trait]
impl WorkerHooks for WorkerSupervisor {
    fn job_start(
        &mut self,
        handle: &str,
        job: &str,
        args: &serde_json::Value,
    ) -> Result<(), SinkError> {
        self.lifecycle.on_start(handle, job, args)
    }

    async fn run_job(
        &mut self,
        job: &str,
        args: &serde_json::Value,
    ) -> Result<JobValue, JobFailure> {
        let handler = self
            .handlers
            .get(job)
            .cloned()
            .ok_or_else(|| JobFailure::new(format!("no handler registered for job {job}")))?;

        handler.execute(args, self.lifecycle.log_mut()).await
    }

    fn job_complete(
        &mut self,
        handle: &str,
        job: &str,
        result: &JobValue,
    ) -> Result<(), SinkError> {
        self.lifecycle.on_complete(handle, job, result)
    }

    fn job_fail(
        &mut self,
        handle: &str,
        job: &str,
        failure: &JobFailure,
    ) -> Result<(), SinkError> {
        self.lifecycle.on_fail(handle, job, failure)
    }

    fn monitor(
        &mut self,
        idle: bool,
        last_job: Option<DateTime<Utc>>,
    ) -> Result<bool, SinkError> {
        self.monitor.poll(idle, last_job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::buffer::JobLog;
    use crate::logging::sink::MemorySink;
    use crate::worker::handler::JobHandler;
    use serde_json::json;

    struct GreetHandler;

    #[async_trait]
    impl JobHandler for GreetHandler {
        async fn execute(
            &self,
            args: &serde_json::Value,
            log: &mut JobLog,
        ) -> Result<JobValue, JobFailure> {
            log.append("greeting requested");
            let name = args.as_str().unwrap_or("world");
            Ok(JobValue::from(format!("hello {name}")))
        }
    }

    fn supervisor_with(handlers: HandlerRegistry) -> (WorkerSupervisor, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let config = WorkerConfig::default();
        (
            WorkerSupervisor::new(&config, handlers, sink.clone()),
            sink,
        )
    }

    #[tokio::test]
    async fn run_job_dispatches_to_registered_handler() {
        let mut registry = HandlerRegistry::new();
        registry.insert("greet", Arc::new(GreetHandler));
        let (mut supervisor, _sink) = supervisor_with(registry);

        let result = supervisor.run_job("greet", &json!("ops")).await.unwrap();
        assert_eq!(result, JobValue::Scalar("hello ops".to_string()));
        assert_eq!(supervisor.lifecycle.log_mut().len(), 1);
    }

    #[tokio::test]
    async fn run_job_without_handler_is_a_business_failure() {
        let (mut supervisor, _sink) = supervisor_with(HandlerRegistry::new());

        let failure = supervisor.run_job("ghost", &json!({})).await.unwrap_err();
        assert!(failure.message.contains("ghost"));
    }

    #[tokio::test]
    async fn stop_request_surfaces_through_monitor_hook() {
        let (mut supervisor, _sink) = supervisor_with(HandlerRegistry::new());
        assert!(!supervisor.monitor(true, None).unwrap());
        supervisor.request_stop();
        assert!(supervisor.monitor(true, None).unwrap());
    }
}
