//! Per-job lifecycle hooks bound to broker events.

use std::sync::Arc;

use crate::error::SinkError;
use crate::logging::buffer::JobLog;
use crate::logging::format::{self, JobValue};
use crate::logging::sink::{LogLevel, LogSink};
use crate::worker::handler::JobFailure;

/// The three callbacks invoked by the broker around each job execution.
///
/// Owns the [`JobLog`] for the running worker. The broker guarantees that
/// exactly one of complete/fail follows each start per handle; the
/// controller trusts that contract and does not enforce ordering itself.
pub struct JobLifecycle {
    sink: Arc<dyn LogSink>,
    log: JobLog,
}

impl JobLifecycle {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            log: JobLog::new(),
        }
    }

    /// Diagnostic buffer for the current run, handed to the executing
    /// handler.
    pub fn log_mut(&mut self) -> &mut JobLog {
        &mut self.log
    }

    /// Invoked when the broker dispatches a job, before the handler runs.
    ///
    /// The buffer reset comes after the workload line: the args belong to
    /// the incoming call, not to the buffer being discarded.
    pub fn on_start(
        &mut self,
        handle: &str,
        job: &str,
        args: &serde_json::Value,
    ) -> Result<(), SinkError> {
        self.sink
            .log(&format!("({handle}) Starting Job: {job}"), LogLevel::WorkerInfo)?;

        let workload = serde_json::to_string(args).unwrap_or_default();
        self.sink
            .log(&format!("({handle}) Workload: {workload}"), LogLevel::Debug)?;

        self.log.reset();
        Ok(())
    }

    /// Invoked when a job completes successfully.
    pub fn on_complete(
        &mut self,
        handle: &str,
        job: &str,
        result: &JobValue,
    ) -> Result<(), SinkError> {
        self.sink.log(
            &format!("({handle}) Completed Job: {job}"),
            LogLevel::WorkerInfo,
        )?;

        format::log_result(self.sink.as_ref(), handle, self.log.entries(), result)
    }

    /// Invoked when a job reports a business failure.
    pub fn on_fail(
        &mut self,
        handle: &str,
        job: &str,
        failure: &JobFailure,
    ) -> Result<(), SinkError> {
        self.sink.log(
            &format!("({handle}) Failed Job: {job}: {}", failure.message),
            LogLevel::WorkerInfo,
        )?;

        let outcome = JobValue::from(failure);
        format::log_result(self.sink.as_ref(), handle, self.log.entries(), &outcome)
    }
}
