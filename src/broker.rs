//! Queue broker collaborator seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{BrokerError, Error, SinkError};
use crate::logging::format::JobValue;
use crate::worker::handler::JobFailure;

/// Client for the external job-queue broker.
///
/// Connection management, polling, and the wire protocol all live behind
/// this trait. Implementations drive the supplied [`WorkerHooks`] from a
/// single task: the monitor between fetch attempts, the lifecycle hooks
/// around each job.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Declare that this worker can execute the named job.
    async fn add_ability(&self, name: &str) -> Result<(), BrokerError>;

    /// Run the poll/execute loop until the monitor requests a stop or a
    /// fatal error propagates out of a hook.
    async fn begin_work(&self, hooks: &mut dyn WorkerHooks) -> Result<(), Error>;
}

/// Callbacks the supervisor exposes to the broker.
///
/// For one job the broker calls `job_start`, then `run_job`, then exactly
/// one of `job_complete`/`job_fail`, all on the same task — diagnostics a
/// handler buffers mid-run are visible to the completion hook without
/// synchronization. `monitor` is polled between fetch attempts; `true`
/// means stop fetching.
#[async_trait]
pub trait WorkerHooks: Send {
    fn job_start(
        &mut self,
        handle: &str,
        job: &str,
        args: &serde_json::Value,
    ) -> Result<(), SinkError>;

    /// Execute the named job. Business failures come back as `Err` and
    /// are routed to `job_fail` by the broker, not propagated.
    async fn run_job(
        &mut self,
        job: &str,
        args: &serde_json::Value,
    ) -> Result<JobValue, JobFailure>;

    fn job_complete(
        &mut self,
        handle: &str,
        job: &str,
        result: &JobValue,
    ) -> Result<(), SinkError>;

    fn job_fail(
        &mut self,
        handle: &str,
        job: &str,
        failure: &JobFailure,
    ) -> Result<(), SinkError>;

    /// `idle` is true when the previous fetch attempt returned no job;
    /// `last_job` is when this worker last ran one, `None` before the
    /// first.
    fn monitor(
        &mut self,
        idle: bool,
        last_job: Option<DateTime<Utc>>,
    ) -> Result<bool, SinkError>;
}
