//! Idle-poll monitor for the worker run loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::SinkError;
use crate::logging::sink::{LogLevel, LogSink};

/// Decides between each fetch attempt whether the worker should keep
/// going.
///
/// `stop_requested` is a monotonic latch: once set it stays set for the
/// rest of the process, whatever parameters later polls carry. Setting it
/// never interrupts an in-flight job — the broker observes the flag at
/// its next poll.
pub struct RunLoopMonitor {
    sink: Arc<dyn LogSink>,
    start_time: Option<DateTime<Utc>>,
    max_run_time: Duration,
    stop_requested: bool,
}

impl RunLoopMonitor {
    /// `max_run_time` of zero disables the time-based stop entirely.
    pub fn new(sink: Arc<dyn LogSink>, max_run_time: Duration) -> Self {
        Self {
            sink,
            start_time: None,
            max_run_time,
            stop_requested: false,
        }
    }

    /// Record the worker-loop start time. Set once; later calls are
    /// ignored.
    pub fn begin(&mut self) {
        if self.start_time.is_none() {
            self.start_time = Some(Utc::now());
        }
    }

    /// Request a cooperative stop from outside the time-based check.
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Poll callback invoked by the broker between fetch attempts.
    /// Returns `true` when the worker should stop.
    pub fn poll(
        &mut self,
        idle: bool,
        last_job: Option<DateTime<Utc>>,
    ) -> Result<bool, SinkError> {
        self.poll_at(Utc::now(), idle, last_job)
    }

    /// Deterministic-time variant of [`poll`](Self::poll).
    pub fn poll_at(
        &mut self,
        now: DateTime<Utc>,
        _idle: bool,
        last_job: Option<DateTime<Utc>>,
    ) -> Result<bool, SinkError> {
        if !self.max_run_time.is_zero() {
            let started = self.start_time.unwrap_or(now);
            let elapsed = now.signed_duration_since(started).to_std().unwrap_or_default();
            if elapsed > self.max_run_time {
                self.sink
                    .log("Been running too long, exiting", LogLevel::WorkerInfo)?;
                self.stop_requested = true;
            }
        }

        // Staleness is reported on every poll, idle or not. A worker that
        // has not run a job yet counts as fresh.
        let staleness = last_job
            .map(|t| now.signed_duration_since(t).num_seconds().max(0))
            .unwrap_or(0);
        self.sink.log(
            &format!("Worker's last job {staleness} seconds ago"),
            LogLevel::Crazy,
        )?;

        Ok(self.stop_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::sink::MemorySink;
    use chrono::Duration as ChronoDuration;

    fn monitor_with_sink(max_run_time: Duration) -> (RunLoopMonitor, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (RunLoopMonitor::new(sink.clone(), max_run_time), sink)
    }

    #[test]
    fn stops_after_max_run_time() {
        let (mut monitor, sink) = monitor_with_sink(Duration::from_secs(100));
        let t0 = Utc::now();
        monitor.start_time = Some(t0);

        assert!(!monitor
            .poll_at(t0 + ChronoDuration::seconds(50), false, Some(t0 + ChronoDuration::seconds(50)))
            .unwrap());
        assert!(monitor
            .poll_at(t0 + ChronoDuration::seconds(150), false, Some(t0 + ChronoDuration::seconds(150)))
            .unwrap());

        assert!(sink
            .messages_at(LogLevel::WorkerInfo)
            .contains(&"Been running too long, exiting".to_string()));
    }

    #[test]
    fn latch_is_monotonic() {
        let (mut monitor, _sink) = monitor_with_sink(Duration::from_secs(100));
        let t0 = Utc::now();
        monitor.start_time = Some(t0);

        assert!(monitor
            .poll_at(t0 + ChronoDuration::seconds(150), false, None)
            .unwrap());
        // Parameters that would not trigger a stop on their own.
        assert!(monitor
            .poll_at(t0 + ChronoDuration::seconds(151), true, Some(t0))
            .unwrap());
        assert!(monitor.poll_at(t0, false, None).unwrap());
    }

    #[test]
    fn zero_max_run_time_never_time_stops() {
        let (mut monitor, sink) = monitor_with_sink(Duration::ZERO);
        let t0 = Utc::now();
        monitor.start_time = Some(t0);

        let far_future = t0 + ChronoDuration::days(365);
        assert!(!monitor.poll_at(far_future, true, None).unwrap());
        assert!(sink.messages_at(LogLevel::WorkerInfo).is_empty());
    }

    #[test]
    fn request_stop_is_observed_and_sticky() {
        let (mut monitor, _sink) = monitor_with_sink(Duration::ZERO);
        assert!(!monitor.poll(false, None).unwrap());
        monitor.request_stop();
        assert!(monitor.poll(false, None).unwrap());
        assert!(monitor.poll(true, None).unwrap());
    }

    #[test]
    fn staleness_logged_every_poll() {
        let (mut monitor, sink) = monitor_with_sink(Duration::ZERO);
        let t0 = Utc::now();
        monitor.start_time = Some(t0);

        monitor
            .poll_at(t0 + ChronoDuration::seconds(42), false, Some(t0))
            .unwrap();
        monitor
            .poll_at(t0 + ChronoDuration::seconds(42), true, Some(t0))
            .unwrap();

        assert_eq!(
            sink.messages_at(LogLevel::Crazy),
            vec![
                "Worker's last job 42 seconds ago".to_string(),
                "Worker's last job 42 seconds ago".to_string(),
            ]
        );
    }

    #[test]
    fn no_job_yet_counts_as_fresh() {
        let (mut monitor, sink) = monitor_with_sink(Duration::ZERO);
        monitor.poll(true, None).unwrap();
        assert_eq!(
            sink.messages_at(LogLevel::Crazy),
            vec!["Worker's last job 0 seconds ago".to_string()]
        );
    }

    #[test]
    fn unstarted_loop_counts_elapsed_from_now() {
        let (mut monitor, _sink) = monitor_with_sink(Duration::from_secs(10));
        // begin() never called: elapsed is zero, no stop.
        assert!(!monitor.poll(false, None).unwrap());
    }

    #[test]
    fn begin_sets_start_time_once() {
        let (mut monitor, _sink) = monitor_with_sink(Duration::from_secs(10));
        monitor.begin();
        let first = monitor.start_time;
        monitor.begin();
        assert_eq!(monitor.start_time, first);
        assert!(first.is_some());
    }
}
