//! Worker supervision — lifecycle hooks, run-loop control, validation.
//!
//! Core components:
//! - `handler` — the `JobHandler` contract, loader seam, and registry
//! - `lifecycle` — start/complete/fail hooks driving the job log
//! - `monitor` — idle-poll run-time ceiling and stop latch
//! - `validator` — fail-fast pre-flight check of the configured registry
//! - `supervisor` — per-process wiring exposed to the broker

pub mod handler;
pub mod lifecycle;
pub mod monitor;
pub mod supervisor;
pub mod validator;

pub use handler::{
    ENTRY_POINT_PREFIX, HandlerLoader, HandlerRegistry, JobFailure, JobHandler, entry_point_name,
};
pub use lifecycle::JobLifecycle;
pub use monitor::RunLoopMonitor;
pub use supervisor::WorkerSupervisor;
pub use validator::HandlerValidator;
