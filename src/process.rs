//! Process-management collaborator seam.

/// Owner of the worker process pool.
///
/// The supervisor only ever reports a fatal condition; how the process is
/// actually torn down (signal, exit code, restart policy) is this
/// collaborator's call.
pub trait ProcessManager: Send + Sync {
    /// Report that the worker identified by `pid` hit an unrecoverable
    /// pre-flight failure and must be terminated.
    fn signal_fatal(&self, pid: u32);
}

/// Process manager that exits the current process immediately.
///
/// Suitable for standalone workers with no supervising parent.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExitProcessManager;

impl ProcessManager for ExitProcessManager {
    fn signal_fatal(&self, pid: u32) {
        tracing::error!(pid, "Fatal worker condition, exiting");
        std::process::exit(1);
    }
}
