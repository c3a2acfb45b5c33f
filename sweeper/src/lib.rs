//! `PeriodicTask` runs an async callback on a fixed interval in a background task.
//!
//! The task keeps running for the lifetime of the process unless it is cancelled
//! through the shared shutdown token it was spawned with, or the handle is dropped.
//! Callback failures are logged and counted; the next tick fires regardless.

use log::{error, info};
use stats::PeriodicTaskStats;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

mod stats;

pub struct PeriodicTask {
    /// Task name used in log lines.
    name: String,
    /// Cancellation token scoped to this task (child of the shared shutdown token).
    cancel_token: CancellationToken,
    /// Statistics about the task runs
    stats: Arc<PeriodicTaskStats>,
}

impl PeriodicTask {
    /// Spawns a background task invoking `callback` every `period`.
    ///
    /// The first invocation happens one full period after the spawn. Cancelling
    /// `shutdown` (or dropping the returned handle) stops the task; a callback
    /// error is logged and does not stop the schedule.
    ///
    /// # Arguments
    /// * `name` - Task name for logging.
    /// * `period` - Interval between invocations.
    /// * `shutdown` - Shared shutdown token; the task listens on a child of it.
    /// * `callback` - Async callback invoked on every tick.
    pub fn spawn<F, Fut>(
        name: impl Into<String>,
        period: Duration,
        shutdown: &CancellationToken,
        mut callback: F,
    ) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        let name = name.into();
        let cancel_token = shutdown.child_token();
        let stats = Arc::new(PeriodicTaskStats::default());

        let task = Self {
            name: name.clone(),
            cancel_token: cancel_token.clone(),
            stats: Arc::clone(&stats),
        };

        tokio::spawn(async move {
            let mut ticker = interval(period);
            // The first tick of a tokio interval completes immediately;
            // consume it so the schedule starts one period from now.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        info!("Periodic task '{}' shutting down", name);
                        break;
                    }
                    _ = ticker.tick() => {
                        stats.increment_runs();
                    }
                }

                if let Err(e) = callback().await {
                    stats.increment_failures();
                    error!("Periodic task '{}' failed: {}", name, e);
                }
            }
        });

        task
    }

    /// The task name this handle was spawned with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total number of times the callback has been invoked.
    pub fn runs(&self) -> usize {
        self.stats.runs()
    }

    /// Total number of callback invocations that returned an error.
    pub fn failures(&self) -> usize {
        self.stats.failures()
    }

    /// Whether the task has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Stops the task without waiting for the current tick.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
