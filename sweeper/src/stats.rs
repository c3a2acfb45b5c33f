use std::sync::atomic::{AtomicUsize, Ordering};

/// Statistics for a PeriodicTask
#[derive(Debug, Default)]
pub(crate) struct PeriodicTaskStats {
    /// Counter for how many times the callback has been invoked
    runs: AtomicUsize,
    /// Counter for how many invocations returned an error
    failures: AtomicUsize,
}

impl PeriodicTaskStats {
    /// Gets the number of times the callback has been invoked
    pub(crate) fn runs(&self) -> usize {
        self.runs.load(Ordering::Relaxed)
    }

    /// Increments the run counter
    pub(crate) fn increment_runs(&self) {
        self.runs.fetch_add(1, Ordering::SeqCst);
    }

    /// Gets the number of failed invocations
    pub(crate) fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Increments the failure counter
    pub(crate) fn increment_failures(&self) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }
}
