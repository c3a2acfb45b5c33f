use chrono::Utc;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sweeper::PeriodicTask;
use tokio_util::sync::CancellationToken;

/// Per-key attempt record. Held only in memory, no durability required.
#[derive(Debug, Clone, Copy)]
struct FloodRecord {
    count: u32,
    window_expires_at: i64,
}

/// Rate limiter over repeated failed sign-in attempts, keyed by client IP.
///
/// `record` is called only on failed or rejected inputs, never on success.
/// Every call resets the window, so the limiter is a sliding window: a key
/// stays blocked while failures keep arriving. The table is swept
/// periodically; a sweep racing a `record` on the same key merely restarts
/// that key's count.
pub struct FloodGuard {
    limit: u32,
    window_secs: i64,
    records: Mutex<HashMap<String, FloodRecord>>,
}

impl FloodGuard {
    pub fn new(limit: u32, window_secs: i64) -> Self {
        Self {
            limit,
            window_secs,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// True unless the key has reached the failure limit within a live window.
    pub fn admit(&self, key: &str) -> bool {
        self.admit_at(key, Utc::now().timestamp())
    }

    /// Counts one failed attempt and slides the window forward.
    pub fn record(&self, key: &str) {
        self.record_at(key, Utc::now().timestamp());
    }

    /// Drops records whose window has passed, bounding table growth.
    pub fn sweep(&self) {
        self.sweep_at(Utc::now().timestamp());
    }

    fn admit_at(&self, key: &str, now: i64) -> bool {
        let records = self.records.lock().expect("flood table lock poisoned");
        match records.get(key) {
            Some(record) if record.count >= self.limit && now < record.window_expires_at => false,
            _ => true,
        }
    }

    fn record_at(&self, key: &str, now: i64) {
        let mut records = self.records.lock().expect("flood table lock poisoned");
        let record = records.entry(key.to_string()).or_insert(FloodRecord {
            count: 0,
            window_expires_at: 0,
        });
        record.count += 1;
        record.window_expires_at = now + self.window_secs;
        debug!(
            "Flood record for '{}': {} failures, window until {}",
            key, record.count, record.window_expires_at
        );
    }

    fn sweep_at(&self, now: i64) {
        let mut records = self.records.lock().expect("flood table lock poisoned");
        let before = records.len();
        records.retain(|_, record| record.window_expires_at > now);
        let removed = before - records.len();
        if removed > 0 {
            info!("Flood sweep removed {} expired records", removed);
        }
    }

    /// Schedules the periodic sweep on the shared shutdown token.
    pub fn spawn_sweep(
        self: &Arc<Self>,
        period: Duration,
        shutdown: &CancellationToken,
    ) -> PeriodicTask {
        let guard = Arc::clone(self);
        PeriodicTask::spawn("flood-sweep", period, shutdown, move || {
            let guard = Arc::clone(&guard);
            async move {
                guard.sweep();
                Ok(())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_until_limit_reached() {
        let guard = FloodGuard::new(3, 60);
        let now = 1_000;

        assert!(guard.admit_at("10.0.0.1", now));
        guard.record_at("10.0.0.1", now);
        guard.record_at("10.0.0.1", now);
        assert!(guard.admit_at("10.0.0.1", now));

        guard.record_at("10.0.0.1", now);
        assert!(!guard.admit_at("10.0.0.1", now));
        // Other keys are unaffected
        assert!(guard.admit_at("10.0.0.2", now));
    }

    #[test]
    fn test_admits_again_after_window_elapses() {
        let guard = FloodGuard::new(2, 60);
        let now = 1_000;

        guard.record_at("k", now);
        guard.record_at("k", now);
        assert!(!guard.admit_at("k", now + 59));
        assert!(guard.admit_at("k", now + 60));
    }

    #[test]
    fn test_window_slides_on_every_record() {
        let guard = FloodGuard::new(2, 60);

        guard.record_at("k", 1_000);
        guard.record_at("k", 1_030);
        // Window was reset by the second failure, so the key is still blocked
        // at a time past the first failure's window.
        assert!(!guard.admit_at("k", 1_065));
        assert!(guard.admit_at("k", 1_090));
    }

    #[test]
    fn test_sweep_drops_only_expired_records() {
        let guard = FloodGuard::new(5, 60);

        guard.record_at("old", 1_000);
        guard.record_at("live", 2_000);
        guard.sweep_at(1_500);

        let records = guard.records.lock().unwrap();
        assert!(!records.contains_key("old"));
        assert!(records.contains_key("live"));
    }

    #[test]
    fn test_recreated_record_restarts_count() {
        let guard = FloodGuard::new(2, 60);

        guard.record_at("k", 1_000);
        guard.record_at("k", 1_000);
        guard.sweep_at(2_000);

        guard.record_at("k", 2_000);
        assert!(guard.admit_at("k", 2_000));
    }
}
