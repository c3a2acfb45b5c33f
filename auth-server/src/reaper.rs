use crate::config::{CollectionsConfig, ReaperConfig};
use crate::store::{DocumentStore, Store};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use sweeper::PeriodicTask;
use tokio_util::sync::CancellationToken;

/// Three independent periodic sweeps purging expired OTP, refresh-token and
/// token-permission rows. Each tick is one delete-by-selector call; a failed
/// tick is logged by the task and retried on the next one.
pub struct TtlReaper {
    tasks: Vec<PeriodicTask>,
}

impl TtlReaper {
    pub fn start(
        store: Arc<Store>,
        config: &ReaperConfig,
        collections: &CollectionsConfig,
        shutdown: &CancellationToken,
    ) -> Self {
        let tasks = vec![
            spawn_expiry_sweep(
                "otp-reaper",
                Arc::clone(&store),
                collections.otp_codes.clone(),
                Duration::from_secs(config.otp_interval_secs),
                shutdown,
            ),
            spawn_expiry_sweep(
                "refresh-token-reaper",
                Arc::clone(&store),
                collections.refresh_tokens.clone(),
                Duration::from_secs(config.refresh_token_interval_secs),
                shutdown,
            ),
            spawn_expiry_sweep(
                "token-permission-reaper",
                store,
                collections.token_permissions.clone(),
                Duration::from_secs(config.token_permission_interval_secs),
                shutdown,
            ),
        ];
        Self { tasks }
    }

    pub fn tasks(&self) -> &[PeriodicTask] {
        &self.tasks
    }
}

fn spawn_expiry_sweep(
    name: &'static str,
    store: Arc<Store>,
    collection: String,
    period: Duration,
    shutdown: &CancellationToken,
) -> PeriodicTask {
    PeriodicTask::spawn(name, period, shutdown, move || {
        let store = Arc::clone(&store);
        let collection = collection.clone();
        async move {
            let now = Utc::now().timestamp();
            store
                .delete(&collection, &json!({"expires_at": {"$lt": now}}))
                .await
                .map_err(|e| format!("failed to purge expired rows from '{}': {}", collection, e))
        }
    })
}
