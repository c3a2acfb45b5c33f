use serde::Deserialize;

/// Flood guard tuning
#[derive(Debug, Deserialize, Clone)]
pub struct FloodConfig {
    /// Failed attempts admitted per key before rejection (default: 5)
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Sliding window length in seconds (default: 10 minutes)
    #[serde(default = "default_window_secs")]
    pub window_secs: i64,

    /// How often the expired-record sweep runs, in seconds (default: 1 minute)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_limit() -> u32 {
    5
}

fn default_window_secs() -> i64 {
    600
}

fn default_sweep_interval_secs() -> u64 {
    60
}
