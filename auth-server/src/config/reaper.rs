use serde::Deserialize;

/// Intervals of the three expiry sweeps, in seconds. Each sweep is scheduled
/// independently of the others.
#[derive(Debug, Deserialize, Clone)]
pub struct ReaperConfig {
    /// OTP code sweep interval (default: 1 minute)
    #[serde(default = "default_otp_interval_secs")]
    pub otp_interval_secs: u64,

    /// Refresh token sweep interval (default: 1 hour)
    #[serde(default = "default_hourly_interval_secs")]
    pub refresh_token_interval_secs: u64,

    /// Token permission sweep interval (default: 1 hour)
    #[serde(default = "default_hourly_interval_secs")]
    pub token_permission_interval_secs: u64,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            otp_interval_secs: default_otp_interval_secs(),
            refresh_token_interval_secs: default_hourly_interval_secs(),
            token_permission_interval_secs: default_hourly_interval_secs(),
        }
    }
}

fn default_otp_interval_secs() -> u64 {
    60
}

fn default_hourly_interval_secs() -> u64 {
    3600
}
