use serde::Deserialize;

/// Lifetimes of issued credentials, in seconds
#[derive(Debug, Deserialize, Clone)]
pub struct TokenTtlConfig {
    /// Access token lifetime (default: 1 day)
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: i64,

    /// Refresh token lifetime (default: 30 days)
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_ttl_secs: i64,
}

impl Default for TokenTtlConfig {
    fn default() -> Self {
        Self {
            access_ttl_secs: default_access_ttl_secs(),
            refresh_ttl_secs: default_refresh_ttl_secs(),
        }
    }
}

fn default_access_ttl_secs() -> i64 {
    86_400
}

fn default_refresh_ttl_secs() -> i64 {
    2_592_000
}
