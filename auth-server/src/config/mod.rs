pub(crate) use crate::config::flood::FloodConfig;
pub(crate) use crate::config::reaper::ReaperConfig;
pub(crate) use crate::config::storage::{CollectionsConfig, StorageBackend, StorageConfig};
pub(crate) use crate::config::tokens::TokenTtlConfig;
use crate::models::Role;
use config::{Config as ConfigCrate, ConfigError};
use serde::Deserialize;

pub mod flood;
pub mod reaper;
pub mod storage;
pub mod tokens;

/// Main configuration structure for the auth server
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// The port the server will listen to (default: 7600)
    #[serde(default)]
    pub port: u16,

    /// Operator bypass token; an empty value disables the bypass
    #[serde(default)]
    pub master_token: String,

    /// Salt appended to passwords before hashing
    #[serde(default)]
    pub salt: String,

    /// JSON definition of the role granted to every user at issuance;
    /// empty falls back to a built-in permissionless default role
    #[serde(default)]
    pub default_role: String,

    /// Token lifetime configuration
    #[serde(default)]
    pub tokens: TokenTtlConfig,

    /// Flood guard configuration
    #[serde(default)]
    pub flood: FloodConfig,

    /// TTL reaper configuration
    #[serde(default)]
    pub reaper: ReaperConfig,

    /// Document store configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            port: 7600,
            master_token: String::new(),
            salt: String::new(),
            default_role: String::new(),
            tokens: TokenTtlConfig::default(),
            flood: FloodConfig::default(),
            reaper: ReaperConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Creates a new Config instance from environment variables.
    ///
    /// Nested sections are addressed with a double underscore so that
    /// multi-word field names survive, e.g. `AUTH_MASTER_TOKEN` for
    /// `master_token` and `AUTH_TOKENS__ACCESS_TTL_SECS` for
    /// `tokens.access_ttl_secs`.
    pub fn new() -> Result<Self, String> {
        ConfigCrate::builder()
            .add_source(
                config::Environment::with_prefix("AUTH")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(config::Case::Snake),
            )
            .build()
            .map_err(|e: ConfigError| e.to_string())?
            .try_deserialize()
            .map_err(|e| e.to_string())
    }

    /// The role every user is granted in addition to their own role set.
    pub fn default_role(&self) -> Result<Role, serde_json::Error> {
        if self.default_role.is_empty() {
            Ok(Role::built_in_default())
        } else {
            serde_json::from_str(&self.default_role)
        }
    }

    #[cfg(test)]
    pub fn for_test() -> Self {
        Self {
            port: 0, // Let the OS choose a port
            master_token: "master-token".to_string(),
            salt: "test-salt".to_string(),
            default_role: String::new(),
            tokens: TokenTtlConfig {
                access_ttl_secs: 3600,
                refresh_ttl_secs: 7200,
            },
            flood: FloodConfig {
                limit: 3,
                window_secs: 60,
                sweep_interval_secs: 60,
            },
            reaper: ReaperConfig::default(),
            storage: StorageConfig {
                store: StorageBackend::InMemory,
                ..Default::default()
            },
        }
    }
}
