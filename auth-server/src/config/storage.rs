use serde::Deserialize;

/// Specifies which document store backend to use
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    Http,
    #[serde(other)]
    #[default]
    InMemory,
}

/// Configuration for the document store collaborator
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Base URL of the storage service (http backend only)
    #[serde(default = "default_storage_url")]
    pub url: String,

    /// Auth token sent to the storage service
    #[serde(default)]
    pub token: String,

    /// Store backend: "http" or "in-memory" (default)
    #[serde(default)]
    pub store: StorageBackend,

    /// Collection names
    #[serde(default)]
    pub collections: CollectionsConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: default_storage_url(),
            token: String::new(),
            store: StorageBackend::default(),
            collections: CollectionsConfig::default(),
        }
    }
}

fn default_storage_url() -> String {
    "http://localhost:8880".to_string()
}

/// Collection names used by the engine
#[derive(Debug, Deserialize, Clone)]
pub struct CollectionsConfig {
    #[serde(default = "default_users")]
    pub users: String,

    #[serde(default = "default_token_permissions")]
    pub token_permissions: String,

    #[serde(default = "default_refresh_tokens")]
    pub refresh_tokens: String,

    #[serde(default = "default_otp_codes")]
    pub otp_codes: String,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            users: default_users(),
            token_permissions: default_token_permissions(),
            refresh_tokens: default_refresh_tokens(),
            otp_codes: default_otp_codes(),
        }
    }
}

fn default_users() -> String {
    "users".to_string()
}

fn default_token_permissions() -> String {
    "tokenPermissions".to_string()
}

fn default_refresh_tokens() -> String {
    "refreshTokens".to_string()
}

fn default_otp_codes() -> String {
    "otpCodes".to_string()
}
