use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

/// A payload constraint attached to a permission.
///
/// `path` is a dot-delimited path into the request payload. `values` holds the
/// accepted (required) or blocked (restricted) raw string values; any value of
/// the form `$.some.path` is a placeholder resolved against the issuing user
/// at issuance time. `all` turns the constraint into a wildcard over presence.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Param {
    pub path: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub all: bool,
}

/// One (microservice, method) grant with its payload constraints.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Permission {
    pub microservice: String,
    pub method: String,
    #[serde(default)]
    pub required_params: Vec<Param>,
    #[serde(default)]
    pub restricted_params: Vec<Param>,
}

/// A named bundle of permissions, optionally scoped to an organizational id.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Role {
    pub internal_id: String,
    #[serde(rename = "type")]
    pub role_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub data: Value,
}

impl Role {
    /// The built-in role granted to every user when no default role is configured.
    pub fn built_in_default() -> Self {
        Self {
            internal_id: "default".to_string(),
            role_type: "default".to_string(),
            scope_id: None,
            permissions: Vec::new(),
            data: Value::Null,
        }
    }
}

/// Account entity as persisted in the user collection.
///
/// The password hash and role list are stored under `___`-prefixed keys so
/// they never collide with client-supplied profile fields.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct User {
    pub internal_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(rename = "___password", default)]
    pub hashed_password: String,
    #[serde(rename = "___roles", default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub data: Value,
}

impl User {
    /// Schema-declared projection of the entity fields addressable by
    /// placeholder dot-paths. Sensitive fields are deliberately absent.
    pub fn projection(&self) -> Value {
        json!({
            "internal_id": self.internal_id,
            "email": self.email,
            "phone": self.phone,
            "data": self.data,
        })
    }

    /// Blanks the stored password hash before the entity leaves the service.
    pub fn redact_password(&mut self) {
        self.hashed_password = "hidden".to_string();
    }
}

/// Persisted binding of a token, a role and one permission's resolved
/// constraints. One row per (role, permission) pair, created at issuance.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct TokenPermission {
    pub token: String,
    #[serde(rename = "type")]
    pub role_type: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
    pub expires_at: i64,
    pub role_internal_id: String,
    pub microservice: String,
    pub method: String,
    #[serde(default)]
    pub required_params: Vec<Param>,
    #[serde(default)]
    pub restricted_params: Vec<Param>,
}

impl TokenPermission {
    /// Client-facing projection of this row.
    pub fn to_access_token(&self) -> AccessToken {
        AccessToken {
            token: self.token.clone(),
            role_type: self.role_type.clone(),
            role_id: self.role_internal_id.clone(),
            scope_id: self.scope_id.clone(),
            expires_at: self.expires_at,
        }
    }
}

/// Opaque bearer credential returned to the client, one per authorized role
/// instance after deduplication.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct AccessToken {
    pub token: String,
    #[serde(rename = "type")]
    pub role_type: String,
    pub role_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
    pub expires_at: i64,
}

impl AccessToken {
    /// Tokens projected from different rows of the same role instance collapse
    /// into one entry.
    pub fn is_duplicate_of(&self, other: &AccessToken) -> bool {
        self.token == other.token
            && self.role_id == other.role_id
            && self.scope_id == other.scope_id
            && self.role_type == other.role_type
    }
}

/// Long-lived credential exchanged for fresh access tokens. Independent
/// lifecycle from access tokens.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: String,
    pub expires_at: i64,
}

/// One-time code row; only its expiry-based reaping and verification live here.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct OtpCode {
    pub code: String,
    pub login: String,
    pub expires_at: i64,
}
