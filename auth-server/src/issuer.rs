use crate::errors::AuthError;
use crate::models::{AccessToken, Param, RefreshToken, Role, TokenPermission, User};
use crate::path;
use crate::repo::{RefreshTokensRepo, TokenPermissionsRepo};
use chrono::Utc;
use rand::RngCore;
use serde_json::Value;

/// Prefix marking a param value as a placeholder: the remainder is a dot-path
/// into the issuing user's projection, e.g. `$.internal_id`.
pub const PLACEHOLDER_SIGIL: &str = "$.";

/// Turns a user's role set into persisted token permission rows and the
/// deduplicated client-facing access token list.
pub struct TokenIssuer {
    token_permissions: TokenPermissionsRepo,
    refresh_tokens: RefreshTokensRepo,
    default_role: Role,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(
        token_permissions: TokenPermissionsRepo,
        refresh_tokens: RefreshTokensRepo,
        default_role: Role,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
    ) -> Self {
        Self {
            token_permissions,
            refresh_tokens,
            default_role,
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Mints one opaque token per role (the user's roles plus the default
    /// role), persists one row per (role, permission) with placeholders
    /// resolved against the user's projection, and returns the deduplicated
    /// access tokens together with a freshly persisted refresh token.
    ///
    /// Placeholder values are frozen here; later edits to the user entity do
    /// not change already-issued rows. Row persistence is sequential and
    /// non-transactional: a storage failure mid-batch can leave earlier rows
    /// committed, which is accepted at-least-once behavior.
    pub async fn issue(&self, user: &User) -> Result<(Vec<AccessToken>, RefreshToken), AuthError> {
        let now = Utc::now().timestamp();
        let expires_at = now + self.access_ttl_secs;
        let projection = user.projection();

        let mut rows = Vec::new();
        for role in user.roles.iter().chain(std::iter::once(&self.default_role)) {
            let token = random_token(32);
            for permission in &role.permissions {
                let required_params =
                    resolve_placeholders(&permission.required_params, &projection)?;
                let restricted_params =
                    resolve_placeholders(&permission.restricted_params, &projection)?;

                rows.push(TokenPermission {
                    token: token.clone(),
                    role_type: role.role_type.clone(),
                    user_id: user.internal_id.clone(),
                    scope_id: role.scope_id.clone(),
                    expires_at,
                    role_internal_id: role.internal_id.clone(),
                    microservice: permission.microservice.clone(),
                    method: permission.method.clone(),
                    required_params,
                    restricted_params,
                });
            }
        }

        self.token_permissions.save(&rows).await?;

        let refresh_token = RefreshToken {
            token: random_token(64),
            user_id: user.internal_id.clone(),
            expires_at: now + self.refresh_ttl_secs,
        };
        self.refresh_tokens.save(&refresh_token).await?;

        let mut access_tokens: Vec<AccessToken> = Vec::new();
        for row in &rows {
            let candidate = row.to_access_token();
            if !access_tokens.iter().any(|t| t.is_duplicate_of(&candidate)) {
                access_tokens.push(candidate);
            }
        }

        Ok((access_tokens, refresh_token))
    }
}

/// Substitutes `$.`-prefixed values with the string found at that path in the
/// user's projection. Anything other than a string there fails the whole
/// issuance call.
fn resolve_placeholders(params: &[Param], projection: &Value) -> Result<Vec<Param>, AuthError> {
    let mut resolved = Vec::with_capacity(params.len());
    for param in params {
        let mut param = param.clone();
        for value in &mut param.values {
            if let Some(entity_path) = value.strip_prefix(PLACEHOLDER_SIGIL) {
                match path::resolve(projection, entity_path) {
                    Some(Value::String(replacement)) => *value = replacement.clone(),
                    _ => return Err(AuthError::PlaceholderResolution(value.clone())),
                }
            }
        }
        resolved.push(param);
    }
    Ok(resolved)
}

/// Mints an unguessable opaque token: `len` random bytes, hex-encoded.
pub fn random_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
