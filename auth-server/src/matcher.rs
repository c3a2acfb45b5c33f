use crate::errors::AuthError;
use crate::models::{Param, TokenPermission};
use crate::path;
use crate::repo::TokenPermissionsRepo;
use chrono::Utc;
use serde_json::Value;

/// Evaluates whether a presented token authorizes a (microservice, method,
/// payload) call against the stored token permission rows.
pub struct PermissionMatcher {
    token_permissions: TokenPermissionsRepo,
    master_token: String,
}

impl PermissionMatcher {
    pub fn new(token_permissions: TokenPermissionsRepo, master_token: String) -> Self {
        Self {
            token_permissions,
            master_token,
        }
    }

    /// Logical OR across candidate rows, AND within each row's constraint
    /// sets: any one row whose required and restricted params both pass
    /// authorizes the call. The configured master token bypasses everything.
    pub async fn check(
        &self,
        token: &str,
        microservice: &str,
        method: &str,
        payload: &Value,
    ) -> Result<bool, AuthError> {
        if !self.master_token.is_empty() && token == self.master_token {
            return Ok(true);
        }

        let candidates = self
            .token_permissions
            .find_active(token, microservice, method, Utc::now().timestamp())
            .await?;

        Ok(candidates
            .iter()
            .any(|candidate| satisfies(candidate, payload)))
    }
}

fn satisfies(candidate: &TokenPermission, payload: &Value) -> bool {
    required_params_pass(&candidate.required_params, payload)
        && restricted_params_pass(&candidate.restricted_params, payload)
}

/// Every required param path must resolve to a non-null value; under the
/// `all` wildcard presence alone suffices, otherwise the stringified value
/// must equal one of the allowed values.
fn required_params_pass(params: &[Param], payload: &Value) -> bool {
    params.iter().all(|param| {
        match path::resolve(payload, &param.path) {
            None | Some(Value::Null) => false,
            Some(value) => {
                if param.all {
                    return true;
                }
                let value = path::stringify(value);
                param.values.iter().any(|allowed| allowed == &value)
            }
        }
    })
}

/// Restricted params never block on absence. A present path fails the
/// candidate under the `all` wildcard, or when its stringified value equals
/// one of the blocked values.
fn restricted_params_pass(params: &[Param], payload: &Value) -> bool {
    params.iter().all(|param| {
        match path::resolve(payload, &param.path) {
            None | Some(Value::Null) => true,
            Some(value) => {
                if param.all {
                    return false;
                }
                let value = path::stringify(value);
                !param.values.iter().any(|blocked| blocked == &value)
            }
        }
    })
}
