use crate::config::AuthConfig;
use crate::errors::AuthError;
use crate::flood::FloodGuard;
use crate::issuer::TokenIssuer;
use crate::matcher::PermissionMatcher;
use crate::reaper::TtlReaper;
use crate::repo::{OtpCodesRepo, RefreshTokensRepo, TokenPermissionsRepo, UsersRepo};
use crate::store::{create_store, Store};
use std::sync::Arc;
use std::time::Duration;
use sweeper::PeriodicTask;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AuthConfig>,
    pub store: Arc<Store>,
    pub flood: Arc<FloodGuard>,
    pub users: UsersRepo,
    pub otp_codes: OtpCodesRepo,
    pub refresh_tokens: RefreshTokensRepo,
    pub issuer: Arc<TokenIssuer>,
    pub matcher: Arc<PermissionMatcher>,
}

/// Handles to the background sweeps; dropping them cancels the tasks.
pub struct BackgroundTasks {
    pub reaper: TtlReaper,
    pub flood_sweep: PeriodicTask,
}

impl AppState {
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let store = Arc::new(create_store(&config)?);
        let default_role = config
            .default_role()
            .map_err(|e| AuthError::Validation(format!("invalid default role: {}", e)))?;

        let collections = &config.storage.collections;
        let users = UsersRepo::new(Arc::clone(&store), collections.users.clone());
        let otp_codes = OtpCodesRepo::new(Arc::clone(&store), collections.otp_codes.clone());
        let refresh_tokens =
            RefreshTokensRepo::new(Arc::clone(&store), collections.refresh_tokens.clone());
        let token_permissions =
            TokenPermissionsRepo::new(Arc::clone(&store), collections.token_permissions.clone());

        let issuer = Arc::new(TokenIssuer::new(
            token_permissions.clone(),
            refresh_tokens.clone(),
            default_role,
            config.tokens.access_ttl_secs,
            config.tokens.refresh_ttl_secs,
        ));
        let matcher = Arc::new(PermissionMatcher::new(
            token_permissions,
            config.master_token.clone(),
        ));
        let flood = Arc::new(FloodGuard::new(
            config.flood.limit,
            config.flood.window_secs,
        ));

        Ok(Self {
            config: Arc::new(config),
            store,
            flood,
            users,
            otp_codes,
            refresh_tokens,
            issuer,
            matcher,
        })
    }

    /// Starts the TTL reaper sweeps and the flood-table sweep, all hanging
    /// off the given shutdown token.
    pub fn start_background_tasks(&self, shutdown: &CancellationToken) -> BackgroundTasks {
        let reaper = TtlReaper::start(
            Arc::clone(&self.store),
            &self.config.reaper,
            &self.config.storage.collections,
            shutdown,
        );
        let flood_sweep = self.flood.spawn_sweep(
            Duration::from_secs(self.config.flood.sweep_interval_secs),
            shutdown,
        );
        BackgroundTasks {
            reaper,
            flood_sweep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_state_new() {
        let state = AppState::new(AuthConfig::for_test()).unwrap();
        assert_eq!(state.config.flood.limit, 3);
        assert!(matches!(*state.store, Store::Memory(_)));
    }

    #[tokio::test]
    async fn test_app_state_clone_shares_data() {
        let state = AppState::new(AuthConfig::for_test()).unwrap();
        let state2 = state.clone();

        assert_eq!(Arc::as_ptr(&state.config), Arc::as_ptr(&state2.config));
        assert_eq!(Arc::as_ptr(&state.store), Arc::as_ptr(&state2.store));
        assert_eq!(Arc::as_ptr(&state.flood), Arc::as_ptr(&state2.flood));
    }

    #[tokio::test]
    async fn test_invalid_default_role_is_rejected() {
        let mut config = AuthConfig::for_test();
        config.default_role = "not json".to_string();
        assert!(matches!(
            AppState::new(config),
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_background_tasks_cancel_with_shutdown() {
        let state = AppState::new(AuthConfig::for_test()).unwrap();
        let shutdown = CancellationToken::new();
        let tasks = state.start_background_tasks(&shutdown);

        assert_eq!(tasks.reaper.tasks().len(), 3);
        shutdown.cancel();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(tasks.flood_sweep.is_cancelled());
        assert!(tasks.reaper.tasks().iter().all(|t| t.is_cancelled()));
    }
}
