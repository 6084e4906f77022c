use async_trait::async_trait;
use shared::domain::{AuthUser, Role, UserProfile};
use std::sync::Arc;
use tokio::sync::watch;

pub mod config;
pub mod error;
pub mod probe;
mod session;
pub mod snapshot;
mod supabase;

pub use config::{AuthConfig, ConfigOverrides};
pub use error::{AuthStoreError, ConfigError};
pub use probe::{run_login_probe, ResultMessage};
pub use snapshot::AuthSnapshot;
pub use supabase::{SupabaseAuthStore, INVALID_EMAIL_MESSAGE};

/// Current authentication state as published by an [`AuthStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub profile: Option<UserProfile>,
    pub loading: bool,
    pub initialized: bool,
    pub is_admin: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            profile: None,
            loading: true,
            initialized: false,
            is_admin: false,
        }
    }
}

impl AuthState {
    fn signed_out(&self) -> Self {
        Self {
            user: None,
            profile: None,
            is_admin: false,
            ..self.clone()
        }
    }
}

/// Outcome of a sign-in call that reached the auth server or was rejected
/// before it. Transport failures are raised as [`AuthStoreError`] instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInResult {
    pub error: Option<String>,
}

impl SignInResult {
    pub fn ok() -> Self {
        Self { error: None }
    }

    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            error: Some(description.into()),
        }
    }
}

#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Restores any persisted session and marks the store initialized.
    /// Failures are absorbed by the store.
    async fn initialize(&self);
    async fn sign_in(&self, email: &str, password: &str)
        -> Result<SignInResult, AuthStoreError>;
    async fn sign_out(&self) -> Result<(), AuthStoreError>;
    fn state(&self) -> AuthState;
    fn subscribe(&self) -> watch::Receiver<AuthState>;
}

pub type SharedAuthStore = Arc<dyn AuthStore>;

pub fn is_admin_user(user: &AuthUser, profile: Option<&UserProfile>, admin_email: &str) -> bool {
    user.email.as_deref() == Some(admin_email)
        || user.user_metadata.has_admin_role()
        || user.app_metadata.has_admin_role()
        || profile.is_some_and(|p| p.role.is_some_and(Role::is_admin))
}

/// Loose `local@domain.tld` check with no whitespace anywhere. Any dot in
/// the domain with text on both sides qualifies.
pub fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .match_indices('.')
        .any(|(at, _)| at > 0 && at + 1 < domain.len())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
