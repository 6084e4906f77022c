use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, StatusCode};
use shared::{
    domain::{AuthUser, UserProfile},
    error::{ApiError, ApiException, ErrorCode},
    protocol::{PasswordGrantRequest, RefreshGrantRequest, StoredSession, TokenResponse},
};
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::{
    config::AuthConfig, error::AuthStoreError, is_admin_user, is_plausible_email,
    session::SessionFile, AuthState, AuthStore, SignInResult,
};

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

/// [`AuthStore`] backed by a hosted GoTrue auth server and its `users`
/// profile table.
pub struct SupabaseAuthStore {
    http: Client,
    config: AuthConfig,
    sessions: SessionFile,
    session: Mutex<Option<StoredSession>>,
    state: watch::Sender<AuthState>,
}

impl SupabaseAuthStore {
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: AuthConfig) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            http,
            sessions: SessionFile::new(config.session_path()),
            config,
            session: Mutex::new(None),
            state,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthStoreError> {
        Ok(self.config.supabase_url.join(path)?)
    }

    fn with_key(&self, builder: RequestBuilder, bearer: &str) -> RequestBuilder {
        builder
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    async fn rejection(res: reqwest::Response) -> ApiException {
        let status = res.status().as_u16();
        let body: ApiError = res.json().await.unwrap_or_default();
        ApiException::from_body(status, &body)
    }

    async fn token_grant<B: serde::Serialize>(
        &self,
        grant_type: &str,
        body: &B,
    ) -> Result<Result<TokenResponse, ApiException>, AuthStoreError> {
        let req = self
            .http
            .post(self.endpoint("auth/v1/token")?)
            .query(&[("grant_type", grant_type)])
            .json(body);
        let res = self.with_key(req, &self.config.anon_key).send().await?;
        if !res.status().is_success() {
            return Ok(Err(Self::rejection(res).await));
        }
        Ok(Ok(res.json().await?))
    }

    async fn fetch_user(&self, access_token: &str) -> Result<Option<AuthUser>, AuthStoreError> {
        let req = self.http.get(self.endpoint("auth/v1/user")?);
        let res = self.with_key(req, access_token).send().await?;
        match res.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => Ok(Some(res.json().await?)),
            _ => Err(Self::rejection(res).await.into()),
        }
    }

    async fn query_profile(
        &self,
        session: &StoredSession,
    ) -> Result<Option<UserProfile>, AuthStoreError> {
        let req = self.http.get(self.endpoint("rest/v1/users")?).query(&[
            ("id", format!("eq.{}", session.user.id)),
            ("select", "*".to_string()),
        ]);
        let res = self.with_key(req, &session.access_token).send().await?;
        if !res.status().is_success() {
            return Err(Self::rejection(res).await.into());
        }
        let rows: Vec<UserProfile> = res.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn fetch_profile(&self, session: &StoredSession) -> Option<UserProfile> {
        match self.query_profile(session).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(user_id = %session.user.id, "profile lookup failed: {err}");
                None
            }
        }
    }

    /// Brings a restored session up to date: refreshes expired tokens and
    /// revalidates the user. `None` means the session is no longer usable.
    async fn revalidate(
        &self,
        mut session: StoredSession,
    ) -> Result<Option<StoredSession>, AuthStoreError> {
        if session.is_expired(Utc::now()) {
            debug!(user_id = %session.user.id, "persisted session expired; refreshing");
            let grant = RefreshGrantRequest {
                refresh_token: session.refresh_token.clone(),
            };
            match self.token_grant("refresh_token", &grant).await? {
                Ok(res) => session = StoredSession::from_token_response(res, Utc::now()),
                Err(rejected) => {
                    info!(code = ?rejected.code, "session refresh rejected: {}", rejected.message);
                    return Ok(None);
                }
            }
        }

        match self.fetch_user(&session.access_token).await? {
            Some(user) => {
                session.user = user;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn adopt_session(&self, session: StoredSession) {
        let profile = self.fetch_profile(&session).await;
        let is_admin = is_admin_user(&session.user, profile.as_ref(), &self.config.admin_email);
        if let Err(err) = self.sessions.save(&session).await {
            warn!("failed to persist session: {err}");
        }
        let user = session.user.clone();
        *self.session.lock().await = Some(session);
        info!(user_id = %user.id, is_admin, "auth session established");
        self.state.send_modify(|state| {
            state.user = Some(user);
            state.profile = profile;
            state.is_admin = is_admin;
        });
    }

    /// Clears the in-memory session only; the persisted file is kept for the
    /// next start.
    async fn forget_session(&self) {
        *self.session.lock().await = None;
        self.state.send_modify(|state| *state = state.signed_out());
    }

    async fn drop_session(&self) {
        if let Err(err) = self.sessions.clear().await {
            warn!(path = %self.sessions.path().display(), "failed to clear session file: {err}");
        }
        self.forget_session().await;
    }

    async fn restore(&self) -> Result<(), AuthStoreError> {
        let Some(stored) = self.sessions.load().await? else {
            debug!("no persisted session");
            return Ok(());
        };
        match self.revalidate(stored).await? {
            Some(session) => self.adopt_session(session).await,
            None => self.drop_session().await,
        }
        Ok(())
    }
}

#[async_trait]
impl AuthStore for SupabaseAuthStore {
    async fn initialize(&self) {
        match self.restore().await {
            Ok(()) => {}
            Err(err @ AuthStoreError::SessionFormat { .. }) => {
                error!("failed to initialize auth: {err}");
                self.drop_session().await;
            }
            Err(err) => {
                error!("failed to initialize auth: {err}");
                self.forget_session().await;
            }
        }
        self.state.send_modify(|state| {
            state.loading = false;
            state.initialized = true;
        });
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInResult, AuthStoreError> {
        if !is_plausible_email(email) {
            return Ok(SignInResult::failed(INVALID_EMAIL_MESSAGE));
        }

        let grant = PasswordGrantRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let token = match self.token_grant("password", &grant).await? {
            Ok(token) => token,
            Err(rejected) => {
                warn!(
                    status = rejected.status,
                    code = ?rejected.code,
                    "sign-in rejected: {}",
                    rejected.message
                );
                return Ok(SignInResult::failed(rejected.code.user_message()));
            }
        };

        self.adopt_session(StoredSession::from_token_response(token, Utc::now()))
            .await;
        Ok(SignInResult::ok())
    }

    async fn sign_out(&self) -> Result<(), AuthStoreError> {
        let access_token = self
            .session
            .lock()
            .await
            .as_ref()
            .map(|session| session.access_token.clone());
        if let Some(token) = access_token {
            let req = self.http.post(self.endpoint("auth/v1/logout")?);
            match self.with_key(req, &token).send().await {
                Ok(res) if !res.status().is_success() => {
                    let rejected = Self::rejection(res).await;
                    if rejected.code != ErrorCode::Unauthorized {
                        warn!("remote sign-out failed: {rejected}");
                    }
                }
                Ok(_) => {}
                Err(err) => warn!("remote sign-out failed: {err}"),
            }
        }
        self.drop_session().await;
        Ok(())
    }

    fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}
