// Authentication client: login flows, coalesced token refresh, and logout

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::navigation::{self, Navigator, Route};
use crate::token_store::TokenStore;
use crate::types::*;
use async_singleflight::Group;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Macro to check HTTP response status and return error if not successful
macro_rules! check_response {
    ($response:expr) => {
        if !$response.status().is_success() {
            let status = $response.status();
            let body = $response.text().await.unwrap_or_default();
            return Err(ClientError::Backend { status, body });
        }
    };
}

/// Where the client stands in the login flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticating,
    Authenticated { role: Option<Role> },
}

impl AuthState {
    fn from_session(session: Option<&SessionRecord>) -> Self {
        match session {
            Some(record) if record.access_token.is_some() => AuthState::Authenticated {
                role: record.role().cloned(),
            },
            _ => AuthState::Anonymous,
        }
    }
}

/// Authentication client with session storage and automatic token refresh
///
/// Owns the session for one backend origin (the configured base URL).
pub struct AuthClient {
    config: ClientConfig,
    token_store: TokenStore,
    http_client: Client,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<AuthState>,
    /// Singleflight group so concurrent 401s share one refresh per origin.
    /// Error type is String because singleflight requires a cloneable error
    token_refresh_singleflight: Group<String, String>,
}

impl AuthClient {
    /// Create a client, opening the session file if the config names one.
    pub fn new(config: ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Arc<Self>> {
        let token_store = match &config.session_path {
            Some(path) => TokenStore::open(path),
            None => TokenStore::new(),
        };
        Self::with_store(config, token_store, navigator)
    }

    /// Create a client on top of an existing store.
    pub fn with_store(
        config: ClientConfig,
        token_store: TokenStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Arc<Self>> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let initial = AuthState::from_session(token_store.get(&config.api_base).as_ref());
        let (state, _) = watch::channel(initial);

        Ok(Arc::new(Self {
            config,
            token_store,
            http_client,
            navigator,
            state,
            token_refresh_singleflight: Group::new(),
        }))
    }

    /// Origin the session is stored under
    pub fn origin(&self) -> &str {
        &self.config.api_base
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the token store (for advanced usage)
    pub fn token_store(&self) -> &TokenStore {
        &self.token_store
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.http_client
    }

    pub fn access_token(&self) -> Option<String> {
        self.token_store.access_token(self.origin())
    }

    pub fn session(&self) -> Option<SessionRecord> {
        self.token_store.get(self.origin())
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// User snapshot stored at login time
    pub fn current_user(&self) -> Option<CachedUser> {
        self.token_store.user(self.origin())
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Redirect required before showing `target`, if any
    pub fn guard(&self, target: &Route) -> Option<Route> {
        navigation::guard(self.session().as_ref(), target)
    }

    /// Email/password login. Stores the session and redirects by role.
    pub async fn login(&self, email: &str, password: &str) -> Result<CachedUser> {
        self.authenticate("/auth/login", &LoginRequest { email, password })
            .await
    }

    /// Account registration. Signs the new account in like a login.
    pub async fn register(&self, fullname: &str, email: &str, password: &str) -> Result<CachedUser> {
        self.authenticate(
            "/auth/register",
            &RegisterRequest {
                fullname,
                email,
                password,
            },
        )
        .await
    }

    /// Login with a Google ID token.
    pub async fn google_login(&self, id_token: &str) -> Result<CachedUser> {
        self.authenticate("/auth/google-login", &GoogleLoginRequest { token: id_token })
            .await
    }

    async fn authenticate<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<CachedUser> {
        self.state.send_replace(AuthState::Authenticating);

        match self.do_authenticate(path, body).await {
            Ok(user) => {
                let role = user.role.clone();
                info!(origin = %self.origin(), path = %path, role = ?role, "Signed in");
                self.state
                    .send_replace(AuthState::Authenticated { role: role.clone() });
                self.navigator.navigate(Route::for_role(role.as_ref()));
                Ok(user)
            }
            Err(e) => {
                warn!(origin = %self.origin(), path = %path, error = %e, "Sign-in failed");
                self.state
                    .send_replace(AuthState::from_session(self.session().as_ref()));
                Err(e)
            }
        }
    }

    async fn do_authenticate<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<CachedUser> {
        let response = self
            .http_client
            .post(self.config.url(path))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        check_response!(response);

        let value: Value = response.json().await?;
        let (tokens, user) = LoginResponse::from_value(value)?.into_parts();

        self.token_store
            .store(self.origin(), SessionRecord::new(tokens, user.clone()));

        Ok(user)
    }

    /// Exchange the stored refresh token for a new token pair.
    ///
    /// Returns `false` without a network call when no refresh token is
    /// stored. Any other failure logs out before returning `false`.
    /// Concurrent callers share a single in-flight refresh.
    pub async fn refresh(&self) -> bool {
        self.refresh_from(None).await
    }

    /// Refresh after a request was rejected while using `stale_access_token`.
    ///
    /// If the stored access token already differs, another task refreshed in
    /// the meantime and the caller can retry straight away.
    pub(crate) async fn refresh_after(&self, stale_access_token: &str) -> bool {
        self.refresh_from(Some(stale_access_token)).await
    }

    async fn refresh_from(&self, stale_access_token: Option<&str>) -> bool {
        if self.token_store.refresh_token(self.origin()).is_none() {
            debug!(origin = %self.origin(), "No refresh token stored, skipping refresh");
            return false;
        }
        self.do_refresh_singleflight(stale_access_token).await.is_ok()
    }

    async fn do_refresh_singleflight(&self, stale_access_token: Option<&str>) -> Result<String> {
        let origin = self.origin().to_string();
        let (success_opt, error_opt, _shared) = self
            .token_refresh_singleflight
            .work(&origin, async {
                match self.do_refresh(stale_access_token).await {
                    Ok(tokens) => Ok(tokens.access_token),
                    Err(e) => {
                        let err_msg = e.to_string();
                        warn!(origin = %origin, error = %err_msg, "Token refresh failed");
                        self.logout();
                        Err(err_msg)
                    }
                }
            })
            .await;

        match (success_opt, error_opt) {
            (Some(token), None) => Ok(token),
            (None, Some(err_str)) => Err(ClientError::InvalidResponse(err_str)),
            _ => Err(ClientError::InvalidResponse(
                "Unknown error during token refresh".to_string(),
            )),
        }
    }

    async fn do_refresh(&self, stale_access_token: Option<&str>) -> Result<AuthTokens> {
        let session = self.session().ok_or(ClientError::NotAuthenticated)?;
        let refresh_token = session.refresh_token.ok_or(ClientError::NotAuthenticated)?;

        // A caller arriving after a finished refresh must not rotate the pair again
        if let (Some(stale), Some(current)) = (stale_access_token, session.access_token) {
            if current != stale {
                debug!(origin = %self.origin(), "Access token already replaced, skipping refresh");
                return Ok(AuthTokens {
                    access_token: current,
                    refresh_token,
                });
            }
        }

        let response = self
            .http_client
            .post(self.config.url("/auth/refresh"))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })
            .send()
            .await?;

        check_response!(response);

        let refresh_response: RefreshResponse = response.json().await?;
        let tokens = refresh_response.into_tokens().ok_or_else(|| {
            ClientError::InvalidResponse("refresh response is missing a token".to_string())
        })?;

        if !self.token_store.replace_tokens(self.origin(), &tokens) {
            return Err(ClientError::NotAuthenticated);
        }

        info!(origin = %self.origin(), "Access token refreshed successfully");
        Ok(tokens)
    }

    /// Drop the session and send the user to login. Safe to call repeatedly.
    pub fn logout(&self) {
        let had_session = self.token_store.contains(self.origin());
        self.token_store.remove(self.origin());
        self.state.send_replace(AuthState::Anonymous);
        if had_session {
            info!(origin = %self.origin(), "Logged out");
        }
        self.navigator.navigate(Route::Login);
    }
}
