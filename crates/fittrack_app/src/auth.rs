//! Session store: who is signed in, and the transitions between states.
//!
//! The store owns the `{loading, user, error}` state and keeps the persisted
//! token, the shared [`Session`] bearer and `user` in step. It never
//! navigates; the coordinator reads the state and routes accordingly.

use std::sync::Arc;

use fittrack_client::{FitTrackClient, FitTrackError, Session, TokenStore, User};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from server";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check that the backend server is running.";
pub const LOGIN_FAILED_MESSAGE: &str = "An error occurred during login";
pub const REGISTER_FAILED_MESSAGE: &str =
    "Registration failed. Please check your network connection and try again.";
pub const PROFILE_UPDATE_FAILED_MESSAGE: &str = "An error occurred while updating profile";

#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub loading: bool,
    pub user: Option<User>,
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            loading: true,
            user: None,
            error: None,
        }
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Message shown for a failed call: the server's own message, a connectivity
/// hint, or the per-action fallback.
pub fn user_message(err: &FitTrackError, fallback: &str) -> String {
    if let Some(message) = err.server_message() {
        return message;
    }
    match err {
        FitTrackError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
        FitTrackError::InvalidResponse(_) => INVALID_RESPONSE_MESSAGE.to_string(),
        _ => fallback.to_string(),
    }
}

pub struct SessionStore {
    client: Arc<dyn FitTrackClient>,
    session: Session,
    tokens: Arc<dyn TokenStore>,
    state: AuthState,
}

impl SessionStore {
    pub fn new(
        client: Arc<dyn FitTrackClient>,
        session: Session,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            client,
            session,
            tokens,
            state: AuthState::default(),
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Restore a persisted session, if any. Always ends with `loading == false`.
    pub async fn initialize(&mut self) {
        let token = match self.tokens.load().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "could not read persisted token");
                None
            }
        };
        let Some(token) = token else {
            self.state.user = None;
            self.state.loading = false;
            return;
        };

        self.session.set_token(Some(token)).await;
        match self.client.get_profile().await {
            Ok(profile) => {
                info!(username = %profile.username, "restored session");
                self.state.user = Some(profile);
            }
            Err(e) => {
                warn!(error = %e, "persisted token rejected; signing out");
                self.logout().await;
            }
        }
        self.state.loading = false;
    }

    pub async fn login(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<User, FitTrackError> {
        self.state.error = None;
        let result = self
            .client
            .login(username, password.expose_secret())
            .await
            .and_then(accept_auth_response);
        self.finish_auth(result, LOGIN_FAILED_MESSAGE).await
    }

    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<User, FitTrackError> {
        self.state.error = None;
        let result = self
            .client
            .register(username, email, password.expose_secret())
            .await
            .and_then(accept_auth_response);
        self.finish_auth(result, REGISTER_FAILED_MESSAGE).await
    }

    async fn finish_auth(
        &mut self,
        result: Result<(User, SecretString), FitTrackError>,
        fallback: &str,
    ) -> Result<User, FitTrackError> {
        match result {
            Ok((user, token)) => {
                if let Err(e) = self.tokens.save(&token).await {
                    warn!(error = %e, "could not persist token");
                }
                self.session.set_token(Some(token)).await;
                info!(username = %user.username, "signed in");
                self.state.user = Some(user.clone());
                self.state.error = None;
                Ok(user)
            }
            Err(e) => {
                debug!(error = %e, "authentication failed");
                self.state.error = Some(user_message(&e, fallback));
                Err(e)
            }
        }
    }

    /// Save profile fields; on success the stored user is replaced by the server's copy.
    pub async fn update_profile(&mut self, profile: &User) -> Result<User, FitTrackError> {
        match self.client.update_profile(profile).await {
            Ok(resp) => {
                let user = resp.user.unwrap_or_else(|| profile.clone());
                self.state.user = Some(user.clone());
                self.state.error = None;
                Ok(user)
            }
            Err(e) => {
                self.state.error = Some(user_message(&e, PROFILE_UPDATE_FAILED_MESSAGE));
                Err(e)
            }
        }
    }

    /// Drop the session locally. Idempotent; storage failures are only logged.
    pub async fn logout(&mut self) {
        if let Err(e) = self.tokens.clear().await {
            warn!(error = %e, "could not clear persisted token");
        }
        self.session.set_token(None).await;
        if self.state.user.take().is_some() {
            info!("signed out");
        }
    }
}

fn accept_auth_response(
    resp: fittrack_client::AuthResponse,
) -> Result<(User, SecretString), FitTrackError> {
    match (resp.user, resp.access_token) {
        (Some(user), Some(token)) if !token.is_empty() => Ok((user, SecretString::new(token.into()))),
        _ => Err(FitTrackError::InvalidResponse(
            INVALID_RESPONSE_MESSAGE.to_string(),
        )),
    }
}
