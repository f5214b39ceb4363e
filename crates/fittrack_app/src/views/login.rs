use fittrack_client::FitTrackError;
use secrecy::{ExposeSecret, SecretString};

use super::Outcome;
use crate::auth::{NETWORK_ERROR_MESSAGE, SessionStore};
use crate::error::{AppError, AppResult};
use crate::route::AppRoute;

pub const MISSING_CREDENTIALS: &str = "Username and password are required";
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials and try again.";

#[derive(Debug)]
pub struct LoginView {
    pub username: String,
    pub password: SecretString,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for LoginView {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: SecretString::new("".into()),
            loading: false,
            error: None,
        }
    }
}

/// Message for a failed sign-in or sign-up attempt.
pub(crate) fn auth_failure_message(err: &FitTrackError, fallback: &str) -> String {
    match err.server_message() {
        Some(message) => message,
        None if err.is_network() => NETWORK_ERROR_MESSAGE.to_string(),
        None => fallback.to_string(),
    }
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn submit(&mut self, auth: &mut SessionStore) -> AppResult<Outcome> {
        if self.username.trim().is_empty() || self.password.expose_secret().is_empty() {
            self.error = Some(MISSING_CREDENTIALS.to_string());
            return Err(AppError::Validation(MISSING_CREDENTIALS.into()));
        }
        self.loading = true;
        self.error = None;
        let result = auth.login(self.username.trim(), &self.password).await;
        self.loading = false;
        match result {
            Ok(_) => Ok(Outcome::Navigate(AppRoute::auth_success_redirect())),
            Err(e) => {
                self.error = Some(auth_failure_message(&e, LOGIN_FAILED));
                Err(e.into())
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Sign In\n\n");
        if let Some(error) = &self.error {
            out.push_str(&format!("! {error}\n"));
        }
        if self.loading {
            out.push_str("Signing in...\n");
        }
        out.push_str("login <username> <password>\n");
        out.push_str("Don't have an account? Sign Up: /register\n");
        out
    }
}
