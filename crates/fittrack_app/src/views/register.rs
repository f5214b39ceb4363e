use secrecy::{ExposeSecret, SecretString};

use super::Outcome;
use super::login::auth_failure_message;
use crate::auth::SessionStore;
use crate::error::{AppError, AppResult};
use crate::route::AppRoute;

pub const PASSWORDS_DIFFER: &str = "Passwords do not match";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const MIN_PASSWORD_LEN: usize = 6;
pub const REGISTER_FAILED: &str =
    "Registration failed. Please check the console for more details.";

#[derive(Debug)]
pub struct RegisterView {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub confirm: SecretString,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for RegisterView {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: SecretString::new("".into()),
            confirm: SecretString::new("".into()),
            loading: false,
            error: None,
        }
    }
}

impl RegisterView {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<(), &'static str> {
        let password = self.password.expose_secret();
        if password != self.confirm.expose_secret() {
            return Err(PASSWORDS_DIFFER);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(PASSWORD_TOO_SHORT);
        }
        Ok(())
    }

    pub async fn submit(&mut self, auth: &mut SessionStore) -> AppResult<Outcome> {
        if let Err(message) = self.validate() {
            self.error = Some(message.to_string());
            return Err(AppError::Validation(message.into()));
        }
        self.loading = true;
        self.error = None;
        let result = auth
            .register(self.username.trim(), self.email.trim(), &self.password)
            .await;
        self.loading = false;
        match result {
            Ok(_) => Ok(Outcome::Navigate(AppRoute::auth_success_redirect())),
            Err(e) => {
                self.error = Some(auth_failure_message(&e, REGISTER_FAILED));
                Err(e.into())
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Create Account\n\n");
        if let Some(error) = &self.error {
            out.push_str(&format!("! {error}\n"));
        }
        if self.loading {
            out.push_str("Creating account...\n");
        }
        out.push_str("register <username> <email> <password> <confirm>\n");
        out.push_str("Already have an account? Sign In: /login\n");
        out
    }
}
