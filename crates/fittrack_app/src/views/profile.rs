//! Profile page: edit personal details and change the password.

use std::time::{Duration, Instant};

use fittrack_client::{FitTrackClient, PasswordChange, User};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::auth::SessionStore;
use crate::error::{AppError, AppResult};

pub const PROFILE_LOAD_ERROR: &str = "Failed to load profile. Please try again later.";
pub const PROFILE_SAVE_ERROR: &str = "Failed to update profile. Please try again later.";
pub const PASSWORD_MISMATCH: &str = "New passwords do not match";
pub const PASSWORD_CHANGE_ERROR: &str =
    "Failed to change password. Please make sure your current password is correct.";
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Transient message that hides itself after [`NOTIFICATION_TTL`].
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    shown_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            shown_at: Instant::now(),
        }
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < NOTIFICATION_TTL
    }
}

#[derive(Debug)]
pub struct PasswordFields {
    pub current: SecretString,
    pub new: SecretString,
    pub confirm: SecretString,
}

impl Default for PasswordFields {
    fn default() -> Self {
        Self {
            current: SecretString::new("".into()),
            new: SecretString::new("".into()),
            confirm: SecretString::new("".into()),
        }
    }
}

#[derive(Debug)]
pub struct ProfileView {
    pub loading: bool,
    pub saving: bool,
    pub changing_password: bool,
    pub error: Option<String>,
    pub profile: User,
    pub password: PasswordFields,
    notification: Option<Notification>,
}

impl Default for ProfileView {
    fn default() -> Self {
        Self {
            loading: true,
            saving: false,
            changing_password: false,
            error: None,
            profile: User::default(),
            password: PasswordFields::default(),
            notification: None,
        }
    }
}

impl ProfileView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, client: &dyn FitTrackClient) -> AppResult<()> {
        self.loading = true;
        let result = client.get_profile().await;
        self.loading = false;
        match result {
            Ok(profile) => {
                self.profile = profile;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "profile load failed");
                self.error = Some(PROFILE_LOAD_ERROR.to_string());
                Err(e.into())
            }
        }
    }

    /// Set one editable profile field. Blank clears optional fields.
    pub fn set_field(&mut self, field: &str, value: &str) -> AppResult<()> {
        let value = value.trim();
        let text = || (!value.is_empty()).then(|| value.to_string());
        let p = &mut self.profile;
        match field {
            "email" => p.email = text(),
            "first_name" | "firstName" => p.first_name = text(),
            "last_name" | "lastName" => p.last_name = text(),
            "fitness_goals" | "fitnessGoals" => p.fitness_goals = text(),
            "age" => p.age = parse_optional(value, "age")?,
            "weight" => p.weight = parse_optional(value, "weight")?,
            "height" => p.height = parse_optional(value, "height")?,
            other => {
                return Err(AppError::Validation(format!(
                    "unknown profile field: {other}"
                )));
            }
        }
        Ok(())
    }

    /// Save through the session store so the signed-in user reflects the change.
    pub async fn save(&mut self, auth: &mut SessionStore) -> AppResult<()> {
        if self.saving {
            return Err(AppError::NotAvailable("save already in progress".into()));
        }
        self.saving = true;
        self.error = None;
        let result = auth.update_profile(&self.profile).await;
        self.saving = false;
        match result {
            Ok(user) => {
                info!(username = %user.username, "profile updated");
                self.profile = user;
                self.notify("Profile updated successfully", Severity::Success);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "profile update failed");
                self.error = Some(PROFILE_SAVE_ERROR.to_string());
                self.notify("Failed to update profile", Severity::Error);
                Err(e.into())
            }
        }
    }

    pub async fn change_password(&mut self, client: &dyn FitTrackClient) -> AppResult<()> {
        if self.changing_password {
            return Err(AppError::NotAvailable(
                "password change already in progress".into(),
            ));
        }
        self.check_passwords_match()?;
        self.changing_password = true;
        self.error = None;
        let change = PasswordChange {
            current_password: self.password.current.expose_secret().to_string(),
            new_password: self.password.new.expose_secret().to_string(),
            confirm_password: self.password.confirm.expose_secret().to_string(),
        };
        let result = client.change_password(&change).await;
        self.changing_password = false;
        match result {
            Ok(_) => {
                info!("password changed");
                self.password = PasswordFields::default();
                self.notify("Password changed successfully", Severity::Success);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "password change failed");
                self.error = Some(PASSWORD_CHANGE_ERROR.to_string());
                self.notify("Failed to change password", Severity::Error);
                Err(e.into())
            }
        }
    }

    fn check_passwords_match(&mut self) -> AppResult<()> {
        if self.password.new.expose_secret() == self.password.confirm.expose_secret() {
            return Ok(());
        }
        self.error = Some(PASSWORD_MISMATCH.to_string());
        self.notify(PASSWORD_MISMATCH, Severity::Error);
        Err(AppError::Validation(PASSWORD_MISMATCH.into()))
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        self.notification = Some(Notification::new(message, severity));
    }

    /// The notification, unless it has auto-hidden or been dismissed.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification
            .as_ref()
            .filter(|n| n.is_visible_at(Instant::now()))
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    pub fn render(&self) -> String {
        let mut out = String::from("My Profile\n\n");
        if self.loading {
            out.push_str(super::LOADING_TEXT);
            out.push('\n');
            return out;
        }
        if let Some(n) = self.notification() {
            let tag = match n.severity {
                Severity::Success => "ok",
                Severity::Error => "!!",
            };
            out.push_str(&format!("[{tag}] {}\n", n.message));
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("! {error}\n"));
        }
        let p = &self.profile;
        let show = |v: Option<String>| v.unwrap_or_default();
        out.push_str(&format!("username:      {}\n", p.username));
        out.push_str(&format!("email:         {}\n", show(p.email.clone())));
        out.push_str(&format!("first_name:    {}\n", show(p.first_name.clone())));
        out.push_str(&format!("last_name:     {}\n", show(p.last_name.clone())));
        out.push_str(&format!("age:           {}\n", show(p.age.map(|v| v.to_string()))));
        out.push_str(&format!("weight:        {}\n", show(p.weight.map(|v| format!("{v} kg")))));
        out.push_str(&format!("height:        {}\n", show(p.height.map(|v| format!("{v} cm")))));
        out.push_str(&format!("fitness_goals: {}\n", show(p.fitness_goals.clone())));
        if self.saving {
            out.push_str("Saving...\n");
        }
        if self.changing_password {
            out.push_str("Changing password...\n");
        }
        out
    }
}

fn parse_optional<T: std::str::FromStr>(value: &str, what: &str) -> AppResult<Option<T>> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| AppError::Validation(format!("{what} must be a number")))
}
