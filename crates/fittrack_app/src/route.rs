//! Routes and the route guard.
//!
//! Pure logic: parsing paths, which routes need a signed-in user, and the
//! guard decision for a route given the current session state.

use std::fmt::Display;

use crate::auth::AuthState;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    #[default]
    Login,
    Register,
    Dashboard,
    Workouts,
    WorkoutNew,
    WorkoutDetail(String),
    WorkoutEdit(String),
    Exercises,
    Profile,
    NotFound,
}

impl AppRoute {
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default().trim();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        match segments.as_slice() {
            [""] => Self::Dashboard,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["workouts"] => Self::Workouts,
            ["workouts", "new"] => Self::WorkoutNew,
            ["workouts", "edit", id] if !id.is_empty() => Self::WorkoutEdit((*id).to_string()),
            ["workouts", id] if !id.is_empty() => Self::WorkoutDetail((*id).to_string()),
            ["exercises"] => Self::Exercises,
            ["profile"] => Self::Profile,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".into(),
            Self::Register => "/register".into(),
            Self::Dashboard => "/".into(),
            Self::Workouts => "/workouts".into(),
            Self::WorkoutNew => "/workouts/new".into(),
            Self::WorkoutDetail(id) => format!("/workouts/{id}"),
            Self::WorkoutEdit(id) => format!("/workouts/edit/{id}"),
            Self::Exercises => "/exercises".into(),
            Self::Profile => "/profile".into(),
            Self::NotFound => "/404".into(),
        }
    }

    /// Whether the route is only reachable with a signed-in user.
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::Workouts
                | Self::WorkoutNew
                | Self::WorkoutDetail(_)
                | Self::WorkoutEdit(_)
                | Self::Exercises
                | Self::Profile
        )
    }

    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(AppRoute),
    /// Session restore still running; re-evaluate once it settles.
    Pending,
}

pub fn guard(route: &AppRoute, state: &AuthState) -> GuardDecision {
    if !route.requires_auth() {
        return GuardDecision::Render;
    }
    if state.loading {
        return GuardDecision::Pending;
    }
    if state.user.is_some() {
        GuardDecision::Render
    } else {
        GuardDecision::Redirect(AppRoute::auth_failure_redirect())
    }
}
