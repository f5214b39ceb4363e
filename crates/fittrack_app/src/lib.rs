//! Fitness Tracker client: session handling, route guard, page view-models
//! and a line-oriented shell over a [`fittrack_client::FitTrackClient`].

pub mod app;
pub mod auth;
pub mod components;
pub mod error;
pub mod route;
pub mod shell;
pub mod views;

pub use app::{App, Page};
pub use auth::{AuthState, SessionStore};
pub use error::{AppError, AppResult};
pub use route::{AppRoute, GuardDecision, guard};
