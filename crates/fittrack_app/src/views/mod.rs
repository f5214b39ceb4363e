//! View-models, one per page.
//!
//! Each view keeps its own `loading`/`error`/data state, exposes an explicit
//! async `load`, and renders itself to text. Actions that can leave the page
//! return an [`Outcome`]; the coordinator performs the navigation.

pub mod dashboard;
pub mod exercise_library;
pub mod login;
pub mod not_found;
pub mod profile;
pub mod register;
pub mod workout_detail;
pub mod workout_form;
pub mod workout_list;

pub use dashboard::DashboardView;
pub use exercise_library::{ExerciseLibraryView, MUSCLE_GROUPS, filter_exercises};
pub use login::LoginView;
pub use profile::{Notification, ProfileView, Severity};
pub use register::RegisterView;
pub use workout_detail::WorkoutDetailView;
pub use workout_form::{FormMode, WorkoutFormView};
pub use workout_list::WorkoutListView;

use fittrack_client::FitTrackError;

use crate::route::AppRoute;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Stay,
    Navigate(AppRoute),
}

pub(crate) const LOADING_TEXT: &str = "Loading...";

/// Pick the error to report from concurrent calls; a rejected session wins.
pub(crate) fn decisive_error(
    errors: impl IntoIterator<Item = FitTrackError>,
) -> Option<FitTrackError> {
    let mut first = None;
    for err in errors {
        if err.is_unauthenticated() {
            return Some(err);
        }
        first.get_or_insert(err);
    }
    first
}
