use fittrack_client::utils::display_date;
use fittrack_client::{FitTrackClient, Workout};
use tracing::{info, warn};

use super::Outcome;
use crate::error::{AppError, AppResult};
use crate::route::AppRoute;

pub const DETAIL_ERROR: &str = "Failed to load workout details. Please try again later.";
pub const DELETE_ERROR: &str = "Failed to delete workout. Please try again later.";

#[derive(Debug)]
pub struct WorkoutDetailView {
    pub id: String,
    pub loading: bool,
    pub error: Option<String>,
    pub workout: Option<Workout>,
    /// Delete confirmation is open.
    pub confirming: bool,
}

impl WorkoutDetailView {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            loading: true,
            error: None,
            workout: None,
            confirming: false,
        }
    }

    pub async fn load(&mut self, client: &dyn FitTrackClient) -> AppResult<()> {
        self.loading = true;
        let result = client.get_workout(&self.id).await;
        self.loading = false;
        match result {
            Ok(workout) => {
                self.workout = Some(workout);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, id = %self.id, "workout load failed");
                self.error = Some(DETAIL_ERROR.to_string());
                Err(e.into())
            }
        }
    }

    pub fn request_delete(&mut self) {
        self.confirming = true;
    }

    pub fn cancel_delete(&mut self) {
        self.confirming = false;
    }

    /// Issue the DELETE for a confirmed request; navigates to the list on success.
    pub async fn confirm_delete(&mut self, client: &dyn FitTrackClient) -> AppResult<Outcome> {
        if !self.confirming {
            return Err(AppError::NotAvailable(
                "delete has not been requested".into(),
            ));
        }
        let result = client.delete_workout(&self.id).await;
        self.confirming = false;
        match result {
            Ok(()) => {
                info!(id = %self.id, "workout deleted");
                Ok(Outcome::Navigate(AppRoute::Workouts))
            }
            Err(e) => {
                warn!(error = %e, id = %self.id, "workout delete failed");
                self.error = Some(DELETE_ERROR.to_string());
                Err(e.into())
            }
        }
    }

    pub fn render(&self) -> String {
        if self.loading {
            return format!("{}\n", super::LOADING_TEXT);
        }
        let mut out = String::new();
        if let Some(error) = &self.error {
            out.push_str(&format!("! {error}\n"));
        }
        let Some(w) = &self.workout else {
            out.push_str("Back to Workouts: /workouts\n");
            return out;
        };
        out.push_str(&format!("{}\n", w.name));
        if let Some(date) = w.date.as_deref() {
            out.push_str(&format!("Date: {}\n", display_date(date)));
        }
        if let Some(minutes) = w.duration {
            out.push_str(&format!("Duration: {minutes} minutes\n"));
        }
        out.push_str(&format!("Difficulty: {}\n", w.difficulty));
        if let Some(description) = w.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("{description}\n"));
        }
        if !w.tags.is_empty() {
            out.push_str(&format!("Tags: {}\n", w.tags.join(", ")));
        }
        out.push_str("\nExercises\n");
        if w.exercises.is_empty() {
            out.push_str("  No exercises added to this workout.\n");
        }
        for (i, e) in w.exercises.iter().enumerate() {
            out.push_str(&format!("  {}. {} - {} sets x {} reps", i + 1, e.name, e.sets, e.reps));
            if let Some(weight) = e.weight {
                out.push_str(&format!(" @ {weight} {}", e.weight_unit.as_str()));
            }
            out.push('\n');
            if let Some(notes) = e.notes.as_deref().filter(|n| !n.is_empty()) {
                out.push_str(&format!("     {notes}\n"));
            }
        }
        if let Some(notes) = w.notes.as_deref().filter(|n| !n.is_empty()) {
            out.push_str(&format!("\nNotes: {notes}\n"));
        }
        out.push_str(&format!("\nEdit: /workouts/edit/{}  Delete: delete\n", self.id));
        if self.confirming {
            out.push_str(
                "Delete this workout? This action cannot be undone. (confirm / cancel)\n",
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fittrack_client::ExerciseEntry;

    #[test]
    fn confirmation_toggles() {
        let mut view = WorkoutDetailView::new("1");
        view.request_delete();
        assert!(view.confirming);
        view.cancel_delete();
        assert!(!view.confirming);
    }

    #[test]
    fn render_lists_exercises_with_weight() {
        let mut view = WorkoutDetailView::new("3");
        view.loading = false;
        view.workout = Some(Workout {
            name: "Upper".into(),
            exercises: vec![ExerciseEntry {
                name: "Bench Press".into(),
                weight: Some(60.0),
                ..ExerciseEntry::default()
            }],
            ..Workout::default()
        });
        view.request_delete();
        let out = view.render();
        assert!(out.contains("1. Bench Press - 3 sets x 10 reps @ 60 kg"));
        assert!(out.contains("Duration: 30 minutes"));
        assert!(out.contains("cannot be undone"));
    }
}
