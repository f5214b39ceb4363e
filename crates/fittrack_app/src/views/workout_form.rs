//! Create/edit form for a workout, with its embedded exercise list and tags.

use fittrack_client::utils::normalize_workout_date;
use fittrack_client::{
    Difficulty, Exercise, ExerciseEntry, FitTrackClient, FitTrackError, WeightUnit, Workout,
};
use tracing::{info, warn};

use super::Outcome;
use super::exercise_library::LIBRARY_PAGE_SIZE;
use crate::error::{AppError, AppResult};
use crate::route::AppRoute;

pub const LOAD_ERROR: &str = "Failed to load workout. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

impl FormMode {
    fn verb(&self) -> &'static str {
        match self {
            FormMode::Create => "create",
            FormMode::Edit(_) => "update",
        }
    }
}

#[derive(Debug)]
pub struct WorkoutFormView {
    pub mode: FormMode,
    pub values: Workout,
    /// Exercise being composed before it is appended to `values.exercises`.
    pub draft: ExerciseEntry,
    pub available: Vec<Exercise>,
    pub initial_loading: bool,
    pub saving: bool,
    pub error: Option<String>,
}

impl WorkoutFormView {
    pub fn new(mode: FormMode) -> Self {
        let initial_loading = matches!(mode, FormMode::Edit(_));
        Self {
            mode,
            values: Workout {
                date: Some(chrono::Local::now().format("%Y-%m-%d").to_string()),
                ..Workout::default()
            },
            draft: ExerciseEntry::default(),
            available: Vec::new(),
            initial_loading,
            saving: false,
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    /// Fetch the exercise library and, in edit mode, the workout being edited.
    pub async fn load(&mut self, client: &dyn FitTrackClient) -> AppResult<()> {
        let library = client.list_exercises(1, LIBRARY_PAGE_SIZE, None);
        let (library, existing) = match &self.mode {
            FormMode::Create => (library.await, None),
            FormMode::Edit(id) => {
                let (library, existing) = tokio::join!(library, client.get_workout(id));
                (library, Some(existing))
            }
        };

        let mut unauthenticated: Option<FitTrackError> = None;
        match library {
            Ok(exercises) => self.available = exercises,
            Err(e) if e.is_unauthenticated() => unauthenticated = Some(e),
            Err(e) => warn!(error = %e, "failed to load exercise library"),
        }

        if let Some(existing) = existing {
            self.initial_loading = false;
            match existing {
                Ok(workout) => {
                    self.values = workout;
                    self.error = None;
                }
                Err(e) => {
                    warn!(error = %e, "failed to load workout for editing");
                    self.error = Some(LOAD_ERROR.to_string());
                    return Err(unauthenticated.unwrap_or(e).into());
                }
            }
        }
        match unauthenticated {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Set one workout field from user input.
    pub fn set_field(&mut self, field: &str, value: &str) -> AppResult<()> {
        let value = value.trim();
        let optional = || (!value.is_empty()).then(|| value.to_string());
        match field {
            "name" => self.values.name = value.to_string(),
            "description" => self.values.description = optional(),
            "notes" => self.values.notes = optional(),
            "difficulty" => {
                self.values.difficulty = Difficulty::parse(value).ok_or_else(|| {
                    AppError::Validation(format!(
                        "difficulty must be one of {}",
                        Difficulty::LEVELS.map(|d| d.as_str()).join(", ")
                    ))
                })?
            }
            "duration" => {
                self.values.duration = match value {
                    "" => None,
                    v => Some(parse_positive(v, "duration")?),
                }
            }
            "date" => {
                self.values.date = match value {
                    "" => None,
                    v => Some(normalize_workout_date(v).ok_or_else(|| {
                        AppError::Validation("date must look like YYYY-MM-DD".into())
                    })?),
                }
            }
            other => return Err(AppError::Validation(format!("unknown field: {other}"))),
        }
        Ok(())
    }

    /// Seed the draft from a library exercise, matched by name.
    pub fn pick_exercise(&mut self, name: &str) -> AppResult<()> {
        let name = name.trim();
        let exercise = self
            .available
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| AppError::Validation(format!("no library exercise named {name}")))?;
        self.draft = ExerciseEntry::from_library(exercise);
        Ok(())
    }

    /// Set one field of the draft exercise.
    pub fn set_draft_field(&mut self, field: &str, value: &str) -> AppResult<()> {
        let value = value.trim();
        match field {
            "name" => self.draft.name = value.to_string(),
            "description" => self.draft.description = value.to_string(),
            "sets" => self.draft.sets = parse_positive(value, "sets")?,
            "reps" => self.draft.reps = parse_positive(value, "reps")?,
            "weight" => {
                self.draft.weight = match value {
                    "" => None,
                    v => {
                        let w: f64 = v.parse().map_err(|_| {
                            AppError::Validation("weight must be a number".into())
                        })?;
                        if !w.is_finite() || w < 0.0 {
                            return Err(AppError::Validation(
                                "weight must be a non-negative number".into(),
                            ));
                        }
                        Some(w)
                    }
                }
            }
            "unit" | "weight_unit" => {
                self.draft.weight_unit = WeightUnit::parse(value)
                    .ok_or_else(|| AppError::Validation("unit must be kg or lb".into()))?
            }
            "notes" => self.draft.notes = (!value.is_empty()).then(|| value.to_string()),
            other => {
                return Err(AppError::Validation(format!(
                    "unknown exercise field: {other}"
                )));
            }
        }
        Ok(())
    }

    /// Append the draft (it needs a name) and reset it to the blank default.
    pub fn add_exercise(&mut self) -> AppResult<()> {
        if self.draft.name.trim().is_empty() {
            return Err(AppError::Validation("exercise name is required".into()));
        }
        let entry = std::mem::take(&mut self.draft);
        self.values.exercises.push(entry);
        Ok(())
    }

    /// Remove the exercise at zero-based `index`.
    pub fn remove_exercise(&mut self, index: usize) -> AppResult<()> {
        if index >= self.values.exercises.len() {
            return Err(AppError::Validation(format!(
                "no exercise at position {}",
                index + 1
            )));
        }
        self.values.exercises.remove(index);
        Ok(())
    }

    /// Add a trimmed tag; blank or duplicate tags are ignored. Returns whether it was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.values.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.values.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.values.tags.retain(|t| t != tag);
    }

    /// Create or update the workout. The form keeps its values on failure.
    pub async fn submit(&mut self, client: &dyn FitTrackClient) -> AppResult<Outcome> {
        if self.saving {
            return Err(AppError::NotAvailable("save already in progress".into()));
        }
        if self.values.name.trim().is_empty() {
            return Err(AppError::Validation("workout name is required".into()));
        }
        self.saving = true;
        self.error = None;
        let result = match &self.mode {
            FormMode::Create => client.create_workout(&self.values).await,
            FormMode::Edit(id) => client.update_workout(id, &self.values).await,
        };
        self.saving = false;
        match result {
            Ok(saved) => {
                info!(id = ?saved.id, mode = self.mode.verb(), "workout saved");
                Ok(Outcome::Navigate(AppRoute::Workouts))
            }
            Err(e) => {
                warn!(error = %e, mode = self.mode.verb(), "workout save failed");
                self.error = Some(format!(
                    "Failed to {} workout. Please try again later.",
                    self.mode.verb()
                ));
                Err(e.into())
            }
        }
    }

    pub fn render(&self) -> String {
        let title = if self.is_edit() { "Edit Workout" } else { "Create New Workout" };
        let mut out = format!("{title}\n\n");
        if self.initial_loading {
            out.push_str(super::LOADING_TEXT);
            out.push('\n');
            return out;
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("! {error}\n"));
        }
        let v = &self.values;
        out.push_str(&format!("name:        {}\n", v.name));
        out.push_str(&format!("date:        {}\n", v.date.as_deref().unwrap_or("")));
        out.push_str(&format!(
            "duration:    {}\n",
            v.duration.map(|d| format!("{d} minutes")).unwrap_or_default()
        ));
        out.push_str(&format!(
            "difficulty:  {} (one of {})\n",
            v.difficulty,
            Difficulty::LEVELS.map(|d| d.as_str()).join(", ")
        ));
        out.push_str(&format!("description: {}\n", v.description.as_deref().unwrap_or("")));
        out.push_str(&format!("notes:       {}\n", v.notes.as_deref().unwrap_or("")));
        out.push_str(&format!("tags:        {}\n", v.tags.join(", ")));

        out.push_str("\nExercises\n");
        if v.exercises.is_empty() {
            out.push_str("  No exercises added yet.\n");
        }
        for (i, e) in v.exercises.iter().enumerate() {
            out.push_str(&format!("  {}. {} - {} x {}", i + 1, e.name, e.sets, e.reps));
            if let Some(w) = e.weight {
                out.push_str(&format!(" @ {w} {}", e.weight_unit.as_str()));
            }
            out.push('\n');
        }

        let d = &self.draft;
        out.push_str(&format!(
            "\nDraft exercise: {} | sets {} | reps {} | weight {} {}\n",
            if d.name.is_empty() { "(none)" } else { d.name.as_str() },
            d.sets,
            d.reps,
            d.weight.map(|w| w.to_string()).unwrap_or_else(|| "-".into()),
            d.weight_unit.as_str()
        ));
        if !self.available.is_empty() {
            let names: Vec<&str> = self.available.iter().map(|e| e.name.as_str()).collect();
            out.push_str(&format!("Library: {}\n", names.join(", ")));
        }
        if self.saving {
            out.push_str("Saving...\n");
        }
        out
    }
}

fn parse_positive(value: &str, what: &str) -> AppResult<u32> {
    match value.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(AppError::Validation(format!(
            "{what} must be a whole number of at least 1"
        ))),
    }
}
