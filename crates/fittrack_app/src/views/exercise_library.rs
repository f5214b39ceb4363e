use fittrack_client::{Exercise, FitTrackClient};
use tracing::warn;

use crate::components::exercise_card;
use crate::error::{AppError, AppResult};

pub const EXERCISES_ERROR: &str = "Failed to load exercises. Please try again later.";
pub const LIBRARY_PAGE_SIZE: u32 = 50;
pub const ALL_GROUPS: &str = "All";
pub const MUSCLE_GROUPS: [&str; 8] = [
    ALL_GROUPS,
    "Chest",
    "Back",
    "Shoulders",
    "Arms",
    "Legs",
    "Core",
    "Full Body",
];

/// Exercises matching the muscle-group selector (exact, `All` passes
/// everything) and the search term (case-insensitive substring of name or
/// description, taken as typed; empty passes everything).
pub fn filter_exercises<'a>(
    exercises: &'a [Exercise],
    group: &str,
    search: &str,
) -> Vec<&'a Exercise> {
    let needle = search.to_lowercase();
    exercises
        .iter()
        .filter(|e| group == ALL_GROUPS || e.muscle_group.as_deref() == Some(group))
        .filter(|e| {
            needle.is_empty()
                || e.name.to_lowercase().contains(&needle)
                || e
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .collect()
}

#[derive(Debug)]
pub struct ExerciseLibraryView {
    pub loading: bool,
    pub error: Option<String>,
    pub exercises: Vec<Exercise>,
    pub search: String,
    pub group: String,
}

impl Default for ExerciseLibraryView {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            exercises: Vec::new(),
            search: String::new(),
            group: ALL_GROUPS.to_string(),
        }
    }
}

impl ExerciseLibraryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, client: &dyn FitTrackClient) -> AppResult<()> {
        self.loading = true;
        let result = client.list_exercises(1, LIBRARY_PAGE_SIZE, None).await;
        self.loading = false;
        match result {
            Ok(exercises) => {
                self.exercises = exercises;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "exercise library load failed");
                self.error = Some(EXERCISES_ERROR.to_string());
                Err(e.into())
            }
        }
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    /// Select a muscle group; matched case-insensitively against the known groups.
    pub fn select_group(&mut self, group: &str) -> AppResult<()> {
        let group = group.trim();
        let known = MUSCLE_GROUPS
            .iter()
            .find(|g| g.eq_ignore_ascii_case(group))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "muscle group must be one of {}",
                    MUSCLE_GROUPS.join(", ")
                ))
            })?;
        self.group = (*known).to_string();
        Ok(())
    }

    pub fn visible(&self) -> Vec<&Exercise> {
        filter_exercises(&self.exercises, &self.group, &self.search)
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Exercise Library\n");
        out.push_str(&format!(
            "search: \"{}\"  muscle group: {}\n\n",
            self.search, self.group
        ));
        if self.loading {
            out.push_str(super::LOADING_TEXT);
            out.push('\n');
            return out;
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("! {error}\n"));
            return out;
        }
        let visible = self.visible();
        if visible.is_empty() {
            out.push_str("No exercises found matching your criteria.\n");
        }
        for e in visible {
            out.push_str(&exercise_card(e));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(name: &str, group: &str, description: Option<&str>) -> Exercise {
        Exercise {
            name: name.into(),
            muscle_group: Some(group.into()),
            description: description.map(str::to_string),
            ..Exercise::default()
        }
    }

    fn library() -> Vec<Exercise> {
        vec![
            ex("Bench Press", "Chest", Some("Barbell press on a flat bench")),
            ex("Push-up", "Chest", None),
            ex("Squat", "Legs", Some("Compound lower body PRESS pattern")),
            ex("Plank", "Core", Some("Isometric hold")),
        ]
    }

    #[test]
    fn group_filter_is_exact() {
        let all = library();
        let chest = filter_exercises(&all, "Chest", "");
        assert_eq!(chest.len(), 2);
        assert!(chest.iter().all(|e| e.muscle_group.as_deref() == Some("Chest")));
        assert!(filter_exercises(&all, "chest", "").is_empty());
        assert_eq!(filter_exercises(&all, "All", "").len(), 4);
    }

    #[test]
    fn search_matches_name_or_description_ignoring_case() {
        let all = library();
        let names: Vec<&str> = filter_exercises(&all, "All", "press")
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, ["Bench Press", "Squat"]);
        assert_eq!(filter_exercises(&all, "Legs", "PRESS").len(), 1);
        assert!(filter_exercises(&all, "Core", "press").is_empty());
    }

    #[test]
    fn search_keeps_surrounding_whitespace() {
        let all = library();
        assert!(filter_exercises(&all, "All", "up ").is_empty());
        let names: Vec<&str> = filter_exercises(&all, "All", " ")
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, ["Bench Press", "Squat", "Plank"]);
    }

    #[test]
    fn select_group_normalizes_case() {
        let mut view = ExerciseLibraryView::new();
        view.select_group("full body").unwrap();
        assert_eq!(view.group, "Full Body");
        assert!(view.select_group("Neck").is_err());
        assert_eq!(view.group, "Full Body");
    }
}
