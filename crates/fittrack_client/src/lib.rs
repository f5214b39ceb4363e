//! `FitTrackClient` trait, wire models and a reqwest-based implementation.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod observability;
pub mod session;
pub mod utils;

pub use session::{FileTokenStore, MemoryTokenStore, Session, TOKEN_STORAGE_KEY, TokenStore};

#[derive(Debug, Error)]
pub enum FitTrackError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("unauthenticated: {body}")]
    Unauthenticated {
        message: Option<String>,
        body: String,
    },
    #[error("api error ({status}): {body}")]
    Api {
        status: u16,
        message: Option<String>,
        body: String,
    },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for FitTrackError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FitTrackError::InvalidResponse(err.to_string())
        } else {
            FitTrackError::Network(err)
        }
    }
}

impl FitTrackError {
    /// True for the error kind the coordinator reacts to by dropping the session.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, FitTrackError::Unauthenticated { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, FitTrackError::Network(_))
    }

    /// The `error` message from a structured failure payload, when the server sent one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            FitTrackError::Api { message, .. } | FitTrackError::Unauthenticated { message, .. } => {
                message.clone()
            }
            _ => None,
        }
    }

    /// Map a non-success status and its full body to an error kind.
    ///
    /// The server message is read from the whole body; only a snippet is kept.
    pub fn from_status(status: u16, body: String) -> Self {
        let message = utils::extract_error_message(&body);
        let body = utils::body_snippet(&body);
        match status {
            401 => FitTrackError::Unauthenticated { message, body },
            _ => FitTrackError::Api {
                status,
                message,
                body,
            },
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        default,
        deserialize_with = "deserialize_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness_goals: Option<String>,
}

/// Body returned by `/auth/login` and `/auth/register`.
///
/// Both fields are optional on the wire; callers decide whether a response
/// lacking either one is usable.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct AuthResponse {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ProfileUpdateResponse {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    #[serde(other)]
    Unknown,
}

impl Difficulty {
    pub const LEVELS: [Difficulty; 4] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
            Difficulty::Unknown => "Unknown",
        }
    }

    /// Case-insensitive parse of one of the four selectable levels.
    pub fn parse(s: &str) -> Option<Self> {
        Self::LEVELS
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" => Some(WeightUnit::Kg),
            "lb" | "lbs" => Some(WeightUnit::Lb),
            _ => None,
        }
    }
}

/// An exercise as embedded in a workout: a snapshot, not a reference.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_sets")]
    pub sets: u32,
    #[serde(default = "default_reps")]
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_sets() -> u32 {
    3
}

fn default_reps() -> u32 {
    10
}

impl Default for ExerciseEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            sets: default_sets(),
            reps: default_reps(),
            weight: None,
            weight_unit: WeightUnit::Kg,
            notes: None,
        }
    }
}

impl ExerciseEntry {
    /// Seed an entry from a library exercise: name and description only.
    pub fn from_library(exercise: &Exercise) -> Self {
        Self {
            name: exercise.name.clone(),
            description: exercise.description.clone().unwrap_or_default(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    #[serde(
        default,
        deserialize_with = "deserialize_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
}

impl Default for Workout {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: None,
            difficulty: Difficulty::Beginner,
            duration: Some(30),
            date: None,
            notes: None,
            tags: Vec::new(),
            exercises: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct WorkoutPage {
    #[serde(default)]
    pub workouts: Vec<Workout>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(
        default,
        deserialize_with = "deserialize_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for attaching a library exercise to a stored workout.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct WorkoutExerciseLink {
    pub exercise_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SummaryStats {
    #[serde(default)]
    pub total_workouts: u64,
    #[serde(default)]
    pub workouts_last_30_days: u64,
    #[serde(default)]
    pub total_duration_minutes: Option<u64>,
    #[serde(default)]
    pub most_frequent_exercise: Option<String>,
    #[serde(default)]
    pub last_workout_date: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct MonthlyStat {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub duration: u64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ExerciseStat {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub count: u64,
}

fn deserialize_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string().into()),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[async_trait]
pub trait FitTrackClient: Send + Sync + 'static {
    // === Auth ===

    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, FitTrackError>;
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, FitTrackError>;
    async fn get_profile(&self) -> Result<User, FitTrackError>;
    async fn update_profile(&self, user: &User) -> Result<ProfileUpdateResponse, FitTrackError>;
    async fn change_password(
        &self,
        change: &PasswordChange,
    ) -> Result<serde_json::Value, FitTrackError>;

    // === Workouts ===

    async fn list_workouts(&self, page: u32, per_page: u32) -> Result<WorkoutPage, FitTrackError>;
    async fn get_workout(&self, workout_id: &str) -> Result<Workout, FitTrackError>;
    async fn create_workout(&self, workout: &Workout) -> Result<Workout, FitTrackError>;
    async fn update_workout(
        &self,
        workout_id: &str,
        workout: &Workout,
    ) -> Result<Workout, FitTrackError>;
    async fn delete_workout(&self, workout_id: &str) -> Result<(), FitTrackError>;

    /// Attach a library exercise to a stored workout
    async fn add_workout_exercise(
        &self,
        workout_id: &str,
        link: &WorkoutExerciseLink,
    ) -> Result<serde_json::Value, FitTrackError>;

    /// Update sets/reps/weight of an attached exercise
    async fn update_workout_exercise(
        &self,
        workout_id: &str,
        entry_id: &str,
        fields: &serde_json::Value,
    ) -> Result<serde_json::Value, FitTrackError>;

    /// Detach an exercise from a stored workout
    async fn remove_workout_exercise(
        &self,
        workout_id: &str,
        entry_id: &str,
    ) -> Result<(), FitTrackError>;

    // === Exercise library ===

    async fn list_exercises(
        &self,
        page: u32,
        per_page: u32,
        muscle_group: Option<&str>,
    ) -> Result<Vec<Exercise>, FitTrackError>;
    async fn get_exercise(&self, exercise_id: &str) -> Result<Exercise, FitTrackError>;
    async fn create_exercise(&self, exercise: &Exercise) -> Result<Exercise, FitTrackError>;
    async fn update_exercise(
        &self,
        exercise_id: &str,
        exercise: &Exercise,
    ) -> Result<Exercise, FitTrackError>;
    async fn delete_exercise(&self, exercise_id: &str) -> Result<(), FitTrackError>;

    // === Statistics ===

    async fn get_summary_stats(&self) -> Result<SummaryStats, FitTrackError>;
    async fn get_monthly_stats(&self) -> Result<Vec<MonthlyStat>, FitTrackError>;
    async fn get_exercise_stats(&self) -> Result<Vec<ExerciseStat>, FitTrackError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_opt_string_from_number() {
        let payload = json!({"id": 1, "username": "alice"});
        let user: User = serde_json::from_value(payload).expect("deserialize number id");
        assert_eq!(user.id.as_deref(), Some("1"));
        assert_eq!(user.username, "alice");
        assert!(user.email.is_none());
    }

    #[test]
    fn deserialize_opt_string_invalid_type_errors() {
        let payload = json!({"id": {"nested": true}, "name": "x"});
        let res: Result<Workout, _> = serde_json::from_value(payload);
        assert!(res.is_err());
    }

    #[test]
    fn unknown_difficulty_maps_to_unknown() {
        let payload = json!({"id": 3, "name": "Legs", "difficulty": "Insane"});
        let w: Workout = serde_json::from_value(payload).expect("deserialize workout");
        assert_eq!(w.difficulty, Difficulty::Unknown);
        assert!(w.tags.is_empty());
        assert!(w.exercises.is_empty());
    }

    #[test]
    fn user_uses_camel_case_on_the_wire() {
        let user = User {
            username: "alice".into(),
            first_name: Some("Alice".into()),
            fitness_goals: Some("run 10k".into()),
            ..User::default()
        };
        let v = serde_json::to_value(&user).unwrap();
        assert_eq!(v["firstName"], "Alice");
        assert_eq!(v["fitnessGoals"], "run 10k");
        assert!(v.get("id").is_none());
    }

    #[test]
    fn exercise_entry_defaults_and_unit() {
        let entry: ExerciseEntry =
            serde_json::from_value(json!({"name": "Squat", "weightUnit": "lb"})).unwrap();
        assert_eq!(entry.sets, 3);
        assert_eq!(entry.reps, 10);
        assert_eq!(entry.weight_unit, WeightUnit::Lb);
    }

    #[test]
    fn from_status_extracts_server_message() {
        let err = FitTrackError::from_status(400, r#"{"error":"Name is required"}"#.into());
        assert_eq!(err.server_message().as_deref(), Some("Name is required"));
        assert!(!err.is_unauthenticated());

        let err = FitTrackError::from_status(401, r#"{"msg":"Token has expired"}"#.into());
        assert!(err.is_unauthenticated());
        assert_eq!(err.server_message().as_deref(), Some("Token has expired"));
    }

    #[test]
    fn from_status_reads_message_past_the_snippet() {
        let padding = "x".repeat(400);
        let body = json!({"detail": padding, "error": "Exercise name already exists"}).to_string();
        let err = FitTrackError::from_status(409, body);
        assert_eq!(
            err.server_message().as_deref(),
            Some("Exercise name already exists")
        );
        match err {
            FitTrackError::Api { body, .. } => assert_eq!(body.chars().count(), 256),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn difficulty_parse_is_case_insensitive() {
        assert_eq!(Difficulty::parse("advanced"), Some(Difficulty::Advanced));
        assert_eq!(Difficulty::parse("unknown"), None);
    }
}
