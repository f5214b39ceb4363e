//! HTTP client implementation for the FitTrack backend.
//!
//! This module provides a reqwest-based implementation of the [`FitTrackClient`](crate::FitTrackClient) trait.
//! The bearer token is read from the injected [`Session`] on every request, so
//! installing or clearing a token takes effect for all later calls.

use crate::observability::{self, RequestTrace};
use crate::session::Session;
use crate::utils::{body_snippet, normalize_workout_date};
use crate::{
    AuthResponse, Exercise, ExerciseStat, FitTrackClient, FitTrackError, MonthlyStat,
    PasswordChange, ProfileUpdateResponse, SummaryStats, User, Workout, WorkoutExerciseLink,
    WorkoutPage,
};
use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;

/// Client for the FitTrack REST API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestFitTrackClient {
    base_url: String,
    session: Session,
    client: reqwest::Client,
}

/// The exercise listing is either a bare array or a paginated wrapper.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExerciseListing {
    Plain(Vec<Exercise>),
    Paged { exercises: Vec<Exercise> },
}

impl ExerciseListing {
    fn into_vec(self) -> Vec<Exercise> {
        match self {
            ExerciseListing::Plain(v) => v,
            ExerciseListing::Paged { exercises } => exercises,
        }
    }
}

impl ReqwestFitTrackClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - Root of the backend (e.g., "http://localhost:5001")
    /// * `session` - Shared token holder consulted on every request
    pub fn new(base_url: &str, session: Session) -> Result<Self, FitTrackError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FitTrackError::Config(format!("building http client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Build a request for `path`, attaching the bearer when one is installed.
    async fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match self.session.bearer_header().await {
            Some(bearer) => builder.header(AUTHORIZATION, bearer),
            None => builder,
        }
    }

    async fn get_request(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::GET, path).await
    }

    async fn post_request(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::POST, path).await
    }

    async fn put_request(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::PUT, path).await
    }

    async fn delete_request(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::DELETE, path).await
    }

    /// Send a request through the diagnostic hooks; non-2xx becomes an error.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, FitTrackError> {
        let (client, request) = request.build_split();
        let request = request?;
        let trace = observability::on_request(request.method(), request.url().path());
        match client.execute(request).await {
            Ok(resp) if resp.status().is_success() => {
                observability::on_success(&trace, resp.status().as_u16());
                Ok(resp)
            }
            Ok(resp) => Err(self.error_from_response(&trace, resp).await),
            Err(e) => {
                observability::on_failure(&trace, None, &e.to_string());
                Err(e.into())
            }
        }
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, FitTrackError> {
        let resp = self.send(request).await?;
        Ok(resp.json::<T>().await?)
    }

    /// Execute a request with no expected response body.
    async fn execute_empty(&self, request: reqwest::RequestBuilder) -> Result<(), FitTrackError> {
        self.send(request).await.map(|_| ())
    }

    /// Extract error information from a failed response.
    async fn error_from_response(
        &self,
        trace: &RequestTrace,
        resp: reqwest::Response,
    ) -> FitTrackError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        observability::on_failure(trace, Some(status), &body_snippet(&body));
        FitTrackError::from_status(status, body)
    }

    /// Copy of `workout` with its date in the `YYYY-MM-DD` form the backend parses.
    fn prepare_workout(workout: &Workout) -> Workout {
        let mut out = workout.clone();
        if let Some(date) = out.date.as_deref() {
            match normalize_workout_date(date) {
                Some(normalized) => out.date = Some(normalized),
                None => tracing::debug!(date, "sending workout date unchanged"),
            }
        }
        out
    }
}

#[async_trait]
impl FitTrackClient for ReqwestFitTrackClient {
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, FitTrackError> {
        let body = serde_json::json!({ "username": username, "password": password });
        self.execute_json(self.post_request("/auth/login").await.json(&body))
            .await
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, FitTrackError> {
        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });
        self.execute_json(self.post_request("/auth/register").await.json(&body))
            .await
    }

    async fn get_profile(&self) -> Result<User, FitTrackError> {
        self.execute_json(self.get_request("/auth/profile").await)
            .await
    }

    async fn update_profile(&self, user: &User) -> Result<ProfileUpdateResponse, FitTrackError> {
        self.execute_json(self.put_request("/auth/profile").await.json(user))
            .await
    }

    async fn change_password(
        &self,
        change: &PasswordChange,
    ) -> Result<serde_json::Value, FitTrackError> {
        self.execute_json(
            self.post_request("/auth/change-password")
                .await
                .json(change),
        )
        .await
    }

    async fn list_workouts(&self, page: u32, per_page: u32) -> Result<WorkoutPage, FitTrackError> {
        let qp = [("page", page.to_string()), ("per_page", per_page.to_string())];
        self.execute_json(self.get_request("/api/workouts").await.query(&qp))
            .await
    }

    async fn get_workout(&self, workout_id: &str) -> Result<Workout, FitTrackError> {
        let path = format!("/api/workouts/{}", workout_id);
        self.execute_json(self.get_request(&path).await).await
    }

    async fn create_workout(&self, workout: &Workout) -> Result<Workout, FitTrackError> {
        let body = Self::prepare_workout(workout);
        self.execute_json(self.post_request("/api/workouts").await.json(&body))
            .await
    }

    async fn update_workout(
        &self,
        workout_id: &str,
        workout: &Workout,
    ) -> Result<Workout, FitTrackError> {
        let path = format!("/api/workouts/{}", workout_id);
        let body = Self::prepare_workout(workout);
        self.execute_json(self.put_request(&path).await.json(&body))
            .await
    }

    async fn delete_workout(&self, workout_id: &str) -> Result<(), FitTrackError> {
        let path = format!("/api/workouts/{}", workout_id);
        self.execute_empty(self.delete_request(&path).await).await
    }

    async fn add_workout_exercise(
        &self,
        workout_id: &str,
        link: &WorkoutExerciseLink,
    ) -> Result<serde_json::Value, FitTrackError> {
        let path = format!("/api/workouts/{}/exercises", workout_id);
        self.execute_json(self.post_request(&path).await.json(link))
            .await
    }

    async fn update_workout_exercise(
        &self,
        workout_id: &str,
        entry_id: &str,
        fields: &serde_json::Value,
    ) -> Result<serde_json::Value, FitTrackError> {
        let path = format!("/api/workouts/{}/exercises/{}", workout_id, entry_id);
        self.execute_json(self.put_request(&path).await.json(fields))
            .await
    }

    async fn remove_workout_exercise(
        &self,
        workout_id: &str,
        entry_id: &str,
    ) -> Result<(), FitTrackError> {
        let path = format!("/api/workouts/{}/exercises/{}", workout_id, entry_id);
        self.execute_empty(self.delete_request(&path).await).await
    }

    async fn list_exercises(
        &self,
        page: u32,
        per_page: u32,
        muscle_group: Option<&str>,
    ) -> Result<Vec<Exercise>, FitTrackError> {
        let mut pairs: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(group) = muscle_group.filter(|g| !g.is_empty() && *g != "All") {
            pairs.push(("muscle_group", group.to_string()));
        }
        let qp: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let listing: ExerciseListing = self
            .execute_json(self.get_request("/api/exercises").await.query(&qp))
            .await?;
        Ok(listing.into_vec())
    }

    async fn get_exercise(&self, exercise_id: &str) -> Result<Exercise, FitTrackError> {
        let path = format!("/api/exercises/{}", exercise_id);
        self.execute_json(self.get_request(&path).await).await
    }

    async fn create_exercise(&self, exercise: &Exercise) -> Result<Exercise, FitTrackError> {
        self.execute_json(self.post_request("/api/exercises").await.json(exercise))
            .await
    }

    async fn update_exercise(
        &self,
        exercise_id: &str,
        exercise: &Exercise,
    ) -> Result<Exercise, FitTrackError> {
        let path = format!("/api/exercises/{}", exercise_id);
        self.execute_json(self.put_request(&path).await.json(exercise))
            .await
    }

    async fn delete_exercise(&self, exercise_id: &str) -> Result<(), FitTrackError> {
        let path = format!("/api/exercises/{}", exercise_id);
        self.execute_empty(self.delete_request(&path).await).await
    }

    async fn get_summary_stats(&self) -> Result<SummaryStats, FitTrackError> {
        self.execute_json(self.get_request("/api/stats/summary").await)
            .await
    }

    async fn get_monthly_stats(&self) -> Result<Vec<MonthlyStat>, FitTrackError> {
        self.execute_json(self.get_request("/api/stats/monthly").await)
            .await
    }

    async fn get_exercise_stats(&self) -> Result<Vec<ExerciseStat>, FitTrackError> {
        self.execute_json(self.get_request("/api/stats/exercises").await)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_trailing_slash() {
        let client = ReqwestFitTrackClient::new("http://localhost:5001/", Session::new()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5001");
    }

    #[test]
    fn prepare_workout_normalizes_date() {
        let w = Workout {
            name: "Push".into(),
            date: Some("2025-03-04T18:00:00Z".into()),
            ..Workout::default()
        };
        let out = ReqwestFitTrackClient::prepare_workout(&w);
        assert_eq!(out.date.as_deref(), Some("2025-03-04"));

        let w = Workout {
            date: Some("whenever".into()),
            ..Workout::default()
        };
        let out = ReqwestFitTrackClient::prepare_workout(&w);
        assert_eq!(out.date.as_deref(), Some("whenever"));
    }

    #[test]
    fn exercise_listing_accepts_both_shapes() {
        let plain: ExerciseListing =
            serde_json::from_str(r#"[{"id":1,"name":"Squat"}]"#).unwrap();
        assert_eq!(plain.into_vec().len(), 1);

        let paged: ExerciseListing = serde_json::from_str(
            r#"{"exercises":[{"id":1,"name":"Squat"},{"id":2,"name":"Row"}],"total":2,"pages":1,"page":1,"per_page":100}"#,
        )
        .unwrap();
        let v = paged.into_vec();
        assert_eq!(v.len(), 2);
        assert_eq!(v[1].id.as_deref(), Some("2"));
    }
}
