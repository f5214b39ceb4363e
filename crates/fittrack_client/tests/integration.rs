use fittrack_client::http_client::ReqwestFitTrackClient;
use fittrack_client::{Difficulty, FitTrackClient, FitTrackError, Session, Workout};
use secrecy::SecretString;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, session: &Session) -> ReqwestFitTrackClient {
    ReqwestFitTrackClient::new(&server.uri(), session.clone()).expect("client")
}

#[tokio::test]
async fn requests_carry_bearer_from_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("authorization", "Bearer T"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 7, "username": "alice"})),
        )
        .mount(&server)
        .await;

    let session = Session::new();
    session.set_token(Some(SecretString::new("T".into()))).await;
    let client = client_for(&server, &session);

    let user = client.get_profile().await.expect("profile");
    assert_eq!(user.id.as_deref(), Some("7"));
    assert_eq!(user.username, "alice");
}

#[tokio::test]
async fn cleared_session_sends_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({"username": "alice", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": {"id": 1, "username": "alice"},
            "access_token": "tok123"
        })))
        .mount(&server)
        .await;

    let session = Session::new();
    session.set_token(Some(SecretString::new("old".into()))).await;
    session.set_token(None).await;
    let client = client_for(&server, &session);

    let auth = client.login("alice", "pw").await.expect("login");
    assert_eq!(auth.access_token.as_deref(), Some("tok123"));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn status_401_is_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/summary"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({"msg": "Token has expired"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, &Session::new());
    let err = client.get_summary_stats().await.unwrap_err();
    assert!(err.is_unauthenticated());
    assert_eq!(err.server_message().as_deref(), Some("Token has expired"));
}

#[tokio::test]
async fn error_payload_message_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(serde_json::json!({"error": "Username already exists"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, &Session::new());
    let err = client.register("alice", "a@example.com", "secret1").await.unwrap_err();
    match err {
        FitTrackError::Api { status, ref message, .. } => {
            assert_eq!(status, 409);
            assert_eq!(message.as_deref(), Some("Username already exists"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let session = Session::new();
    let client = ReqwestFitTrackClient::new("http://127.0.0.1:1", session).unwrap();
    let err = client.list_workouts(1, 10).await.unwrap_err();
    assert!(err.is_network(), "got {err:?}");
}

#[tokio::test]
async fn malformed_success_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/workouts/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, &Session::new());
    let err = client.get_workout("3").await.unwrap_err();
    assert!(matches!(err, FitTrackError::InvalidResponse(_)), "got {err:?}");
}

#[tokio::test]
async fn list_workouts_sends_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/workouts"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "workouts": [{"id": 11, "name": "Legs", "difficulty": "Advanced", "duration": 45}],
            "total": 11, "pages": 2, "page": 2, "per_page": 10
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, &Session::new());
    let page = client.list_workouts(2, 10).await.expect("page");
    assert_eq!(page.pages, Some(2));
    assert_eq!(page.workouts.len(), 1);
    assert_eq!(page.workouts[0].difficulty, Difficulty::Advanced);
    assert_eq!(page.workouts[0].duration, Some(45));
}

#[tokio::test]
async fn update_workout_puts_normalized_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/workouts/42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 42, "name": "Push"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &Session::new());
    let workout = Workout {
        name: "Push".into(),
        date: Some("2025-03-04T07:30:00".into()),
        tags: vec!["upper".into()],
        ..Workout::default()
    };
    let saved = client.update_workout("42", &workout).await.expect("update");
    assert_eq!(saved.id.as_deref(), Some("42"));

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["date"], "2025-03-04");
    assert_eq!(body["difficulty"], "Beginner");
    assert_eq!(body["tags"][0], "upper");
}

#[tokio::test]
async fn delete_workout_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/workouts/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &Session::new());
    client.delete_workout("9").await.expect("delete");
}

#[tokio::test]
async fn list_exercises_omits_all_group() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/exercises"))
        .and(query_param_is_missing("muscle_group"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "exercises": [{"id": 1, "name": "Bench Press", "muscleGroup": "Chest"}],
            "total": 1, "pages": 1, "page": 1, "per_page": 100
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/exercises"))
        .and(query_param("muscle_group", "Legs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"id": 2, "name": "Squat", "muscleGroup": "Legs"}])),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, &Session::new());
    let all = client.list_exercises(1, 100, Some("All")).await.expect("all");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].muscle_group.as_deref(), Some("Chest"));

    let legs = client.list_exercises(1, 100, Some("Legs")).await.expect("legs");
    assert_eq!(legs[0].name, "Squat");
}

#[tokio::test]
async fn workout_exercise_endpoints_use_nested_paths() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/workouts/5/exercises"))
        .and(body_json(serde_json::json!({"exercise_id": "12", "sets": 4})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 99})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/workouts/5/exercises/99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &Session::new());
    let link = fittrack_client::WorkoutExerciseLink {
        exercise_id: "12".into(),
        sets: Some(4),
        ..Default::default()
    };
    let created = client.add_workout_exercise("5", &link).await.expect("attach");
    assert_eq!(created["id"], 99);
    client.remove_workout_exercise("5", "99").await.expect("detach");
}

#[tokio::test]
async fn stats_endpoints_parse() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/monthly"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"year": 2025, "month": 3, "count": 4, "duration": 180}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stats/exercises"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "name": "Squat", "category": "Strength", "count": 12}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server, &Session::new());
    let monthly = client.get_monthly_stats().await.expect("monthly");
    assert_eq!(monthly[0].duration, 180);
    let per_exercise = client.get_exercise_stats().await.expect("exercises");
    assert_eq!(per_exercise[0].count, 12);
    assert_eq!(per_exercise[0].id.as_deref(), Some("1"));
}
