use axum::{http::StatusCode, routing::post, Json, Router};
use axum_test::TestServer;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chainsaw::config::Config;
use chainsaw::modules::trophy::model::TrophyCandidate;
use chainsaw::modules::user::model::{ExerciseHistoryEntry, UserSnapshot};
use chainsaw::services::conversion::UnitSystem;
use chainsaw::services::jwt::JwtService;
use chainsaw::services::trophy::{EvaluatorError, HttpTrophyEvaluator, TrophyEvaluator};
use chainsaw::AppState;

use crate::common::MemoryStore;

async fn spawn_evaluator(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api/validate-trophy", addr)
}

fn evaluator(url: &str) -> HttpTrophyEvaluator {
    HttpTrophyEvaluator::new(url, Duration::from_millis(300)).unwrap()
}

fn snapshot() -> UserSnapshot {
    UserSnapshot {
        user_id: 1,
        sex: Some("male".to_string()),
        preferred_units: UnitSystem::Metric,
        latest_bodyweight: Some(Decimal::new(805, 1)),
        exercise_history: vec![ExerciseHistoryEntry {
            exercise_id: 2,
            exercise_name: "Squat".to_string(),
            reps: 5,
            weight: Decimal::new(140, 0),
            log_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }],
    }
}

fn candidates() -> Vec<TrophyCandidate> {
    vec![
        TrophyCandidate { trophy_id: 1, display_order: 0 },
        TrophyCandidate { trophy_id: 2, display_order: 1 },
    ]
}

#[tokio::test]
async fn http_evaluator_posts_snapshot_and_reads_verdicts() {
    let received = Arc::new(Mutex::new(None::<Value>));
    let seen = received.clone();
    let router = Router::new().route(
        "/api/validate-trophy",
        post(move |Json(body): Json<Value>| {
            let seen = seen.clone();
            async move {
                *seen.lock().unwrap() = Some(body);
                Json(json!({ "trophies": [
                    { "trophy_id": 1, "unlocked": true },
                    { "trophy_id": 2, "unlocked": false }
                ]}))
            }
        }),
    );
    let url = spawn_evaluator(router).await;

    let verdicts = evaluator(&url)
        .evaluate(&snapshot(), &candidates())
        .await
        .unwrap();

    assert_eq!(verdicts.len(), 2);
    assert!(verdicts[0].unlocked);
    assert!(!verdicts[1].unlocked);

    let body = received.lock().unwrap().clone().unwrap();
    assert_eq!(body["user"], json!({ "sex": "male", "bodyWeight": 80.5, "units": "metric" }));
    assert_eq!(body["exerciseLogs"][0]["exercise_name"], "Squat");
    assert_eq!(body["exerciseLogs"][0]["weight"], 140.0);
    assert_eq!(body["trophies"][1], json!({ "trophy_id": 2, "display_order": 1 }));
}

#[tokio::test]
async fn http_evaluator_reports_error_status() {
    let router = Router::new().route(
        "/api/validate-trophy",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let url = spawn_evaluator(router).await;

    let err = evaluator(&url)
        .evaluate(&snapshot(), &candidates())
        .await
        .unwrap_err();

    assert!(matches!(err, EvaluatorError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn http_evaluator_reports_malformed_body() {
    let router = Router::new()
        .route("/api/validate-trophy", post(|| async { "not json" }))
        .route(
            "/missing-field",
            post(|| async { Json(json!({ "results": [] })) }),
        );
    let url = spawn_evaluator(router).await;

    let err = evaluator(&url)
        .evaluate(&snapshot(), &candidates())
        .await
        .unwrap_err();
    assert!(matches!(err, EvaluatorError::Malformed(_)));

    let missing = url.replace("/api/validate-trophy", "/missing-field");
    let err = evaluator(&missing)
        .evaluate(&snapshot(), &candidates())
        .await
        .unwrap_err();
    assert!(matches!(err, EvaluatorError::Malformed(_)));
}

#[tokio::test]
async fn http_evaluator_times_out() {
    let router = Router::new().route(
        "/api/validate-trophy",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "trophies": [] }))
        }),
    );
    let url = spawn_evaluator(router).await;

    let err = evaluator(&url)
        .evaluate(&snapshot(), &candidates())
        .await
        .unwrap_err();

    assert!(matches!(err, EvaluatorError::Timeout));
}

#[tokio::test]
async fn http_evaluator_reports_unreachable_host() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = evaluator(&format!("http://{}/api/validate-trophy", addr))
        .evaluate(&snapshot(), &candidates())
        .await
        .unwrap_err();

    assert!(matches!(err, EvaluatorError::Transport(_)));
}

#[tokio::test]
async fn validate_save_through_failing_http_evaluator_changes_nothing() {
    let router = Router::new().route(
        "/api/validate-trophy",
        post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let url = spawn_evaluator(router).await;

    let store = Arc::new(MemoryStore::seeded());
    let user_id = store.add_user("lifter");
    store.display(user_id, 1, 0);

    let config = Config {
        evaluator_url: url,
        evaluator_timeout: Duration::from_millis(300),
        ..Config::default()
    };
    let jwt_service = JwtService::new(config.jwt_secret.clone());
    let token = jwt_service.create_access_token(user_id).unwrap();
    let evaluator = HttpTrophyEvaluator::new(&config.evaluator_url, config.evaluator_timeout).unwrap();

    let state = AppState {
        config,
        logs: store.clone(),
        trophies: store.clone(),
        users: store.clone(),
        evaluator: Arc::new(evaluator),
        jwt_service,
    };
    let server = TestServer::new(chainsaw::create_app(state)).unwrap();

    let response = server
        .post("/validate-save-trophies")
        .authorization_bearer(&token)
        .json(&json!({ "trophies": [{ "trophy_id": 2, "display_order": 0 }] }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"], "evaluation unavailable");
    assert_eq!(store.slots(user_id), BTreeMap::from([(0, 1)]));
}
