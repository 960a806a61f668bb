use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::config::StoreError;
use crate::modules::exercise::schema::{
    LatestExerciseResponse, LogExerciseRequest, LogExercisesResponse,
};
use crate::modules::response::{api_error, ApiError};
use crate::services::exercise_log::{self, LogWriter};
use crate::services::jwt::AuthUser;
use crate::AppState;

pub async fn log_exercises(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(requests): Json<Vec<LogExerciseRequest>>,
) -> Result<Json<LogExercisesResponse>, ApiError> {
    let entries = exercise_log::validate_batch(requests)
        .map_err(|e| api_error(&state.config, e.status_code(), &e))?;

    let summary = LogWriter::new(state.logs.as_ref())
        .log_batch(user.user_id, &entries)
        .await;

    if summary.written() > 0 {
        state.reconciler().recheck_displayed(user.user_id).await;
    }

    let message = if summary.failed.is_empty() {
        "Exercises and body weight logged successfully"
    } else {
        "Some exercises could not be logged"
    };

    Ok(Json(LogExercisesResponse {
        message,
        logged: summary.logged,
        duplicates: summary.duplicates,
        failed: summary.failed,
    }))
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to fetch latest exercises")]
struct LatestExercisesError(#[source] StoreError);

pub async fn latest_exercises(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<LatestExerciseResponse>>, ApiError> {
    let latest = state.logs.latest_exercises(user.user_id).await.map_err(|e| {
        tracing::error!(user_id = user.user_id, "Error fetching latest exercises: {}", e);
        api_error(
            &state.config,
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            &LatestExercisesError(e),
        )
    })?;

    Ok(Json(latest.into_iter().map(LatestExerciseResponse::from).collect()))
}
