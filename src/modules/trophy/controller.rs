use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::modules::response::{api_error, bad_request, ApiError};
use crate::modules::trophy::{
    model::is_valid_display_order,
    schema::{
        DeleteTrophyResponse, TrophiesResponse, TrophyResponse, ValidateTrophiesRequest,
        ValidateTrophiesResponse,
    },
};
use crate::services::jwt::AuthUser;
use crate::services::trophy::{CandidateSource, TrophyError};
use crate::AppState;

pub async fn validate_and_save(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ValidateTrophiesRequest>,
) -> Result<Json<ValidateTrophiesResponse>, ApiError> {
    let outcome = state
        .reconciler()
        .reconcile(user.user_id, CandidateSource::Requested(req.trophies))
        .await
        .map_err(|e| api_error(&state.config, e.status_code(), &e))?;

    tracing::info!(
        user_id = user.user_id,
        saved = outcome.saved.len(),
        removed = outcome.removed.len(),
        rejected = outcome.rejected.len(),
        "Trophies validated"
    );

    Ok(Json(ValidateTrophiesResponse {
        message: "Trophies saved successfully",
        saved: outcome.saved,
        removed: outcome.removed,
        rejected: outcome.rejected,
    }))
}

pub async fn list_trophies(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TrophiesResponse>, ApiError> {
    let trophies = state
        .trophies
        .displayed_trophies(user.user_id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = user.user_id, "Error fetching trophies: {}", e);
            let err = TrophyError::Store(e);
            api_error(&state.config, err.status_code(), &err)
        })?;

    Ok(Json(TrophiesResponse {
        trophies: trophies.into_iter().map(TrophyResponse::from).collect(),
    }))
}

pub async fn delete_trophy(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(display_order): Path<String>,
) -> Result<Json<DeleteTrophyResponse>, ApiError> {
    let display_order = display_order
        .parse::<i32>()
        .ok()
        .filter(|order| is_valid_display_order(*order))
        .ok_or_else(|| bad_request("Invalid display order"))?;

    let removed = state
        .trophies
        .delete_by_display_order(user.user_id, display_order)
        .await
        .map_err(|e| {
            tracing::error!(user_id = user.user_id, display_order, "Error deleting trophy: {}", e);
            let err = TrophyError::Store(e);
            api_error(&state.config, StatusCode::INTERNAL_SERVER_ERROR, &err)
        })?;

    Ok(Json(DeleteTrophyResponse {
        status: "success",
        removed,
    }))
}
