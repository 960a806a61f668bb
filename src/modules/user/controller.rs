use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;
use validator::Validate;

use crate::config::StoreError;
use crate::modules::response::{api_error, ApiError};
use crate::modules::user::{
    model::ProfileUpdate,
    schema::{MessageResponse, UpdateUserRequest},
};
use crate::services::conversion::UnitSystem;
use crate::services::jwt::AuthUser;
use crate::AppState;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),

    #[error("Username already taken")]
    UsernameTaken,

    #[error("User not found")]
    NotFound,

    #[error("Failed to update user")]
    UpdateFailed(#[source] StoreError),

    #[error("Failed to delete account")]
    DeleteFailed(#[source] StoreError),
}

impl UserError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::Validation(_) => StatusCode::BAD_REQUEST,
            UserError::UsernameTaken => StatusCode::CONFLICT,
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::UpdateFailed(_) | UserError::DeleteFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Empty strings clear the field.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let respond = |e: UserError| api_error(&state.config, e.status_code(), &e);

    if let Err(e) = req.validate() {
        return Err(respond(UserError::Validation(e.to_string())));
    }

    let update = ProfileUpdate {
        username: req.username,
        name: non_empty(req.name),
        avatar_url: non_empty(req.avatar_url),
        sex: non_empty(req.sex),
        preferred_units: UnitSystem::from_preference(
            req.preferred_units.as_deref().unwrap_or_default(),
        ),
    };

    state
        .users
        .update_profile(user.user_id, &update)
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation => respond(UserError::UsernameTaken),
            other => {
                tracing::error!(user_id = user.user_id, "Error updating user: {}", other);
                respond(UserError::UpdateFailed(other))
            }
        })?;

    state.reconciler().recheck_displayed(user.user_id).await;

    tracing::info!(user_id = user.user_id, "User updated");

    Ok(Json(MessageResponse {
        message: "User updated successfully",
    }))
}

pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.delete_user(user.user_id).await.map_err(|e| {
        let err = match e {
            StoreError::NotFound => UserError::NotFound,
            other => {
                tracing::error!(user_id = user.user_id, "Error deleting account: {}", other);
                UserError::DeleteFailed(other)
            }
        };
        api_error(&state.config, err.status_code(), &err)
    })?;

    tracing::info!(user_id = user.user_id, "Account deleted");

    Ok(Json(MessageResponse {
        message: "Account deleted successfully",
    }))
}
