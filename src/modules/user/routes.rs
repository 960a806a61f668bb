use axum::{
    routing::{delete, patch},
    Router,
};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/update-user", patch(controller::update_user))
        .route("/delete-account", delete(controller::delete_account))
}
