use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn trophy_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/validate-save-trophies", post(controller::validate_and_save))
        .route("/trophies", get(controller::list_trophies))
        .route("/trophies/{display_order}", delete(controller::delete_trophy))
}
