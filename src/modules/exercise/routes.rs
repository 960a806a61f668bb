use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn exercise_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/log-exercises", post(controller::log_exercises))
        .route("/exercises/latest", get(controller::latest_exercises))
}
