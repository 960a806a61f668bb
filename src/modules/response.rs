use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::config::Config;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Renders `err` for a client. The error's own message is the public text;
/// the chain of underlying causes is attached only outside production.
pub fn api_error<E>(config: &Config, status: StatusCode, err: &E) -> ApiError
where
    E: std::error::Error,
{
    let public = err.to_string();

    let mut causes = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }

    let body = if causes.is_empty() || config.is_production() {
        ErrorResponse::new(public)
    } else {
        ErrorResponse::with_message(public, causes.join(": "))
    };

    (status, Json(body))
}

pub fn bad_request(error: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(error)))
}
