//! Client for the external trophy evaluator.
//!
//! The evaluator receives the user's profile, full exercise history and the
//! candidate trophies, and answers which of them are unlocked. Callers treat
//! every failure mode the same way, but the concrete case is kept on the
//! error for logging.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::modules::trophy::model::TrophyCandidate;
use crate::modules::user::model::{ExerciseHistoryEntry, UserSnapshot};
use crate::services::conversion::UnitSystem;

#[derive(Debug, thiserror::Error)]
pub enum EvaluatorError {
    #[error("evaluator request failed: {0}")]
    Transport(String),

    #[error("evaluator timed out")]
    Timeout,

    #[error("evaluator returned status {0}")]
    Status(StatusCode),

    #[error("evaluator response malformed: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for EvaluatorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EvaluatorError::Timeout
        } else {
            EvaluatorError::Transport(err.to_string())
        }
    }
}

/// Verdict for one candidate trophy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrophyVerdict {
    pub trophy_id: i32,
    #[serde(default)]
    pub unlocked: bool,
}

#[async_trait]
pub trait TrophyEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        user: &UserSnapshot,
        candidates: &[TrophyCandidate],
    ) -> Result<Vec<TrophyVerdict>, EvaluatorError>;
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

#[derive(Debug, Serialize)]
pub struct EvaluationRequest<'a> {
    pub user: EvaluatedUser<'a>,
    #[serde(rename = "exerciseLogs")]
    pub exercise_logs: &'a [ExerciseHistoryEntry],
    pub trophies: &'a [TrophyCandidate],
}

#[derive(Debug, Serialize)]
pub struct EvaluatedUser<'a> {
    pub sex: &'a str,
    /// Kilograms.
    #[serde(rename = "bodyWeight", with = "rust_decimal::serde::float_option")]
    pub body_weight: Option<Decimal>,
    pub units: UnitSystem,
}

impl<'a> EvaluationRequest<'a> {
    pub fn new(user: &'a UserSnapshot, candidates: &'a [TrophyCandidate]) -> Self {
        Self {
            user: EvaluatedUser {
                sex: user.sex.as_deref().unwrap_or_default(),
                body_weight: user.latest_bodyweight,
                units: user.preferred_units,
            },
            exercise_logs: &user.exercise_history,
            trophies: candidates,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EvaluationResponse {
    trophies: Vec<TrophyVerdict>,
}

// =============================================================================
// HTTP EVALUATOR
// =============================================================================

pub struct HttpTrophyEvaluator {
    client: Client,
    url: String,
}

impl HttpTrophyEvaluator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, EvaluatorError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EvaluatorError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl TrophyEvaluator for HttpTrophyEvaluator {
    async fn evaluate(
        &self,
        user: &UserSnapshot,
        candidates: &[TrophyCandidate],
    ) -> Result<Vec<TrophyVerdict>, EvaluatorError> {
        let payload = EvaluationRequest::new(user, candidates);

        tracing::debug!(
            user_id = user.user_id,
            candidates = candidates.len(),
            history = user.exercise_history.len(),
            "Requesting trophy evaluation"
        );

        let response = self.client.post(&self.url).json(&payload).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(EvaluatorError::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: EvaluationResponse = serde_json::from_slice(&body)
            .map_err(|e| EvaluatorError::Malformed(e.to_string()))?;

        Ok(parsed.trophies)
    }
}
