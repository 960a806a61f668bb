//! Exercise and bodyweight log writing.
//!
//! Each entry first resolves the bodyweight row for its (user, date), then
//! writes the exercise row keyed on (user, exercise, date). A uniqueness
//! conflict on the exercise insert is resolved by updating the existing row
//! and reporting the entry as a duplicate.

use axum::http::StatusCode;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use validator::Validate;

use crate::config::StoreError;
use crate::modules::exercise::{
    interface::LogRepository,
    model::{ExerciseType, NewExerciseLog},
    schema::{ExerciseResponse, FailedExerciseResponse, LogExerciseRequest},
};
use crate::services::conversion::{self, UnitSystem};

pub const LOG_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("invalid date format")]
    InvalidDate(String),

    #[error("invalid {field}: {value}")]
    InvalidWeight { field: &'static str, value: f64 },

    #[error("invalid exercise type: {0}")]
    InvalidExerciseType(String),

    #[error("{0}")]
    Validation(String),

    #[error("failed to log body weight")]
    BodyweightFailed(#[source] StoreError),

    #[error("failed to log exercise")]
    InsertFailed(#[source] StoreError),

    /// The entry conflicted with an existing row and the update also failed.
    #[error("failed to log exercise")]
    UpdateFailed(#[source] StoreError),
}

impl LogError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidDate(_)
            | Self::InvalidWeight { .. }
            | Self::InvalidExerciseType(_)
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BodyweightFailed(_) | Self::InsertFailed(_) | Self::UpdateFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// =============================================================================
// VALIDATED ENTRY
// =============================================================================

/// A batch entry that passed validation. All weights are in kilograms.
#[derive(Debug, Clone)]
pub struct ValidatedEntry {
    pub exercise_id: i32,
    pub reps: i32,
    pub weight: Decimal,
    pub additional_weight: Option<Decimal>,
    pub exercise_type: Option<ExerciseType>,
    pub unit: UnitSystem,
    pub body_weight: Decimal,
    pub log_date: NaiveDate,
    echo: ExerciseResponse,
}

pub fn parse_log_date(value: &str) -> Result<NaiveDate, LogError> {
    NaiveDate::parse_from_str(value.trim(), LOG_DATE_FORMAT).map_err(|e| {
        tracing::debug!("Error parsing log date '{}': {}", value, e);
        LogError::InvalidDate(value.to_string())
    })
}

/// Largest kilogram value a `DECIMAL(10,4)` weight column holds.
pub const MAX_WEIGHT_KG: f64 = 999_999.9999;

fn checked_weight(field: &'static str, value: f64, unit: UnitSystem) -> Result<Decimal, LogError> {
    let kg = conversion::to_metric(value, unit);
    if !value.is_finite() || value < 0.0 || kg > MAX_WEIGHT_KG {
        return Err(LogError::InvalidWeight { field, value });
    }

    conversion::to_decimal(kg)
        .map(|d| d.round_dp(4))
        .map_err(|_| LogError::InvalidWeight { field, value })
}

impl ValidatedEntry {
    pub fn parse(req: LogExerciseRequest) -> Result<Self, LogError> {
        req.validate()
            .map_err(|e| LogError::Validation(e.to_string()))?;

        let log_date = parse_log_date(&req.log_date)?;
        let unit = UnitSystem::from_preference(&req.unit);

        let weight = checked_weight("weight", req.weight, unit)?;
        let additional_weight = req
            .additional_weight
            .map(|w| checked_weight("additional_weight", w, unit))
            .transpose()?;

        let body_weight = checked_weight("body_weight", req.body_weight, unit)?;

        let exercise_type = match req.exercise_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(
                value
                    .parse::<ExerciseType>()
                    .map_err(LogError::InvalidExerciseType)?,
            ),
        };

        let echo = ExerciseResponse {
            exercise_id: req.exercise_id,
            reps: req.reps,
            weight: req.weight,
            unit: unit.as_str().to_string(),
            log_date: log_date.format(LOG_DATE_FORMAT).to_string(),
            additional_weight: req.additional_weight.unwrap_or(0.0),
            exercise_type: exercise_type.map(|t| t.to_string()).unwrap_or_default(),
        };

        Ok(Self {
            exercise_id: req.exercise_id,
            reps: req.reps,
            weight,
            additional_weight,
            exercise_type,
            unit,
            body_weight,
            log_date,
            echo,
        })
    }

    /// The entry as reported back to the client.
    pub fn echo(&self) -> &ExerciseResponse {
        &self.echo
    }

    fn to_new_log(&self, user_id: i32, bodyweight_id: i32) -> NewExerciseLog {
        NewExerciseLog {
            user_id,
            exercise_id: self.exercise_id,
            reps: self.reps,
            weight: self.weight,
            additional_weight: self.additional_weight,
            exercise_type: self.exercise_type,
            bodyweight_id,
            log_date: self.log_date,
        }
    }
}

/// Validates every entry before anything is written. The first invalid
/// entry rejects the whole batch.
pub fn validate_batch(requests: Vec<LogExerciseRequest>) -> Result<Vec<ValidatedEntry>, LogError> {
    requests.into_iter().map(ValidatedEntry::parse).collect()
}

// =============================================================================
// OUTCOMES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    Inserted,
    /// The (user, exercise, date) row existed and was updated in place.
    UpdatedDuplicate,
}

/// Partition returned to the caller of a batch.
///
/// An entry resolved by update appears in both `duplicates` and `logged`.
/// A conflicting entry whose update failed appears in `duplicates` and
/// `failed`.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub logged: Vec<ExerciseResponse>,
    pub duplicates: Vec<ExerciseResponse>,
    pub failed: Vec<FailedExerciseResponse>,
}

impl BatchSummary {
    pub fn written(&self) -> usize {
        self.logged.len()
    }
}

// =============================================================================
// LOG WRITER
// =============================================================================

pub struct LogWriter<'a> {
    repo: &'a dyn LogRepository,
}

impl<'a> LogWriter<'a> {
    pub fn new(repo: &'a dyn LogRepository) -> Self {
        Self { repo }
    }

    /// Returns the id of the bodyweight row for (user, date), creating it
    /// or overwriting its value. `bodyweight_kg` is already validated.
    pub async fn resolve_bodyweight_id(
        &self,
        user_id: i32,
        bodyweight_kg: Decimal,
        log_date: NaiveDate,
    ) -> Result<i32, LogError> {
        self.repo
            .upsert_bodyweight(user_id, bodyweight_kg, log_date)
            .await
            .map_err(|e| {
                tracing::error!(user_id, %log_date, "Error logging body weight: {}", e);
                LogError::BodyweightFailed(e)
            })
    }

    /// Writes one exercise observation linked to `bodyweight_id`.
    pub async fn log_exercise(
        &self,
        user_id: i32,
        entry: &ValidatedEntry,
        bodyweight_id: i32,
    ) -> Result<LogOutcome, LogError> {
        let log = entry.to_new_log(user_id, bodyweight_id);

        match self.repo.insert_exercise_log(&log).await {
            Ok(()) => Ok(LogOutcome::Inserted),
            Err(e) if e.is_unique_violation() => {
                tracing::debug!(
                    user_id,
                    exercise_id = log.exercise_id,
                    log_date = %log.log_date,
                    "Exercise already logged for date, updating"
                );

                self.repo.update_exercise_log(&log).await.map_err(|e| {
                    tracing::error!(user_id, "Error updating exercise log: {}", e);
                    LogError::UpdateFailed(e)
                })?;

                Ok(LogOutcome::UpdatedDuplicate)
            }
            Err(e) => {
                tracing::error!(user_id, "Error logging exercise: {}", e);
                Err(LogError::InsertFailed(e))
            }
        }
    }

    pub async fn log_entry(&self, user_id: i32, entry: &ValidatedEntry) -> Result<LogOutcome, LogError> {
        let bodyweight_id = self
            .resolve_bodyweight_id(user_id, entry.body_weight, entry.log_date)
            .await?;

        self.log_exercise(user_id, entry, bodyweight_id).await
    }

    /// Processes entries in order. A failed entry is recorded and the batch
    /// moves on to the next one.
    pub async fn log_batch(&self, user_id: i32, entries: &[ValidatedEntry]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for entry in entries {
            let echo = entry.echo().clone();

            match self.log_entry(user_id, entry).await {
                Ok(LogOutcome::Inserted) => summary.logged.push(echo),
                Ok(LogOutcome::UpdatedDuplicate) => {
                    summary.duplicates.push(echo.clone());
                    summary.logged.push(echo);
                }
                Err(e) => {
                    if matches!(e, LogError::UpdateFailed(_)) {
                        summary.duplicates.push(echo.clone());
                    }
                    summary.failed.push(FailedExerciseResponse {
                        entry: echo,
                        error: e.to_string(),
                    });
                }
            }
        }

        summary
    }
}
