use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::LatestExercise;

// =============================================================================
// LOG EXERCISES
// =============================================================================

/// One entry of a `POST /log-exercises` batch.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogExerciseRequest {
    #[validate(range(min = 1, message = "exercise_id must be positive"))]
    pub exercise_id: i32,
    #[validate(range(min = 0, message = "reps must not be negative"))]
    pub reps: i32,
    pub weight: f64,
    #[serde(default)]
    pub unit: String,
    pub body_weight: f64,
    pub log_date: String,
    #[serde(default)]
    pub additional_weight: Option<f64>,
    #[serde(default)]
    pub exercise_type: Option<String>,
}

/// Echo of a submitted entry, as the client sent it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExerciseResponse {
    pub exercise_id: i32,
    pub reps: i32,
    pub weight: f64,
    pub unit: String,
    pub log_date: String,
    pub additional_weight: f64,
    pub exercise_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedExerciseResponse {
    pub entry: ExerciseResponse,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct LogExercisesResponse {
    pub message: &'static str,
    pub logged: Vec<ExerciseResponse>,
    pub duplicates: Vec<ExerciseResponse>,
    pub failed: Vec<FailedExerciseResponse>,
}

// =============================================================================
// LATEST EXERCISES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct LatestExerciseResponse {
    pub exercise_id: i32,
    pub exercise_name: String,
    pub log_date: NaiveDate,
}

impl From<LatestExercise> for LatestExerciseResponse {
    fn from(latest: LatestExercise) -> Self {
        Self {
            exercise_id: latest.exercise_id,
            exercise_name: latest.exercise_name,
            log_date: latest.latest_log_date,
        }
    }
}
