use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::services::conversion::UnitSystem;

/// One logged set as handed to the trophy evaluator. Weights are kilograms.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ExerciseHistoryEntry {
    pub exercise_id: i32,
    pub exercise_name: String,
    pub reps: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub weight: Decimal,
    pub log_date: NaiveDate,
}

/// Everything the trophy evaluator needs to know about a user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSnapshot {
    pub user_id: i32,
    pub sex: Option<String>,
    pub preferred_units: UnitSystem,
    /// Most recent bodyweight in kilograms, if any was ever logged.
    pub latest_bodyweight: Option<Decimal>,
    pub exercise_history: Vec<ExerciseHistoryEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub sex: Option<String>,
    pub preferred_units: UnitSystem,
}
