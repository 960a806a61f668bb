use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// =============================================================================
// EXERCISE TYPE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseType {
    Bodyweight,
    Weighted,
    Assisted,
}

impl ExerciseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bodyweight => "Bodyweight",
            Self::Weighted => "Weighted",
            Self::Assisted => "Assisted",
        }
    }
}

impl std::str::FromStr for ExerciseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bodyweight" => Ok(Self::Bodyweight),
            "Weighted" => Ok(Self::Weighted),
            "Assisted" => Ok(Self::Assisted),
            other => Err(other.to_string()),
        }
    }
}

impl std::fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// EXERCISE LOG
// =============================================================================

/// Normalized exercise observation ready to be written.
/// Weights are kilograms.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExerciseLog {
    pub user_id: i32,
    pub exercise_id: i32,
    pub reps: i32,
    pub weight: Decimal,
    pub additional_weight: Option<Decimal>,
    pub exercise_type: Option<ExerciseType>,
    pub bodyweight_id: i32,
    pub log_date: NaiveDate,
}

// Most recent log date per exercise for one user
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LatestExercise {
    pub exercise_id: i32,
    pub exercise_name: String,
    pub latest_log_date: NaiveDate,
}
