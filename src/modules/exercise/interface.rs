use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::model::{LatestExercise, NewExerciseLog};
use crate::config::StoreError;

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait LogRepository: Send + Sync {
    /// Writes the bodyweight for (user, date) in one atomic upsert and
    /// returns the id of the row now holding it. An existing row keeps its
    /// id and `created_at`.
    async fn upsert_bodyweight(
        &self,
        user_id: i32,
        bodyweight: Decimal,
        log_date: NaiveDate,
    ) -> Result<i32>;

    /// Plain insert. Fails with `StoreError::UniqueViolation` when the
    /// (user, exercise, date) triple already exists.
    async fn insert_exercise_log(&self, log: &NewExerciseLog) -> Result<()>;

    /// Overwrites reps, weights, type and bodyweight link of the row keyed
    /// by (user, exercise, date).
    async fn update_exercise_log(&self, log: &NewExerciseLog) -> Result<()>;

    async fn latest_exercises(&self, user_id: i32) -> Result<Vec<LatestExercise>>;
}
