use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{MySql, Pool};

use super::interface::{LogRepository, Result};
use super::model::{LatestExercise, NewExerciseLog};
use crate::config::StoreError;

// =============================================================================
// EXERCISE CRUD
// =============================================================================

pub struct ExerciseCrud {
    pool: Pool<MySql>,
}

impl ExerciseCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogRepository for ExerciseCrud {
    async fn upsert_bodyweight(
        &self,
        user_id: i32,
        bodyweight: Decimal,
        log_date: NaiveDate,
    ) -> Result<i32> {
        // LAST_INSERT_ID(id) makes the existing row's id visible on the update path
        let result = sqlx::query(
            r#"
            INSERT INTO bodyweight_logs (user_id, bodyweight, log_date)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE
                id = LAST_INSERT_ID(id),
                bodyweight = VALUES(bodyweight),
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(user_id)
        .bind(bodyweight)
        .bind(log_date)
        .execute(&self.pool)
        .await?;

        i32::try_from(result.last_insert_id()).map_err(|_| {
            StoreError::Database(format!(
                "bodyweight id {} out of range",
                result.last_insert_id()
            ))
        })
    }

    async fn insert_exercise_log(&self, log: &NewExerciseLog) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO exercise_logs (
                user_id, exercise_id, reps, weight, additional_weight,
                exercise_type, bodyweight_id, log_date
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(log.user_id)
        .bind(log.exercise_id)
        .bind(log.reps)
        .bind(log.weight)
        .bind(log.additional_weight)
        .bind(log.exercise_type.map(|t| t.as_str()))
        .bind(log.bodyweight_id)
        .bind(log.log_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_exercise_log(&self, log: &NewExerciseLog) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE exercise_logs
            SET reps = ?,
                weight = ?,
                additional_weight = ?,
                exercise_type = ?,
                bodyweight_id = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE user_id = ? AND exercise_id = ? AND log_date = ?
            "#,
        )
        .bind(log.reps)
        .bind(log.weight)
        .bind(log.additional_weight)
        .bind(log.exercise_type.map(|t| t.as_str()))
        .bind(log.bodyweight_id)
        .bind(log.user_id)
        .bind(log.exercise_id)
        .bind(log.log_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest_exercises(&self, user_id: i32) -> Result<Vec<LatestExercise>> {
        let latest = sqlx::query_as::<_, LatestExercise>(
            r#"
            SELECT el.exercise_id, e.name AS exercise_name, MAX(el.log_date) AS latest_log_date
            FROM exercise_logs el
            JOIN exercises e ON e.id = el.exercise_id
            WHERE el.user_id = ?
            GROUP BY el.exercise_id, e.name
            ORDER BY latest_log_date DESC, el.exercise_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(latest)
    }
}
