use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, Pool};

use super::interface::{Result, UserRepository};
use super::model::{ExerciseHistoryEntry, ProfileUpdate, UserSnapshot};
use crate::config::StoreError;
use crate::services::conversion::UnitSystem;

#[derive(Debug, FromRow)]
struct UserDetailsRow {
    user_id: i32,
    sex: Option<String>,
    preferred_units: String,
    latest_bodyweight: Option<Decimal>,
}

// =============================================================================
// USER CRUD
// =============================================================================

pub struct UserCrud {
    pool: Pool<MySql>,
}

impl UserCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    async fn exercise_history(&self, user_id: i32) -> Result<Vec<ExerciseHistoryEntry>> {
        let history = sqlx::query_as::<_, ExerciseHistoryEntry>(
            r#"
            SELECT el.exercise_id, e.name AS exercise_name, el.reps, el.weight, el.log_date
            FROM exercise_logs el
            JOIN exercises e ON e.id = el.exercise_id
            WHERE el.user_id = ?
            ORDER BY el.log_date, el.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(history)
    }
}

#[async_trait]
impl UserRepository for UserCrud {
    async fn user_snapshot(&self, user_id: i32) -> Result<Option<UserSnapshot>> {
        let row = sqlx::query_as::<_, UserDetailsRow>(
            r#"
            SELECT
                u.id AS user_id,
                u.sex,
                CAST(u.preferred_units AS CHAR) AS preferred_units,
                (
                    SELECT bw.bodyweight
                    FROM bodyweight_logs bw
                    WHERE bw.user_id = u.id
                    ORDER BY bw.log_date DESC
                    LIMIT 1
                ) AS latest_bodyweight
            FROM users u
            WHERE u.id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let exercise_history = self.exercise_history(user_id).await?;

        Ok(Some(UserSnapshot {
            user_id: row.user_id,
            sex: row.sex.filter(|s| !s.is_empty()),
            preferred_units: UnitSystem::from_preference(&row.preferred_units),
            latest_bodyweight: row.latest_bodyweight,
            exercise_history,
        }))
    }

    async fn update_profile(&self, user_id: i32, update: &ProfileUpdate) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = ?,
                name = ?,
                avatar_url = ?,
                sex = ?,
                preferred_units = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(&update.username)
        .bind(&update.name)
        .bind(&update.avatar_url)
        .bind(&update.sex)
        .bind(update.preferred_units.as_str())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_user(&self, user_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
