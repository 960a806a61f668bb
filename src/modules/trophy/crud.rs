use async_trait::async_trait;
use sqlx::{MySql, Pool};

use super::interface::{ChangeError, Result, TrophyRepository};
use super::model::{DisplayedTrophy, TrophyChange};
use crate::config::StoreError;

// =============================================================================
// TROPHY CRUD
// =============================================================================

pub struct TrophyCrud {
    pool: Pool<MySql>,
}

impl TrophyCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrophyRepository for TrophyCrud {
    async fn displayed_trophies(&self, user_id: i32) -> Result<Vec<DisplayedTrophy>> {
        let trophies = sqlx::query_as::<_, DisplayedTrophy>(
            r#"
            SELECT t.id AS trophy_id, t.name, t.description, ut.display_order
            FROM user_trophies ut
            JOIN trophies t ON t.id = ut.trophy_id
            WHERE ut.user_id = ?
            ORDER BY ut.display_order
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(trophies)
    }

    async fn apply_changes(
        &self,
        user_id: i32,
        changes: &[TrophyChange],
    ) -> std::result::Result<(), ChangeError> {
        let first = match changes.first() {
            Some(change) => *change,
            None => return Ok(()),
        };

        let mut tx = self.pool.begin().await.map_err(|e| ChangeError {
            change: first,
            source: StoreError::from(e),
        })?;

        for change in changes {
            let result = match change {
                TrophyChange::Delete { trophy_id } => {
                    sqlx::query("DELETE FROM user_trophies WHERE user_id = ? AND trophy_id = ?")
                        .bind(user_id)
                        .bind(trophy_id)
                        .execute(&mut *tx)
                        .await
                }
                TrophyChange::Insert {
                    trophy_id,
                    display_order,
                } => {
                    sqlx::query(
                        r#"
                        INSERT INTO user_trophies (user_id, trophy_id, display_order)
                        VALUES (?, ?, ?)
                        "#,
                    )
                    .bind(user_id)
                    .bind(trophy_id)
                    .bind(display_order)
                    .execute(&mut *tx)
                    .await
                }
            };

            // Dropping `tx` on the error path rolls back the earlier changes
            result.map_err(|e| ChangeError {
                change: *change,
                source: StoreError::from(e),
            })?;
        }

        let last = changes.last().copied().unwrap_or(first);
        tx.commit().await.map_err(|e| ChangeError {
            change: last,
            source: StoreError::from(e),
        })?;

        Ok(())
    }

    async fn delete_by_display_order(&self, user_id: i32, display_order: i32) -> Result<u64> {
        let result = sqlx::query("DELETE FROM user_trophies WHERE user_id = ? AND display_order = ?")
            .bind(user_id)
            .bind(display_order)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
