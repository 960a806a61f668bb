use async_trait::async_trait;

use super::model::{DisplayedTrophy, TrophyChange};
use crate::config::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// A change that could not be applied. Nothing from the batch was kept.
#[derive(Debug, thiserror::Error)]
#[error("failed to apply {change:?}: {source}")]
pub struct ChangeError {
    pub change: TrophyChange,
    #[source]
    pub source: StoreError,
}

#[async_trait]
pub trait TrophyRepository: Send + Sync {
    /// Trophies in the user's display slots, ordered by display order.
    async fn displayed_trophies(&self, user_id: i32) -> Result<Vec<DisplayedTrophy>>;

    /// Applies `changes` in order, all or nothing.
    async fn apply_changes(
        &self,
        user_id: i32,
        changes: &[TrophyChange],
    ) -> std::result::Result<(), ChangeError>;

    /// Empties one display slot. Returns how many rows were removed.
    async fn delete_by_display_order(&self, user_id: i32, display_order: i32) -> Result<u64>;
}
