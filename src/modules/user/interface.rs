use async_trait::async_trait;

use super::model::{ProfileUpdate, UserSnapshot};
use crate::config::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns `None` when the user does not exist.
    async fn user_snapshot(&self, user_id: i32) -> Result<Option<UserSnapshot>>;

    /// Fails with `StoreError::UniqueViolation` when the username is taken.
    async fn update_profile(&self, user_id: i32, update: &ProfileUpdate) -> Result<()>;

    /// Fails with `StoreError::NotFound` when the user does not exist.
    async fn delete_user(&self, user_id: i32) -> Result<()>;
}
