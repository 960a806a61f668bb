use sqlx::{mysql::MySqlPoolOptions, MySql, Pool};

use super::environment::Config;

pub type DbPool = Pool<MySql>;

pub async fn init_db(config: &Config) -> Result<DbPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(config.max_db_connections)
        .connect(&config.database_url)
        .await
}

/// Failure reported by any repository implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unique constraint violated")]
    UniqueViolation,

    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation)
    }
}
