use core_types::JobId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("An error occurred during JSON serialization/deserialization: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Job {0} was not found.")]
    NotFound(JobId),

    #[error("A job with id {0} already exists.")]
    DuplicateId(JobId),

    #[error("Stored job {id} is unreadable: {reason}")]
    CorruptRow { id: i64, reason: String },

    #[error("The in-memory job store lock was poisoned.")]
    LockPoisoned,
}
