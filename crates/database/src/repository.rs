use crate::DbError;
use async_trait::async_trait;
use core_types::{Job, JobId};

/// Storage for saved jobs.
///
/// Implementations decide the medium; callers only see these operations. Jobs
/// are immutable once created, so there is no update.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Saves a new job. Fails with `DuplicateId` if the id is taken.
    async fn create(&self, job: &Job) -> Result<(), DbError>;

    async fn get(&self, id: JobId) -> Result<Job, DbError>;

    /// Removes one job. Fails with `NotFound` if there is no such job.
    async fn delete(&self, id: JobId) -> Result<(), DbError>;

    /// Every job, in insertion order.
    async fn list(&self) -> Result<Vec<Job>, DbError>;

    /// Removes every job and returns how many there were.
    async fn clear(&self) -> Result<u64, DbError>;

    /// The highest id in use, if any.
    async fn latest_id(&self) -> Result<Option<JobId>, DbError> {
        Ok(self.list().await?.iter().map(|job| job.id).max())
    }
}
