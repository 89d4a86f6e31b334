use crate::DbError;
use crate::repository::JobRepository;
use async_trait::async_trait;
use core_types::{Job, JobId};
use std::sync::{Mutex, MutexGuard};

/// A process-local job store. Useful for previews, tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    jobs: Mutex<Vec<Job>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn jobs(&self) -> Result<MutexGuard<'_, Vec<Job>>, DbError> {
        self.jobs.lock().map_err(|_| DbError::LockPoisoned)
    }
}

#[async_trait]
impl JobRepository for InMemoryRepository {
    async fn create(&self, job: &Job) -> Result<(), DbError> {
        let mut jobs = self.jobs()?;
        if jobs.iter().any(|existing| existing.id == job.id) {
            return Err(DbError::DuplicateId(job.id));
        }
        jobs.push(job.clone());
        Ok(())
    }

    async fn get(&self, id: JobId) -> Result<Job, DbError> {
        self.jobs()?
            .iter()
            .find(|job| job.id == id)
            .cloned()
            .ok_or(DbError::NotFound(id))
    }

    async fn delete(&self, id: JobId) -> Result<(), DbError> {
        let mut jobs = self.jobs()?;
        let position = jobs
            .iter()
            .position(|job| job.id == id)
            .ok_or(DbError::NotFound(id))?;
        jobs.remove(position);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Job>, DbError> {
        Ok(self.jobs()?.clone())
    }

    async fn clear(&self) -> Result<u64, DbError> {
        let mut jobs = self.jobs()?;
        let removed = jobs.len() as u64;
        jobs.clear();
        Ok(removed)
    }
}
