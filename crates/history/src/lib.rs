//! # Job History
//!
//! The imperative shell around the calculation core. `JobHistory` owns the
//! workflow for a submitted form: validate, compute, stamp, persist. It also
//! answers listing queries for the history view, charts and exports.
//!
//! The storage medium is injected as a `Box<dyn JobRepository>`.

pub mod error;
pub mod query;

pub use error::HistoryError;
pub use query::{JobQuery, SortDirection, SortKey};

use analytics::{HistorySummary, MetricsEngine};
use chrono::{DateTime, Utc};
use core_types::{Job, JobId, JobInput, Metrics};
use database::JobRepository;
use validator::{validate, ValidationErrors};

/// What a live form shows while the user types: the running calculation plus
/// whatever would currently block saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub metrics: Metrics,
    pub errors: ValidationErrors,
}

impl Preview {
    pub fn can_save(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Computes metrics for `input` regardless of validity. Never touches storage.
pub fn preview(input: &JobInput) -> Preview {
    Preview {
        metrics: MetricsEngine::new().calculate(input),
        errors: validate(input),
    }
}

pub struct JobHistory {
    repo: Box<dyn JobRepository>,
    engine: MetricsEngine,
}

impl JobHistory {
    pub fn new(repo: Box<dyn JobRepository>) -> Self {
        Self {
            repo,
            engine: MetricsEngine::new(),
        }
    }

    /// Validates and saves a job stamped with the current time.
    pub async fn submit(&self, input: &JobInput) -> Result<Job, HistoryError> {
        self.submit_at(input, Utc::now()).await
    }

    /// Validates and saves a job stamped with `created_at`.
    ///
    /// Nothing is written when validation fails; the errors come back in
    /// `HistoryError::Invalid`.
    pub async fn submit_at(
        &self,
        input: &JobInput,
        created_at: DateTime<Utc>,
    ) -> Result<Job, HistoryError> {
        let errors = validate(input);
        if !errors.is_empty() {
            tracing::debug!(error_count = errors.len(), "Rejected invalid job input.");
            return Err(HistoryError::Invalid(errors));
        }

        let metrics = self.engine.calculate(input);
        let id = JobId::next(created_at, self.repo.latest_id().await?);
        let job = Job::new(
            id,
            created_at,
            input.trimmed_name(),
            input.trimmed_carrier().map(str::to_string),
            input.figures(),
            metrics,
        );

        self.repo.create(&job).await?;
        tracing::info!(job_id = %job.id, status = %job.status(), "Saved job.");
        Ok(job)
    }

    pub async fn get(&self, id: JobId) -> Result<Job, HistoryError> {
        Ok(self.repo.get(id).await?)
    }

    pub async fn delete(&self, id: JobId) -> Result<(), HistoryError> {
        self.repo.delete(id).await?;
        tracing::info!(job_id = %id, "Deleted job.");
        Ok(())
    }

    /// Deletes every saved job and returns how many were removed.
    pub async fn clear(&self) -> Result<u64, HistoryError> {
        let removed = self.repo.clear().await?;
        tracing::info!(removed, "Cleared job history.");
        Ok(removed)
    }

    pub async fn list(&self, query: &JobQuery) -> Result<Vec<Job>, HistoryError> {
        Ok(query.apply(self.repo.list().await?))
    }

    /// Chart data over the jobs matching `query`.
    pub async fn summary(&self, query: &JobQuery) -> Result<HistorySummary, HistoryError> {
        let jobs = self.list(query).await?;
        Ok(HistorySummary::from_jobs(&jobs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_types::{FieldValue, ProfitabilityStatus};
    use database::{DbError, InMemoryRepository};
    use rust_decimal_macros::dec;
    use validator::Field;

    fn history() -> JobHistory {
        JobHistory::new(Box::new(InMemoryRepository::new()))
    }

    fn input(name: &str, retail: &str, cost: &str) -> JobInput {
        JobInput {
            job_name: name.into(),
            carrier: Some(" Travelers ".into()),
            retail_price: retail.into(),
            job_cost: cost.into(),
            division_overhead_pct: "12".into(),
            company_overhead_pct: "15".into(),
            royalty_pct: "5".into(),
            target_net_profit_pct: "20".into(),
        }
    }

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn preview_computes_even_when_invalid() {
        let mut raw = input("", "10000", "6000");
        raw.royalty_pct = FieldValue::Text("five".into());

        let preview = preview(&raw);
        assert!(!preview.can_save());
        assert!(preview.errors.contains(Field::JobName));
        assert!(preview.errors.contains(Field::RoyaltyPct));
        // Royalty coerced to zero: 27% of 10000.
        assert_eq!(preview.metrics.overhead_cost_dollars, dec!(2700));
    }

    #[tokio::test]
    async fn submit_saves_trimmed_job_with_metrics() {
        let history = history();
        let job = history
            .submit_at(&input("  Roof  ", "10000", "6000"), at(1_000))
            .await
            .unwrap();

        assert_eq!(job.id, JobId::new(1_000));
        assert_eq!(job.job_name, "Roof");
        assert_eq!(job.carrier.as_deref(), Some("Travelers"));
        assert_eq!(job.metrics.net_profit_dollars, dec!(800));
        assert_eq!(job.status(), ProfitabilityStatus::Warning);
        assert_eq!(history.get(job.id).await.unwrap(), job);
    }

    #[tokio::test]
    async fn invalid_input_is_not_saved() {
        let history = history();
        let result = history.submit_at(&input("Roof", "5000", "6000"), at(1)).await;

        match result {
            Err(HistoryError::Invalid(errors)) => {
                assert_eq!(errors.get(Field::JobCost), ["Job cost cannot exceed retail price"]);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert!(history.list(&JobQuery::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn same_millisecond_submissions_get_distinct_ids() {
        let history = history();
        let first = history.submit_at(&input("A", "100", "50"), at(5)).await.unwrap();
        let second = history.submit_at(&input("B", "100", "50"), at(5)).await.unwrap();

        assert_eq!(first.id, JobId::new(5));
        assert_eq!(second.id, JobId::new(6));
    }

    #[tokio::test]
    async fn delete_clear_and_list() {
        let history = history();
        let a = history.submit_at(&input("A", "10000", "6000"), at(1)).await.unwrap();
        let b = history.submit_at(&input("B", "10400", "8400"), at(2)).await.unwrap();
        history.submit_at(&input("C", "10000", "5000"), at(3)).await.unwrap();

        history.delete(a.id).await.unwrap();
        assert!(matches!(
            history.delete(a.id).await,
            Err(HistoryError::Database(DbError::NotFound(_)))
        ));

        let listed = history.list(&JobQuery::new()).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].id, b.id);

        let summary = history.summary(&JobQuery::new()).await.unwrap();
        assert_eq!(summary.total_jobs, 2);

        assert_eq!(history.clear().await.unwrap(), 2);
        assert!(history.list(&JobQuery::new()).await.unwrap().is_empty());
    }
}
