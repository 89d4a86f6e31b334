use crate::DbError;
use crate::repository::JobRepository;
use analytics::compute_from_figures;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{Job, JobFigures, JobId, Metrics};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

const SELECT_JOBS: &str = r#"
    SELECT id, created_at, job_name, carrier,
           retail_price, job_cost, division_overhead_pct, company_overhead_pct,
           royalty_pct, target_net_profit_pct, metrics
    FROM jobs
"#;

/// The `SqliteRepository` keeps jobs in a SQLite database. It encapsulates all
/// SQL queries and row mapping.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a new `SqliteRepository` over an already-migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for SqliteRepository {
    async fn create(&self, job: &Job) -> Result<(), DbError> {
        let metrics_json = serde_json::to_string(&job.metrics)?;

        sqlx::query(
            r#"
            INSERT INTO jobs (
                id, created_at, job_name, carrier,
                retail_price, job_cost, division_overhead_pct, company_overhead_pct,
                royalty_pct, target_net_profit_pct, profitability_status, metrics
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(job.id.value())
        .bind(job.created_at)
        .bind(&job.job_name)
        .bind(job.carrier.as_deref())
        .bind(job.inputs.retail_price.to_string())
        .bind(job.inputs.job_cost.to_string())
        .bind(job.inputs.division_overhead_pct.to_string())
        .bind(job.inputs.company_overhead_pct.to_string())
        .bind(job.inputs.royalty_pct.to_string())
        .bind(job.inputs.target_net_profit_pct.to_string())
        .bind(job.status().as_str())
        .bind(metrics_json)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => DbError::DuplicateId(job.id),
            other => other.into(),
        })?;

        tracing::debug!(job_id = %job.id, "Inserted job.");
        Ok(())
    }

    async fn get(&self, id: JobId) -> Result<Job, DbError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_JOBS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound(id))?;
        job_from_row(&row)
    }

    async fn delete(&self, id: JobId) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id.value())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Job>, DbError> {
        let rows = sqlx::query(&format!("{} ORDER BY id ASC", SELECT_JOBS))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(job_from_row).collect()
    }

    async fn clear(&self) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM jobs").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn latest_id(&self) -> Result<Option<JobId>, DbError> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM jobs")
            .fetch_one(&self.pool)
            .await?;
        Ok(max.map(JobId::new))
    }
}

/// Maps a row back to a `Job`.
///
/// Metrics are re-derived from the stored inputs so a loaded job always agrees
/// with the current engine; a mismatch with the stored copy is logged.
fn job_from_row(row: &SqliteRow) -> Result<Job, DbError> {
    let id: i64 = row.try_get("id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let job_name: String = row.try_get("job_name")?;
    let carrier: Option<String> = row.try_get("carrier")?;

    let inputs = JobFigures {
        retail_price: decimal_column(row, id, "retail_price")?,
        job_cost: decimal_column(row, id, "job_cost")?,
        division_overhead_pct: decimal_column(row, id, "division_overhead_pct")?,
        company_overhead_pct: decimal_column(row, id, "company_overhead_pct")?,
        royalty_pct: decimal_column(row, id, "royalty_pct")?,
        target_net_profit_pct: decimal_column(row, id, "target_net_profit_pct")?,
    };

    let metrics = compute_from_figures(&inputs);
    let stored_json: String = row.try_get("metrics")?;
    match serde_json::from_str::<Metrics>(&stored_json) {
        Ok(stored) if stored == metrics => {}
        Ok(_) => tracing::warn!(job_id = id, "Stored metrics differ from their inputs; using recomputed values."),
        Err(e) => tracing::warn!(job_id = id, error = %e, "Stored metrics are unreadable; using recomputed values."),
    }

    Ok(Job::new(JobId::new(id), created_at, job_name, carrier, inputs, metrics))
}

fn decimal_column(row: &SqliteRow, id: i64, column: &str) -> Result<Decimal, DbError> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw).map_err(|e| DbError::CorruptRow {
        id,
        reason: format!("column '{}' holds '{}': {}", column, raw, e),
    })
}
