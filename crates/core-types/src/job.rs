use crate::error::CoreError;
use crate::input::{JobFigures, JobInput};
use crate::metrics::Metrics;
use crate::status::ProfitabilityStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier of a saved job, derived from its creation time in Unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(i64);

impl JobId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn from_timestamp(created_at: DateTime<Utc>) -> Self {
        Self(created_at.timestamp_millis())
    }

    /// The id for a job created at `created_at`. Always strictly greater than
    /// `previous`, so two jobs saved within the same millisecond stay distinct.
    pub fn next(created_at: DateTime<Utc>, previous: Option<JobId>) -> Self {
        let candidate = Self::from_timestamp(created_at);
        match previous {
            Some(previous) if previous >= candidate => Self(previous.0.saturating_add(1)),
            _ => candidate,
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(JobId)
            .map_err(|e| CoreError::InvalidInput("job id".to_string(), e.to_string()))
    }
}

/// A persisted job: its validated inputs, the metrics computed from them, and
/// when it was created. Jobs are never edited, only deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub created_at: DateTime<Utc>,
    pub job_name: String,
    pub carrier: Option<String>,
    #[serde(flatten)]
    pub inputs: JobFigures,
    #[serde(flatten)]
    pub metrics: Metrics,
}

impl Job {
    pub fn new(
        id: JobId,
        created_at: DateTime<Utc>,
        job_name: impl Into<String>,
        carrier: Option<String>,
        inputs: JobFigures,
        metrics: Metrics,
    ) -> Self {
        Self {
            id,
            created_at,
            job_name: job_name.into(),
            carrier,
            inputs,
            metrics,
        }
    }

    pub fn status(&self) -> ProfitabilityStatus {
        self.metrics.profitability_status
    }

    /// Rebuilds the input this job was created from.
    pub fn to_input(&self) -> JobInput {
        JobInput {
            job_name: self.job_name.clone(),
            carrier: self.carrier.clone(),
            ..JobInput::from(self.inputs)
        }
    }
}
