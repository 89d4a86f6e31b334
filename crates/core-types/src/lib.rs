//! # Core Types
//!
//! The shared vocabulary of the workspace: raw job inputs, the metrics derived
//! from them, the profitability status, and the persisted `Job` record.
//!
//! This crate holds data only. The calculation lives in `analytics`, the
//! input rules in `validator`.

pub mod error;
pub mod input;
pub mod job;
pub mod metrics;
pub mod status;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use input::{FieldValue, JobFigures, JobInput};
pub use job::{Job, JobId};
pub use metrics::Metrics;
pub use status::ProfitabilityStatus;
