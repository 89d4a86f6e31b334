//! # Profitability Analytics
//!
//! The calculation core: turns a job's financial inputs into margins, markups,
//! required pricing and shortfall figures, and classifies the result.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O, no logging, no shared state. It depends only on
//!   `core-types`. Every function here is safe to call on each keystroke of a
//!   live-preview form.
//! - **Total Functions:** Degenerate inputs produce explicit zero fallbacks, never
//!   errors or panics.
//!
//! ## Public API
//!
//! - `compute_metrics` / `MetricsEngine`: the metrics engine.
//! - `classify_status` / `covers_overhead`: the status classifier.
//! - `HistorySummary`: aggregates over many jobs for charting.

// Declare the modules that constitute this crate.
pub mod classifier;
pub mod engine;
pub mod summary;

// Re-export the key components to create a clean, public-facing API.
pub use classifier::{classify_status, covers_overhead};
pub use engine::{compute_from_figures, compute_metrics, MetricsEngine};
pub use summary::{HistorySummary, MarginPoint, StatusCount};
