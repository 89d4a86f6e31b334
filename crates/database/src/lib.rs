//! # Job Database Crate
//!
//! The persistence layer for saved jobs: the system's "permanent archive."
//!
//! ## Architectural Principles
//!
//! - **Injected Storage:** Callers depend on the `JobRepository` trait only. The
//!   medium is chosen at startup: `SqliteRepository` for a file on disk,
//!   `InMemoryRepository` for a throwaway session.
//! - **No Drift:** Metrics are re-derived from stored inputs on every load, so a
//!   saved job always matches what the engine would compute.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations`: open a SQLite pool and bring its schema up to date.
//! - `JobRepository`: `create`, `get`, `delete`, `list`, `clear`.
//! - `SqliteRepository`, `InMemoryRepository`: the two backends.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod sqlite;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use memory::InMemoryRepository;
pub use repository::JobRepository;
pub use sqlite::SqliteRepository;
