use crate::error::DbError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Opens the SQLite database at `database_url`, creating the file if needed.
///
/// The pool holds a single connection that is never recycled: writes are
/// serialized, and `sqlite::memory:` databases survive for the life of the pool.
pub async fn connect(database_url: &str) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    tracing::debug!(database_url, "Connected to job database.");
    Ok(pool)
}

/// Applies the embedded migrations, bringing the schema up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
