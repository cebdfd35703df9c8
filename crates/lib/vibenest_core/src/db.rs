//! PostgreSQL connection pool setup and store-error classification.
//!
//! Pool management proper (dialing, health, timeouts) is left to `sqlx`;
//! this module only carries the knobs the server exposes.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::info;

/// Default database URL for local development.
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/vibenest";

/// Default upper bound on pooled connections.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// How long a request waits for a pooled connection before failing.
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while bringing up the store.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Result type for database setup.
pub type Result<T> = std::result::Result<T, DbError>;

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl PoolSettings {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }

    /// Open the pool and run embedded migrations.
    pub async fn connect(&self) -> Result<PgPool> {
        info!(
            max_connections = self.max_connections,
            "connecting to PostgreSQL"
        );
        let pool = self.options().connect(&self.database_url).await?;
        crate::migrate::migrate(&pool).await?;
        Ok(pool)
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}

/// Round-trip `SELECT 1` against the pool.
pub async fn ping(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}

/// SQLSTATE 23505: a unique constraint rejected the write.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// SQLSTATE 23503: a referenced row does not exist.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// SQLSTATE 23503 raised by the named constraint.
pub(crate) fn violates_foreign_key(err: &sqlx::Error, constraint: &str) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db)
            if db.is_foreign_key_violation() && db.constraint() == Some(constraint)
    )
}
