//! `SQLite` connection pool setup, connect-retry policy and migration runner.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::error::StorageError;

/// Delay between connection attempts when none is configured.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// How the initial connection is retried when the store is unreachable.
///
/// Every attempt is separated by the same fixed `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pause between two attempts.
    pub delay: Duration,
    /// Total number of attempts, or `None` to keep trying until it works.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded(DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy {
    /// Retry forever with a fixed delay.
    #[must_use]
    pub fn unbounded(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    /// Give up after `max_attempts` attempts (at least one is always made).
    #[must_use]
    pub fn bounded(max_attempts: u32, delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: Some(max_attempts),
        }
    }

    /// Whether another attempt is allowed after `attempts` have failed.
    #[must_use]
    pub fn should_retry(&self, attempts: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempts < max)
    }
}

/// Configuration for the `SQLite` storage adapter.
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:camguard.db` or `sqlite::memory:`).
    pub database_url: String,
    /// Policy applied while establishing the first connection.
    pub retry: RetryPolicy,
}

impl Config {
    /// Configuration with the default (unbounded, 5 s) retry policy.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build a [`Database`] from this configuration.
    ///
    /// Creates the connection pool (retrying per [`RetryPolicy`]), creates
    /// the database file if missing, and runs all pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the URL is invalid, the retry policy is
    /// exhausted, or migrations fail.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::initialize(&self.database_url, self.retry).await
    }
}

/// Holds the `SQLite` connection pool and provides access to it.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    async fn initialize(database_url: &str, retry: RetryPolicy) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = connect_with_retry(&options, retry).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection, waiting for checked-out ones to return.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database pool closed");
    }
}

async fn connect_with_retry(
    options: &SqliteConnectOptions,
    retry: RetryPolicy,
) -> Result<SqlitePool, StorageError> {
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match SqlitePool::connect_with(options.clone()).await {
            Ok(pool) => {
                tracing::info!(attempts, "connected to database");
                return Ok(pool);
            }
            Err(source) if !retry.should_retry(attempts) => {
                tracing::error!(attempts, error = %source, "giving up connecting to database");
                return Err(StorageError::ConnectExhausted { attempts, source });
            }
            Err(err) => {
                tracing::warn!(
                    attempt = attempts,
                    delay_ms = u64::try_from(retry.delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "database connection failed, retrying"
                );
                tokio::time::sleep(retry.delay).await;
            }
        }
    }
}
