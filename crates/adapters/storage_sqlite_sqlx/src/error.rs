//! Storage-specific error type wrapping sqlx errors.

use camguard_domain::error::CamGuardError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to (de)serialize the stored sensor document.
    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Every connection attempt allowed by the retry policy failed.
    #[error("gave up connecting after {attempts} attempts")]
    ConnectExhausted {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },
}

impl From<StorageError> for CamGuardError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
