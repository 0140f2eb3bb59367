//! # camguard-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port defined in `camguard-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle, including the startup
//!   connect-retry policy and explicit shutdown
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `camguard-app` (for port traits) and `camguard-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod pool;
mod violation_repo;

pub use error::StorageError;
pub use pool::{Config, Database, RetryPolicy};
pub use violation_repo::SqliteViolationRepository;
