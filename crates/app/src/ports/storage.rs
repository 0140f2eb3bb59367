//! Storage port — repository trait for the violation collection.

use std::future::Future;

use camguard_domain::error::CamGuardError;
use camguard_domain::id::ViolationId;
use camguard_domain::pagination::Page;
use camguard_domain::violation::{Violation, ViolationType};

/// Repository for persisting and querying [`Violation`]s.
///
/// Every listing method returns records newest-first.
pub trait ViolationRepository {
    /// Persist a new violation.
    fn create(
        &self,
        violation: Violation,
    ) -> impl Future<Output = Result<Violation, CamGuardError>> + Send;

    /// Get a violation by its unique identifier.
    fn get_by_id(
        &self,
        id: ViolationId,
    ) -> impl Future<Output = Result<Option<Violation>, CamGuardError>> + Send;

    /// Get one page of violations.
    fn list(&self, page: Page) -> impl Future<Output = Result<Vec<Violation>, CamGuardError>> + Send;

    /// Count all stored violations.
    fn count(&self) -> impl Future<Output = Result<u64, CamGuardError>> + Send;

    /// Get the `limit` most recent violations.
    fn get_recent(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Violation>, CamGuardError>> + Send;

    /// Get one page of violations of the given type.
    fn find_by_type(
        &self,
        violation_type: ViolationType,
        page: Page,
    ) -> impl Future<Output = Result<Vec<Violation>, CamGuardError>> + Send;

    /// Delete a violation, returning whether a record was removed.
    fn delete(&self, id: ViolationId) -> impl Future<Output = Result<bool, CamGuardError>> + Send;
}
