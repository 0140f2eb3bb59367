//! Shared application state for axum handlers.

use std::sync::Arc;

use camguard_app::ports::ViolationRepository;
use camguard_app::services::violation_service::ViolationService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository type to avoid dynamic dispatch.
/// `Clone` is implemented manually so the repository itself does not need
/// to be `Clone` — only the `Arc` wrapper is cloned.
pub struct AppState<VR> {
    /// Violation use-cases.
    pub violation_service: Arc<ViolationService<VR>>,
}

impl<VR> Clone for AppState<VR> {
    fn clone(&self) -> Self {
        Self {
            violation_service: Arc::clone(&self.violation_service),
        }
    }
}

impl<VR> AppState<VR>
where
    VR: ViolationRepository + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(violation_service: ViolationService<VR>) -> Self {
        Self::from_arc(Arc::new(violation_service))
    }

    /// Create a new application state from a pre-wrapped service.
    pub fn from_arc(violation_service: Arc<ViolationService<VR>>) -> Self {
        Self { violation_service }
    }
}
