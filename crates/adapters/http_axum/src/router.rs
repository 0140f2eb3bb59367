//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use camguard_app::ports::ViolationRepository;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Serves the capability descriptor at `/`, a liveness probe at `/health`
/// and the violation API under `/api`. Includes a [`TraceLayer`] that logs
/// each HTTP request/response using the `tracing` ecosystem.
pub fn build<VR>(state: AppState<VR>) -> Router
where
    VR: ViolationRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(crate::info::describe))
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
