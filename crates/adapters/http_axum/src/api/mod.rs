//! JSON REST API handler modules.

pub mod metadata;
#[allow(clippy::missing_errors_doc)]
pub mod violations;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::handler::Handler;
use axum::routing::get;

use camguard_app::ports::ViolationRepository;
use camguard_domain::image::MAX_IMAGE_BYTES;

use crate::state::AppState;

/// Build the `/api` sub-router.
///
/// Only the upload handler buffers a request body; it carries its own
/// body limit so no other route accepts large payloads.
pub fn routes<VR>() -> Router<AppState<VR>>
where
    VR: ViolationRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/violations",
            get(violations::list::<VR>)
                .post(violations::create::<VR>.layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))),
        )
        .route("/violations/recent", get(violations::recent::<VR>))
        .route(
            "/violations/type/{violation_type}",
            get(violations::by_type::<VR>),
        )
        .route(
            "/violations/{id}",
            get(violations::get::<VR>).delete(violations::delete::<VR>),
        )
        .route("/violations/{id}/image", get(violations::image::<VR>))
}
