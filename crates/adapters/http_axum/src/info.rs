//! Root capability descriptor.

use axum::Json;
use serde_json::{Value, json};

/// `GET /` — static description of the service and its endpoints.
pub async fn describe() -> Json<Value> {
    Json(json!({
        "message": "ESP32-CAM Violation Detection API",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /api/violations": "Upload violation (raw JPEG body + sensor metadata)",
            "GET /api/violations": "Get all violations (paginated: page, limit)",
            "GET /api/violations/{id}": "Get specific violation",
            "GET /api/violations/{id}/image": "Download the raw JPEG of a violation",
            "GET /api/violations/recent": "Get recent violations (limit)",
            "GET /api/violations/type/{type}": "Get by type (smoke/spit)",
            "DELETE /api/violations/{id}": "Delete violation"
        }
    }))
}
