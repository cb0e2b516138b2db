//! Liveness endpoint.

use axum::response::IntoResponse;
use axum::Json;

/// Report that the process is up.
///
/// # Returns
/// - 200 OK with `{"status": "healthy", "version": ...}`
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
