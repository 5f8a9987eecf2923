use axum::{http::StatusCode, response::IntoResponse, Json};

/// Liveness probe for deployment.
pub async fn health() -> axum::response::Response {
    (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response()
}
