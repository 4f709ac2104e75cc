/*
 * Responsibility
 * - GET /health (疎通用)
 * - Basic 認証の外に置く (probe から叩けるように)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
