use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe that never touches the store.
///
/// GET /
pub async fn hello() -> impl IntoResponse {
    Json(json!({ "hello": "world" }))
}
