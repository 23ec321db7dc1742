use axum::http::StatusCode;
use axum::response::IntoResponse;

/// GET router liveness
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "healthy")
}
