use crate::transport::http::handlers::common::success_response;
use crate::transport::http::types::{ApiResponse, SERVICE_NAME};
use axum::http::StatusCode;
use axum::response::Response;

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is up", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler() -> Response {
    success_response(
        StatusCode::OK,
        "service is healthy",
        Some(serde_json::json!({ "status": "healthy", "service": SERVICE_NAME })),
    )
}
