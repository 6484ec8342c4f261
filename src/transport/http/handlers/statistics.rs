use crate::transport::http::handlers::common::{book_error_response, success_response};
use crate::transport::http::types::{ApiResponse, AppState, ErrorResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

#[utoipa::path(
    get,
    path = "/api/v1/statistics",
    responses(
        (status = 200, description = "`data` is BookStatistics", body = ApiResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn statistics_handler(State(state): State<AppState>) -> Response {
    match state.book_service.statistics().await {
        Ok(stats) => success_response(StatusCode::OK, "", Some(stats)),
        Err(e) => book_error_response("failed to compute statistics", &e),
    }
}
