//! The two guarded lifecycle transitions.

use crate::domain::BookError;
use crate::transport::http::handlers::common::{book_error_response, path_book_id, success_response};
use crate::transport::http::types::{ApiResponse, AppState, ErrorResponse, FinishReadingRequest};
use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;

#[utoipa::path(
    post,
    path = "/api/v1/books/{id}/start-reading",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Status is now `reading`", body = ApiResponse),
        (status = 400, description = "Invalid id, or the book is already reading/completed", body = ErrorResponse),
        (status = 404, description = "No such book", body = ErrorResponse)
    )
)]
pub async fn start_reading_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    const SUMMARY: &str = "failed to start reading";
    let result = match path_book_id(id) {
        Ok(id) => state.book_service.start_reading(id).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(book) => success_response(StatusCode::OK, "started reading", Some(book)),
        Err(e) => book_error_response(SUMMARY, &e),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/books/{id}/finish-reading",
    params(("id" = i64, Path, description = "Book id")),
    request_body(content = FinishReadingRequest, description = "Optional rating; the body may be empty"),
    responses(
        (status = 200, description = "Status is now `completed`", body = ApiResponse),
        (status = 400, description = "Invalid id, book not being read, or rating out of range", body = ErrorResponse),
        (status = 404, description = "No such book", body = ErrorResponse)
    )
)]
pub async fn finish_reading_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Response {
    const SUMMARY: &str = "failed to finish reading";
    let id = match path_book_id(id) {
        Ok(id) => id,
        Err(e) => return book_error_response(SUMMARY, &e),
    };
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        FinishReadingRequest::default()
    } else {
        match serde_json::from_slice::<FinishReadingRequest>(&body) {
            Ok(r) => r,
            Err(e) => return book_error_response(SUMMARY, &BookError::BadRequest(e.to_string())),
        }
    };
    match state.book_service.finish_reading(id, request.rating).await {
        Ok(book) => success_response(StatusCode::OK, "finished reading", Some(book)),
        Err(e) => book_error_response(SUMMARY, &e),
    }
}
