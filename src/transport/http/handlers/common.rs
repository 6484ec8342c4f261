use crate::domain::BookError;
use crate::transport::http::types::{ApiResponse, ErrorResponse};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Status class for each error kind.
pub fn status_for(err: &BookError) -> StatusCode {
    match err {
        BookError::BadRequest(_)
        | BookError::Validation(_)
        | BookError::BusinessRule(_)
        | BookError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        BookError::NotFound { .. } => StatusCode::NOT_FOUND,
        BookError::Storage(_) | BookError::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(status: StatusCode, summary: &str, detail: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: summary.to_string(),
            message: detail,
        }),
    )
        .into_response()
}

/// Renders `err` as the error envelope, logging server-side failures loudly.
pub fn book_error_response(summary: &str, err: &BookError) -> Response {
    let status = status_for(err);
    if status.is_server_error() {
        tracing::error!(error = %err, "{}", summary);
    } else {
        tracing::debug!(error = %err, status = status.as_u16(), "{}", summary);
    }
    error_response(status, summary, err.to_string())
}

pub fn success_response<T: Serialize>(status: StatusCode, message: &str, data: Option<T>) -> Response {
    let data = match data.map(serde_json::to_value).transpose() {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error = %e, "failed to encode response body");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to encode response",
                e.to_string(),
            );
        }
    };
    (
        status,
        Json(ApiResponse {
            message: message.to_string(),
            data,
        }),
    )
        .into_response()
}

/// Path segment -> book id. Non-numeric ids are an `InvalidArgument`.
pub fn parse_book_id(raw: &str) -> Result<i64, BookError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| BookError::InvalidArgument(raw.to_string()))
}

/// Path extractor -> book id. A rejected path is a `BadRequest`.
pub fn path_book_id(path: Result<Path<String>, PathRejection>) -> Result<i64, BookError> {
    let Path(raw) = path.map_err(|e| BookError::BadRequest(e.body_text()))?;
    parse_book_id(&raw)
}

pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, BookError> {
    body.map(|Json(v)| v)
        .map_err(|e| BookError::BadRequest(e.body_text()))
}

pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, BookError> {
    query
        .map(|Query(v)| v)
        .map_err(|e| BookError::BadRequest(e.body_text()))
}
