use crate::domain::book::{CreateBookRequest, UpdateBookRequest};
use crate::transport::http::handlers::common::{
    book_error_response, json_body, path_book_id, query_params, success_response,
};
use crate::transport::http::types::{ApiResponse, AppState, ErrorResponse, ListBooksQuery};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/v1/books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created; `data` is the stored Book", body = ApiResponse),
        (status = 400, description = "Malformed body, missing field or future purchase date", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn create_book_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Response {
    const SUMMARY: &str = "failed to create book";
    let request = match json_body(body) {
        Ok(r) => r,
        Err(e) => return book_error_response(SUMMARY, &e),
    };
    match state.book_service.create_book(request).await {
        Ok(book) => success_response(StatusCode::CREATED, "book created", Some(book)),
        Err(e) => book_error_response(SUMMARY, &e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/books",
    params(ListBooksQuery),
    responses(
        (status = 200, description = "One page of books; `data` is a BookPage", body = ApiResponse),
        (status = 400, description = "Unknown status filter", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_books_handler(
    State(state): State<AppState>,
    query: Result<Query<ListBooksQuery>, QueryRejection>,
) -> Response {
    const SUMMARY: &str = "failed to list books";
    let request = match query_params(query).and_then(ListBooksQuery::into_request) {
        Ok(r) => r,
        Err(e) => return book_error_response(SUMMARY, &e),
    };
    match state
        .book_service
        .list_books(&request.filter, request.page, request.limit)
        .await
    {
        Ok(page) => success_response(StatusCode::OK, "", Some(page)),
        Err(e) => book_error_response(SUMMARY, &e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/books/{id}",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "`data` is the Book", body = ApiResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "No such book", body = ErrorResponse)
    )
)]
pub async fn get_book_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    const SUMMARY: &str = "failed to get book";
    let result = match path_book_id(id) {
        Ok(id) => state.book_service.get_book(id).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(book) => success_response(StatusCode::OK, "", Some(book)),
        Err(e) => book_error_response(SUMMARY, &e),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/books/{id}",
    params(("id" = i64, Path, description = "Book id")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Book updated; `data` is the Book", body = ApiResponse),
        (status = 400, description = "Invalid id, malformed body or rating out of range", body = ErrorResponse),
        (status = 404, description = "No such book", body = ErrorResponse)
    )
)]
pub async fn update_book_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdateBookRequest>, JsonRejection>,
) -> Response {
    const SUMMARY: &str = "failed to update book";
    let id = match path_book_id(id) {
        Ok(id) => id,
        Err(e) => return book_error_response(SUMMARY, &e),
    };
    let request = match json_body(body) {
        Ok(r) => r,
        Err(e) => return book_error_response(SUMMARY, &e),
    };
    match state.book_service.update_book(id, request).await {
        Ok(book) => success_response(StatusCode::OK, "book updated", Some(book)),
        Err(e) => book_error_response(SUMMARY, &e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/books/{id}",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book deleted", body = ApiResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "No such book", body = ErrorResponse)
    )
)]
pub async fn delete_book_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    const SUMMARY: &str = "failed to delete book";
    let result = match path_book_id(id) {
        Ok(id) => state.book_service.delete_book(id).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => success_response(StatusCode::OK, "book deleted", None::<()>),
        Err(e) => book_error_response(SUMMARY, &e),
    }
}
