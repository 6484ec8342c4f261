use crate::domain::book::{BookPage, CreateBookRequest, UpdateBookRequest};
use crate::domain::{Book, BookStatistics, ReadingStatus};
use crate::transport::http::handlers::{books, health, reading, statistics};
use crate::transport::http::types::{
    ApiResponse, AppState, ErrorResponse, FinishReadingRequest, API_PREFIX,
};
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        books::create_book_handler,
        books::list_books_handler,
        books::get_book_handler,
        books::update_book_handler,
        books::delete_book_handler,
        reading::start_reading_handler,
        reading::finish_reading_handler,
        statistics::statistics_handler
    ),
    components(schemas(
        ApiResponse,
        ErrorResponse,
        Book,
        BookPage,
        BookStatistics,
        ReadingStatus,
        CreateBookRequest,
        UpdateBookRequest,
        FinishReadingRequest
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/books",
            post(books::create_book_handler).get(books::list_books_handler),
        )
        .route(
            "/books/:id",
            get(books::get_book_handler)
                .put(books::update_book_handler)
                .delete(books::delete_book_handler),
        )
        .route("/books/:id/start-reading", post(reading::start_reading_handler))
        .route("/books/:id/finish-reading", post(reading::finish_reading_handler))
        .route("/statistics", get(statistics::statistics_handler))
        .route("/health", get(health::healthcheck_handler));

    Router::new().nest(API_PREFIX, api).with_state(app_state)
}

/// Any origin and header; only the methods the API actually serves.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}
