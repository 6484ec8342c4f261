use crate::app::BookService;
use crate::domain::{BookError, BookFilter, ReadingStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// Every route lives under this prefix.
pub const API_PREFIX: &str = "/api/v1";

pub const SERVICE_NAME: &str = "book-tracker";

#[derive(Clone)]
pub struct AppState {
    pub book_service: Arc<BookService>,
}

impl AppState {
    pub fn new(book_service: BookService) -> Self {
        Self {
            book_service: Arc::new(book_service),
        }
    }
}

/// Success envelope.
#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
}

/// Error envelope.
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    /// What the request was trying to do, e.g. "failed to create book".
    pub error: String,
    /// The underlying cause.
    pub message: String,
}

/// Query string of `GET /books`.
///
/// Kept as raw strings so that a sloppy `page` or `rating` is ignored instead of
/// rejecting the whole request.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBooksQuery {
    /// 1-based page number (default 1).
    pub page: Option<String>,
    /// Page size, 1 to 100 (default 20).
    pub limit: Option<String>,
    /// not_started | reading | completed | dropped
    pub status: Option<String>,
    /// Exact author match.
    pub author: Option<String>,
    /// Exact publisher match.
    pub publisher: Option<String>,
    /// Substring of the tags.
    pub tag: Option<String>,
    /// Exact rating, 1 to 5.
    pub rating: Option<String>,
    /// Substring of the title or author.
    pub search: Option<String>,
}

/// A decoded listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub filter: BookFilter,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

impl ListBooksQuery {
    /// Only an unknown `status` is an error; other malformed values are dropped.
    pub fn into_request(self) -> Result<ListRequest, BookError> {
        let status = match non_empty(self.status) {
            Some(s) => Some(
                s.parse::<ReadingStatus>()
                    .map_err(|e| BookError::BadRequest(e.to_string()))?,
            ),
            None => None,
        };
        let rating = non_empty(self.rating)
            .and_then(|r| r.trim().parse::<i32>().ok())
            .filter(|r| (1..=5).contains(r));

        Ok(ListRequest {
            filter: BookFilter {
                status,
                author: non_empty(self.author),
                publisher: non_empty(self.publisher),
                tag: non_empty(self.tag),
                rating,
                search: non_empty(self.search),
            },
            page: non_empty(self.page).and_then(|p| p.trim().parse().ok()),
            limit: non_empty(self.limit).and_then(|l| l.trim().parse().ok()),
        })
    }
}

/// Body of `POST /books/{id}/finish-reading`. The body itself may be omitted.
#[derive(Deserialize, Serialize, Debug, Default, ToSchema)]
pub struct FinishReadingRequest {
    #[serde(default)]
    pub rating: Option<i32>,
}
