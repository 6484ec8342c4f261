//! The `Book` entity and the request shapes that create or mutate it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

pub mod lifecycle;
pub mod query;

pub use query::{BookFilter, BookPage, Pagination, Predicate};

/// Reading progress of a single book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    NotStarted,
    Reading,
    Completed,
    Dropped,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 4] = [
        ReadingStatus::NotStarted,
        ReadingStatus::Reading,
        ReadingStatus::Completed,
        ReadingStatus::Dropped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::NotStarted => "not_started",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Completed => "completed",
            ReadingStatus::Dropped => "dropped",
        }
    }
}

impl Default for ReadingStatus {
    fn default() -> Self {
        ReadingStatus::NotStarted
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reading status: {0:?} (expected not_started, reading, completed or dropped)")]
pub struct ParseStatusError(pub String);

impl FromStr for ReadingStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReadingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// A purchased book and its reading progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: String,
    pub published_date: Option<DateTime<Utc>>,
    pub purchase_date: DateTime<Utc>,
    /// Whole yen.
    pub purchase_price: i64,
    pub status: ReadingStatus,
    pub start_read_date: Option<DateTime<Utc>>,
    pub end_read_date: Option<DateTime<Utc>>,
    /// 1 to 5 when present.
    pub rating: Option<i32>,
    pub notes: String,
    /// Comma-separated, free form.
    pub tags: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /books`.
///
/// `title`, `author` and `purchase_date` are required; they are still modelled as
/// defaults/options here so that a missing field surfaces as a validation error rather
/// than a decode error. An explicit `null` counts as absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateBookRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub isbn: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub publisher: String,
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub purchase_price: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
}

/// Body of `PUT /books/{id}`. Every absent field is left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UpdateBookRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub purchase_price: Option<i64>,
    #[serde(default)]
    pub status: Option<ReadingStatus>,
    #[serde(default)]
    pub start_read_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_read_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

/// Validated fields for a new record. Produced by `lifecycle::validate_create`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: String,
    pub published_date: Option<DateTime<Utc>>,
    pub purchase_date: DateTime<Utc>,
    pub purchase_price: i64,
    pub tags: String,
    pub notes: String,
}

/// A partial write handed to the store.
///
/// `None` leaves the column untouched. The read dates are nullable columns, so they get
/// a second level: `Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub purchase_price: Option<i64>,
    pub status: Option<ReadingStatus>,
    pub start_read_date: Option<Option<DateTime<Utc>>>,
    pub end_read_date: Option<Option<DateTime<Utc>>>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
    pub tags: Option<String>,
}

impl BookChanges {
    pub fn is_empty(&self) -> bool {
        *self == BookChanges::default()
    }

    /// Applies the present fields to `book`. Does not touch `updated_at`.
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(v) = &self.title {
            book.title = v.clone();
        }
        if let Some(v) = &self.author {
            book.author = v.clone();
        }
        if let Some(v) = &self.isbn {
            book.isbn = v.clone();
        }
        if let Some(v) = &self.publisher {
            book.publisher = v.clone();
        }
        if let Some(v) = self.published_date {
            book.published_date = Some(v);
        }
        if let Some(v) = self.purchase_price {
            book.purchase_price = v;
        }
        if let Some(v) = self.status {
            book.status = v;
        }
        if let Some(v) = self.start_read_date {
            book.start_read_date = v;
        }
        if let Some(v) = self.end_read_date {
            book.end_read_date = v;
        }
        if let Some(v) = self.rating {
            book.rating = Some(v);
        }
        if let Some(v) = &self.notes {
            book.notes = v.clone();
        }
        if let Some(v) = &self.tags {
            book.tags = v.clone();
        }
    }
}
