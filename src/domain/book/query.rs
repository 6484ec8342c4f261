//! Listing filters and pagination.
//!
//! A `BookFilter` is lowered into a flat list of `Predicate`s. Every store evaluates that
//! same list for both listing and counting, so a count always agrees with an unbounded
//! listing under the same filter.

use super::{Book, ReadingStatus};
use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Optional, AND-combined constraints over book attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub status: Option<ReadingStatus>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub tag: Option<String>,
    pub rating: Option<i32>,
    /// Substring of the title or of the author.
    pub search: Option<String>,
}

/// One filter clause.
///
/// Substring clauses compare ASCII-case-insensitively; exact clauses are case-sensitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    StatusIs(ReadingStatus),
    AuthorIs(String),
    PublisherIs(String),
    RatingIs(i32),
    TagsContain(String),
    TitleOrAuthorContains(String),
}

impl BookFilter {
    pub fn by_status(status: ReadingStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(status) = self.status {
            out.push(Predicate::StatusIs(status));
        }
        if let Some(author) = &self.author {
            out.push(Predicate::AuthorIs(author.clone()));
        }
        if let Some(publisher) = &self.publisher {
            out.push(Predicate::PublisherIs(publisher.clone()));
        }
        if let Some(rating) = self.rating {
            out.push(Predicate::RatingIs(rating));
        }
        if let Some(tag) = &self.tag {
            out.push(Predicate::TagsContain(tag.to_ascii_lowercase()));
        }
        if let Some(search) = &self.search {
            out.push(Predicate::TitleOrAuthorContains(search.to_ascii_lowercase()));
        }
        out
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.predicates().iter().all(|p| p.matches(book))
    }
}

impl Predicate {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            Predicate::StatusIs(status) => book.status == *status,
            Predicate::AuthorIs(author) => book.author == *author,
            Predicate::PublisherIs(publisher) => book.publisher == *publisher,
            Predicate::RatingIs(rating) => book.rating == Some(*rating),
            Predicate::TagsContain(needle) => contains_folded(&book.tags, needle),
            Predicate::TitleOrAuthorContains(needle) => {
                contains_folded(&book.title, needle) || contains_folded(&book.author, needle)
            }
        }
    }
}

// `needle` is already folded. Mirrors SQLite's ASCII-only lower().
fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(needle)
}

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Page below 1 becomes 1; limit outside `1..=100` (or unset) becomes 20.
    pub fn normalize(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = limit
            .filter(|l| (1..=MAX_PAGE_SIZE).contains(l))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// One page of a listing plus the unpaginated total.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl BookPage {
    pub fn new(books: Vec<Book>, total: i64, pagination: Pagination) -> Self {
        let total_pages = (total + pagination.limit - 1) / pagination.limit;
        Self {
            books,
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages,
        }
    }
}
