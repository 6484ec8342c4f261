//! Persistence for `Book` records.
//!
//! `BookStore` is the seam between the lifecycle engine and the storage engine. Both
//! implementations evaluate `BookFilter::predicates` for `list` and `count` alike.

use crate::domain::{Book, BookChanges, BookFilter, BookResult, NewBook};
use async_trait::async_trait;

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryBookStore;
pub use sqlite::SqliteBookStore;

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Persists a validated book with status `not_started` and fresh timestamps.
    async fn create(&self, book: NewBook) -> BookResult<Book>;

    /// Fails with `BookError::NotFound` when no record has `id`.
    async fn get_by_id(&self, id: i64) -> BookResult<Book>;

    /// Newest first (ties in ascending id order). `limit == 0` means unbounded.
    async fn list(&self, filter: &BookFilter, limit: i64, offset: i64) -> BookResult<Vec<Book>>;

    /// Writes the present fields and refreshes `updated_at`. An empty change set is a
    /// plain read.
    async fn update(&self, id: i64, changes: &BookChanges) -> BookResult<Book>;

    async fn delete(&self, id: i64) -> BookResult<()>;

    async fn count(&self, filter: &BookFilter) -> BookResult<i64>;
}
