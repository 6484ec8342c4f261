//! The book lifecycle engine.
//!
//! Sits between the HTTP surface and a `BookStore`: validates requests, enforces the
//! reading-status rules in `domain::book::lifecycle` and computes statistics.

use crate::domain::book::{lifecycle, BookPage, CreateBookRequest, Pagination, UpdateBookRequest};
use crate::domain::statistics::{self, BookStatistics};
use crate::domain::{Book, BookFilter, BookResult};
use crate::storage::BookStore;
use chrono::{Local, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct BookService {
    store: Arc<dyn BookStore>,
    /// Held across every read-check-write sequence so two mutations of the same record
    /// cannot interleave between the guard check and the write.
    write_lock: Mutex<()>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn BookStore> {
        &self.store
    }

    pub async fn create_book(&self, req: CreateBookRequest) -> BookResult<Book> {
        let new_book = lifecycle::validate_create(req, Utc::now())?;
        let book = self.store.create(new_book).await?;
        tracing::info!(id = book.id, title = %book.title, "book created");
        Ok(book)
    }

    pub async fn get_book(&self, id: i64) -> BookResult<Book> {
        lifecycle::validate_id(id)?;
        self.store.get_by_id(id).await
    }

    /// One page of books matching `filter`, plus the total match count.
    pub async fn list_books(
        &self,
        filter: &BookFilter,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> BookResult<BookPage> {
        let pagination = Pagination::normalize(page, limit);
        let books = self
            .store
            .list(filter, pagination.limit, pagination.offset())
            .await?;
        let total = self.store.count(filter).await?;
        Ok(BookPage::new(books, total, pagination))
    }

    pub async fn update_book(&self, id: i64, req: UpdateBookRequest) -> BookResult<Book> {
        lifecycle::validate_id(id)?;
        lifecycle::validate_update(&req)?;

        let _guard = self.write_lock.lock().await;
        let current = self.store.get_by_id(id).await?;
        let changes = lifecycle::update_changes(&current, req, Utc::now());
        let book = self.store.update(id, &changes).await?;
        if current.status != book.status {
            tracing::info!(id, from = %current.status, to = %book.status, "status changed by update");
        }
        Ok(book)
    }

    pub async fn delete_book(&self, id: i64) -> BookResult<()> {
        lifecycle::validate_id(id)?;
        let _guard = self.write_lock.lock().await;
        self.store.delete(id).await?;
        tracing::info!(id, "book deleted");
        Ok(())
    }

    pub async fn start_reading(&self, id: i64) -> BookResult<Book> {
        lifecycle::validate_id(id)?;
        let _guard = self.write_lock.lock().await;
        let current = self.store.get_by_id(id).await?;
        let changes = lifecycle::start_reading(&current, Utc::now())?;
        let book = self.store.update(id, &changes).await?;
        tracing::info!(id, from = %current.status, "started reading");
        Ok(book)
    }

    pub async fn finish_reading(&self, id: i64, rating: Option<i32>) -> BookResult<Book> {
        lifecycle::validate_id(id)?;
        let _guard = self.write_lock.lock().await;
        let current = self.store.get_by_id(id).await?;
        let changes = lifecycle::finish_reading(&current, rating, Utc::now())?;
        let book = self.store.update(id, &changes).await?;
        tracing::info!(id, rating = ?book.rating, "finished reading");
        Ok(book)
    }

    /// Every figure comes from one listing, so the per-status counts always add up to
    /// `total_books`.
    pub async fn statistics(&self) -> BookResult<BookStatistics> {
        let books = self.store.list(&BookFilter::default(), 0, 0).await?;
        Ok(statistics::summarize(&books, statistics::month_start(&Local::now())))
    }
}
