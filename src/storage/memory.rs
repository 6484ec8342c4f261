//! Process-local store backed by an ordered map.

use crate::domain::{Book, BookChanges, BookError, BookFilter, BookResult, NewBook, ReadingStatus};
use crate::storage::BookStore;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    last_id: i64,
    books: BTreeMap<i64, Book>,
}

/// Keeps every book in memory. Ids are never reused, matching SQLite `AUTOINCREMENT`.
#[derive(Default)]
pub struct InMemoryBookStore {
    inner: RwLock<Inner>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn create(&self, book: NewBook) -> BookResult<Book> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let now = Utc::now();
        let stored = Book {
            id: inner.last_id,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            publisher: book.publisher,
            published_date: book.published_date,
            purchase_date: book.purchase_date,
            purchase_price: book.purchase_price,
            status: ReadingStatus::NotStarted,
            start_read_date: None,
            end_read_date: None,
            rating: None,
            notes: book.notes,
            tags: book.tags,
            created_at: now,
            updated_at: now,
        };
        inner.books.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: i64) -> BookResult<Book> {
        let inner = self.inner.read().await;
        inner
            .books
            .get(&id)
            .cloned()
            .ok_or(BookError::NotFound { id })
    }

    async fn list(&self, filter: &BookFilter, limit: i64, offset: i64) -> BookResult<Vec<Book>> {
        let inner = self.inner.read().await;
        let predicates = filter.predicates();
        // Map iteration is ascending id; the stable sort keeps that order among ties.
        let mut books: Vec<Book> = inner
            .books
            .values()
            .filter(|b| predicates.iter().all(|p| p.matches(b)))
            .cloned()
            .collect();
        books.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = usize::try_from(offset).unwrap_or(0);
        let iter = books.into_iter().skip(offset);
        Ok(match usize::try_from(limit) {
            Ok(limit) if limit > 0 => iter.take(limit).collect(),
            _ => iter.collect(),
        })
    }

    async fn update(&self, id: i64, changes: &BookChanges) -> BookResult<Book> {
        let mut inner = self.inner.write().await;
        let book = inner.books.get_mut(&id).ok_or(BookError::NotFound { id })?;
        if !changes.is_empty() {
            changes.apply_to(book);
            book.updated_at = Utc::now();
        }
        Ok(book.clone())
    }

    async fn delete(&self, id: i64) -> BookResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .books
            .remove(&id)
            .map(|_| ())
            .ok_or(BookError::NotFound { id })
    }

    async fn count(&self, filter: &BookFilter) -> BookResult<i64> {
        let inner = self.inner.read().await;
        let predicates = filter.predicates();
        let n = inner
            .books
            .values()
            .filter(|b| predicates.iter().all(|p| p.matches(b)))
            .count();
        Ok(n as i64)
    }
}
