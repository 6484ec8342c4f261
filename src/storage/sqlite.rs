//! SQLite-backed book store.

use crate::domain::book::Predicate;
use crate::domain::{Book, BookChanges, BookError, BookFilter, BookResult, NewBook, ReadingStatus};
use crate::storage::BookStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use std::str::FromStr;

const MEMORY_PATH: &str = ":memory:";

const SELECT_BOOK: &str = "SELECT id, title, author, isbn, publisher, published_date, purchase_date, \
     purchase_price, status, start_read_date, end_read_date, rating, notes, tags, created_at, updated_at \
     FROM books";

/// Column-for-column image of a `books` row.
#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author: String,
    isbn: String,
    publisher: String,
    published_date: Option<DateTime<Utc>>,
    purchase_date: DateTime<Utc>,
    purchase_price: i64,
    status: String,
    start_read_date: Option<DateTime<Utc>>,
    end_read_date: Option<DateTime<Utc>>,
    rating: Option<i32>,
    notes: String,
    tags: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookRow> for Book {
    type Error = BookError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let status = ReadingStatus::from_str(&row.status)
            .map_err(|e| BookError::Storage(sqlx::Error::Decode(Box::new(e))))?;
        Ok(Book {
            id: row.id,
            title: row.title,
            author: row.author,
            isbn: row.isbn,
            publisher: row.publisher,
            published_date: row.published_date,
            purchase_date: row.purchase_date,
            purchase_price: row.purchase_price,
            status,
            start_read_date: row.start_read_date,
            end_read_date: row.end_read_date,
            rating: row.rating,
            notes: row.notes,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// `BookStore` over an SQLite database file (or `:memory:`).
#[derive(Clone)]
pub struct SqliteBookStore {
    pool: SqlitePool,
}

impl SqliteBookStore {
    /// Opens (creating if missing) the database at `path` and applies the schema.
    ///
    /// An in-memory database lives inside a single connection, so the pool is pinned to
    /// one connection that is never recycled.
    pub async fn connect(path: &str, max_connections: u32) -> BookResult<Self> {
        let pool = if path == MEMORY_PATH {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
                .await?
        } else {
            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .foreign_keys(true);
            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .connect_with(options)
                .await?
        };
        tracing::debug!(path, "opened sqlite pool");
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, running pending migrations first.
    pub async fn from_pool(pool: SqlitePool) -> BookResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Appends the `WHERE` clause for `filter`. Shared by `list` and `count`.
fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &BookFilter) {
    for (i, predicate) in filter.predicates().into_iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        match predicate {
            Predicate::StatusIs(status) => {
                qb.push("status = ").push_bind(status.as_str());
            }
            Predicate::AuthorIs(author) => {
                qb.push("author = ").push_bind(author);
            }
            Predicate::PublisherIs(publisher) => {
                qb.push("publisher = ").push_bind(publisher);
            }
            Predicate::RatingIs(rating) => {
                qb.push("rating = ").push_bind(rating);
            }
            // instr() instead of LIKE: no wildcard escaping, same semantics as the
            // in-memory matcher.
            Predicate::TagsContain(needle) => {
                qb.push("instr(lower(tags), ").push_bind(needle).push(") > 0");
            }
            Predicate::TitleOrAuthorContains(needle) => {
                qb.push("(instr(lower(title), ")
                    .push_bind(needle.clone())
                    .push(") > 0 OR instr(lower(author), ")
                    .push_bind(needle)
                    .push(") > 0)");
            }
        }
    }
}

#[async_trait]
impl BookStore for SqliteBookStore {
    async fn create(&self, book: NewBook) -> BookResult<Book> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO books (title, author, isbn, publisher, published_date, purchase_date, \
             purchase_price, status, tags, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.publisher)
        .bind(book.published_date)
        .bind(book.purchase_date)
        .bind(book.purchase_price)
        .bind(ReadingStatus::NotStarted.as_str())
        .bind(&book.tags)
        .bind(&book.notes)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, title = %book.title, "inserted book");
        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: i64) -> BookResult<Book> {
        let row: Option<BookRow> = sqlx::query_as(&format!("{SELECT_BOOK} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(BookError::NotFound { id })?.try_into()
    }

    async fn list(&self, filter: &BookFilter, limit: i64, offset: i64) -> BookResult<Vec<Book>> {
        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_BOOK);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id ASC");
        if limit > 0 {
            qb.push(" LIMIT ").push_bind(limit);
            qb.push(" OFFSET ").push_bind(offset.max(0));
        }

        let rows: Vec<BookRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Book::try_from).collect()
    }

    async fn update(&self, id: i64, changes: &BookChanges) -> BookResult<Book> {
        if changes.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE books SET ");
        let mut set = qb.separated(", ");
        if let Some(v) = &changes.title {
            set.push("title = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &changes.author {
            set.push("author = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &changes.isbn {
            set.push("isbn = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &changes.publisher {
            set.push("publisher = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = changes.published_date {
            set.push("published_date = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.purchase_price {
            set.push("purchase_price = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.status {
            set.push("status = ").push_bind_unseparated(v.as_str());
        }
        if let Some(v) = changes.start_read_date {
            set.push("start_read_date = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.end_read_date {
            set.push("end_read_date = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.rating {
            set.push("rating = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.notes {
            set.push("notes = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &changes.tags {
            set.push("tags = ").push_bind_unseparated(v.clone());
        }
        set.push("updated_at = ").push_bind_unseparated(Utc::now());
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(BookError::NotFound { id });
        }
        tracing::debug!(id, "updated book");
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> BookResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BookError::NotFound { id });
        }
        tracing::debug!(id, "deleted book");
        Ok(())
    }

    async fn count(&self, filter: &BookFilter) -> BookResult<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM books");
        push_filter(&mut qb, filter);
        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }
}
