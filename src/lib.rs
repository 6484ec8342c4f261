pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::BookService;
pub use domain::{Book, BookError, BookFilter, BookResult, BookStatistics, ReadingStatus};
pub use storage::{BookStore, InMemoryBookStore, SqliteBookStore};
