//! Book domain: the entity, its lifecycle rules and the statistics it feeds.

pub mod book;
pub mod error;
pub mod statistics;

pub use book::{Book, BookChanges, BookFilter, NewBook, ReadingStatus};
pub use error::{BookError, BookResult};
pub use statistics::BookStatistics;
