//! Error taxonomy shared by the store, the lifecycle engine and the HTTP surface.

/// Every failure the book service can report.
///
/// The HTTP layer maps each variant onto a status class; see
/// `transport::http::handlers::common::status_for`.
#[derive(Debug, thiserror::Error)]
pub enum BookError {
    /// The request payload could not be decoded at all.
    #[error("malformed request: {0}")]
    BadRequest(String),

    /// A required field is missing or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request is well-formed but violates a business rule
    /// (future purchase date, rating out of range, illegal transition).
    #[error("{0}")]
    BusinessRule(String),

    /// The identifier itself is unusable (non-numeric or not positive).
    #[error("invalid book id: {0}")]
    InvalidArgument(String),

    #[error("book with id {id} not found")]
    NotFound { id: i64 },

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Convenience type alias.
pub type BookResult<T> = Result<T, BookError>;
