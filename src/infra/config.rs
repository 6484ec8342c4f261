//! Centralized configuration (environment variables + defaults).
//!
//! An empty variable counts as unset.

use anyhow::Context;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_PATH: &str = "./books.db";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_LOG_FILTER: &str = "info,book_tracker=debug";

/// Loads `.env` from the working directory if present.
pub fn load_dotenv() {
    dotenv::dotenv().ok();
}

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Listen port (`PORT`).
pub fn port() -> anyhow::Result<u16> {
    match var("PORT") {
        Some(v) => v
            .trim()
            .parse::<u16>()
            .with_context(|| format!("PORT must be a valid port number, got {v:?}")),
        None => Ok(DEFAULT_PORT),
    }
}

/// SQLite database file (`DB_PATH`). `:memory:` keeps everything in process.
pub fn db_path() -> String {
    var("DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
}

/// Pool size (`DB_MAX_CONNECTIONS`), at least 1.
pub fn db_max_connections() -> anyhow::Result<u32> {
    match var("DB_MAX_CONNECTIONS") {
        Some(v) => Ok(v
            .trim()
            .parse::<u32>()
            .with_context(|| format!("DB_MAX_CONNECTIONS must be a positive integer, got {v:?}"))?
            .max(1)),
        None => Ok(DEFAULT_DB_MAX_CONNECTIONS),
    }
}

/// Tracing filter directives (`RUST_LOG`).
pub fn log_filter() -> String {
    var("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}
