use autoremove_core::error::CoreError;

/// Error type for everything in this crate.
///
/// Store failures surface as [`DbError::Database`] untouched so callers can
/// inspect the underlying `sqlx` error (constraint violations, pool timeouts).
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A domain-level error from `autoremove_core`, e.g. an invalid column name.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias for results in this crate.
pub type DbResult<T> = Result<T, DbError>;
