//! Errors raised by durable store adapters.

/// Failure of a durable store operation.
///
/// "No match" is never an error: lookups return `Ok(None)` / `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or rejected the query.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The insert lost a race: another writer stored the same code first.
    #[error("short code already taken: {code}")]
    CodeCollision { code: String },

    /// Some other unique constraint rejected the write.
    #[error("unique constraint violation: {constraint:?}")]
    Duplicate { constraint: Option<String> },
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return StoreError::Duplicate {
                    constraint: db.constraint().map(str::to_owned),
                };
            }
        }

        StoreError::Unavailable(e.to_string())
    }
}
