use thiserror::Error;

/// Errors raised by the in-memory stores.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RepositoryError {
    /// Entity not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Key already taken (short code or email)
    #[error("Conflict error: {0}")]
    Conflict(String),
}
