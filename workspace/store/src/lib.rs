//! Domain and query layer for the publishing service.
//!
//! Every operation here takes a SeaORM connection and returns a typed result;
//! the HTTP layer above maps [`StoreError`] variants onto status codes and
//! never touches the database directly.

pub mod articles;
pub mod comments;
pub mod feed;
pub mod password;
pub mod profiles;
pub mod slug;
pub mod tags;
pub mod token;
pub mod users;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

use sea_orm::DbErr;

/// Default page size for article and feed listings.
pub const DEFAULT_PAGE_LIMIT: u64 = 20;

/// Errors produced by store operations.
///
/// The variants form the failure taxonomy of the whole service: the HTTP
/// layer maps them one-to-one onto status codes (422, 401, 403, 404, 409, 500).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Input failed domain validation (malformed email, empty title, ...).
    #[error("{0}")]
    Validation(String),
    /// Missing, invalid, or expired credentials.
    #[error("{0}")]
    Authentication(String),
    /// The caller is authenticated but does not own the resource.
    #[error("{0}")]
    Authorization(String),
    /// The named resource does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// A uniqueness race was lost after validation passed.
    #[error("{0}")]
    Conflict(String),
    /// An internal failure unrelated to the database (e.g. token signing).
    #[error("{0}")]
    Internal(String),
    /// The database rejected the operation.
    #[error(transparent)]
    Database(#[from] DbErr),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Whether a database error is a unique-constraint violation.
///
/// SeaORM does not expose a portable error code for this, so we sniff the
/// driver message the same way across SQLite and Postgres.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    let message = err.to_string().to_lowercase();
    message.contains("unique") || message.contains("duplicate")
}

/// A clamped limit/offset pair for paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    /// Build a page from raw query parameters.
    ///
    /// Negative values clamp to zero; a missing limit falls back to
    /// [`DEFAULT_PAGE_LIMIT`]. An explicit limit of zero is honored and
    /// yields an empty page alongside the total count.
    pub fn clamped(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT as i64).max(0) as u64,
            offset: offset.unwrap_or(0).max(0) as u64,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::clamped(None, None)
    }
}
