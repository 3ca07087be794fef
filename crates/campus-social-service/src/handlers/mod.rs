//! API handlers.

use std::str::FromStr;

use crate::error::ApiError;

pub mod accounts;
pub mod conversations;
pub mod follows;
pub mod health;
pub mod notifications;

/// Page size when the caller gives none.
pub(crate) const DEFAULT_PAGE_SIZE: usize = 50;

/// Largest page a caller may request.
pub(crate) const MAX_PAGE_SIZE: usize = 200;

pub(crate) fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Parse an identifier taken from the URL path.
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError>
where
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid {what} id {raw:?}: {e}")))
}
