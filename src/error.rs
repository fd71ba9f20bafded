//! Errors returned by table construction and handle-based access.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The permutation generator needs at least two slots.
    #[error("invalid capacity {capacity}: a table needs at least 2 buckets")]
    InvalidCapacity { capacity: usize },
    #[error("key not found: {key:?}")]
    KeyNotFound { key: String },
    /// The handle's entry was removed, or the table was rehashed since
    /// the handle was issued.
    #[error("stale handle: entry removed or table rehashed")]
    StaleHandle,
}
