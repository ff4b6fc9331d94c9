//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`, so `?` works across crate boundaries.

use thiserror::Error;

/// Errors produced by `sp-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A caller-supplied point is missing a field, non-numeric, non-finite or
    /// outside the projectable range.  Fatal: never retried.
    #[error("invalid point format: {0}")]
    InvalidPointFormat(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `sp-core`.
pub type CoreResult<T> = Result<T, CoreError>;
