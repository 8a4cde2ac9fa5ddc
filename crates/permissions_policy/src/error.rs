//! Error types for policy parsing and construction.

use thiserror::Error;

/// Errors surfaced by header parsing and policy construction.
///
/// Attribute (`allow`) parsing never fails; malformed directives are dropped.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// The `Permissions-Policy` header is not a valid structured-field
    /// dictionary, or a feature was declared without an allowlist.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// An origin string could not be canonicalized.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type PolicyResult<T> = Result<T, PolicyError>;
