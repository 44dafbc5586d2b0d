//! Compute provider error types

use thiserror::Error;

/// Errors surfaced by compute operations.
///
/// Every remote failure collapses into [`CloudError::Api`] carrying the
/// provider's own message; this tool does no further classification and
/// never retries.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("provider API error: {0}")]
    Api(String),

    #[error("provider response missing {0}")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, CloudError>;
