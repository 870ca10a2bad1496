//! Error types for hub API fetches.

use thiserror::Error;

/// Result type alias for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors that can occur while fetching from the hub API.
///
/// A non-2xx response is not an error; its body is returned as-is.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),

    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error("transport error: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),
}
