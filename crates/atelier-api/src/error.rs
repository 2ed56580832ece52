//! API error types.

use atelier_common_http::HttpError;
use thiserror::Error;

/// Errors from backend API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport, status or decoding failure.
    #[error("backend request failed: {0}")]
    Http(#[from] HttpError),

    /// The backend answered with a shape the client cannot use.
    #[error("unusable backend response: {0}")]
    InvalidResponse(String),
}
