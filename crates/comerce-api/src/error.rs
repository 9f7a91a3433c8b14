//! API error types.

use comerce_domain::{CommerceError, ErrorKind};
use http::StatusCode;
use thiserror::Error;

/// Errors that end a request before or instead of a report.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or unacceptable caller identity.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No handler for the method and path.
    #[error("Route not found: {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// Body could not be decoded.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The operation itself failed.
    #[error(transparent)]
    Commerce(#[from] CommerceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(_) => StatusCode::NOT_ACCEPTABLE,
            ApiError::Commerce(e) => status_for(e.kind()),
        }
    }

    /// Text shown to the caller. Unexpected failures are not echoed back.
    pub fn public_message(&self) -> String {
        if self.status().is_server_error() {
            "Something went wrong. Please try again later.".to_string()
        } else {
            self.to_string()
        }
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Invalid => StatusCode::NOT_ACCEPTABLE,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Server => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
