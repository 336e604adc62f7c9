//! Transport-neutral request handlers
//!
//! Handlers take already-authenticated inputs (the payment pointer a request
//! is scoped to, the raw body) and return wire-shaped responses or an
//! [`ApiError`] carrying the status code to send.

pub mod quote;

pub use quote::{CreateQuoteBody, QuoteResponse, QuoteRoutes};

use crate::types::{ErrorKind, PageError, QuoteError};
use thiserror::Error;
use tracing::error;

/// Error response: status code plus the message shown to the caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    pub fn not_found() -> Self {
        Self::new(404, "Not Found")
    }

    pub fn internal() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        match (&err, err.kind()) {
            (QuoteError::QuoteCreationFailed, _) => ApiError::new(500, err.to_string()),
            (_, ErrorKind::Internal) => {
                error!(error = %err, "Quote request failed");
                ApiError::internal()
            }
            (_, kind) => ApiError::new(kind.status_code(), err.to_string()),
        }
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        match err.kind() {
            ErrorKind::Internal => {
                error!(error = %err, "Payment page request failed");
                ApiError::internal()
            }
            kind => ApiError::new(kind.status_code(), err.to_string()),
        }
    }
}
