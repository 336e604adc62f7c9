//! Error types for quoting and payment pagination
//!
//! Each concern owns one error enum. Every enum can be classified into an
//! [`ErrorKind`] so outer layers can pick a status code without matching on
//! individual variants.
//!
//! # Error Categories
//!
//! - **Input errors**: malformed or mismatched amounts, invalid pagination
//! - **Not-found errors**: unknown payment pointer, receiver or cursor
//! - **Internal errors**: store, rate step and timeout failures

use thiserror::Error;
use uuid::Uuid;

/// Coarse classification of a failure, as seen by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied bad input (400)
    Input,
    /// A referenced resource does not exist (404)
    NotFound,
    /// A dependent system failed (500)
    Internal,
}

impl ErrorKind {
    /// HTTP-equivalent status code for this kind
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Input => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
        }
    }
}

/// Failures of the payment record store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not serve the request
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Description of the failure
        message: String,
    },

    /// A row with the same id already exists
    #[error("duplicate id {id}")]
    DuplicateId {
        /// Conflicting id
        id: Uuid,
    },
}

impl StoreError {
    /// Create an Unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            message: message.into(),
        }
    }
}

/// Failures of the rate/probe step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// No exchange rate is known between the two assets
    #[error("no rate from {from} to {to}")]
    UnsupportedPair {
        /// Source asset code
        from: String,
        /// Target asset code
        to: String,
    },

    /// The converted value does not fit the amount type
    #[error("conversion of {value} {from} to {to} overflowed")]
    Overflow {
        /// Input value
        value: u128,
        /// Source asset code
        from: String,
        /// Target asset code
        to: String,
    },

    /// The rate step did not answer in time
    #[error("rate probe timed out after {after_ms}ms")]
    Timeout {
        /// Configured timeout in milliseconds
        after_ms: u128,
    },

    /// The rate backend failed
    #[error("rate probe unavailable: {message}")]
    Unavailable {
        /// Description of the failure
        message: String,
    },
}

/// Failures of quote creation
///
/// `Rate`, `Store` and `Internal` never leave `QuoteService::create`: they are
/// logged and replaced with [`QuoteError::QuoteCreationFailed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// Amount asset code or scale does not match the expected asset
    #[error("invalid amount")]
    InvalidAmount {
        /// Expected asset, as `CODE/scale`
        expected: String,
        /// Supplied asset, as `CODE/scale`
        actual: String,
    },

    /// Supplied or derived amount is zero
    #[error("non-positive amount")]
    NonPositiveAmount,

    /// Request shape is invalid (e.g. both debit and receive amount supplied)
    #[error("malformed quote request: {message}")]
    MalformedRequest {
        /// What was wrong with the request
        message: String,
    },

    /// Receiver cannot be quoted against (expired, no amount to pay, ...)
    #[error("invalid receiver")]
    InvalidReceiver {
        /// Why the receiver was rejected
        reason: String,
    },

    /// Payment pointer id does not resolve
    #[error("unknown payment pointer")]
    UnknownPaymentPointer {
        /// The unresolved id
        id: Uuid,
    },

    /// Receiver reference does not resolve
    #[error("unknown receiver")]
    UnknownReceiver {
        /// The unresolved receiver URL
        receiver: String,
    },

    /// Rate step failure
    #[error("rate step failed: {0}")]
    Rate(#[from] RateError),

    /// Store failure
    #[error("store failed: {0}")]
    Store(#[from] StoreError),

    /// Any other unexpected failure
    #[error("internal error: {message}")]
    Internal {
        /// Description of the failure
        message: String,
    },

    /// Generic failure surfaced to callers in place of an internal error
    #[error("Error trying to create quote")]
    QuoteCreationFailed,
}

impl QuoteError {
    /// Create an InvalidAmount error from expected/actual asset labels
    pub fn invalid_amount(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        QuoteError::InvalidAmount {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a MalformedRequest error
    pub fn malformed(message: impl Into<String>) -> Self {
        QuoteError::MalformedRequest {
            message: message.into(),
        }
    }

    /// Create an InvalidReceiver error
    pub fn invalid_receiver(reason: impl Into<String>) -> Self {
        QuoteError::InvalidReceiver {
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        QuoteError::Internal {
            message: message.into(),
        }
    }

    /// Classify the error for the caller
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuoteError::InvalidAmount { .. }
            | QuoteError::NonPositiveAmount
            | QuoteError::MalformedRequest { .. }
            | QuoteError::InvalidReceiver { .. } => ErrorKind::Input,
            QuoteError::UnknownPaymentPointer { .. } | QuoteError::UnknownReceiver { .. } => {
                ErrorKind::NotFound
            }
            QuoteError::Rate(_)
            | QuoteError::Store(_)
            | QuoteError::Internal { .. }
            | QuoteError::QuoteCreationFailed => ErrorKind::Internal,
        }
    }

    /// HTTP-equivalent status code
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }
}

/// Failures of combined payment pagination
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// Pagination arguments are contradictory or out of range
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// What was wrong with the arguments
        message: String,
    },

    /// Cursor id does not refer to any payment
    #[error("unknown cursor {id}")]
    UnknownCursor {
        /// The unresolved cursor id
        id: Uuid,
    },

    /// Store failure
    #[error("store failed: {0}")]
    Store(#[from] StoreError),
}

impl PageError {
    /// Create an InvalidPagination error
    pub fn invalid(message: impl Into<String>) -> Self {
        PageError::InvalidPagination {
            message: message.into(),
        }
    }

    /// Classify the error for the caller
    pub fn kind(&self) -> ErrorKind {
        match self {
            PageError::InvalidPagination { .. } | PageError::UnknownCursor { .. } => {
                ErrorKind::Input
            }
            PageError::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Failures while loading fixture files
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FixtureError {
    /// File could not be opened or read
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// A row could not be parsed
    #[error("CSV parse error in {file}{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Fixture file name
        file: String,
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A row parsed but holds inconsistent data
    #[error("invalid fixture data in {file}: {message}")]
    Invalid {
        /// Fixture file name
        file: String,
        /// Description of the inconsistency
        message: String,
    },
}

impl From<std::io::Error> for FixtureError {
    fn from(error: std::io::Error) -> Self {
        FixtureError::Io {
            message: error.to_string(),
        }
    }
}

impl FixtureError {
    /// Create a Parse error
    pub fn parse(file: &str, line: Option<u64>, message: impl Into<String>) -> Self {
        FixtureError::Parse {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }

    /// Create an Invalid error
    pub fn invalid(file: &str, message: impl Into<String>) -> Self {
        FixtureError::Invalid {
            file: file.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_amount(QuoteError::invalid_amount("USD/2", "USD/3"), "invalid amount")]
    #[case::creation_failed(QuoteError::QuoteCreationFailed, "Error trying to create quote")]
    #[case::non_positive(QuoteError::NonPositiveAmount, "non-positive amount")]
    #[case::malformed(
        QuoteError::malformed("both amounts"),
        "malformed quote request: both amounts"
    )]
    #[case::rate(
        QuoteError::Rate(RateError::Timeout { after_ms: 50 }),
        "rate step failed: rate probe timed out after 50ms"
    )]
    fn test_quote_error_display(#[case] error: QuoteError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::invalid_amount(QuoteError::invalid_amount("a", "b"), 400)]
    #[case::malformed(QuoteError::malformed("x"), 400)]
    #[case::invalid_receiver(QuoteError::invalid_receiver("expired"), 400)]
    #[case::unknown_pointer(QuoteError::UnknownPaymentPointer { id: Uuid::nil() }, 404)]
    #[case::unknown_receiver(QuoteError::UnknownReceiver { receiver: "r".into() }, 404)]
    #[case::store(QuoteError::Store(StoreError::unavailable("down")), 500)]
    #[case::creation_failed(QuoteError::QuoteCreationFailed, 500)]
    fn test_quote_error_status(#[case] error: QuoteError, #[case] status: u16) {
        assert_eq!(error.status_code(), status);
    }

    #[test]
    fn test_page_error_kind() {
        assert_eq!(PageError::invalid("x").kind(), ErrorKind::Input);
        assert_eq!(
            PageError::UnknownCursor { id: Uuid::nil() }.kind(),
            ErrorKind::Input
        );
        assert_eq!(
            PageError::from(StoreError::unavailable("down")).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_fixture_parse_error_display() {
        let error = FixtureError::parse("rates.csv", Some(3), "bad rate");
        assert_eq!(error.to_string(), "CSV parse error in rates.csv at line 3: bad rate");
        let error = FixtureError::parse("rates.csv", None, "bad rate");
        assert_eq!(error.to_string(), "CSV parse error in rates.csv: bad rate");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: FixtureError = io_error.into();
        assert_eq!(error.to_string(), "I/O error: missing");
    }
}
