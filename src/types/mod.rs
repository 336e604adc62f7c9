//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `amount`: Amounts, assets and the asset validator
//! - `account`: Payment pointers and receivers
//! - `quote`: Quotes and quote drafts
//! - `payment`: Outgoing/incoming payments and the combined projection
//! - `pagination`: Keyset pagination and filter types
//! - `timestamp`: Wire timestamp format
//! - `error`: Error types

pub mod account;
pub mod amount;
pub mod error;
pub mod pagination;
pub mod payment;
pub mod quote;
pub mod timestamp;

pub use account::{PaymentPointer, Receiver};
pub use amount::{parse_amount_value, validate_amount, Amount, Asset};
pub use error::{ErrorKind, FixtureError, PageError, QuoteError, RateError, StoreError};
pub use pagination::{
    Direction, FilterIn, GetPageOptions, Keyed, PageInfo, PageQuery, PageWindow, Pagination,
    PaymentFilter, SortKey,
};
pub use payment::{
    CombinedPayment, IncomingPayment, IncomingPaymentState, OutgoingPayment,
    OutgoingPaymentState, PaymentType,
};
pub use quote::{CreateQuoteOptions, Quote, QuoteDraft};
