//! Rust Open Payments Library
//! # Overview
//!
//! This library implements two backend features of an Open Payments
//! account-servicing entity: quote generation and a unified, cursor-paginated
//! feed over outgoing and incoming payments.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (amounts, quotes, payments, pagination, errors)
//! - [`core`] - Business logic components:
//!   - [`core::quote_builder`] - Debit/receive derivation through the rate step
//!   - [`core::quote_service`] - Transactional quote creation
//!   - [`core::merger`] - Keyset merge of two ordered payment sources
//!   - [`core::combined_payment_service`] - Paginated combined feed
//! - [`store`] - In-memory implementation of the store traits
//! - [`rates`] - Fixed-table rate probe
//! - [`api`] - Transport-neutral quote handlers and wire shapes
//! - [`io`] - Fixture loading and CSV output
//! - [`cli`] / [`command`] - CLI arguments parsing and command runners
//!
//! # Quotes
//!
//! A quote fixes exactly one side of a payment, or neither when the receiver
//! carries its own incoming amount:
//!
//! - **debitAmount**: what the payment pointer sends, in its own asset
//! - **receiveAmount**: what the receiver gets, in the receiver's asset
//!
//! The other side is derived through the rate step. Quotes expire a fixed
//! lifetime after creation.
//!
//! # Combined Payments
//!
//! Outgoing and incoming payments share the `(createdAt, id)` order. Pages
//! over their union are produced by merging per-table keyset queries, never
//! by materializing a combined table.

// Module declarations
pub mod api;
pub mod app;
pub mod cli;
pub mod command;
pub mod core;
pub mod io;
pub mod rates;
pub mod store;
pub mod types;

pub use app::App;
pub use core::{CombinedPaymentService, QuoteBuilder, QuoteService, ServiceConfig};
pub use io::{write_payments_csv, Fixtures};
pub use types::{
    Amount, Asset, CombinedPayment, CreateQuoteOptions, GetPageOptions, PageInfo, PaymentFilter,
    PaymentPointer, PaymentType, Quote, QuoteError,
};
