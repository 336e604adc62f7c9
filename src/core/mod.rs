//! Core business logic module
//!
//! This module contains the quoting and payment feed components:
//! - `traits` - Store and collaborator abstractions injected into services
//! - `config` - Policy values (quote lifetime, rate timeout, page sizes)
//! - `quote_builder` - Debit/receive amount derivation and expiry
//! - `quote_service` - Transactional quote creation and lookup
//! - `merger` - Keyset merge of the two payment tables
//! - `combined_payment_service` - Paginated feed over both payment types

pub mod combined_payment_service;
pub mod config;
pub mod merger;
pub mod quote_builder;
pub mod quote_service;
pub mod traits;

pub use combined_payment_service::CombinedPaymentService;
pub use config::ServiceConfig;
pub use quote_builder::QuoteBuilder;
pub use quote_service::QuoteService;
