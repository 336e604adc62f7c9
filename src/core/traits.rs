//! Core traits for stores and external collaborators
//!
//! Services receive implementations of these traits at construction time.
//! The in-memory store and the fixed-rate probe implement them for the CLI
//! and tests; any other backend only has to provide the same operations.

use crate::types::{
    Amount, Asset, IncomingPayment, OutgoingPayment, PageQuery, PaymentPointer, Quote, RateError,
    Receiver, SortKey, StoreError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Lookup of payment pointers by id
#[async_trait]
pub trait PaymentPointerStore: Send + Sync {
    async fn get_payment_pointer(&self, id: Uuid) -> Result<Option<PaymentPointer>, StoreError>;
}

/// Store of quotes and the payment pointers that own them
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Open a transactional scope for quote creation
    async fn begin(&self) -> Result<Box<dyn QuoteTransaction>, StoreError>;

    /// Get a committed quote by id
    async fn get_quote(&self, id: Uuid) -> Result<Option<Quote>, StoreError>;
}

/// Transactional scope covering payment pointer resolution and quote insert
///
/// Inserts are only visible after [`commit`](QuoteTransaction::commit).
/// Dropping the transaction discards them.
#[async_trait]
pub trait QuoteTransaction: Send {
    /// Resolve a payment pointer by id
    async fn payment_pointer(&mut self, id: Uuid) -> Result<Option<PaymentPointer>, StoreError>;

    /// Stage a quote row for insertion
    async fn insert_quote(&mut self, quote: Quote) -> Result<Quote, StoreError>;

    /// Make staged rows visible
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// Store of outgoing and incoming payment records
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Open a consistent read view over both payment tables
    async fn read_view(&self) -> Result<Box<dyn PaymentReadView>, StoreError>;
}

/// Consistent snapshot of both payment tables
///
/// Every query issued through one view observes the same data.
#[async_trait]
pub trait PaymentReadView: Send + Sync {
    /// Position of the payment with `id` in either table
    async fn sort_key_of(&self, id: Uuid) -> Result<Option<SortKey>, StoreError>;

    /// Outgoing payments matching `query`, in query order
    async fn outgoing_page(&self, query: &PageQuery) -> Result<Vec<OutgoingPayment>, StoreError>;

    /// Incoming payments matching `query`, in query order
    async fn incoming_page(&self, query: &PageQuery) -> Result<Vec<IncomingPayment>, StoreError>;
}

/// Rate/probe step converting an amount across assets
#[async_trait]
pub trait RateProbe: Send + Sync {
    /// Amount delivered in `receive_asset` when `debit` is sent (rounded down)
    async fn receive_for_debit(&self, debit: &Amount, receive_asset: &Asset)
        -> Result<Amount, RateError>;

    /// Amount to send in `debit_asset` so that `receive` arrives (rounded up)
    async fn debit_for_receive(&self, receive: &Amount, debit_asset: &Asset)
        -> Result<Amount, RateError>;
}

/// Lookup of a receiver URL into its receiving resource
#[async_trait]
pub trait ReceiverResolver: Send + Sync {
    /// `Ok(None)` when the URL does not resolve
    async fn resolve(&self, url: &str) -> Result<Option<Receiver>, StoreError>;
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
