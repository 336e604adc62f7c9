//! In-memory store
//!
//! Payment pointers and quotes are independent single-row records and live
//! in `DashMap`s. The two payment tables must be read through one consistent
//! view, so they sit together behind a single `tokio::sync::RwLock`; a read
//! view holds an owned read guard for as long as it lives.
//!
//! Payment rows are kept in `BTreeMap`s keyed by [`SortKey`], so keyset
//! range scans are plain ordered map ranges.

use crate::core::traits::{
    PaymentPointerStore, PaymentReadView, PaymentStore, QuoteStore, QuoteTransaction,
    ReceiverResolver,
};
use crate::types::{
    Direction, IncomingPayment, Keyed, OutgoingPayment, PageQuery, PaymentPointer, Quote,
    Receiver, SortKey, StoreError,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;
use tokio::sync::{OwnedRwLockReadGuard, RwLock};
use uuid::Uuid;

/// Both payment tables plus an id index across them
#[derive(Debug, Default)]
struct PaymentTables {
    outgoing: BTreeMap<SortKey, OutgoingPayment>,
    incoming: BTreeMap<SortKey, IncomingPayment>,
    keys: HashMap<Uuid, SortKey>,
}

/// Shared in-memory backing for all store traits
///
/// Cloning is cheap; clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    payment_pointers: Arc<DashMap<Uuid, PaymentPointer>>,
    quotes: Arc<DashMap<Uuid, Quote>>,
    payments: Arc<RwLock<PaymentTables>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a payment pointer, replacing any with the same id
    pub fn add_payment_pointer(&self, payment_pointer: PaymentPointer) {
        self.payment_pointers
            .insert(payment_pointer.id, payment_pointer);
    }

    /// Get a payment pointer by id
    pub fn payment_pointer(&self, id: Uuid) -> Option<PaymentPointer> {
        self.payment_pointers
            .get(&id)
            .map(|entry| entry.value().clone())
    }

    /// Number of committed quotes
    pub fn quote_count(&self) -> usize {
        self.quotes.len()
    }

    /// Insert an outgoing payment; ids are unique across both tables
    pub async fn insert_outgoing_payment(&self, payment: OutgoingPayment) -> Result<(), StoreError> {
        let mut tables = self.payments.write().await;
        let key = payment.sort_key();
        if tables.keys.contains_key(&key.id) {
            return Err(StoreError::DuplicateId { id: key.id });
        }
        tables.keys.insert(key.id, key);
        tables.outgoing.insert(key, payment);
        Ok(())
    }

    /// Insert an incoming payment; ids are unique across both tables
    pub async fn insert_incoming_payment(&self, payment: IncomingPayment) -> Result<(), StoreError> {
        let mut tables = self.payments.write().await;
        let key = payment.sort_key();
        if tables.keys.contains_key(&key.id) {
            return Err(StoreError::DuplicateId { id: key.id });
        }
        tables.keys.insert(key.id, key);
        tables.incoming.insert(key, payment);
        Ok(())
    }
}

#[async_trait]
impl PaymentPointerStore for MemoryStore {
    async fn get_payment_pointer(&self, id: Uuid) -> Result<Option<PaymentPointer>, StoreError> {
        Ok(self.payment_pointer(id))
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn QuoteTransaction>, StoreError> {
        Ok(Box::new(MemoryQuoteTransaction {
            store: self.clone(),
            staged: Vec::new(),
        }))
    }

    async fn get_quote(&self, id: Uuid) -> Result<Option<Quote>, StoreError> {
        Ok(self.quotes.get(&id).map(|entry| entry.value().clone()))
    }
}

/// Quote transaction staging inserts until commit
struct MemoryQuoteTransaction {
    store: MemoryStore,
    staged: Vec<Quote>,
}

#[async_trait]
impl QuoteTransaction for MemoryQuoteTransaction {
    async fn payment_pointer(&mut self, id: Uuid) -> Result<Option<PaymentPointer>, StoreError> {
        Ok(self.store.payment_pointer(id))
    }

    async fn insert_quote(&mut self, quote: Quote) -> Result<Quote, StoreError> {
        if self.store.quotes.contains_key(&quote.id)
            || self.staged.iter().any(|staged| staged.id == quote.id)
        {
            return Err(StoreError::DuplicateId { id: quote.id });
        }
        self.staged.push(quote.clone());
        Ok(quote)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryQuoteTransaction { store, staged } = *self;
        if let Some(conflict) = staged
            .iter()
            .find(|quote| store.quotes.contains_key(&quote.id))
        {
            return Err(StoreError::DuplicateId { id: conflict.id });
        }
        for quote in staged {
            store.quotes.insert(quote.id, quote);
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentStore for MemoryStore {
    async fn read_view(&self) -> Result<Box<dyn PaymentReadView>, StoreError> {
        let tables = Arc::clone(&self.payments).read_owned().await;
        Ok(Box::new(MemoryReadView { tables }))
    }
}

/// Snapshot of the payment tables, pinned by a read guard
struct MemoryReadView {
    tables: OwnedRwLockReadGuard<PaymentTables>,
}

#[async_trait]
impl PaymentReadView for MemoryReadView {
    async fn sort_key_of(&self, id: Uuid) -> Result<Option<SortKey>, StoreError> {
        Ok(self.tables.keys.get(&id).copied())
    }

    async fn outgoing_page(&self, query: &PageQuery) -> Result<Vec<OutgoingPayment>, StoreError> {
        Ok(scan(&self.tables.outgoing, query, |p| p.payment_pointer_id))
    }

    async fn incoming_page(&self, query: &PageQuery) -> Result<Vec<IncomingPayment>, StoreError> {
        Ok(scan(&self.tables.incoming, query, |p| p.payment_pointer_id))
    }
}

/// Keyset range scan over one table, in query order
fn scan<T, F>(table: &BTreeMap<SortKey, T>, query: &PageQuery, owner: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Uuid,
{
    let bound = query.cursor.map_or(Bound::Unbounded, Bound::Excluded);
    let rows: Box<dyn Iterator<Item = (&SortKey, &T)> + '_> = match query.direction {
        Direction::Forward => Box::new(table.range((bound, Bound::Unbounded))),
        Direction::Backward => Box::new(table.range((Bound::Unbounded, bound)).rev()),
    };
    rows.filter(|(key, row)| query.admits(key, owner(row)))
        .take(query.limit)
        .map(|(_, row)| row.clone())
        .collect()
}

/// Receiver lookup backed by a map of known receivers
#[derive(Debug, Default)]
pub struct MemoryReceiverDirectory {
    receivers: DashMap<String, Receiver>,
}

impl MemoryReceiverDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a receiver under its URL, replacing any previous entry
    pub fn insert(&self, receiver: Receiver) {
        self.receivers.insert(receiver.url.clone(), receiver);
    }
}

#[async_trait]
impl ReceiverResolver for MemoryReceiverDirectory {
    async fn resolve(&self, url: &str) -> Result<Option<Receiver>, StoreError> {
        Ok(self.receivers.get(url).map(|entry| entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Amount, Asset, IncomingPaymentState, OutgoingPaymentState};
    use chrono::{DateTime, Duration, Utc};

    fn outgoing(owner: Uuid, created_at: DateTime<Utc>) -> OutgoingPayment {
        OutgoingPayment {
            id: Uuid::new_v4(),
            payment_pointer_id: owner,
            state: OutgoingPaymentState::Completed,
            receiver: "https://wallet2.example/bob/incoming-payments/1".to_string(),
            debit_amount: Amount::new(10, "USD", 2),
            receive_amount: Amount::new(10, "USD", 2),
            sent_amount: Amount::new(10, "USD", 2),
            description: None,
            created_at,
        }
    }

    fn incoming(owner: Uuid, created_at: DateTime<Utc>) -> IncomingPayment {
        IncomingPayment {
            id: Uuid::new_v4(),
            payment_pointer_id: owner,
            state: IncomingPaymentState::Pending,
            incoming_amount: None,
            received_amount: Amount::new(0, "USD", 2),
            description: None,
            expires_at: created_at + Duration::days(1),
            created_at,
        }
    }

    fn query(direction: Direction, limit: usize, cursor: Option<SortKey>) -> PageQuery {
        PageQuery {
            direction,
            limit,
            cursor,
            payment_pointer_ids: None,
        }
    }

    #[tokio::test]
    async fn test_scan_forward_and_backward() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let start = Utc::now();
        let mut payments = Vec::new();
        for i in 0..5 {
            let payment = outgoing(owner, start + Duration::seconds(i));
            store.insert_outgoing_payment(payment.clone()).await.unwrap();
            payments.push(payment);
        }

        let view = store.read_view().await.unwrap();
        let page = view
            .outgoing_page(&query(Direction::Forward, 2, Some(payments[1].sort_key())))
            .await
            .unwrap();
        assert_eq!(page, vec![payments[2].clone(), payments[3].clone()]);

        let page = view
            .outgoing_page(&query(Direction::Backward, 10, Some(payments[2].sort_key())))
            .await
            .unwrap();
        assert_eq!(page, vec![payments[1].clone(), payments[0].clone()]);
    }

    #[tokio::test]
    async fn test_scan_filters_owner() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let now = Utc::now();
        store.insert_incoming_payment(incoming(alice, now)).await.unwrap();
        let bobs = incoming(bob, now);
        store.insert_incoming_payment(bobs.clone()).await.unwrap();

        let view = store.read_view().await.unwrap();
        let mut q = query(Direction::Forward, 10, None);
        q.payment_pointer_ids = Some(vec![bob]);
        assert_eq!(view.incoming_page(&q).await.unwrap(), vec![bobs.clone()]);
        assert_eq!(view.sort_key_of(bobs.id).await.unwrap(), Some(bobs.sort_key()));
        assert_eq!(view.sort_key_of(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_payment_id_across_tables() {
        let store = MemoryStore::new();
        let payment = outgoing(Uuid::new_v4(), Utc::now());
        let mut clash = incoming(Uuid::new_v4(), Utc::now());
        clash.id = payment.id;

        store.insert_outgoing_payment(payment.clone()).await.unwrap();
        assert_eq!(
            store.insert_incoming_payment(clash).await,
            Err(StoreError::DuplicateId { id: payment.id })
        );
    }

    #[tokio::test]
    async fn test_read_view_blocks_writers_until_dropped() {
        let store = MemoryStore::new();
        let view = store.read_view().await.unwrap();

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .insert_outgoing_payment(outgoing(Uuid::new_v4(), Utc::now()))
                    .await
            })
        };
        tokio::task::yield_now().await;
        let snapshot = view
            .outgoing_page(&query(Direction::Forward, 10, None))
            .await
            .unwrap();
        assert!(snapshot.is_empty());

        drop(view);
        writer.await.unwrap().unwrap();
        let view = store.read_view().await.unwrap();
        let after = view
            .outgoing_page(&query(Direction::Forward, 10, None))
            .await
            .unwrap();
        assert_eq!(after.len(), 1);
    }

    #[tokio::test]
    async fn test_quote_transaction_commit_and_rollback() {
        let store = MemoryStore::new();
        let pointer = PaymentPointer::new("https://wallet.example/alice", Asset::new("USD", 2));
        store.add_payment_pointer(pointer.clone());
        let now = Utc::now();
        let quote = Quote {
            id: Uuid::new_v4(),
            payment_pointer_id: pointer.id,
            receiver: "https://wallet2.example/bob/incoming-payments/1".to_string(),
            debit_amount: Amount::of(10, &pointer.asset),
            receive_amount: Amount::of(10, &pointer.asset),
            created_at: now,
            expires_at: now + Duration::minutes(5),
            client: None,
        };

        // Dropped without commit: nothing visible
        {
            let mut tx = store.begin().await.unwrap();
            assert_eq!(tx.payment_pointer(pointer.id).await.unwrap(), Some(pointer.clone()));
            tx.insert_quote(quote.clone()).await.unwrap();
        }
        assert_eq!(store.quote_count(), 0);

        let mut tx = store.begin().await.unwrap();
        tx.insert_quote(quote.clone()).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(store.get_quote(quote.id).await.unwrap(), Some(quote.clone()));

        let mut tx = store.begin().await.unwrap();
        assert_eq!(
            tx.insert_quote(quote.clone()).await,
            Err(StoreError::DuplicateId { id: quote.id })
        );
    }
}
