//! Service wiring
//!
//! Builds the quote and payment services over one in-memory store seeded
//! from fixtures, with the fixed-rate probe and the system clock.

use crate::api::{ApiError, QuoteRoutes};
use crate::core::traits::{PaymentPointerStore, RateProbe, ReceiverResolver, SystemClock};
use crate::core::{CombinedPaymentService, QuoteBuilder, QuoteService, ServiceConfig};
use crate::io::fixtures::{INCOMING_PAYMENTS_FILE, OUTGOING_PAYMENTS_FILE};
use crate::io::Fixtures;
use crate::store::{MemoryReceiverDirectory, MemoryStore};
use crate::types::{FixtureError, PaymentPointer, Receiver};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Wired services sharing one store
pub struct App {
    store: MemoryStore,
    receivers: Arc<dyn ReceiverResolver>,
    quotes: QuoteRoutes,
    payments: CombinedPaymentService,
}

impl App {
    /// Wire services over the contents of `fixtures`
    pub async fn from_fixtures(fixtures: Fixtures, config: ServiceConfig) -> Result<Self, FixtureError> {
        let store = MemoryStore::new();
        for pointer in fixtures.payment_pointers {
            store.add_payment_pointer(pointer);
        }
        for payment in fixtures.outgoing_payments {
            store
                .insert_outgoing_payment(payment)
                .await
                .map_err(|e| FixtureError::invalid(OUTGOING_PAYMENTS_FILE, e.to_string()))?;
        }
        for payment in fixtures.incoming_payments {
            store
                .insert_incoming_payment(payment)
                .await
                .map_err(|e| FixtureError::invalid(INCOMING_PAYMENTS_FILE, e.to_string()))?;
        }

        let receivers = Arc::new(MemoryReceiverDirectory::new());
        for receiver in fixtures.receivers {
            receivers.insert(receiver);
        }

        Ok(Self::wire(store, receivers, Arc::new(fixtures.rates), config))
    }

    fn wire(
        store: MemoryStore,
        receivers: Arc<dyn ReceiverResolver>,
        rates: Arc<dyn RateProbe>,
        config: ServiceConfig,
    ) -> Self {
        let builder = QuoteBuilder::new(rates, receivers.clone(), Arc::new(SystemClock), config.clone());
        let quotes = QuoteRoutes::new(QuoteService::new(Arc::new(store.clone()), builder));
        let payments = CombinedPaymentService::new(Arc::new(store.clone()), config);

        App {
            store,
            receivers,
            quotes,
            payments,
        }
    }

    /// Load a fixture directory and wire services over it
    pub async fn load(dir: &Path, config: ServiceConfig) -> Result<Self, FixtureError> {
        let fixtures = Fixtures::load(dir).await?;
        Self::from_fixtures(fixtures, config).await
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn quotes(&self) -> &QuoteRoutes {
        &self.quotes
    }

    pub fn payments(&self) -> &CombinedPaymentService {
        &self.payments
    }

    /// Resolve a payment pointer, 404 when unknown
    pub async fn payment_pointer(&self, id: Uuid) -> Result<PaymentPointer, ApiError> {
        match self.store.get_payment_pointer(id).await {
            Ok(Some(pointer)) => Ok(pointer),
            Ok(None) => Err(ApiError::new(404, "unknown payment pointer")),
            Err(e) => {
                tracing::error!(payment_pointer_id = %id, error = %e, "Error resolving payment pointer");
                Err(ApiError::internal())
            }
        }
    }

    /// Resolve a receiver URL through the receiver directory
    pub async fn receiver(&self, url: &str) -> Result<Option<Receiver>, ApiError> {
        self.receivers.resolve(url).await.map_err(|e| {
            tracing::error!(receiver = %url, error = %e, "Error resolving receiver");
            ApiError::internal()
        })
    }
}
