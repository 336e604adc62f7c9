//! Quote service
//!
//! Orchestrates quote creation inside one store transaction:
//!
//! 1. Resolve the payment pointer
//! 2. Build the draft (receiver lookup, validation, rate step)
//! 3. Insert the quote with a fresh id and commit
//!
//! Input and not-found errors reach the caller unchanged. Collaborator
//! failures are logged with their cause and replaced with
//! [`QuoteError::QuoteCreationFailed`], so callers only ever see the fixed
//! message.

use super::quote_builder::QuoteBuilder;
use super::traits::QuoteStore;
use crate::types::{CreateQuoteOptions, ErrorKind, Quote, QuoteError};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Creates and looks up quotes
#[derive(Clone)]
pub struct QuoteService {
    store: Arc<dyn QuoteStore>,
    builder: QuoteBuilder,
}

impl QuoteService {
    pub fn new(store: Arc<dyn QuoteStore>, builder: QuoteBuilder) -> Self {
        Self { store, builder }
    }

    /// Create and persist a quote
    ///
    /// # Arguments
    ///
    /// * `options` - Payment pointer id, receiver URL, at most one fixed
    ///   amount and the requesting client
    ///
    /// # Returns
    ///
    /// The stored quote, or a caller-facing `QuoteError`. Exactly one quote
    /// row exists afterwards on success and none on failure.
    pub async fn create(&self, options: CreateQuoteOptions) -> Result<Quote, QuoteError> {
        let payment_pointer_id = options.payment_pointer_id;
        self.try_create(options)
            .await
            .map_err(|err| Self::surface(err, payment_pointer_id))
    }

    async fn try_create(&self, options: CreateQuoteOptions) -> Result<Quote, QuoteError> {
        if options.debit_amount.is_some() && options.receive_amount.is_some() {
            return Err(QuoteError::malformed(
                "debitAmount and receiveAmount are mutually exclusive",
            ));
        }

        let mut tx = self.store.begin().await?;
        let payment_pointer = tx
            .payment_pointer(options.payment_pointer_id)
            .await?
            .ok_or(QuoteError::UnknownPaymentPointer {
                id: options.payment_pointer_id,
            })?;

        let draft = self
            .builder
            .build(
                &payment_pointer,
                &options.receiver,
                options.debit_amount,
                options.receive_amount,
            )
            .await?;

        let quote = tx
            .insert_quote(Quote::from_draft(Uuid::new_v4(), draft, options.client))
            .await?;
        tx.commit().await?;

        info!(
            quote_id = %quote.id,
            payment_pointer_id = %quote.payment_pointer_id,
            debit = quote.debit_amount.value,
            receive = quote.receive_amount.value,
            "Created quote"
        );
        Ok(quote)
    }

    /// Replace internal failures with the generic creation error
    fn surface(err: QuoteError, payment_pointer_id: Uuid) -> QuoteError {
        match err.kind() {
            ErrorKind::Internal => {
                error!(
                    %payment_pointer_id,
                    error = %err,
                    "Error trying to create quote"
                );
                QuoteError::QuoteCreationFailed
            }
            ErrorKind::Input | ErrorKind::NotFound => err,
        }
    }

    /// Get a quote owned by `payment_pointer_id`
    ///
    /// Quotes owned by another payment pointer are reported as absent.
    pub async fn get(&self, id: Uuid, payment_pointer_id: Uuid) -> Result<Option<Quote>, QuoteError> {
        let quote = self.store.get_quote(id).await.map_err(|err| {
            error!(%id, error = %err, "Error trying to get quote");
            QuoteError::Store(err)
        })?;
        Ok(quote.filter(|quote| quote.payment_pointer_id == payment_pointer_id))
    }
}
