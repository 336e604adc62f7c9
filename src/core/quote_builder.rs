//! Quote building
//!
//! Turns partial quote input into a [`QuoteDraft`]: exactly one fixed side
//! (debit or receive), or neither when the receiver carries its own incoming
//! amount. The other side is derived through the [`RateProbe`]. Every probe
//! call is bounded by the configured rate timeout.
//!
//! The builder does not persist anything. Given the same collaborator
//! answers it always produces the same draft.

use super::config::ServiceConfig;
use super::traits::{Clock, RateProbe, ReceiverResolver};
use crate::types::{
    validate_amount, Amount, Asset, PaymentPointer, QuoteDraft, QuoteError, RateError, Receiver,
};
use std::future::Future;
use std::sync::Arc;

/// Computes debit/receive amount pairs and expiry for new quotes
#[derive(Clone)]
pub struct QuoteBuilder {
    rates: Arc<dyn RateProbe>,
    receivers: Arc<dyn ReceiverResolver>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl QuoteBuilder {
    pub fn new(
        rates: Arc<dyn RateProbe>,
        receivers: Arc<dyn ReceiverResolver>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            rates,
            receivers,
            clock,
            config,
        }
    }

    /// Build a quote draft for `payment_pointer` paying `receiver`
    ///
    /// # Errors
    ///
    /// * `MalformedRequest` if both amounts are given
    /// * `UnknownReceiver` if the receiver URL does not resolve
    /// * `InvalidReceiver` if the receiver is expired or has nothing left to receive
    /// * `InvalidAmount` if a supplied amount is in the wrong asset
    /// * `NonPositiveAmount` if a supplied or derived amount is zero
    /// * `Rate`/`Store`/`Internal` for collaborator failures
    pub async fn build(
        &self,
        payment_pointer: &PaymentPointer,
        receiver: &str,
        debit_amount: Option<Amount>,
        receive_amount: Option<Amount>,
    ) -> Result<QuoteDraft, QuoteError> {
        let fixed = match (debit_amount, receive_amount) {
            (Some(_), Some(_)) => {
                return Err(QuoteError::malformed(
                    "debitAmount and receiveAmount are mutually exclusive",
                ))
            }
            (Some(debit), None) => FixedSide::Debit(debit),
            (None, Some(receive)) => FixedSide::Receive(receive),
            (None, None) => FixedSide::Receiver,
        };

        // Input errors on a pinned debit win over receiver lookup failures
        if let FixedSide::Debit(debit) = &fixed {
            validate_amount(debit, &payment_pointer.asset)?;
            ensure_positive(debit)?;
        }

        let created_at = self.clock.now();
        let resolved = self
            .receivers
            .resolve(receiver)
            .await?
            .ok_or_else(|| QuoteError::UnknownReceiver {
                receiver: receiver.to_string(),
            })?;
        if resolved.is_expired(created_at) {
            return Err(QuoteError::invalid_receiver("receiver has expired"));
        }

        let (debit_amount, receive_amount) = match fixed {
            FixedSide::Debit(debit) => {
                let receive = self.receive_for_debit(&debit, &resolved.asset).await?;
                (debit, receive)
            }
            FixedSide::Receive(receive) => {
                validate_amount(&receive, &resolved.asset)?;
                ensure_positive(&receive)?;
                if resolved.incoming_amount.is_some() {
                    return Err(QuoteError::invalid_amount(
                        "receiver without incoming amount",
                        receive.label(),
                    ));
                }
                let debit = self
                    .debit_for_receive(&receive, &payment_pointer.asset)
                    .await?;
                (debit, receive)
            }
            FixedSide::Receiver => {
                let receive = fixed_receive_amount(&resolved)?;
                let debit = self
                    .debit_for_receive(&receive, &payment_pointer.asset)
                    .await?;
                (debit, receive)
            }
        };

        let lifetime = chrono::Duration::from_std(self.config.quote_lifetime)
            .map_err(|e| QuoteError::internal(format!("quote lifetime out of range: {}", e)))?;
        let expires_at = created_at
            .checked_add_signed(lifetime)
            .ok_or_else(|| QuoteError::internal("quote expiry out of range"))?;

        Ok(QuoteDraft {
            payment_pointer_id: payment_pointer.id,
            receiver: receiver.to_string(),
            debit_amount,
            receive_amount,
            created_at,
            expires_at,
        })
    }

    async fn receive_for_debit(&self, debit: &Amount, asset: &Asset) -> Result<Amount, QuoteError> {
        let receive = self
            .bounded(self.rates.receive_for_debit(debit, asset))
            .await?;
        check_derived(&receive, asset)?;
        Ok(receive)
    }

    async fn debit_for_receive(&self, receive: &Amount, asset: &Asset) -> Result<Amount, QuoteError> {
        let debit = self
            .bounded(self.rates.debit_for_receive(receive, asset))
            .await?;
        check_derived(&debit, asset)?;
        Ok(debit)
    }

    /// Run a probe call under the configured timeout
    async fn bounded<F>(&self, call: F) -> Result<Amount, RateError>
    where
        F: Future<Output = Result<Amount, RateError>>,
    {
        match tokio::time::timeout(self.config.rate_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(RateError::Timeout {
                after_ms: self.config.rate_timeout.as_millis(),
            }),
        }
    }
}

/// Which side of the quote the caller pinned
enum FixedSide {
    Debit(Amount),
    Receive(Amount),
    /// Neither: the receiver's incoming amount decides
    Receiver,
}

fn ensure_positive(amount: &Amount) -> Result<(), QuoteError> {
    if amount.value == 0 {
        Err(QuoteError::NonPositiveAmount)
    } else {
        Ok(())
    }
}

/// Amount the receiver still expects, required when no side is fixed
fn fixed_receive_amount(receiver: &Receiver) -> Result<Amount, QuoteError> {
    let remaining = receiver
        .remaining_amount()
        .ok_or_else(|| QuoteError::invalid_receiver("receiver has no incoming amount"))?;
    if remaining.value == 0 {
        return Err(QuoteError::invalid_receiver("receiver is already paid"));
    }
    Ok(remaining)
}

/// A derived amount must be non-zero and in the asset that was asked for
fn check_derived(amount: &Amount, asset: &Asset) -> Result<(), QuoteError> {
    if !amount.is_in(asset) {
        return Err(QuoteError::internal(format!(
            "rate probe answered in {} instead of {}",
            amount.label(),
            asset.label()
        )));
    }
    ensure_positive(amount)
}
