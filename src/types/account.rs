//! Account-like endpoints: payment pointers and receivers
//!
//! A payment pointer is the local, paying account. A receiver is the remote
//! resource a quote pays into, resolved from its URL by a
//! [`ReceiverResolver`](crate::core::traits::ReceiverResolver).

use super::amount::{Amount, Asset};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Paying account, identified by URL, holding exactly one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPointer {
    /// Payment pointer id
    pub id: Uuid,
    /// Public URL, e.g. `https://wallet.example/alice`
    pub url: String,
    /// The asset this account is denominated in
    pub asset: Asset,
}

impl PaymentPointer {
    /// Create a payment pointer with a fresh id
    pub fn new(url: impl Into<String>, asset: Asset) -> Self {
        PaymentPointer {
            id: Uuid::new_v4(),
            url: url.into(),
            asset,
        }
    }
}

/// Receiving resource as seen through its URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receiver {
    /// Receiver URL (usually an incoming payment URL)
    pub url: String,
    /// Asset the receiver is denominated in
    pub asset: Asset,
    /// Amount the receiver expects in total, if fixed
    pub incoming_amount: Option<Amount>,
    /// Amount received so far
    pub received_amount: Option<Amount>,
    /// After this instant the receiver no longer accepts payments
    pub expires_at: Option<DateTime<Utc>>,
}

impl Receiver {
    /// Create an open-ended receiver (no fixed amount, no expiry)
    pub fn new(url: impl Into<String>, asset: Asset) -> Self {
        Receiver {
            url: url.into(),
            asset,
            incoming_amount: None,
            received_amount: None,
            expires_at: None,
        }
    }

    /// Whether the receiver has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Amount still to be received, `None` when no incoming amount is fixed
    ///
    /// Saturates at zero if more than the incoming amount was received.
    pub fn remaining_amount(&self) -> Option<Amount> {
        let incoming = self.incoming_amount.as_ref()?;
        match &self.received_amount {
            Some(received) => Some(
                incoming
                    .checked_sub(received)
                    .unwrap_or_else(|| Amount::new(0, incoming.asset_code.clone(), incoming.asset_scale)),
            ),
            None => Some(incoming.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_receiver_expiry() {
        let now = Utc::now();
        let mut receiver = Receiver::new("https://wallet.example/bob/incoming-payments/1", Asset::new("EUR", 2));
        assert!(!receiver.is_expired(now));

        receiver.expires_at = Some(now + Duration::seconds(1));
        assert!(!receiver.is_expired(now));

        receiver.expires_at = Some(now);
        assert!(receiver.is_expired(now));
    }

    #[test]
    fn test_remaining_amount() {
        let asset = Asset::new("EUR", 2);
        let mut receiver = Receiver::new("https://wallet.example/bob/incoming-payments/1", asset.clone());
        assert_eq!(receiver.remaining_amount(), None);

        receiver.incoming_amount = Some(Amount::of(500, &asset));
        assert_eq!(receiver.remaining_amount(), Some(Amount::of(500, &asset)));

        receiver.received_amount = Some(Amount::of(200, &asset));
        assert_eq!(receiver.remaining_amount(), Some(Amount::of(300, &asset)));

        receiver.received_amount = Some(Amount::of(700, &asset));
        assert_eq!(receiver.remaining_amount(), Some(Amount::of(0, &asset)));
    }
}
