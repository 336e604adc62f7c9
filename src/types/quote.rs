//! Quote types

use super::amount::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Input to quote creation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateQuoteOptions {
    /// Paying account
    pub payment_pointer_id: Uuid,
    /// Receiver URL
    pub receiver: String,
    /// Fixed debit amount, in the payment pointer's asset
    pub debit_amount: Option<Amount>,
    /// Fixed receive amount, in the receiver's asset
    pub receive_amount: Option<Amount>,
    /// Client that requested the quote
    pub client: Option<String>,
}

/// Quote computed by the builder, not yet persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteDraft {
    pub payment_pointer_id: Uuid,
    pub receiver: String,
    pub debit_amount: Amount,
    pub receive_amount: Amount,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Stored, immutable quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub payment_pointer_id: Uuid,
    pub receiver: String,
    pub debit_amount: Amount,
    pub receive_amount: Amount,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

impl Quote {
    /// Path segment under a payment pointer URL
    pub const URL_PATH: &'static str = "quotes";

    /// Turn a draft into a quote row with the given id
    pub fn from_draft(id: Uuid, draft: QuoteDraft, client: Option<String>) -> Self {
        Quote {
            id,
            payment_pointer_id: draft.payment_pointer_id,
            receiver: draft.receiver,
            debit_amount: draft.debit_amount,
            receive_amount: draft.receive_amount,
            created_at: draft.created_at,
            expires_at: draft.expires_at,
            client,
        }
    }

    /// Resource URL of this quote under its payment pointer's URL
    pub fn url(&self, payment_pointer_url: &str) -> String {
        format!("{}/{}/{}", payment_pointer_url, Self::URL_PATH, self.id)
    }

    /// Whether the quote has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
