//! Payment record types and the combined projection over them
//!
//! Outgoing and incoming payments live in two disjoint tables. The
//! [`CombinedPayment`] union exposes both through one shape, tagged with its
//! [`PaymentType`], and shares a single sort key so one merge routine can
//! order any mix of them.

use super::amount::Amount;
use super::pagination::{Keyed, SortKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Which table a payment comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    /// Funds sent from a payment pointer
    Outgoing,
    /// Funds received at a payment pointer
    Incoming,
}

impl PaymentType {
    /// Both payment types, in source order
    pub const ALL: [PaymentType; 2] = [PaymentType::Outgoing, PaymentType::Incoming];

    /// Wire name (`OUTGOING` / `INCOMING`)
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentType::Outgoing => "OUTGOING",
            PaymentType::Incoming => "INCOMING",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "outgoing" => Ok(PaymentType::Outgoing),
            "incoming" => Ok(PaymentType::Incoming),
            _ => Err(format!("Invalid payment type: '{}'", s)),
        }
    }
}

/// Lifecycle state of an outgoing payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutgoingPaymentState {
    Funding,
    Sending,
    Completed,
    Failed,
}

/// Lifecycle state of an incoming payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IncomingPaymentState {
    Pending,
    Processing,
    Completed,
    Expired,
}

/// Funds sent from a payment pointer to a receiver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingPayment {
    pub id: Uuid,
    pub payment_pointer_id: Uuid,
    pub state: OutgoingPaymentState,
    pub receiver: String,
    pub debit_amount: Amount,
    pub receive_amount: Amount,
    pub sent_amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Funds received at a payment pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingPayment {
    pub id: Uuid,
    pub payment_pointer_id: Uuid,
    pub state: IncomingPaymentState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incoming_amount: Option<Amount>,
    pub received_amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "super::timestamp")]
    pub expires_at: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl IncomingPayment {
    /// URL of this incoming payment under its payment pointer's URL
    pub fn url(&self, payment_pointer_url: &str) -> String {
        format!("{}/incoming-payments/{}", payment_pointer_url, self.id)
    }
}

impl Keyed for OutgoingPayment {
    fn sort_key(&self) -> SortKey {
        SortKey::new(self.created_at, self.id)
    }
}

impl Keyed for IncomingPayment {
    fn sort_key(&self) -> SortKey {
        SortKey::new(self.created_at, self.id)
    }
}

/// Read-only projection over both payment tables
///
/// Serializes with a `type` tag next to the source record's own fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum CombinedPayment {
    Outgoing(OutgoingPayment),
    Incoming(IncomingPayment),
}

impl CombinedPayment {
    pub fn payment_type(&self) -> PaymentType {
        match self {
            CombinedPayment::Outgoing(_) => PaymentType::Outgoing,
            CombinedPayment::Incoming(_) => PaymentType::Incoming,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            CombinedPayment::Outgoing(p) => p.id,
            CombinedPayment::Incoming(p) => p.id,
        }
    }

    pub fn payment_pointer_id(&self) -> Uuid {
        match self {
            CombinedPayment::Outgoing(p) => p.payment_pointer_id,
            CombinedPayment::Incoming(p) => p.payment_pointer_id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            CombinedPayment::Outgoing(p) => p.created_at,
            CombinedPayment::Incoming(p) => p.created_at,
        }
    }

    /// The amount that characterizes the payment: debit for outgoing,
    /// received for incoming
    pub fn headline_amount(&self) -> &Amount {
        match self {
            CombinedPayment::Outgoing(p) => &p.debit_amount,
            CombinedPayment::Incoming(p) => &p.received_amount,
        }
    }

    /// State as its wire name
    pub fn state_name(&self) -> &'static str {
        match self {
            CombinedPayment::Outgoing(p) => match p.state {
                OutgoingPaymentState::Funding => "FUNDING",
                OutgoingPaymentState::Sending => "SENDING",
                OutgoingPaymentState::Completed => "COMPLETED",
                OutgoingPaymentState::Failed => "FAILED",
            },
            CombinedPayment::Incoming(p) => match p.state {
                IncomingPaymentState::Pending => "PENDING",
                IncomingPaymentState::Processing => "PROCESSING",
                IncomingPaymentState::Completed => "COMPLETED",
                IncomingPaymentState::Expired => "EXPIRED",
            },
        }
    }
}

impl Keyed for CombinedPayment {
    fn sort_key(&self) -> SortKey {
        SortKey::new(self.created_at(), self.id())
    }
}

impl From<OutgoingPayment> for CombinedPayment {
    fn from(payment: OutgoingPayment) -> Self {
        CombinedPayment::Outgoing(payment)
    }
}

impl From<IncomingPayment> for CombinedPayment {
    fn from(payment: IncomingPayment) -> Self {
        CombinedPayment::Incoming(payment)
    }
}
