//! Quote routes
//!
//! `create` parses a JSON body into [`CreateQuoteOptions`] for the payment
//! pointer the request is scoped to. `get` looks a quote up under that same
//! payment pointer. Both answer with [`QuoteResponse`], whose `id` is the
//! quote's resource URL.

use super::ApiError;
use crate::core::QuoteService;
use crate::types::{timestamp, Amount, CreateQuoteOptions, PaymentPointer, Quote};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Body of a create-quote request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteBody {
    pub receiver: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit_amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receive_amount: Option<Amount>,
}

impl CreateQuoteBody {
    /// Parse a raw JSON body
    ///
    /// Amount values must be decimal integer strings.
    pub fn from_json(raw: &str) -> Result<Self, ApiError> {
        serde_json::from_str(raw).map_err(|e| {
            debug!(error = %e, "Rejected create quote body");
            ApiError::bad_request(format!("invalid request body: {}", e))
        })
    }
}

/// Wire representation of a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    /// Resource URL, `{paymentPointer}/quotes/{id}`
    pub id: String,
    /// URL of the owning payment pointer
    pub payment_pointer: String,
    pub receiver: String,
    pub debit_amount: Amount,
    pub receive_amount: Amount,
    pub created_at: String,
    pub expires_at: String,
}

impl QuoteResponse {
    pub fn new(quote: &Quote, payment_pointer: &PaymentPointer) -> Self {
        QuoteResponse {
            id: quote.url(&payment_pointer.url),
            payment_pointer: payment_pointer.url.clone(),
            receiver: quote.receiver.clone(),
            debit_amount: quote.debit_amount.clone(),
            receive_amount: quote.receive_amount.clone(),
            created_at: timestamp::format(&quote.created_at),
            expires_at: timestamp::format(&quote.expires_at),
        }
    }
}

/// Quote handlers bound to a quote service
#[derive(Clone)]
pub struct QuoteRoutes {
    service: QuoteService,
}

impl QuoteRoutes {
    pub fn new(service: QuoteService) -> Self {
        Self { service }
    }

    /// Create a quote for `payment_pointer`
    ///
    /// # Arguments
    ///
    /// * `payment_pointer` - Payment pointer the request is scoped to
    /// * `body` - Parsed request body
    /// * `client` - Identifier of the requesting client, if known
    pub async fn create(
        &self,
        payment_pointer: &PaymentPointer,
        body: CreateQuoteBody,
        client: Option<String>,
    ) -> Result<QuoteResponse, ApiError> {
        let quote = self
            .service
            .create(CreateQuoteOptions {
                payment_pointer_id: payment_pointer.id,
                receiver: body.receiver,
                debit_amount: body.debit_amount,
                receive_amount: body.receive_amount,
                client,
            })
            .await?;
        Ok(QuoteResponse::new(&quote, payment_pointer))
    }

    /// Get a quote by id, 404 when missing or owned by another payment pointer
    pub async fn get(&self, payment_pointer: &PaymentPointer, id: Uuid) -> Result<QuoteResponse, ApiError> {
        match self.service.get(id, payment_pointer.id).await? {
            Some(quote) => Ok(QuoteResponse::new(&quote, payment_pointer)),
            None => Err(ApiError::not_found()),
        }
    }
}
