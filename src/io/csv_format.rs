//! CSV format handling for fixture rows and payment page output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Row structures for each fixture file
//! - Conversion from rows to domain types
//! - Combined payment page serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{
    parse_amount_value, timestamp, Amount, Asset, CombinedPayment, IncomingPayment,
    IncomingPaymentState, OutgoingPayment, OutgoingPaymentState, PaymentPointer, Receiver,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;
use uuid::Uuid;

/// Row of `payment_pointers.csv`: `id,url,asset_code,asset_scale`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PaymentPointerRow {
    pub id: Uuid,
    pub url: String,
    pub asset_code: String,
    pub asset_scale: u8,
}

/// Row of `receivers.csv`
///
/// Columns: `url,asset_code,asset_scale,incoming_amount,received_amount,expires_at`.
/// Amounts are in the receiver's asset; the last three columns may be empty.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReceiverRow {
    pub url: String,
    pub asset_code: String,
    pub asset_scale: u8,
    pub incoming_amount: Option<String>,
    pub received_amount: Option<String>,
    pub expires_at: Option<String>,
}

/// Row of `rates.csv`: `from,to,rate`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RateRow {
    pub from: String,
    pub to: String,
    pub rate: String,
}

/// Row of `outgoing_payments.csv`
///
/// Debit and sent amounts are in the owning payment pointer's asset; the
/// receive amount names its own asset.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OutgoingPaymentRow {
    pub id: Uuid,
    pub payment_pointer_id: Uuid,
    pub state: String,
    pub receiver: String,
    pub debit_amount: String,
    pub receive_amount: String,
    pub receive_asset_code: String,
    pub receive_asset_scale: u8,
    pub sent_amount: String,
    pub description: Option<String>,
    pub created_at: String,
}

/// Row of `incoming_payments.csv`
///
/// Amounts are in the owning payment pointer's asset.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct IncomingPaymentRow {
    pub id: Uuid,
    pub payment_pointer_id: Uuid,
    pub state: String,
    pub incoming_amount: Option<String>,
    pub received_amount: String,
    pub description: Option<String>,
    pub expires_at: String,
    pub created_at: String,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

fn parse_time(raw: &str, field: &str) -> Result<DateTime<Utc>, String> {
    timestamp::parse(raw).map_err(|e| format!("{}: {}", field, e))
}

fn parse_value(raw: &str, field: &str) -> Result<u128, String> {
    parse_amount_value(raw.trim()).map_err(|e| format!("{}: {}", field, e))
}

/// Convert a payment pointer row
pub fn convert_payment_pointer_row(row: PaymentPointerRow) -> PaymentPointer {
    PaymentPointer {
        id: row.id,
        url: row.url,
        asset: Asset::new(row.asset_code, row.asset_scale),
    }
}

/// Convert a receiver row, parsing its optional amounts and expiry
pub fn convert_receiver_row(row: ReceiverRow) -> Result<Receiver, String> {
    let asset = Asset::new(row.asset_code, row.asset_scale);
    let incoming_amount = non_empty(row.incoming_amount)
        .map(|raw| parse_value(&raw, "incoming_amount").map(|v| Amount::of(v, &asset)))
        .transpose()?;
    let received_amount = non_empty(row.received_amount)
        .map(|raw| parse_value(&raw, "received_amount").map(|v| Amount::of(v, &asset)))
        .transpose()?;
    let expires_at = non_empty(row.expires_at)
        .map(|raw| parse_time(&raw, "expires_at"))
        .transpose()?;

    Ok(Receiver {
        url: row.url,
        asset,
        incoming_amount,
        received_amount,
        expires_at,
    })
}

/// Convert a rate row into `(from, to, rate)`
///
/// Rates must be positive decimals.
pub fn convert_rate_row(row: RateRow) -> Result<(String, String, Decimal), String> {
    let rate = Decimal::from_str(row.rate.trim())
        .map_err(|_| format!("Invalid rate '{}' for {} -> {}", row.rate, row.from, row.to))?;
    if rate <= Decimal::ZERO {
        return Err(format!(
            "Rate for {} -> {} must be positive, got {}",
            row.from, row.to, rate
        ));
    }
    Ok((row.from, row.to, rate))
}

/// Parse an outgoing payment state, case-insensitively
pub fn parse_outgoing_state(raw: &str) -> Result<OutgoingPaymentState, String> {
    match raw.trim().to_lowercase().as_str() {
        "funding" => Ok(OutgoingPaymentState::Funding),
        "sending" => Ok(OutgoingPaymentState::Sending),
        "completed" => Ok(OutgoingPaymentState::Completed),
        "failed" => Ok(OutgoingPaymentState::Failed),
        _ => Err(format!("Invalid outgoing payment state: '{}'", raw)),
    }
}

/// Parse an incoming payment state, case-insensitively
pub fn parse_incoming_state(raw: &str) -> Result<IncomingPaymentState, String> {
    match raw.trim().to_lowercase().as_str() {
        "pending" => Ok(IncomingPaymentState::Pending),
        "processing" => Ok(IncomingPaymentState::Processing),
        "completed" => Ok(IncomingPaymentState::Completed),
        "expired" => Ok(IncomingPaymentState::Expired),
        _ => Err(format!("Invalid incoming payment state: '{}'", raw)),
    }
}

/// Convert an outgoing payment row
///
/// # Arguments
///
/// * `row` - The deserialized row
/// * `asset` - Asset of the owning payment pointer
pub fn convert_outgoing_row(row: OutgoingPaymentRow, asset: &Asset) -> Result<OutgoingPayment, String> {
    Ok(OutgoingPayment {
        id: row.id,
        payment_pointer_id: row.payment_pointer_id,
        state: parse_outgoing_state(&row.state)?,
        receiver: row.receiver,
        debit_amount: Amount::of(parse_value(&row.debit_amount, "debit_amount")?, asset),
        receive_amount: Amount::new(
            parse_value(&row.receive_amount, "receive_amount")?,
            row.receive_asset_code,
            row.receive_asset_scale,
        ),
        sent_amount: Amount::of(parse_value(&row.sent_amount, "sent_amount")?, asset),
        description: non_empty(row.description),
        created_at: parse_time(&row.created_at, "created_at")?,
    })
}

/// Convert an incoming payment row
///
/// # Arguments
///
/// * `row` - The deserialized row
/// * `asset` - Asset of the owning payment pointer
pub fn convert_incoming_row(row: IncomingPaymentRow, asset: &Asset) -> Result<IncomingPayment, String> {
    let incoming_amount = non_empty(row.incoming_amount)
        .map(|raw| parse_value(&raw, "incoming_amount").map(|v| Amount::of(v, asset)))
        .transpose()?;

    Ok(IncomingPayment {
        id: row.id,
        payment_pointer_id: row.payment_pointer_id,
        state: parse_incoming_state(&row.state)?,
        incoming_amount,
        received_amount: Amount::of(parse_value(&row.received_amount, "received_amount")?, asset),
        description: non_empty(row.description),
        expires_at: parse_time(&row.expires_at, "expires_at")?,
        created_at: parse_time(&row.created_at, "created_at")?,
    })
}

/// Write a combined payment page in CSV format
///
/// Columns: `type,id,payment_pointer_id,created_at,state,amount_value,amount_asset_code,amount_asset_scale`.
/// Rows keep page order. The amount is the debit amount of outgoing payments
/// and the received amount of incoming ones.
///
/// # Arguments
///
/// * `page` - Payments to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(csv::Error)` if a record could not be written or the output failed
pub fn write_payments_csv(page: &[CombinedPayment], output: &mut dyn Write) -> Result<(), csv::Error> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "type",
            "id",
            "payment_pointer_id",
            "created_at",
            "state",
            "amount_value",
            "amount_asset_code",
            "amount_asset_scale",
        ])?;

    for payment in page {
        let amount = payment.headline_amount();
        writer
            .write_record(&[
                payment.payment_type().to_string(),
                payment.id().to_string(),
                payment.payment_pointer_id().to_string(),
                timestamp::format(&payment.created_at()),
                payment.state_name().to_string(),
                amount.value.to_string(),
                amount.asset_code.clone(),
                amount.asset_scale.to_string(),
            ])?;
    }

    writer.flush()?;
    Ok(())
}
