//! Fixture directory loading
//!
//! A fixture directory describes the world a CLI command runs against:
//!
//! ```text
//! payment_pointers.csv   required
//! receivers.csv          optional
//! rates.csv              optional
//! outgoing_payments.csv  optional
//! incoming_payments.csv  optional
//! ```
//!
//! Files are read through tokio and streamed with csv-async. A missing
//! optional file counts as empty.

use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::{
    convert_incoming_row, convert_outgoing_row, convert_payment_pointer_row, convert_rate_row,
    convert_receiver_row, IncomingPaymentRow, OutgoingPaymentRow, PaymentPointerRow, RateRow,
    ReceiverRow,
};
use crate::rates::FixedRateProbe;
use crate::types::{FixtureError, IncomingPayment, OutgoingPayment, PaymentPointer, Receiver};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::debug;
use uuid::Uuid;

pub const PAYMENT_POINTERS_FILE: &str = "payment_pointers.csv";
pub const RECEIVERS_FILE: &str = "receivers.csv";
pub const RATES_FILE: &str = "rates.csv";
pub const OUTGOING_PAYMENTS_FILE: &str = "outgoing_payments.csv";
pub const INCOMING_PAYMENTS_FILE: &str = "incoming_payments.csv";

/// Everything loaded from one fixture directory
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub payment_pointers: Vec<PaymentPointer>,
    pub receivers: Vec<Receiver>,
    pub rates: FixedRateProbe,
    pub outgoing_payments: Vec<OutgoingPayment>,
    pub incoming_payments: Vec<IncomingPayment>,
}

impl Fixtures {
    /// Load and cross-check a fixture directory
    ///
    /// # Errors
    ///
    /// * `Io` if a file cannot be read, or `payment_pointers.csv` is missing
    /// * `Parse` for malformed rows, with the offending line
    /// * `Invalid` for duplicate payment pointer ids or payments owned by an
    ///   unknown payment pointer
    pub async fn load(dir: &Path) -> Result<Self, FixtureError> {
        let pointer_rows: Vec<PaymentPointerRow> = read_rows(dir, PAYMENT_POINTERS_FILE, true).await?;
        let mut pointers: HashMap<Uuid, PaymentPointer> = HashMap::new();
        let mut payment_pointers = Vec::with_capacity(pointer_rows.len());
        for row in pointer_rows {
            let pointer = convert_payment_pointer_row(row);
            if pointers.insert(pointer.id, pointer.clone()).is_some() {
                return Err(FixtureError::invalid(
                    PAYMENT_POINTERS_FILE,
                    format!("duplicate payment pointer id {}", pointer.id),
                ));
            }
            payment_pointers.push(pointer);
        }

        let receivers = read_rows::<ReceiverRow>(dir, RECEIVERS_FILE, false)
            .await?
            .into_iter()
            .map(|row| convert_receiver_row(row).map_err(|e| FixtureError::invalid(RECEIVERS_FILE, e)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut rates = FixedRateProbe::new();
        for row in read_rows::<RateRow>(dir, RATES_FILE, false).await? {
            let (from, to, rate) =
                convert_rate_row(row).map_err(|e| FixtureError::invalid(RATES_FILE, e))?;
            rates.set_rate(&from, &to, rate);
        }

        let mut outgoing_payments = Vec::new();
        for row in read_rows::<OutgoingPaymentRow>(dir, OUTGOING_PAYMENTS_FILE, false).await? {
            let asset = &owner(&pointers, row.payment_pointer_id, OUTGOING_PAYMENTS_FILE)?.asset;
            let payment = convert_outgoing_row(row, asset)
                .map_err(|e| FixtureError::invalid(OUTGOING_PAYMENTS_FILE, e))?;
            outgoing_payments.push(payment);
        }

        let mut incoming_payments = Vec::new();
        for row in read_rows::<IncomingPaymentRow>(dir, INCOMING_PAYMENTS_FILE, false).await? {
            let asset = &owner(&pointers, row.payment_pointer_id, INCOMING_PAYMENTS_FILE)?.asset;
            let payment = convert_incoming_row(row, asset)
                .map_err(|e| FixtureError::invalid(INCOMING_PAYMENTS_FILE, e))?;
            incoming_payments.push(payment);
        }

        debug!(
            payment_pointers = payment_pointers.len(),
            receivers = receivers.len(),
            outgoing = outgoing_payments.len(),
            incoming = incoming_payments.len(),
            "Loaded fixtures from {}",
            dir.display()
        );

        Ok(Fixtures {
            payment_pointers,
            receivers,
            rates,
            outgoing_payments,
            incoming_payments,
        })
    }
}

fn owner<'a>(
    pointers: &'a HashMap<Uuid, PaymentPointer>,
    id: Uuid,
    file: &str,
) -> Result<&'a PaymentPointer, FixtureError> {
    pointers
        .get(&id)
        .ok_or_else(|| FixtureError::invalid(file, format!("unknown payment pointer {}", id)))
}

/// Read every row of one fixture file
async fn read_rows<T>(dir: &Path, name: &str, required: bool) -> Result<Vec<T>, FixtureError>
where
    T: DeserializeOwned + 'static,
{
    let path = dir.join(name);
    match tokio::fs::File::open(&path).await {
        Ok(file) => AsyncReader::new(file.compat(), name).read_all().await,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            debug!("No {} in {}, treating as empty", name, dir.display());
            Ok(Vec::new())
        }
        Err(e) => Err(FixtureError::Io {
            message: format!("{}: {}", path.display(), e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::RateProbe;
    use crate::types::{Amount, Asset};
    use std::fs;
    use tempfile::TempDir;

    const ALICE: &str = "00000000-0000-0000-0000-00000000000a";

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    fn with_pointers() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            PAYMENT_POINTERS_FILE,
            &format!("id,url,asset_code,asset_scale\n{},https://wallet.example/alice,USD,2\n", ALICE),
        );
        dir
    }

    #[tokio::test]
    async fn test_load_minimal_directory() {
        let dir = with_pointers();
        let fixtures = Fixtures::load(dir.path()).await.unwrap();
        assert_eq!(fixtures.payment_pointers.len(), 1);
        assert_eq!(fixtures.payment_pointers[0].url, "https://wallet.example/alice");
        assert!(fixtures.receivers.is_empty());
        assert!(fixtures.outgoing_payments.is_empty());
        assert!(fixtures.incoming_payments.is_empty());
    }

    #[tokio::test]
    async fn test_missing_payment_pointers_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Fixtures::load(dir.path()).await,
            Err(FixtureError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_rates_and_payments() {
        let dir = with_pointers();
        write(&dir, RATES_FILE, "from,to,rate\nUSD,EUR,0.5\n");
        write(
            &dir,
            INCOMING_PAYMENTS_FILE,
            &format!(
                "id,payment_pointer_id,state,incoming_amount,received_amount,description,expires_at,created_at\n\
                 00000000-0000-0000-0000-000000000002,{},pending,500,0,,2023-11-15T00:00:00.000Z,2023-11-14T00:00:00.000Z\n",
                ALICE
            ),
        );

        let fixtures = Fixtures::load(dir.path()).await.unwrap();
        let receive = fixtures
            .rates
            .receive_for_debit(&Amount::new(100, "USD", 2), &Asset::new("EUR", 2))
            .await
            .unwrap();
        assert_eq!(receive.value, 50);
        assert_eq!(fixtures.incoming_payments.len(), 1);
        assert_eq!(
            fixtures.incoming_payments[0].incoming_amount,
            Some(Amount::new(500, "USD", 2))
        );
    }

    #[tokio::test]
    async fn test_payment_with_unknown_owner() {
        let dir = with_pointers();
        write(
            &dir,
            INCOMING_PAYMENTS_FILE,
            "id,payment_pointer_id,state,incoming_amount,received_amount,description,expires_at,created_at\n\
             00000000-0000-0000-0000-000000000002,00000000-0000-0000-0000-0000000000ff,pending,,0,,2023-11-15T00:00:00.000Z,2023-11-14T00:00:00.000Z\n",
        );
        assert!(matches!(
            Fixtures::load(dir.path()).await,
            Err(FixtureError::Invalid { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_row_reports_line() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            PAYMENT_POINTERS_FILE,
            &format!(
                "id,url,asset_code,asset_scale\n{},https://wallet.example/alice,USD,2\nnot-a-uuid,https://x,USD,2\n",
                ALICE
            ),
        );
        match Fixtures::load(dir.path()).await {
            Err(FixtureError::Parse { file, line, .. }) => {
                assert_eq!(file, PAYMENT_POINTERS_FILE);
                assert_eq!(line, Some(3));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
