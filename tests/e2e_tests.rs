//! End-to-end integration tests
//!
//! These tests run the CLI command runners against fixture directories in
//! tests/fixtures/:
//! - `combined_feed` - Two payment pointers with interleaved outgoing and
//!   incoming payments, including same-timestamp ties
//! - `quoting` - One payment pointer, a rate table, and receivers that are
//!   open, invoiced, fully paid, expired, or in an unsupported asset
//! - `malformed_amount` - A payment row whose amount is not an integer
//!
//! Payment pages are written as CSV and compared with `expected_*.csv`.
//! Quotes carry fresh ids and wall-clock timestamps, so their JSON output is
//! checked field by field.

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_open_payments::cli::{OutputFormat, PaymentsArgs, QuoteArgs};
    use rust_open_payments::command::{CommandRunner, PaymentsCommand, QuoteCommand};
    use rust_open_payments::{PaymentType, ServiceConfig};
    use std::fs;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;
    use uuid::Uuid;

    const ALICE: &str = "00000000-0000-0000-0000-00000000000a";
    const BOB: &str = "00000000-0000-0000-0000-00000000000b";

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(format!("tests/fixtures/{}", name))
    }

    fn payments_args(name: &str) -> PaymentsArgs {
        PaymentsArgs {
            fixtures: fixture(name),
            payment_pointers: Vec::new(),
            types: Vec::new(),
            first: None,
            last: None,
            after: None,
            before: None,
            format: OutputFormat::Csv,
        }
    }

    fn quote_args(receiver: &str) -> QuoteArgs {
        QuoteArgs {
            fixtures: fixture("quoting"),
            payment_pointer: ALICE.parse().unwrap(),
            receiver: receiver.to_string(),
            debit_amount: None,
            receive_amount: None,
            asset_code: None,
            asset_scale: None,
            client: None,
        }
    }

    /// Run a runner into a temp file and return what it wrote
    fn run_to_string(runner: &dyn CommandRunner) -> Result<String, String> {
        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");
        runner.run(&mut temp_output)?;
        temp_output.flush().expect("Failed to flush temp file");
        Ok(fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e)))
    }

    fn run_quote(args: QuoteArgs) -> Result<serde_json::Value, String> {
        let output = run_to_string(&QuoteCommand::new(args, ServiceConfig::default()))?;
        Ok(serde_json::from_str(&output).expect("quote output is JSON"))
    }

    /// Run a payments page against combined_feed and compare with an expected CSV
    fn run_payments_fixture(args: PaymentsArgs, expected_file: &str) {
        let expected_path = format!("tests/fixtures/combined_feed/{}", expected_file);
        let actual_output = run_to_string(&PaymentsCommand::new(args.clone(), ServiceConfig::default()))
            .unwrap_or_else(|e| panic!("Failed to page payments: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for {} ({:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            expected_file, args, actual_output, expected_output
        );
    }

    #[rstest]
    #[case::all(payments_args("combined_feed"), "expected_all.csv")]
    #[case::first_page(PaymentsArgs { first: Some(2), ..payments_args("combined_feed") }, "expected_first_page.csv")]
    #[case::after_cursor(
        PaymentsArgs { first: Some(2), after: Some(id(1)), ..payments_args("combined_feed") },
        "expected_after_cursor.csv"
    )]
    #[case::before_cursor(
        PaymentsArgs { last: Some(2), before: Some(id(5)), ..payments_args("combined_feed") },
        "expected_before_cursor.csv"
    )]
    #[case::outgoing_only(
        PaymentsArgs { types: vec![PaymentType::Outgoing], ..payments_args("combined_feed") },
        "expected_outgoing.csv"
    )]
    #[case::alice_only(
        PaymentsArgs { payment_pointers: vec![ALICE.parse().unwrap()], ..payments_args("combined_feed") },
        "expected_alice.csv"
    )]
    #[case::bob_incoming(
        PaymentsArgs {
            payment_pointers: vec![BOB.parse().unwrap()],
            types: vec![PaymentType::Incoming],
            ..payments_args("combined_feed")
        },
        "expected_bob_incoming.csv"
    )]
    #[case::unknown_owner(
        PaymentsArgs { payment_pointers: vec![id(12)], ..payments_args("combined_feed") },
        "expected_empty.csv"
    )]
    fn test_payment_pages(#[case] args: PaymentsArgs, #[case] expected_file: &str) {
        run_payments_fixture(args, expected_file);
    }

    #[rstest]
    #[case::unknown_cursor(PaymentsArgs { after: Some(id(99)), ..payments_args("combined_feed") }, "400")]
    #[case::first_and_last(PaymentsArgs { first: Some(1), last: Some(1), before: Some(id(1)), ..payments_args("combined_feed") }, "400")]
    #[case::too_large(PaymentsArgs { first: Some(101), ..payments_args("combined_feed") }, "400")]
    #[case::malformed_fixture(payments_args("malformed_amount"), "outgoing_payments.csv")]
    #[case::missing_fixture(payments_args("does_not_exist"), "payment_pointers.csv")]
    fn test_payment_page_errors(#[case] args: PaymentsArgs, #[case] expected_fragment: &str) {
        let err = run_to_string(&PaymentsCommand::new(args, ServiceConfig::default())).unwrap_err();
        assert!(
            err.contains(expected_fragment),
            "error '{}' does not mention '{}'",
            err,
            expected_fragment
        );
    }

    #[test]
    fn test_payment_page_json() {
        let args = PaymentsArgs {
            first: Some(2),
            after: Some(id(2)),
            format: OutputFormat::Json,
            ..payments_args("combined_feed")
        };
        let output = run_to_string(&PaymentsCommand::new(args, ServiceConfig::default())).unwrap();
        let page: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(page["result"][0]["type"], "OUTGOING");
        assert_eq!(page["result"][0]["id"], id(1).to_string());
        assert_eq!(page["result"][0]["debitAmount"]["value"], "1000");
        assert_eq!(page["result"][1]["type"], "INCOMING");
        assert_eq!(page["result"][1]["createdAt"], "2023-11-14T11:00:00.000Z");
        assert_eq!(page["pageInfo"]["startCursor"], id(1).to_string());
        assert_eq!(page["pageInfo"]["endCursor"], id(3).to_string());
        assert_eq!(page["pageInfo"]["hasNextPage"], true);
        assert_eq!(page["pageInfo"]["hasPreviousPage"], true);
    }

    #[rstest]
    #[case::fixed_debit(
        QuoteArgs { debit_amount: Some(1000), ..quote_args("https://wallet2.example/bob/incoming-payments/open") },
        "1000",
        "900"
    )]
    #[case::fixed_receive(
        QuoteArgs { receive_amount: Some(900), ..quote_args("https://wallet2.example/bob/incoming-payments/open") },
        "1000",
        "900"
    )]
    #[case::invoice_remaining(quote_args("https://wallet2.example/bob/incoming-payments/invoice"), "667", "600")]
    fn test_quotes(#[case] args: QuoteArgs, #[case] debit: &str, #[case] receive: &str) {
        let receiver = args.receiver.clone();
        let quote = run_quote(args).unwrap();

        let quote_id = quote["id"].as_str().unwrap();
        let suffix = quote_id
            .strip_prefix("https://wallet.example/alice/quotes/")
            .unwrap_or_else(|| panic!("unexpected quote id {}", quote_id));
        assert!(Uuid::parse_str(suffix).is_ok());
        assert_eq!(quote["paymentPointer"], "https://wallet.example/alice");
        assert_eq!(quote["receiver"], receiver.as_str());
        assert_eq!(quote["debitAmount"]["value"], debit);
        assert_eq!(quote["debitAmount"]["assetCode"], "USD");
        assert_eq!(quote["debitAmount"]["assetScale"], 2);
        assert_eq!(quote["receiveAmount"]["value"], receive);
        assert_eq!(quote["receiveAmount"]["assetCode"], "EUR");

        let created_at = chrono::DateTime::parse_from_rfc3339(quote["createdAt"].as_str().unwrap()).unwrap();
        let expires_at = chrono::DateTime::parse_from_rfc3339(quote["expiresAt"].as_str().unwrap()).unwrap();
        assert_eq!(expires_at - created_at, chrono::Duration::minutes(5));
    }

    #[rstest]
    #[case::scale_mismatch(
        QuoteArgs { debit_amount: Some(1000), asset_scale: Some(3), ..quote_args("https://wallet2.example/bob/incoming-payments/open") },
        "400: invalid amount"
    )]
    #[case::zero_amount(
        QuoteArgs { debit_amount: Some(0), ..quote_args("https://wallet2.example/bob/incoming-payments/open") },
        "400: non-positive amount"
    )]
    #[case::receive_for_invoice(
        QuoteArgs { receive_amount: Some(10), ..quote_args("https://wallet2.example/bob/incoming-payments/invoice") },
        "400: invalid amount"
    )]
    #[case::no_amount_open_receiver(quote_args("https://wallet2.example/bob/incoming-payments/open"), "400: invalid receiver")]
    #[case::already_paid(quote_args("https://wallet2.example/bob/incoming-payments/paid"), "400: invalid receiver")]
    #[case::expired(
        QuoteArgs { debit_amount: Some(1000), ..quote_args("https://wallet2.example/bob/incoming-payments/expired") },
        "400: invalid receiver"
    )]
    #[case::unknown_receiver(
        QuoteArgs { debit_amount: Some(1000), ..quote_args("https://nowhere.example/incoming-payments/1") },
        "404: unknown receiver"
    )]
    #[case::unknown_payment_pointer(
        QuoteArgs { debit_amount: Some(1000), payment_pointer: id(12), ..quote_args("https://wallet2.example/bob/incoming-payments/open") },
        "404: unknown payment pointer"
    )]
    #[case::unsupported_rate(
        QuoteArgs { debit_amount: Some(1000), ..quote_args("https://wallet3.example/yuki/incoming-payments/1") },
        "500: Error trying to create quote"
    )]
    fn test_quote_errors(#[case] args: QuoteArgs, #[case] expected: &str) {
        assert_eq!(run_quote(args).unwrap_err(), expected);
    }
}
