use crate::core::config::ServiceConfig;
use crate::types::{parse_amount_value, PaymentType};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Create quotes and page through payments of Open Payments accounts
#[derive(Parser, Debug)]
#[command(name = "open-payments")]
#[command(about = "Create quotes and page through payments of Open Payments accounts", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Seconds between a quote's creation and its expiry
    #[arg(
        long = "quote-lifetime-secs",
        value_name = "SECS",
        global = true,
        help = "Quote lifetime in seconds (default: 300)"
    )]
    pub quote_lifetime_secs: Option<u64>,

    /// Timeout for one rate lookup
    #[arg(
        long = "rate-timeout-ms",
        value_name = "MS",
        global = true,
        help = "Rate lookup timeout in milliseconds (default: 10000)"
    )]
    pub rate_timeout_ms: Option<u64>,

    /// Page size when neither --first nor --last is given
    #[arg(
        long = "page-size",
        value_name = "SIZE",
        global = true,
        help = "Default page size (default: 20)"
    )]
    pub page_size: Option<usize>,

    /// Largest accepted --first/--last
    #[arg(
        long = "max-page-size",
        value_name = "SIZE",
        global = true,
        help = "Maximum page size (default: 100)"
    )]
    pub max_page_size: Option<usize>,

    /// Log filter, overridden by RUST_LOG
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        global = true,
        default_value = "warn",
        help = "Log level or filter directive, e.g. 'info' or 'rust_open_payments=debug'"
    )]
    pub log_level: String,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a quote and print it as JSON
    Quote(QuoteArgs),
    /// Print one page of the combined payment feed
    Payments(PaymentsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct QuoteArgs {
    /// Fixture directory
    #[arg(long = "fixtures", value_name = "DIR")]
    pub fixtures: PathBuf,

    /// Id of the paying payment pointer
    #[arg(long = "payment-pointer", value_name = "ID")]
    pub payment_pointer: Uuid,

    /// Receiver URL
    #[arg(long = "receiver", value_name = "URL")]
    pub receiver: String,

    /// Fixed debit amount in minor units of the payment pointer's asset
    #[arg(
        long = "debit-amount",
        value_name = "VALUE",
        value_parser = parse_amount_value,
        conflicts_with = "receive_amount"
    )]
    pub debit_amount: Option<u128>,

    /// Fixed receive amount in minor units of the receiver's asset
    #[arg(long = "receive-amount", value_name = "VALUE", value_parser = parse_amount_value)]
    pub receive_amount: Option<u128>,

    /// Asset code of the fixed amount, when it differs from the default asset
    #[arg(long = "asset-code", value_name = "CODE")]
    pub asset_code: Option<String>,

    /// Asset scale of the fixed amount, when it differs from the default asset
    #[arg(long = "asset-scale", value_name = "SCALE")]
    pub asset_scale: Option<u8>,

    /// Client identifier recorded on the quote
    #[arg(long = "client", value_name = "CLIENT")]
    pub client: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PaymentsArgs {
    /// Fixture directory
    #[arg(long = "fixtures", value_name = "DIR")]
    pub fixtures: PathBuf,

    /// Restrict to payments owned by this payment pointer (repeatable)
    #[arg(long = "payment-pointer", value_name = "ID")]
    pub payment_pointers: Vec<Uuid>,

    /// Restrict to this payment type (repeatable)
    #[arg(long = "type", value_name = "TYPE")]
    pub types: Vec<PaymentType>,

    /// Page forward: number of payments after the cursor
    #[arg(long = "first", value_name = "N")]
    pub first: Option<usize>,

    /// Page backward: number of payments before the cursor
    #[arg(long = "last", value_name = "N")]
    pub last: Option<usize>,

    /// Cursor: id of the payment to page forward from
    #[arg(long = "after", value_name = "ID")]
    pub after: Option<Uuid>,

    /// Cursor: id of the payment to page backward from
    #[arg(long = "before", value_name = "ID")]
    pub before: Option<Uuid>,

    /// Output format
    #[arg(long = "format", value_name = "FORMAT", default_value = "json")]
    pub format: OutputFormat,
}

/// Output formats for payment pages
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl CliArgs {
    /// Create a ServiceConfig from CLI arguments
    ///
    /// Missing values use the defaults. Zero values fall back to the defaults
    /// with a warning.
    pub fn to_service_config(&self) -> ServiceConfig {
        let default = ServiceConfig::default();
        ServiceConfig::new(
            self.quote_lifetime_secs
                .map(Duration::from_secs)
                .unwrap_or(default.quote_lifetime),
            self.rate_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(default.rate_timeout),
            self.page_size.unwrap_or(default.default_page_size),
            self.max_page_size.unwrap_or(default.max_page_size),
        )
    }
}
