//! Open Payments CLI
//!
//! Command-line interface for creating quotes and paging through payments
//! of accounts described by a fixture directory.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- quote --fixtures demo --payment-pointer <ID> \
//!     --receiver https://wallet2.example/bob/incoming-payments/1 --debit-amount 1000
//! cargo run -- payments --fixtures demo --first 10 --format csv > page.csv
//! cargo run -- payments --fixtures demo --type incoming --payment-pointer <ID>
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` or `--log-level` to see them.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unreadable fixtures, rejected request, output failure, etc.)

use rust_open_payments::cli;
use rust_open_payments::command;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = args.to_service_config();
    let runner = command::create_runner(args.command, config);

    // Output goes to stdout
    let mut output = std::io::stdout();
    if let Err(e) = runner.run(&mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
