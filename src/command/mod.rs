//! Command runners for the CLI
//!
//! Each subcommand is a [`CommandRunner`]: it loads its fixture directory,
//! wires the services, runs one request against them and writes the result.
//! Runners own their tokio runtime so `main` stays synchronous.

use crate::cli::Command;
use crate::core::ServiceConfig;
use std::future::Future;
use std::io::Write;

pub mod payments;
pub mod quote;

pub use payments::PaymentsCommand;
pub use quote::QuoteCommand;

/// One CLI command, from fixtures to output
pub trait CommandRunner: Send + Sync {
    /// Run the command and write its result to `output`
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the command succeeded
    /// * `Err(String)` with a caller-facing message otherwise (fixture
    ///   errors, rejected requests, output failures)
    fn run(&self, output: &mut dyn Write) -> Result<(), String>;
}

/// Create the runner for a parsed command
pub fn create_runner(command: Command, config: ServiceConfig) -> Box<dyn CommandRunner> {
    match command {
        Command::Quote(args) => Box::new(QuoteCommand::new(args, config)),
        Command::Payments(args) => Box::new(PaymentsCommand::new(args, config)),
    }
}

/// Drive `future` to completion on a fresh multi-threaded runtime
pub(crate) fn block_on<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;
    runtime.block_on(future)
}
