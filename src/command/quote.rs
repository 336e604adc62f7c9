//! `quote` command
//!
//! Creates one quote for a payment pointer and prints the quote resource as
//! JSON. A bare `--debit-amount` is in the payment pointer's asset and a
//! bare `--receive-amount` in the receiver's; `--asset-code`/`--asset-scale`
//! override either part.

use super::{block_on, CommandRunner};
use crate::api::CreateQuoteBody;
use crate::app::App;
use crate::cli::QuoteArgs;
use crate::core::ServiceConfig;
use crate::types::{Amount, Asset};
use std::io::Write;

pub struct QuoteCommand {
    args: QuoteArgs,
    config: ServiceConfig,
}

impl QuoteCommand {
    pub fn new(args: QuoteArgs, config: ServiceConfig) -> Self {
        Self { args, config }
    }

    fn amount(&self, value: u128, default: &Asset) -> Amount {
        Amount::new(
            value,
            self.args
                .asset_code
                .clone()
                .unwrap_or_else(|| default.code.clone()),
            self.args.asset_scale.unwrap_or(default.scale),
        )
    }

    async fn execute(&self, output: &mut dyn Write) -> Result<(), String> {
        let app = App::load(&self.args.fixtures, self.config.clone())
            .await
            .map_err(|e| e.to_string())?;
        let payment_pointer = app
            .payment_pointer(self.args.payment_pointer)
            .await
            .map_err(|e| e.to_string())?;

        let debit_amount = self
            .args
            .debit_amount
            .map(|value| self.amount(value, &payment_pointer.asset));
        let receive_amount = match self.args.receive_amount {
            Some(value) => {
                // Unknown receivers still go through the service for a proper 404
                let asset = app
                    .receiver(&self.args.receiver)
                    .await
                    .map_err(|e| e.to_string())?
                    .map(|receiver| receiver.asset)
                    .unwrap_or_else(|| payment_pointer.asset.clone());
                Some(self.amount(value, &asset))
            }
            None => None,
        };

        let body = CreateQuoteBody {
            receiver: self.args.receiver.clone(),
            debit_amount,
            receive_amount,
        };
        let quote = app
            .quotes()
            .create(&payment_pointer, body, self.args.client.clone())
            .await
            .map_err(|e| e.to_string())?;

        serde_json::to_writer_pretty(&mut *output, &quote)
            .map_err(|e| format!("Failed to write quote: {}", e))?;
        writeln!(output).map_err(|e| format!("Failed to write quote: {}", e))?;
        Ok(())
    }
}

impl CommandRunner for QuoteCommand {
    fn run(&self, output: &mut dyn Write) -> Result<(), String> {
        block_on(self.execute(output))
    }
}
