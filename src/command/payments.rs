//! `payments` command
//!
//! Prints one page of the combined payment feed, as JSON (payments plus page
//! info) or as CSV rows.

use super::{block_on, CommandRunner};
use crate::api::ApiError;
use crate::app::App;
use crate::cli::{OutputFormat, PaymentsArgs};
use crate::core::ServiceConfig;
use crate::io::write_payments_csv;
use crate::types::{CombinedPayment, FilterIn, GetPageOptions, PageInfo, Pagination, PaymentFilter};
use serde::Serialize;
use std::io::Write;

/// JSON output of the `payments` command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPage {
    pub page_info: PageInfo,
    pub result: Vec<CombinedPayment>,
}

pub struct PaymentsCommand {
    args: PaymentsArgs,
    config: ServiceConfig,
}

impl PaymentsCommand {
    pub fn new(args: PaymentsArgs, config: ServiceConfig) -> Self {
        Self { args, config }
    }

    /// Translate flags into page options; repeated flags become `in` lists
    pub fn page_options(&self) -> GetPageOptions {
        let args = &self.args;
        let pagination = Pagination {
            after: args.after,
            before: args.before,
            first: args.first,
            last: args.last,
        };
        let filter = PaymentFilter {
            payment_pointer_id: (!args.payment_pointers.is_empty())
                .then(|| FilterIn::new(args.payment_pointers.clone())),
            payment_type: (!args.types.is_empty()).then(|| FilterIn::new(args.types.clone())),
        };
        GetPageOptions {
            pagination: Some(pagination),
            filter: Some(filter),
        }
    }

    async fn execute(&self, output: &mut dyn Write) -> Result<(), String> {
        let app = App::load(&self.args.fixtures, self.config.clone())
            .await
            .map_err(|e| e.to_string())?;

        let options = self.page_options();
        let filter = options.filter.clone();
        let page = app
            .payments()
            .get_page(options)
            .await
            .map_err(|e| ApiError::from(e).to_string())?;

        match self.args.format {
            OutputFormat::Csv => write_payments_csv(&page, output)
                .map_err(|e| format!("Failed to write page: {}", e)),
            OutputFormat::Json => {
                let page_info = app
                    .payments()
                    .get_page_info(&page, filter.as_ref())
                    .await
                    .map_err(|e| ApiError::from(e).to_string())?;
                let body = PaymentPage {
                    page_info,
                    result: page,
                };
                serde_json::to_writer_pretty(&mut *output, &body)
                    .map_err(|e| format!("Failed to write page: {}", e))?;
                writeln!(output).map_err(|e| format!("Failed to write page: {}", e))
            }
        }
    }
}

impl CommandRunner for PaymentsCommand {
    fn run(&self, output: &mut dyn Write) -> Result<(), String> {
        block_on(self.execute(output))
    }
}
