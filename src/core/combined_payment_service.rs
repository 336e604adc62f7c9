//! Combined payment service
//!
//! Read-only feed over outgoing and incoming payments. Pagination arguments
//! are resolved against the configured page sizes, then the cursor merger
//! builds the page from one consistent read view.

use super::config::ServiceConfig;
use super::merger;
use super::traits::PaymentStore;
use crate::types::{
    CombinedPayment, Direction, GetPageOptions, Keyed, PageError, PageInfo, PaymentFilter,
};
use std::sync::Arc;

/// Paginated access to the union of both payment tables
#[derive(Clone)]
pub struct CombinedPaymentService {
    store: Arc<dyn PaymentStore>,
    config: ServiceConfig,
}

impl CombinedPaymentService {
    pub fn new(store: Arc<dyn PaymentStore>, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    /// Get one page of payments
    ///
    /// # Arguments
    ///
    /// * `options` - Optional pagination and filter; absent means the first
    ///   `default_page_size` payments of every type and owner
    ///
    /// # Returns
    ///
    /// Payments in ascending `(created_at, id)` order. No matches is an empty
    /// page, not an error.
    pub async fn get_page(&self, options: GetPageOptions) -> Result<Vec<CombinedPayment>, PageError> {
        let window = options
            .pagination
            .unwrap_or_default()
            .resolve(self.config.default_page_size, self.config.max_page_size)?;
        let filter = options.filter.unwrap_or_default();

        let view = self.store.read_view().await?;
        merger::page(view.as_ref(), &window, &filter).await
    }

    /// Cursor metadata for a page previously returned by [`get_page`](Self::get_page)
    ///
    /// Neighbour checks use the same `filter` the page was fetched with.
    pub async fn get_page_info(
        &self,
        page: &[CombinedPayment],
        filter: Option<&PaymentFilter>,
    ) -> Result<PageInfo, PageError> {
        let (Some(first), Some(last)) = (page.first(), page.last()) else {
            return Ok(PageInfo::default());
        };
        let default_filter = PaymentFilter::default();
        let filter = filter.unwrap_or(&default_filter);

        let view = self.store.read_view().await?;
        let next = merger::page_from_key(
            view.as_ref(),
            Direction::Forward,
            1,
            Some(last.sort_key()),
            filter,
        )
        .await?;
        let previous = merger::page_from_key(
            view.as_ref(),
            Direction::Backward,
            1,
            Some(first.sort_key()),
            filter,
        )
        .await?;

        Ok(PageInfo {
            start_cursor: Some(first.id()),
            end_cursor: Some(last.id()),
            has_next_page: !next.is_empty(),
            has_previous_page: !previous.is_empty(),
        })
    }
}
