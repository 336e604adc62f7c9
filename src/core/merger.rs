//! Payment cursor merger
//!
//! Outgoing and incoming payments are stored in disjoint tables that share
//! the `(created_at, id)` order. A page over their union is built by issuing
//! the same keyset query against each table and merging the two ordered
//! results, without ever materializing a combined table:
//!
//! 1. Resolve the cursor id into a [`SortKey`] through the read view
//! 2. Query each table the filter allows, both bounded by `limit`
//! 3. Merge the ordered results and truncate to `limit`
//! 4. Reverse backward pages back into ascending order
//!
//! Each source returns at most `limit` rows, so the merged page is exact:
//! any row of the true union page is among the first `limit` rows of its own
//! table.

use crate::core::traits::PaymentReadView;
use crate::types::{
    CombinedPayment, Direction, Keyed, PageError, PageQuery, PageWindow, PaymentFilter,
    PaymentType, SortKey, StoreError,
};
use futures::future::{try_join_all, BoxFuture, FutureExt};
use tracing::debug;

/// Merge ordered sources into one ordered list of at most `limit` rows
///
/// Every source must already be ordered for `direction`: ascending for
/// [`Direction::Forward`], descending for [`Direction::Backward`]. The
/// output keeps that order.
///
/// # Arguments
///
/// * `sources` - Independently ordered row lists
/// * `direction` - Order the sources are in
/// * `limit` - Maximum number of rows to take
pub fn merge_sorted<T: Keyed>(sources: Vec<Vec<T>>, direction: Direction, limit: usize) -> Vec<T> {
    let mut heads: Vec<_> = sources
        .into_iter()
        .map(|source| source.into_iter().peekable())
        .collect();
    let mut merged = Vec::with_capacity(limit);

    while merged.len() < limit {
        let next = heads
            .iter_mut()
            .enumerate()
            .filter_map(|(index, head)| head.peek().map(|row| (index, row.sort_key())))
            .reduce(|best, candidate| {
                if precedes(&candidate.1, &best.1, direction) {
                    candidate
                } else {
                    best
                }
            });
        let Some((index, _)) = next else {
            break;
        };
        if let Some(row) = heads[index].next() {
            merged.push(row);
        }
    }

    merged
}

fn precedes(a: &SortKey, b: &SortKey, direction: Direction) -> bool {
    match direction {
        Direction::Forward => a < b,
        Direction::Backward => a > b,
    }
}

/// Build one page of the combined feed from a resolved window
///
/// # Arguments
///
/// * `view` - Read view every source query runs against
/// * `window` - Resolved direction, limit and cursor id
/// * `filter` - Type and payment pointer restrictions
///
/// # Returns
///
/// Up to `window.limit` payments in ascending `(created_at, id)` order, or
/// `PageError::UnknownCursor` when the cursor id matches no payment.
pub async fn page(
    view: &dyn PaymentReadView,
    window: &PageWindow,
    filter: &PaymentFilter,
) -> Result<Vec<CombinedPayment>, PageError> {
    let cursor = match window.cursor {
        Some(id) => Some(
            view.sort_key_of(id)
                .await?
                .ok_or(PageError::UnknownCursor { id })?,
        ),
        None => None,
    };
    Ok(page_from_key(view, window.direction, window.limit, cursor, filter).await?)
}

/// Build one page of the combined feed from an already resolved cursor key
pub async fn page_from_key(
    view: &dyn PaymentReadView,
    direction: Direction,
    limit: usize,
    cursor: Option<SortKey>,
    filter: &PaymentFilter,
) -> Result<Vec<CombinedPayment>, StoreError> {
    let payment_pointer_ids = filter
        .payment_pointer_id
        .as_ref()
        .map(|ids| ids.values.clone());
    if payment_pointer_ids.as_ref().is_some_and(|ids| ids.is_empty()) {
        debug!("Empty payment pointer filter, returning empty page");
        return Ok(Vec::new());
    }

    let query = PageQuery {
        direction,
        limit,
        cursor,
        payment_pointer_ids,
    };

    let mut fetches = Vec::with_capacity(PaymentType::ALL.len());
    for payment_type in PaymentType::ALL {
        if filter.includes_type(payment_type) {
            fetches.push(fetch(view, payment_type, &query));
        } else {
            debug!(%payment_type, "Skipping source excluded by type filter");
        }
    }

    let sources = try_join_all(fetches).await?;
    let mut merged = merge_sorted(sources, direction, limit);
    if direction == Direction::Backward {
        merged.reverse();
    }
    debug!(?direction, limit, rows = merged.len(), "Merged payment page");
    Ok(merged)
}

/// Query one source table and lift its rows into the combined projection
fn fetch<'a>(
    view: &'a dyn PaymentReadView,
    payment_type: PaymentType,
    query: &'a PageQuery,
) -> BoxFuture<'a, Result<Vec<CombinedPayment>, StoreError>> {
    match payment_type {
        PaymentType::Outgoing => async move {
            let rows = view.outgoing_page(query).await?;
            Ok(rows.into_iter().map(CombinedPayment::from).collect())
        }
        .boxed(),
        PaymentType::Incoming => async move {
            let rows = view.incoming_page(query).await?;
            Ok(rows.into_iter().map(CombinedPayment::from).collect())
        }
        .boxed(),
    }
}
