//! Keyset pagination types
//!
//! Records are totally ordered by `(created_at, id)`. A caller's
//! [`Pagination`] request is resolved into a [`PageWindow`], the uniform
//! shape the cursor merger consumes.

use super::error::PageError;
use super::payment::PaymentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Position of a record in the `(created_at, id)` total order
///
/// Field order matters: the derived `Ord` compares `created_at` first and
/// breaks ties on `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

impl SortKey {
    pub fn new(created_at: DateTime<Utc>, id: Uuid) -> Self {
        SortKey { created_at, id }
    }
}

/// Anything that has a position in the pagination order
pub trait Keyed {
    fn sort_key(&self) -> SortKey;
}

/// Traversal direction relative to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Records after the cursor, ascending
    #[default]
    Forward,
    /// Records before the cursor, queried descending
    Backward,
}

/// Raw pagination arguments, as supplied by a caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<usize>,
}

/// Resolved window request: direction, bound and optional cursor id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub direction: Direction,
    pub limit: usize,
    pub cursor: Option<Uuid>,
}

impl Pagination {
    /// Resolve into a window
    ///
    /// `first`/`last` must lie in `1..=max_size`; `default_size` applies
    /// when neither is given. Backward windows need a `before` cursor.
    pub fn resolve(&self, default_size: usize, max_size: usize) -> Result<PageWindow, PageError> {
        if self.first.is_some() && self.last.is_some() {
            return Err(PageError::invalid("first and last cannot both be set"));
        }
        if self.after.is_some() && self.before.is_some() {
            return Err(PageError::invalid("after and before cannot both be set"));
        }
        for (name, size) in [("first", self.first), ("last", self.last)] {
            if let Some(size) = size {
                if size == 0 || size > max_size {
                    return Err(PageError::invalid(format!(
                        "{} must be between 1 and {}",
                        name, max_size
                    )));
                }
            }
        }

        if self.last.is_some() || self.before.is_some() {
            let cursor = self
                .before
                .ok_or_else(|| PageError::invalid("cannot paginate backwards from the start"))?;
            return Ok(PageWindow {
                direction: Direction::Backward,
                limit: self.last.unwrap_or(default_size),
                cursor: Some(cursor),
            });
        }

        Ok(PageWindow {
            direction: Direction::Forward,
            limit: self.first.unwrap_or(default_size),
            cursor: self.after,
        })
    }
}

/// Query issued against one source table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub direction: Direction,
    pub limit: usize,
    /// Exclusive bound: rows strictly after (forward) or before (backward)
    pub cursor: Option<SortKey>,
    /// Owning payment pointers to restrict to, `None` for all
    pub payment_pointer_ids: Option<Vec<Uuid>>,
}

impl PageQuery {
    /// Whether a row at `key` owned by `owner` falls inside this query
    pub fn admits(&self, key: &SortKey, owner: Uuid) -> bool {
        let in_window = match (self.cursor, self.direction) {
            (None, _) => true,
            (Some(cursor), Direction::Forward) => *key > cursor,
            (Some(cursor), Direction::Backward) => *key < cursor,
        };
        in_window
            && self
                .payment_pointer_ids
                .as_ref()
                .is_none_or(|ids| ids.contains(&owner))
    }
}

/// `{ in: [...] }` filter clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterIn<T> {
    #[serde(rename = "in")]
    pub values: Vec<T>,
}

impl<T> FilterIn<T> {
    pub fn new(values: Vec<T>) -> Self {
        FilterIn { values }
    }
}

/// Filters accepted by the combined payment feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_pointer_id: Option<FilterIn<Uuid>>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<FilterIn<PaymentType>>,
}

impl PaymentFilter {
    /// Restrict to the given owning payment pointers
    pub fn by_payment_pointer(ids: Vec<Uuid>) -> Self {
        PaymentFilter {
            payment_pointer_id: Some(FilterIn::new(ids)),
            payment_type: None,
        }
    }

    /// Restrict to the given payment types
    pub fn by_type(types: Vec<PaymentType>) -> Self {
        PaymentFilter {
            payment_pointer_id: None,
            payment_type: Some(FilterIn::new(types)),
        }
    }

    /// Whether records of `payment_type` can appear at all
    pub fn includes_type(&self, payment_type: PaymentType) -> bool {
        self.payment_type
            .as_ref()
            .is_none_or(|filter| filter.values.contains(&payment_type))
    }
}

/// Arguments of `CombinedPaymentService::get_page`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPageOptions {
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub filter: Option<PaymentFilter>,
}

/// Cursor metadata describing one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub start_cursor: Option<Uuid>,
    pub end_cursor: Option<Uuid>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}
