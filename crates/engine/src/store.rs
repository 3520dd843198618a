//! Record store: the persistence collaborator the engine reads from.
//!
//! Handlers never talk to a database directly; they receive an
//! `Arc<dyn RecordStore>` through the [`Engine`](crate::Engine), so tests can
//! swap the SQL-backed [`SeaStore`] for a [`MemoryStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{DateRange, Expense, Item, Money, Other, ResultEngine};

pub use memory::MemoryStore;
pub use sea::SeaStore;

mod memory;
mod sea;

/// Date column of `items` a range query filters on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemDateField {
    Purchase,
    Sold,
}

impl ItemDateField {
    /// Value of this field on `item`, if set.
    pub fn of(self, item: &Item) -> Option<DateTime<Utc>> {
        match self {
            Self::Purchase => Some(item.purchase_date),
            Self::Sold => item.sold_date,
        }
    }
}

/// Read/write access to the item, expense and other collections.
///
/// Range queries are inclusive on both ends and return records ordered by the
/// filtered date, ascending. Records whose date field is unset never match.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_items(&self, field: ItemDateField, range: &DateRange) -> ResultEngine<Vec<Item>>;

    async fn find_expenses(&self, range: &DateRange) -> ResultEngine<Vec<Expense>>;

    async fn find_other(&self, range: &DateRange) -> ResultEngine<Vec<Other>>;

    async fn insert_item(&self, item: &Item) -> ResultEngine<()>;

    /// Set sold price and date of an existing item.
    async fn mark_sold(&self, id: Uuid, price: Money, at: DateTime<Utc>) -> ResultEngine<()>;

    async fn insert_expense(&self, expense: &Expense) -> ResultEngine<()>;

    async fn insert_other(&self, other: &Other) -> ResultEngine<()>;
}
