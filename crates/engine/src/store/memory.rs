//! In-memory record store, used by tests and embedded setups.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ItemDateField, RecordStore};
use crate::{DateRange, EngineError, Expense, Item, Money, Other, ResultEngine};

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<Vec<Item>>,
    expenses: RwLock<Vec<Expense>>,
    other: RwLock<Vec<Other>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Keep the records whose `date` falls in `range`, ordered by that date.
fn select<T: Clone>(
    records: &[T],
    range: &DateRange,
    date: impl Fn(&T) -> Option<DateTime<Utc>>,
) -> Vec<T> {
    let mut selected: Vec<(DateTime<Utc>, T)> = records
        .iter()
        .filter_map(|record| {
            date(record)
                .filter(|at| range.contains(*at))
                .map(|at| (at, record.clone()))
        })
        .collect();
    selected.sort_by_key(|(at, _)| *at);
    selected.into_iter().map(|(_, record)| record).collect()
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_items(&self, field: ItemDateField, range: &DateRange) -> ResultEngine<Vec<Item>> {
        let items = self.items.read().await;
        Ok(select(&items, range, |item| field.of(item)))
    }

    async fn find_expenses(&self, range: &DateRange) -> ResultEngine<Vec<Expense>> {
        let expenses = self.expenses.read().await;
        Ok(select(&expenses, range, |expense| Some(expense.date)))
    }

    async fn find_other(&self, range: &DateRange) -> ResultEngine<Vec<Other>> {
        let other = self.other.read().await;
        Ok(select(&other, range, |entry| Some(entry.date)))
    }

    async fn insert_item(&self, item: &Item) -> ResultEngine<()> {
        self.items.write().await.push(item.clone());
        Ok(())
    }

    async fn mark_sold(&self, id: Uuid, price: Money, at: DateTime<Utc>) -> ResultEngine<()> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        item.sell(price, at)
    }

    async fn insert_expense(&self, expense: &Expense) -> ResultEngine<()> {
        self.expenses.write().await.push(expense.clone());
        Ok(())
    }

    async fn insert_other(&self, other: &Other) -> ResultEngine<()> {
        self.other.write().await.push(other.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;

    fn range(from: (i32, u32, u32), to: (i32, u32, u32)) -> DateRange {
        DateRange::from_days(
            NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap(),
            NaiveDate::from_ymd_opt(to.0, to.1, to.2).unwrap(),
        )
    }

    #[tokio::test]
    async fn item_queries_filter_on_the_requested_field() {
        let store = MemoryStore::new();
        let mut lamp = Item::new(
            "Lamp",
            Money::new(20_00),
            Utc.with_ymd_and_hms(2023, 12, 30, 10, 0, 0).unwrap(),
        )
        .unwrap();
        lamp.sell(
            Money::new(35_00),
            Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 0).unwrap(),
        )
        .unwrap();
        store.insert_item(&lamp).await.unwrap();

        let january = range((2024, 1, 1), (2024, 1, 31));
        let sold = store.find_items(ItemDateField::Sold, &january).await.unwrap();
        let bought = store
            .find_items(ItemDateField::Purchase, &january)
            .await
            .unwrap();
        assert_eq!(sold.len(), 1);
        assert!(bought.is_empty());
    }

    #[tokio::test]
    async fn results_are_sorted_by_date() {
        let store = MemoryStore::new();
        for day in [20, 3, 11] {
            let at = Utc.with_ymd_and_hms(2024, 5, day, 8, 0, 0).unwrap();
            let entry = Other::new(&format!("day {day}"), Money::new(1_00), at, None).unwrap();
            store.insert_other(&entry).await.unwrap();
        }

        let found = store
            .find_other(&range((2024, 5, 1), (2024, 5, 31)))
            .await
            .unwrap();
        let names: Vec<&str> = found.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["day 3", "day 11", "day 20"]);
    }

    #[tokio::test]
    async fn mark_sold_on_unknown_item_fails() {
        let store = MemoryStore::new();
        let err = store
            .mark_sold(Uuid::new_v4(), Money::new(1), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::KeyNotFound(_)));
    }
}
