use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

pub use encoder::{CsvEncoder, CsvRecord};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseRow};
pub use items::Item;
pub use money::Money;
pub use other::{Other, OtherRow};
pub use range::{DateRange, INVALID_RANGE, MISSING_RANGE};
pub use store::{ItemDateField, MemoryStore, RecordStore, SeaStore};
pub use transactions::{Transaction, TransactionType, combine, purchases, sales};

mod encoder;
mod error;
mod expenses;
mod items;
mod money;
mod other;
mod range;
mod store;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;

/// Entry point of the export pipeline.
///
/// Cheap to clone: every clone shares the same record store.
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn RecordStore>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Sale views of the items sold inside `range`.
    pub async fn sales_between(&self, range: &DateRange) -> ResultEngine<Vec<Transaction>> {
        let items = self.store.find_items(ItemDateField::Sold, range).await?;
        Ok(sales(&items))
    }

    /// Purchase views of the items bought inside `range`.
    pub async fn purchases_between(&self, range: &DateRange) -> ResultEngine<Vec<Transaction>> {
        let items = self.store.find_items(ItemDateField::Purchase, range).await?;
        Ok(purchases(&items))
    }

    /// Every sale and purchase inside `range`, ordered by effective date.
    ///
    /// The two item queries are independent reads, not one atomic snapshot.
    pub async fn transactions_between(&self, range: &DateRange) -> ResultEngine<Vec<Transaction>> {
        let sold = self.sales_between(range).await?;
        let bought = self.purchases_between(range).await?;
        tracing::debug!(
            sales = sold.len(),
            purchases = bought.len(),
            "collected transactions"
        );
        Ok(combine(sold, bought))
    }

    pub async fn expenses_between(&self, range: &DateRange) -> ResultEngine<Vec<ExpenseRow>> {
        let expenses = self.store.find_expenses(range).await?;
        tracing::debug!(rows = expenses.len(), "collected expenses");
        Ok(expenses.into_iter().map(ExpenseRow::from).collect())
    }

    pub async fn other_between(&self, range: &DateRange) -> ResultEngine<Vec<OtherRow>> {
        let other = self.store.find_other(range).await?;
        tracing::debug!(rows = other.len(), "collected other entries");
        Ok(other.into_iter().map(OtherRow::from).collect())
    }

    /// Store a newly bought item.
    pub async fn add_item(&self, item: Item) -> ResultEngine<Uuid> {
        self.store.insert_item(&item).await?;
        Ok(item.id)
    }

    /// Record the sale of a stored item.
    pub async fn sell_item(&self, id: Uuid, price: Money, at: DateTime<Utc>) -> ResultEngine<()> {
        if price.is_negative() {
            return Err(EngineError::InvalidAmount(
                "sold price must be >= 0".to_string(),
            ));
        }
        self.store.mark_sold(id, price, at).await
    }

    pub async fn add_expense(&self, expense: Expense) -> ResultEngine<Uuid> {
        self.store.insert_expense(&expense).await?;
        Ok(expense.id)
    }

    pub async fn add_other(&self, other: Other) -> ResultEngine<Uuid> {
        self.store.insert_other(&other).await?;
        Ok(other.id)
    }
}

#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn RecordStore>>,
}

impl EngineBuilder {
    /// Back the engine with a SQL database (schema from the `migration` crate).
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.store = Some(Arc::new(SeaStore::new(db)));
        self
    }

    /// Back the engine with any record store.
    pub fn store(mut self, store: Arc<dyn RecordStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let store = self
            .store
            .ok_or_else(|| EngineError::KeyNotFound("record store".to_string()))?;
        Ok(Engine { store })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;

    fn january() -> DateRange {
        DateRange::from_days(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    fn engine() -> Engine {
        Engine::builder()
            .store(Arc::new(MemoryStore::new()))
            .build()
            .unwrap()
    }

    #[test]
    fn build_without_store_fails() {
        assert!(Engine::builder().build().is_err());
    }

    #[tokio::test]
    async fn item_bought_and_sold_in_range_yields_two_rows() {
        let engine = engine();
        let lamp = Item::new(
            "Lamp",
            Money::new(20_00),
            Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap(),
        )
        .unwrap();
        let id = engine.add_item(lamp).await.unwrap();
        engine
            .sell_item(
                id,
                Money::new(35_00),
                Utc.with_ymd_and_hms(2024, 1, 20, 18, 0, 0).unwrap(),
            )
            .await
            .unwrap();

        let rows = engine.transactions_between(&january()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].transaction_type, TransactionType::Purchase);
        assert_eq!(rows[0].profit, Money::new(-20_00));
        assert_eq!(rows[1].transaction_type, TransactionType::Sale);
        assert_eq!(rows[1].profit, Money::new(15_00));
    }

    #[tokio::test]
    async fn sale_of_item_bought_earlier_yields_only_the_sale() {
        let engine = engine();
        let mut vase = Item::new(
            "Vase",
            Money::new(5_00),
            Utc.with_ymd_and_hms(2023, 11, 2, 9, 0, 0).unwrap(),
        )
        .unwrap();
        vase.sell(
            Money::new(8_00),
            Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap(),
        )
        .unwrap();
        engine.add_item(vase).await.unwrap();

        let rows = engine.transactions_between(&january()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_type, TransactionType::Sale);
    }

    #[tokio::test]
    async fn negative_sale_price_is_rejected() {
        let engine = engine();
        let err = engine
            .sell_item(Uuid::new_v4(), Money::new(-1), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
}
