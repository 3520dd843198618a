//! SQL-backed record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use super::{ItemDateField, RecordStore};
use crate::{
    DateRange, EngineError, Expense, Item, Money, Other, ResultEngine, expenses, items, other,
};

#[derive(Clone, Debug)]
pub struct SeaStore {
    database: DatabaseConnection,
}

impl SeaStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl RecordStore for SeaStore {
    async fn find_items(&self, field: ItemDateField, range: &DateRange) -> ResultEngine<Vec<Item>> {
        let column = match field {
            ItemDateField::Purchase => items::Column::PurchaseDate,
            ItemDateField::Sold => items::Column::SoldDate,
        };

        let models = items::Entity::find()
            .filter(column.gte(range.start))
            .filter(column.lte(range.end))
            .order_by_asc(column)
            .all(&self.database)
            .await?;

        models.into_iter().map(Item::try_from).collect()
    }

    async fn find_expenses(&self, range: &DateRange) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::Date.gte(range.start))
            .filter(expenses::Column::Date.lte(range.end))
            .order_by_asc(expenses::Column::Date)
            .all(&self.database)
            .await?;

        models.into_iter().map(Expense::try_from).collect()
    }

    async fn find_other(&self, range: &DateRange) -> ResultEngine<Vec<Other>> {
        let models = other::Entity::find()
            .filter(other::Column::Date.gte(range.start))
            .filter(other::Column::Date.lte(range.end))
            .order_by_asc(other::Column::Date)
            .all(&self.database)
            .await?;

        models.into_iter().map(Other::try_from).collect()
    }

    async fn insert_item(&self, item: &Item) -> ResultEngine<()> {
        items::ActiveModel::from(item).insert(&self.database).await?;
        Ok(())
    }

    async fn mark_sold(&self, id: Uuid, price: Money, at: DateTime<Utc>) -> ResultEngine<()> {
        let Some(model) = items::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
        else {
            return Err(EngineError::KeyNotFound(id.to_string()));
        };

        let mut model: items::ActiveModel = model.into();
        model.sold_price_minor = ActiveValue::Set(Some(price.minor()));
        model.sold_date = ActiveValue::Set(Some(at));
        model.update(&self.database).await?;
        Ok(())
    }

    async fn insert_expense(&self, expense: &Expense) -> ResultEngine<()> {
        expenses::ActiveModel::from(expense)
            .insert(&self.database)
            .await?;
        Ok(())
    }

    async fn insert_other(&self, other: &Other) -> ResultEngine<()> {
        other::ActiveModel::from(other).insert(&self.database).await?;
        Ok(())
    }
}
