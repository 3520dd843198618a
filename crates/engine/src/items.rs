//! Inventory items.
//!
//! An `Item` is created when something is bought and mutated once, when it is
//! sold (`sold_price`/`sold_date` set).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub purchase_price: Money,
    pub purchase_date: DateTime<Utc>,
    pub sold_price: Option<Money>,
    pub sold_date: Option<DateTime<Utc>>,
    pub owner: Option<String>,
    pub notes: Option<String>,
    pub item_type: Option<String>,
}

impl Item {
    pub fn new(
        name: &str,
        purchase_price: Money,
        purchase_date: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidRecord(
                "item name must not be empty".to_string(),
            ));
        }
        if purchase_price.is_negative() {
            return Err(EngineError::InvalidAmount(
                "purchase price must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            purchase_price,
            purchase_date,
            sold_price: None,
            sold_date: None,
            owner: None,
            notes: None,
            item_type: None,
        })
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// Record the sale of the item.
    pub fn sell(&mut self, price: Money, at: DateTime<Utc>) -> ResultEngine<()> {
        if price.is_negative() {
            return Err(EngineError::InvalidAmount(
                "sold price must be >= 0".to_string(),
            ));
        }
        self.sold_price = Some(price);
        self.sold_date = Some(at);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub purchase_price_minor: i64,
    pub purchase_date: DateTimeUtc,
    pub sold_price_minor: Option<i64>,
    pub sold_date: Option<DateTimeUtc>,
    pub owner: Option<String>,
    pub notes: Option<String>,
    pub item_type: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Item> for ActiveModel {
    fn from(item: &Item) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            name: ActiveValue::Set(item.name.clone()),
            purchase_price_minor: ActiveValue::Set(item.purchase_price.minor()),
            purchase_date: ActiveValue::Set(item.purchase_date),
            sold_price_minor: ActiveValue::Set(item.sold_price.map(Money::minor)),
            sold_date: ActiveValue::Set(item.sold_date),
            owner: ActiveValue::Set(item.owner.clone()),
            notes: ActiveValue::Set(item.notes.clone()),
            item_type: ActiveValue::Set(item.item_type.clone()),
        }
    }
}

impl TryFrom<Model> for Item {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidRecord(format!("invalid item id: {}", model.id)))?,
            name: model.name,
            purchase_price: Money::new(model.purchase_price_minor),
            purchase_date: model.purchase_date,
            sold_price: model.sold_price_minor.map(Money::new),
            sold_date: model.sold_date,
            owner: model.owner,
            notes: model.notes,
            item_type: model.item_type,
        })
    }
}
