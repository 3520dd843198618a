//! Miscellaneous financial entries that are neither items nor expenses.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{CsvRecord, EngineError, Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Other {
    pub id: Uuid,
    pub name: String,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Other {
    pub fn new(
        name: &str,
        amount: Money,
        date: DateTime<Utc>,
        notes: Option<&str>,
    ) -> ResultEngine<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidRecord(
                "entry name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            amount,
            date,
            notes: notes.map(str::to_string),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherRow {
    pub name: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

impl CsvRecord for OtherRow {
    const COLUMNS: &'static [&'static str] = &["name", "amount", "date", "notes"];
}

impl From<Other> for OtherRow {
    fn from(other: Other) -> Self {
        Self {
            name: other.name,
            amount: other.amount,
            date: other.date.date_naive(),
            notes: other.notes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "other_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub amount_minor: i64,
    pub date: DateTimeUtc,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Other> for ActiveModel {
    fn from(other: &Other) -> Self {
        Self {
            id: ActiveValue::Set(other.id.to_string()),
            name: ActiveValue::Set(other.name.clone()),
            amount_minor: ActiveValue::Set(other.amount.minor()),
            date: ActiveValue::Set(other.date),
            notes: ActiveValue::Set(other.notes.clone()),
        }
    }
}

impl TryFrom<Model> for Other {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id).map_err(|_| {
                EngineError::InvalidRecord(format!("invalid entry id: {}", model.id))
            })?,
            name: model.name,
            amount: Money::new(model.amount_minor),
            date: model.date,
            notes: model.notes,
        })
    }
}
