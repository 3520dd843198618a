//! Expenses and their export row.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{CsvRecord, EngineError, Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Expense {
    pub fn new(
        name: &str,
        category: Option<&str>,
        amount: Money,
        date: DateTime<Utc>,
        notes: Option<&str>,
    ) -> ResultEngine<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidRecord(
                "expense name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: category.map(str::to_string),
            amount,
            date,
            notes: notes.map(str::to_string),
        })
    }
}

/// One line of the expenses CSV.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRow {
    pub name: String,
    pub category: Option<String>,
    pub amount: Money,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

impl CsvRecord for ExpenseRow {
    const COLUMNS: &'static [&'static str] = &["name", "category", "amount", "date", "notes"];
}

impl From<Expense> for ExpenseRow {
    fn from(expense: Expense) -> Self {
        Self {
            name: expense.name,
            category: expense.category,
            amount: expense.amount,
            date: expense.date.date_naive(),
            notes: expense.notes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub amount_minor: i64,
    pub date: DateTimeUtc,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            name: ActiveValue::Set(expense.name.clone()),
            category: ActiveValue::Set(expense.category.clone()),
            amount_minor: ActiveValue::Set(expense.amount.minor()),
            date: ActiveValue::Set(expense.date),
            notes: ActiveValue::Set(expense.notes.clone()),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id).map_err(|_| {
                EngineError::InvalidRecord(format!("invalid expense id: {}", model.id))
            })?,
            name: model.name,
            category: model.category,
            amount: Money::new(model.amount_minor),
            date: model.date,
            notes: model.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn row_keeps_only_the_calendar_day() {
        let at = Utc.with_ymd_and_hms(2024, 1, 9, 22, 15, 0).unwrap();
        let expense = Expense::new("Shipping", Some("postage"), Money::new(7_50), at, None).unwrap();
        let row = ExpenseRow::from(expense);
        assert_eq!(row.date.to_string(), "2024-01-09");
        assert_eq!(row.amount.to_string(), "7.50");
        assert_eq!(row.notes, None);
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(Expense::new(" ", None, Money::ZERO, Utc::now(), None).is_err());
    }
}
