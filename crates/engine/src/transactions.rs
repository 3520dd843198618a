//! Transaction view.
//!
//! A `Transaction` is never stored: it is derived from an [`Item`] to describe
//! either its purchase or its sale, with the profit of that event.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{CsvRecord, Item, Money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Sale,
    Purchase,
}

/// One line of the transactions CSV.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub name: String,
    pub purchase_price: Money,
    pub purchase_date: NaiveDate,
    pub sold_price: Option<Money>,
    pub sold_date: Option<NaiveDate>,
    pub owner: Option<String>,
    pub notes: Option<String>,
    pub item_type: Option<String>,
    pub profit: Money,
    pub transaction_type: TransactionType,
}

impl CsvRecord for Transaction {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "purchasePrice",
        "purchaseDate",
        "soldPrice",
        "soldDate",
        "owner",
        "notes",
        "itemType",
        "profit",
        "transactionType",
    ];
}

impl Transaction {
    /// Sale view of `item`: both prices and dates, profit = sold − purchase.
    ///
    /// A missing sold price stays empty in the row and counts as zero in the
    /// profit. Returns `None` for an item that was never sold.
    pub fn sale(item: &Item) -> Option<Self> {
        let sold_date = item.sold_date?;

        Some(Self {
            name: item.name.clone(),
            purchase_price: item.purchase_price,
            purchase_date: item.purchase_date.date_naive(),
            sold_price: item.sold_price,
            sold_date: Some(sold_date.date_naive()),
            owner: item.owner.clone(),
            notes: item.notes.clone(),
            item_type: item.item_type.clone(),
            profit: item.sold_price.unwrap_or(Money::ZERO) - item.purchase_price,
            transaction_type: TransactionType::Sale,
        })
    }

    /// Purchase view of `item`: sale fields are left empty and the profit is
    /// the money spent, negated.
    pub fn purchase(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            purchase_price: item.purchase_price,
            purchase_date: item.purchase_date.date_naive(),
            sold_price: None,
            sold_date: None,
            owner: item.owner.clone(),
            notes: item.notes.clone(),
            item_type: item.item_type.clone(),
            profit: -item.purchase_price,
            transaction_type: TransactionType::Purchase,
        }
    }

    /// `sold_date` when present, `purchase_date` otherwise.
    pub fn effective_date(&self) -> NaiveDate {
        self.sold_date.unwrap_or(self.purchase_date)
    }
}

/// Sale views of the items sold in the queried window.
pub fn sales(items: &[Item]) -> Vec<Transaction> {
    items.iter().filter_map(Transaction::sale).collect()
}

/// Purchase views of the items bought in the queried window.
pub fn purchases(items: &[Item]) -> Vec<Transaction> {
    items.iter().map(Transaction::purchase).collect()
}

/// Merge both lists into one sequence ordered by effective date.
///
/// The sort is stable over `sales ++ purchases`, so on equal dates sales come
/// before purchases and each list keeps its own order.
pub fn combine(sales: Vec<Transaction>, purchases: Vec<Transaction>) -> Vec<Transaction> {
    let mut combined = sales;
    combined.extend(purchases);
    combined.sort_by_key(Transaction::effective_date);
    combined
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::CsvEncoder;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn item(name: &str, price: i64, bought: DateTime<Utc>) -> Item {
        Item::new(name, Money::new(price), bought).unwrap()
    }

    #[test]
    fn sale_profit_is_sold_minus_purchase() {
        let mut lamp = item("Lamp", 100_00, at(2024, 1, 1));
        lamp.sell(Money::new(150_00), at(2024, 1, 2)).unwrap();

        let sale = Transaction::sale(&lamp).unwrap();
        assert_eq!(sale.profit.to_string(), "50.00");
        assert_eq!(sale.transaction_type, TransactionType::Sale);
        assert_eq!(sale.sold_date, NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn sale_with_missing_price_leaves_the_cell_empty() {
        let mut lamp = item("Lamp", 12_34, at(2024, 1, 1));
        lamp.sold_date = Some(at(2024, 1, 3));

        let sale = Transaction::sale(&lamp).unwrap();
        assert_eq!(sale.sold_price, None);
        assert_eq!(sale.profit.to_string(), "-12.34");

        let csv: Vec<u8> = CsvEncoder::new(vec![sale])
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
            .concat();
        assert_eq!(
            String::from_utf8(csv).unwrap().lines().nth(1),
            Some("Lamp,12.34,2024-01-01,,2024-01-03,,,,-12.34,sale")
        );
    }

    #[test]
    fn unsold_item_has_no_sale_view() {
        let lamp = item("Lamp", 1_00, at(2024, 1, 1));
        assert!(Transaction::sale(&lamp).is_none());
        assert!(sales(&[lamp]).is_empty());
    }

    #[test]
    fn purchase_profit_is_negative_price_and_sale_fields_empty() {
        let mut chair = item("Chair", 40_00, at(2024, 1, 5));
        let purchase = Transaction::purchase(&chair);
        assert_eq!(purchase.profit.to_string(), "-40.00");
        assert_eq!(purchase.sold_price, None);
        assert_eq!(purchase.sold_date, None);

        chair.sell(Money::new(60_00), at(2024, 2, 1)).unwrap();
        let purchase = Transaction::purchase(&chair);
        assert_eq!(purchase.sold_price, None);
        assert_eq!(purchase.effective_date(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn combine_orders_by_effective_date() {
        let mut lamp = item("Lamp", 20_00, at(2024, 1, 5));
        lamp.sell(Money::new(35_00), at(2024, 1, 20)).unwrap();
        let desk = item("Desk", 10_00, at(2024, 1, 10));

        let combined = combine(
            sales(std::slice::from_ref(&lamp)),
            purchases(&[lamp.clone(), desk]),
        );
        let order: Vec<(&str, TransactionType)> = combined
            .iter()
            .map(|tx| (tx.name.as_str(), tx.transaction_type))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Lamp", TransactionType::Purchase),
                ("Desk", TransactionType::Purchase),
                ("Lamp", TransactionType::Sale),
            ]
        );
        assert!(
            combined
                .windows(2)
                .all(|pair| pair[0].effective_date() <= pair[1].effective_date())
        );
    }

    #[test]
    fn combine_puts_sales_first_on_ties() {
        let mut sold = item("Sold", 5_00, at(2023, 12, 1));
        sold.sell(Money::new(9_00), at(2024, 1, 7)).unwrap();
        let bought = item("Bought", 3_00, at(2024, 1, 7));

        let combined = combine(sales(&[sold]), purchases(&[bought]));
        assert_eq!(combined[0].transaction_type, TransactionType::Sale);
        assert_eq!(combined[1].transaction_type, TransactionType::Purchase);
    }

    #[test]
    fn combine_of_nothing_is_empty() {
        assert!(combine(Vec::new(), Vec::new()).is_empty());
    }
}
