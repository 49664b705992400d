//! Report structures returned by the ledger

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::models::{add_amount, Record};
use crate::series::{to_daily_series, DailySeries};
use crate::time::DateRange;
use crate::types::Category;

/// Shown instead of a summary when a range query selects nothing
pub const NO_TRANSACTIONS_MESSAGE: &str = "No transactions found in the given date range.";

/// Income and expense totals over a set of records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_savings: Decimal,
}

impl Totals {
    /// Sum income and expense; an overflowing sum is an error
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> CoreResult<Self> {
        let mut totals = Totals::default();
        for record in records {
            match record.category {
                Category::Income => {
                    totals.total_income = add_amount(totals.total_income, record.amount)?
                }
                Category::Expense => {
                    totals.total_expense = add_amount(totals.total_expense, record.amount)?
                }
            }
        }
        totals.net_savings = totals
            .total_income
            .checked_sub(totals.total_expense)
            .ok_or_else(|| CoreError::InvalidFormat {
                message: "net savings fall outside the supported amount range".to_string(),
            })?;
        Ok(totals)
    }
}

/// Result of a range query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeReport {
    pub range: DateRange,
    /// Selected records in stored (date) order
    pub records: Vec<Record>,
    #[serde(flatten)]
    pub totals: Totals,
    /// Set when nothing matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl RangeReport {
    pub fn new(range: DateRange, records: Vec<Record>) -> CoreResult<Self> {
        let totals = Totals::from_records(&records)?;
        let notice = records
            .is_empty()
            .then(|| NO_TRANSACTIONS_MESSAGE.to_string());
        Ok(Self {
            range,
            records,
            totals,
            notice,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn transaction_count(&self) -> usize {
        self.records.len()
    }

    pub fn total_income(&self) -> Decimal {
        self.totals.total_income
    }

    pub fn total_expense(&self) -> Decimal {
        self.totals.total_expense
    }

    pub fn net_savings(&self) -> Decimal {
        self.totals.net_savings
    }

    /// Daily series over the selected records; `None` when empty
    pub fn daily_series(&self) -> CoreResult<Option<DailySeries>> {
        to_daily_series(&self.records)
    }
}

/// All-time ledger summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_records: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub totals: Totals,
}

/// Chart dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: Option<String>,
}

/// Data handed to an external chart renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub chart_type: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, category: Category, amount: i64) -> Record {
        Record::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            Decimal::new(amount, 0),
            category,
            "",
        )
    }

    #[test]
    fn test_totals() {
        let records = vec![
            record(1, Category::Income, 100),
            record(2, Category::Expense, 40),
            record(3, Category::Income, 25),
        ];

        let totals = Totals::from_records(&records).unwrap();
        assert_eq!(totals.total_income, Decimal::new(125, 0));
        assert_eq!(totals.total_expense, Decimal::new(40, 0));
        assert_eq!(totals.net_savings, Decimal::new(85, 0));
    }

    #[test]
    fn test_totals_overflow_is_an_error() {
        let mut big = record(1, Category::Income, 0);
        big.amount = Decimal::MAX;
        let records = vec![big, record(2, Category::Income, 1)];

        let err = Totals::from_records(&records).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFormat { .. }));
    }

    #[test]
    fn test_net_savings_overflow_is_an_error() {
        let mut income = record(1, Category::Income, 0);
        income.amount = Decimal::MAX;
        let mut expense = record(2, Category::Expense, 0);
        expense.amount = -Decimal::MAX;

        assert!(Totals::from_records(&[income, expense]).is_err());
    }

    #[test]
    fn test_empty_report_has_notice() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        let report = RangeReport::new(range, vec![]).unwrap();

        assert!(report.is_empty());
        assert_eq!(report.totals, Totals::default());
        assert_eq!(report.notice.as_deref(), Some(NO_TRANSACTIONS_MESSAGE));
        assert!(report.daily_series().unwrap().is_none());
    }

    #[test]
    fn test_report_json_shape() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        let report = RangeReport::new(range, vec![record(5, Category::Income, 10)]).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["total_income"], "10");
        assert_eq!(json["records"][0]["category"], "Income");
        assert!(json.get("notice").is_none());
    }
}
