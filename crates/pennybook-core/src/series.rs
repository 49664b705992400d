//! Daily resampling for charts

use chrono::NaiveDate;
use pennybook_config::ChartConfig;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CoreResult;
use crate::models::{add_amount, Record};
use crate::reports::{ChartData, ChartDataset};
use crate::types::Category;

/// Value for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// Income and expense per day, aligned on the same dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySeries {
    pub income: Vec<DailyPoint>,
    pub expense: Vec<DailyPoint>,
}

impl DailySeries {
    /// Number of days covered
    pub fn len(&self) -> usize {
        self.income.len()
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.income.iter().map(|p| p.date)
    }

    /// Line chart with one dataset per category
    pub fn to_chart_data(&self, chart: &ChartConfig, date_format: &str) -> ChartData {
        ChartData {
            chart_type: "line".to_string(),
            title: "Income and Expenses over Time".to_string(),
            x_label: "Date".to_string(),
            y_label: "Amount".to_string(),
            labels: self.dates().map(|d| d.format(date_format).to_string()).collect(),
            datasets: vec![
                ChartDataset {
                    label: Category::Income.to_string(),
                    data: chart_values(&self.income),
                    border_color: Some(chart.income_color.clone()),
                },
                ChartDataset {
                    label: Category::Expense.to_string(),
                    data: chart_values(&self.expense),
                    border_color: Some(chart.expense_color.clone()),
                },
            ],
        }
    }
}

fn chart_values(points: &[DailyPoint]) -> Vec<f64> {
    points.iter().map(|p| p.value.to_f64().unwrap_or(0.0)).collect()
}

/// Sum amounts per day and category over every day from the earliest to the
/// latest record, filling days without records with zero.
///
/// Returns `None` for an empty slice, where the span is undefined.
pub fn to_daily_series(records: &[Record]) -> CoreResult<Option<DailySeries>> {
    let (Some(start), Some(end)) = (
        records.iter().map(|r| r.date).min(),
        records.iter().map(|r| r.date).max(),
    ) else {
        return Ok(None);
    };

    let mut income: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    let mut expense: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in records {
        let bucket = match record.category {
            Category::Income => &mut income,
            Category::Expense => &mut expense,
        };
        let sum = bucket.entry(record.date).or_insert(Decimal::ZERO);
        *sum = add_amount(*sum, record.amount)?;
    }

    let days: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
    let fill = |sums: &BTreeMap<NaiveDate, Decimal>| -> Vec<DailyPoint> {
        days.iter()
            .map(|date| DailyPoint {
                date: *date,
                value: sums.get(date).copied().unwrap_or(Decimal::ZERO),
            })
            .collect()
    };

    Ok(Some(DailySeries {
        income: fill(&income),
        expense: fill(&expense),
    }))
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
    fn test_empty_records_have_no_series() {
        assert!(to_daily_series(&[]).unwrap().is_none());
    }

    #[test]
    fn test_gap_days_are_zero_filled() {
        let records = vec![record(1, Category::Income, 100), record(3, Category::Expense, 40)];
        let series = to_daily_series(&records).unwrap().unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.expense.len(), 3);
        assert_eq!(series.income[1].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(series.income[1].value, Decimal::ZERO);
        assert_eq!(series.expense[1].value, Decimal::ZERO);
        assert_eq!(series.income[0].value, Decimal::new(100, 0));
        assert_eq!(series.income[2].value, Decimal::ZERO);
        assert_eq!(series.expense[0].value, Decimal::ZERO);
        assert_eq!(series.expense[2].value, Decimal::new(40, 0));
    }

    #[test]
    fn test_same_day_amounts_are_summed() {
        let records = vec![
            record(5, Category::Expense, 10),
            record(5, Category::Expense, 15),
            record(5, Category::Income, 7),
        ];
        let series = to_daily_series(&records).unwrap().unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.expense[0].value, Decimal::new(25, 0));
        assert_eq!(series.income[0].value, Decimal::new(7, 0));
    }

    #[test]
    fn test_day_sum_overflow_is_an_error() {
        let mut big = record(5, Category::Expense, 0);
        big.amount = Decimal::MAX;
        let records = vec![big, record(5, Category::Expense, 1)];

        assert!(to_daily_series(&records).is_err());
    }

    #[test]
    fn test_unsorted_input_spans_min_to_max() {
        let records = vec![record(10, Category::Income, 1), record(8, Category::Income, 1)];
        let series = to_daily_series(&records).unwrap().unwrap();

        let dates: Vec<NaiveDate> = series.dates().collect();
        assert_eq!(dates.first(), NaiveDate::from_ymd_opt(2024, 1, 8).as_ref());
        assert_eq!(dates.last(), NaiveDate::from_ymd_opt(2024, 1, 10).as_ref());
    }

    #[test]
    fn test_chart_data() {
        let records = vec![record(1, Category::Income, 100), record(2, Category::Expense, 40)];
        let chart = to_daily_series(&records)
            .unwrap()
            .unwrap()
            .to_chart_data(&ChartConfig::default(), "%d-%m-%Y");

        assert_eq!(chart.labels, vec!["01-01-2024", "02-01-2024"]);
        assert_eq!(chart.datasets[0].label, "Income");
        assert_eq!(chart.datasets[0].data, vec![100.0, 0.0]);
        assert_eq!(chart.datasets[1].border_color.as_deref(), Some("red"));
        assert_eq!(chart.datasets[1].data, vec![0.0, 40.0]);
    }
}
