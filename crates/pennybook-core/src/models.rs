//! Core data models for the ledger

use chrono::NaiveDate;
use pennybook_store::RawRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::types::Category;

/// One ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    /// Expected non-negative; the store does not check
    pub amount: Decimal,
    pub category: Category,
    /// Free text, may be empty
    pub description: String,
}

impl Record {
    pub fn new(
        date: NaiveDate,
        amount: Decimal,
        category: Category,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount,
            category,
            description: description.into(),
        }
    }

    /// The row written back to storage
    pub fn to_raw(&self, date_format: &str) -> RawRecord {
        RawRecord::new(
            self.date.format(date_format).to_string(),
            self.amount.to_string(),
            self.category.as_str(),
            self.description.clone(),
        )
    }
}

/// A stored row as the ledger sees it.
///
/// Rows whose category is neither `Income` nor `Expense` are carried through
/// rewrites untouched but never counted.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredRow {
    Entry(Record),
    Uncategorized { date: NaiveDate, raw: RawRecord },
}

impl StoredRow {
    /// Convert a stored row, naming its line on failure
    pub fn from_raw(raw: &RawRecord, date_format: &str) -> CoreResult<Self> {
        let at_line = |message: String| CoreError::InvalidFormat {
            message: format!("line {}: {}", raw.line, message),
        };

        let date = NaiveDate::parse_from_str(raw.date.trim(), date_format)
            .map_err(|_| at_line(format!("invalid date '{}'", raw.date)))?;

        let Some(category) = Category::from_stored(&raw.category) else {
            return Ok(StoredRow::Uncategorized {
                date,
                raw: raw.clone(),
            });
        };

        let amount = parse_amount(&raw.amount).map_err(|e| match e {
            CoreError::ValidationError { message } => at_line(message),
            other => other,
        })?;

        Ok(StoredRow::Entry(Record {
            date,
            amount,
            category,
            description: raw.description.clone(),
        }))
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            StoredRow::Entry(record) => record.date,
            StoredRow::Uncategorized { date, .. } => *date,
        }
    }

    pub fn to_raw(&self, date_format: &str) -> RawRecord {
        match self {
            StoredRow::Entry(record) => record.to_raw(date_format),
            StoredRow::Uncategorized { raw, .. } => raw.clone(),
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            StoredRow::Entry(record) => Some(record),
            StoredRow::Uncategorized { .. } => None,
        }
    }
}

/// Plain or scientific decimal notation, as other tools may write it
pub fn parse_amount(text: &str) -> CoreResult<Decimal> {
    let trimmed = text.trim();
    if let Ok(amount) = Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        return Ok(amount);
    }

    let message = match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => format!(
            "amount '{}' is outside the supported range of -{max} to {max}",
            text,
            max = Decimal::MAX
        ),
        _ => format!("invalid amount '{}'", text),
    };
    Err(CoreError::ValidationError { message })
}

/// `total + amount`, failing instead of overflowing
pub(crate) fn add_amount(total: Decimal, amount: Decimal) -> CoreResult<Decimal> {
    total.checked_add(amount).ok_or_else(|| CoreError::InvalidFormat {
        message: format!(
            "amounts add up to more than the supported maximum of {}",
            Decimal::MAX
        ),
    })
}
