//! Date parsing and date-range selection

use chrono::{Datelike, NaiveDate};
use pennybook_config::TimeRange;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Parse `input` with a chrono format string
pub fn parse_date(input: &str, format: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), format).map_err(|_| CoreError::InvalidDate {
        input: input.to_string(),
        format: format.to_string(),
    })
}

/// Inclusive date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Every representable date
    pub fn all() -> Self {
        Self::new(NaiveDate::MIN, NaiveDate::MAX)
    }

    /// Parse both bounds with `format`
    pub fn parse(start: &str, end: &str, format: &str) -> CoreResult<Self> {
        Ok(Self::new(parse_date(start, format)?, parse_date(end, format)?))
    }

    /// `start <= date <= end`
    pub fn contains(&self, date: &NaiveDate) -> bool {
        *date >= self.start && *date <= self.end
    }

    /// A window whose start lies after its end selects nothing
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// Named period resolved against "today"
#[derive(Debug, Clone, PartialEq)]
pub struct TimeContext {
    pub range: TimeRange,
    /// Custom start date (when range is Custom)
    pub custom_start: Option<NaiveDate>,
    /// Custom end date (when range is Custom)
    pub custom_end: Option<NaiveDate>,
}

impl Default for TimeContext {
    fn default() -> Self {
        Self::new(TimeRange::Month)
    }
}

impl TimeContext {
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            custom_start: None,
            custom_end: None,
        }
    }

    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            range: TimeRange::Custom,
            custom_start: Some(start),
            custom_end: Some(end),
        }
    }

    /// Resolve to an inclusive window; open bounds become the date extremes
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        match self.range {
            TimeRange::Month => DateRange::new(
                first_of_month(today.year(), today.month()).unwrap_or(today),
                last_of_month(today.year(), today.month()).unwrap_or(today),
            ),
            TimeRange::Quarter => {
                let first_month = (today.month0() / 3) * 3 + 1;
                DateRange::new(
                    first_of_month(today.year(), first_month).unwrap_or(today),
                    last_of_month(today.year(), first_month + 2).unwrap_or(today),
                )
            }
            TimeRange::Year => DateRange::new(
                first_of_month(today.year(), 1).unwrap_or(today),
                last_of_month(today.year(), 12).unwrap_or(today),
            ),
            TimeRange::All => DateRange::all(),
            TimeRange::Custom => DateRange::new(
                self.custom_start.unwrap_or(NaiveDate::MIN),
                self.custom_end.unwrap_or(NaiveDate::MAX),
            ),
        }
    }

    /// Get a human-readable description of the time range
    pub fn description(&self) -> String {
        match self.range {
            TimeRange::Month => "Current Month".to_string(),
            TimeRange::Quarter => "Current Quarter".to_string(),
            TimeRange::Year => "Current Year".to_string(),
            TimeRange::All => "All Time".to_string(),
            TimeRange::Custom => {
                if let (Some(start), Some(end)) = (self.custom_start, self.custom_end) {
                    format!("{} to {}", start, end)
                } else {
                    "Custom Range".to_string()
                }
            }
        }
    }
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn last_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    first_of_month(next_year, next_month).and_then(|d| d.pred_opt())
}
