//! Ledger store, range queries and summaries
//!
//! The ledger is a flat table of dated income/expense records. Every mutation
//! reads the whole table and writes it back; there is no locking, so only one
//! process should use a ledger file at a time.

pub mod error;
pub mod models;
pub mod reports;
pub mod series;
pub mod time;
pub mod types;

use chrono::NaiveDate;
use pennybook_config::{validate_date_format, ChartConfig, StoreConfig, LEDGER_COLUMN_COUNT};
use pennybook_store::{CsvFileStorage, StorageRef, Table};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use error::{CoreError, CoreResult, ErrorSeverity};
pub use models::{Record, StoredRow};
pub use reports::{ChartData, ChartDataset, LedgerSummary, RangeReport, Totals, NO_TRANSACTIONS_MESSAGE};
pub use series::{to_daily_series, DailyPoint, DailySeries};
pub use time::{parse_date, DateRange, TimeContext};
pub use types::Category;

/// What `initialize` found on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InitOutcome {
    /// A valid ledger was already present and left untouched
    Existing,
    /// No ledger existed; an empty one was created
    Created,
    /// The ledger was unreadable and has been replaced by an empty one
    Repaired { reason: String },
}

/// Main ledger structure
pub struct Ledger {
    config: StoreConfig,
    storage: StorageRef,
}

impl Ledger {
    /// Ledger backed by the CSV file named in `config`
    pub fn open(config: StoreConfig) -> CoreResult<Self> {
        let storage = Arc::new(CsvFileStorage::new(
            config.store_path.clone(),
            config.column_names.len(),
        ));
        Self::with_storage(config, storage)
    }

    /// Ledger over any table storage
    pub fn with_storage(config: StoreConfig, storage: StorageRef) -> CoreResult<Self> {
        if config.column_names.len() != LEDGER_COLUMN_COUNT {
            return Err(CoreError::ConfigError {
                message: format!(
                    "expected {} column names, got {}",
                    LEDGER_COLUMN_COUNT,
                    config.column_names.len()
                ),
            });
        }
        validate_date_format(&config.date_format).map_err(|e| CoreError::ConfigError {
            message: e.to_string(),
        })?;

        Ok(Self { config, storage })
    }

    /// Where the ledger lives, for messages
    pub fn location(&self) -> String {
        self.storage.location()
    }

    /// Make sure a readable ledger exists.
    ///
    /// A missing table, one that fails to parse, or one whose header does not
    /// have exactly four columns is overwritten with an empty table. Any rows
    /// in a damaged table are lost. A valid table is not touched.
    pub fn initialize(&self) -> CoreResult<InitOutcome> {
        match self.storage.read() {
            Ok(table) => {
                log::debug!(
                    "Ledger {} ready with {} records",
                    self.location(),
                    table.len()
                );
                Ok(InitOutcome::Existing)
            }
            Err(e) if e.is_missing() => {
                self.storage.write(&self.empty_table())?;
                log::info!("Created ledger {}", self.location());
                Ok(InitOutcome::Created)
            }
            Err(e) if e.is_corrupt() => {
                let reason = e.to_string();
                self.storage.write(&self.empty_table())?;
                log::warn!(
                    "Ledger {} was unreadable ({}); replaced with an empty ledger",
                    self.location(),
                    reason
                );
                Ok(InitOutcome::Repaired { reason })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Add one record and rewrite the ledger sorted by date.
    ///
    /// `date` is parsed before anything is read. Records sharing a date keep
    /// their insertion order. The stored table is only replaced once the new
    /// one has been fully built.
    pub fn append(
        &self,
        date: &str,
        amount: Decimal,
        category: Category,
        description: &str,
    ) -> CoreResult<Record> {
        let date = self.parse_date(date)?;
        let record = Record::new(date, amount, category, description);

        let mut rows = self.rows()?;
        rows.push(StoredRow::Entry(record.clone()));
        rows.sort_by_key(StoredRow::date);

        let mut table = self.empty_table();
        table.rows = rows
            .iter()
            .map(|r| r.to_raw(&self.config.date_format))
            .collect();
        self.storage.write(&table)?;

        log::info!("Entry added and data sorted by date");
        Ok(record)
    }

    /// Every income and expense record in stored order
    pub fn records(&self) -> CoreResult<Vec<Record>> {
        Ok(self
            .rows()?
            .into_iter()
            .filter_map(StoredRow::into_record)
            .collect())
    }

    /// Every stored row, including ones with other categories
    pub fn rows(&self) -> CoreResult<Vec<StoredRow>> {
        let table = self.storage.read()?;
        table
            .rows
            .iter()
            .map(|raw| StoredRow::from_raw(raw, &self.config.date_format))
            .collect()
    }

    /// Records with `start <= date <= end`, with income/expense totals.
    ///
    /// Rows with other categories are left out. An inverted range is not an
    /// error; it selects nothing.
    pub fn query_range(&self, range: DateRange) -> CoreResult<RangeReport> {
        if range.is_inverted() {
            log::warn!("Start date {} is after end date {}", range.start, range.end);
        }

        let mut selected = Vec::new();
        let mut skipped = 0;
        for row in self.rows()? {
            if !range.contains(&row.date()) {
                continue;
            }
            match row.into_record() {
                Some(record) => selected.push(record),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            log::warn!(
                "{} rows in range have a category other than Income or Expense and were not counted",
                skipped
            );
        }

        let report = RangeReport::new(range, selected)?;
        if report.is_empty() {
            log::warn!("{}", NO_TRANSACTIONS_MESSAGE);
        } else {
            log::debug!(
                "Selected {} records between {} and {}",
                report.transaction_count(),
                range.start,
                range.end
            );
        }
        Ok(report)
    }

    /// [`Ledger::query_range`] with bounds given as text in the ledger's date format
    pub fn query_range_str(&self, start: &str, end: &str) -> CoreResult<RangeReport> {
        let range = DateRange::parse(start, end, &self.config.date_format)?;
        self.query_range(range)
    }

    /// Chart hand-off for a daily series
    pub fn daily_chart_data(&self, series: &DailySeries, chart: &ChartConfig) -> ChartData {
        series.to_chart_data(chart, &self.config.date_format)
    }

    pub fn parse_date(&self, input: &str) -> CoreResult<NaiveDate> {
        parse_date(input, &self.config.date_format)
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.config.date_format).to_string()
    }

    fn empty_table(&self) -> Table {
        Table::empty(&self.config.column_names)
    }
}

/// Trait for ledger operations
pub trait LedgerOperations {
    /// Get ledger summary
    fn summary(&self) -> CoreResult<LedgerSummary>;
}

impl LedgerOperations for Ledger {
    fn summary(&self) -> CoreResult<LedgerSummary> {
        let records = self.records()?;
        Ok(LedgerSummary {
            total_records: records.len(),
            first_date: records.iter().map(|r| r.date).min(),
            last_date: records.iter().map(|r| r.date).max(),
            totals: Totals::from_records(&records)?,
        })
    }
}

// ==================== Tests ====================
