//! Configuration management for pennybook
//!
//! This module handles loading, validation, and management of
//! pennybook configuration from YAML files.

pub mod error;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

/// Number of columns every ledger file carries
pub const LEDGER_COLUMN_COUNT: usize = 4;

// ==================== Configuration Types ====================

/// Data file configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the ledger file
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Ledger file name inside `path`
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            file_name: default_file_name(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_file_name() -> String {
    "finance_data.csv".to_string()
}

/// Ledger file layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerFormatConfig {
    /// Header names, in on-disk order: date, amount, category, description
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,
    /// chrono format string used for the date column
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for LedgerFormatConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            date_format: default_date_format(),
        }
    }
}

fn default_columns() -> Vec<String> {
    ["date", "amount", "category", "description"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_date_format() -> String {
    "%d-%m-%Y".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Time range configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TimeRangeConfig {
    /// Range used by `view` when no dates are given
    #[serde(default)]
    pub default_range: TimeRange,
}

/// Time range enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Current month
    #[default]
    Month,
    /// Current calendar quarter
    Quarter,
    /// Current year
    Year,
    /// All time
    All,
    /// Custom range
    Custom,
}

impl std::str::FromStr for TimeRange {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" => Ok(TimeRange::Month),
            "quarter" => Ok(TimeRange::Quarter),
            "year" => Ok(TimeRange::Year),
            "all" => Ok(TimeRange::All),
            "custom" => Ok(TimeRange::Custom),
            _ => Err(format!("Invalid time range: {}", s)),
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::Month => write!(f, "month"),
            TimeRange::Quarter => write!(f, "quarter"),
            TimeRange::Year => write!(f, "year"),
            TimeRange::All => write!(f, "all"),
            TimeRange::Custom => write!(f, "custom"),
        }
    }
}

/// Chart hand-off settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Line colour for the income series
    #[serde(default = "default_income_color")]
    pub income_color: String,
    /// Line colour for the expense series
    #[serde(default = "default_expense_color")]
    pub expense_color: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            income_color: default_income_color(),
            expense_color: default_expense_color(),
        }
    }
}

fn default_income_color() -> String {
    "green".to_string()
}

fn default_expense_color() -> String {
    "red".to_string()
}

/// Currency and number formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Symbol printed next to amounts
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Currency symbol position ("before" or "after")
    #[serde(default)]
    pub symbol_position: SymbolPosition,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            symbol_position: SymbolPosition::Before,
        }
    }
}

fn default_symbol() -> String {
    "£".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

/// Currency symbol position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    #[default]
    Before,
    After,
}

/// Everything the ledger store needs to locate and decode its file
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub store_path: PathBuf,
    pub column_names: Vec<String>,
    pub date_format: String,
}

impl StoreConfig {
    /// Store at `store_path` using the default columns and date format
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            column_names: default_columns(),
            date_format: default_date_format(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub ledger: LedgerFormatConfig,
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub time_range: TimeRangeConfig,
    #[serde(default)]
    pub charts: ChartConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::IoError {
                    path: path.display().to_string(),
                    source: e,
                }
            }
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        let columns = &self.ledger.columns;
        if columns.len() != LEDGER_COLUMN_COUNT {
            return Err(ConfigError::InvalidValue {
                field: "ledger.columns".to_string(),
                reason: format!(
                    "Exactly {} columns are required, found {}",
                    LEDGER_COLUMN_COUNT,
                    columns.len()
                ),
            });
        }
        if columns.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "ledger.columns".to_string(),
                reason: "Column names must not be empty".to_string(),
            });
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(ConfigError::InvalidValue {
                    field: "ledger.columns".to_string(),
                    reason: format!("Duplicate column name: {}", column),
                });
            }
        }

        validate_date_format(&self.ledger.date_format)?;

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if self.data.file_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data.file_name".to_string(),
                reason: "A ledger file name is required".to_string(),
            });
        }

        Ok(())
    }

    /// The bundled default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Get the full path to the ledger file
    pub fn ledger_path(&self) -> PathBuf {
        self.data.path.join(&self.data.file_name)
    }

    /// Store settings handed to the ledger at construction
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            store_path: self.ledger_path(),
            column_names: self.ledger.columns.clone(),
            date_format: self.ledger.date_format.clone(),
        }
    }
}

/// A date format must be well formed and must round-trip a calendar date
pub fn validate_date_format(format: &str) -> ConfigResult<()> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        field: "ledger.date_format".to_string(),
        reason,
    };

    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(invalid(format!("Malformed date format: {}", format)));
    }

    let sample = NaiveDate::from_ymd_opt(2024, 3, 15)
        .ok_or_else(|| invalid("Sample date out of range".to_string()))?;
    // Time specifiers make Display fail for a bare date
    let mut rendered = String::new();
    if write!(rendered, "{}", sample.format(format)).is_err() {
        return Err(invalid(format!(
            "Date format '{}' may only use date fields",
            format
        )));
    }
    match NaiveDate::parse_from_str(&rendered, format) {
        Ok(parsed) if parsed == sample => Ok(()),
        _ => Err(invalid(format!(
            "Date format '{}' must contain a full day, month and year",
            format
        ))),
    }
}
