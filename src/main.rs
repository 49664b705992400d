//! Pennybook main entry point

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use pennybook_config::{Config, ConfigError, CurrencyConfig, SymbolPosition, TimeRange};
use pennybook_core::models::parse_amount;
use pennybook_core::{
    Category, CoreError, DailySeries, DateRange, InitOutcome, Ledger, LedgerOperations,
    RangeReport, TimeContext,
};
use pennybook_utils::{format_amount, with_symbol};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "pennybook")]
#[command(version = "0.1.0")]
#[command(about = "A small personal finance ledger backed by a CSV file", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the ledger file, or replace it if it is unreadable
    Init,
    /// Add an income or expense entry
    Add {
        /// Entry date in the ledger's date format; defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        amount: String,
        /// Income or Expense
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show entries and totals for a date range
    View {
        #[arg(long, requires = "end", conflicts_with = "range")]
        start: Option<String>,
        #[arg(long, requires = "start", conflicts_with = "range")]
        end: Option<String>,
        /// month, quarter, year or all
        #[arg(long)]
        range: Option<TimeRange>,
        /// Also print per-day income and expense
        #[arg(long)]
        series: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// All-time totals
    Summary,
    /// Print the default configuration file
    DefaultConfig,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Print the error chain, then any hints the library errors carry
fn report_error(error: &anyhow::Error) {
    for line in error_lines(error) {
        eprintln!("{}", line);
    }
}

fn error_lines(error: &anyhow::Error) -> Vec<String> {
    let (label, suggestions) = if let Some(core) = error.downcast_ref::<CoreError>() {
        let details = core.to_details();
        log::debug!("{}", details);
        (core.severity().to_string(), details.suggestions)
    } else if let Some(config) = error.downcast_ref::<ConfigError>() {
        let details = config.to_details();
        log::debug!("{}", details);
        ("error".to_string(), details.suggestions)
    } else {
        ("error".to_string(), Vec::new())
    };

    let mut lines = vec![format!("{}: {:#}", label, error)];
    lines.extend(suggestions.into_iter().map(|s| format!("  hint: {}", s)));
    lines
}

fn run(args: Args) -> Result<()> {
    if let Command::DefaultConfig = args.command {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, missing) = match Config::load(&args.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to load configuration {}", args.config.display()))
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if missing {
        log::warn!(
            "Config file {} not found, using defaults",
            args.config.display()
        );
    }
    log::debug!("Ledger file: {}", config.ledger_path().display());

    let ledger = Ledger::open(config.store_config()).context("Invalid ledger settings")?;

    match args.command {
        Command::Init => run_init(&ledger),
        Command::Add {
            date,
            amount,
            category,
            description,
        } => run_add(&ledger, date, &amount, &category, &description),
        Command::View {
            start,
            end,
            range,
            series,
            json,
        } => {
            let context = time_context(&ledger, &config, start, end, range)?;
            log::info!("Showing {}", context.description());
            let range = context.resolve(Local::now().date_naive());
            run_view(&ledger, &config, range, series, json)
        }
        Command::Summary => run_summary(&ledger, &config.currency),
        Command::DefaultConfig => Ok(()),
    }
}

fn run_init(ledger: &Ledger) -> Result<()> {
    let outcome = ledger
        .initialize()
        .with_context(|| format!("Failed to initialize {}", ledger.location()))?;
    match outcome {
        InitOutcome::Existing => println!("Ledger {} is ready", ledger.location()),
        InitOutcome::Created => println!("Created ledger {}", ledger.location()),
        InitOutcome::Repaired { reason } => println!(
            "Ledger {} was unreadable ({}) and has been reset",
            ledger.location(),
            reason
        ),
    }
    Ok(())
}

fn run_add(
    ledger: &Ledger,
    date: Option<String>,
    amount: &str,
    category: &str,
    description: &str,
) -> Result<()> {
    let amount = parse_amount(amount)?;
    if amount.is_sign_negative() {
        bail!("Amount must not be negative, got {}", amount);
    }
    let category: Category = category.parse()?;
    let date = date.unwrap_or_else(|| ledger.format_date(Local::now().date_naive()));

    ledger
        .initialize()
        .with_context(|| format!("Failed to initialize {}", ledger.location()))?;
    let record = ledger
        .append(&date, amount, category, description)
        .context("Failed to add entry")?;

    println!(
        "Added {} of {} on {}",
        record.category,
        record.amount,
        ledger.format_date(record.date)
    );
    Ok(())
}

fn time_context(
    ledger: &Ledger,
    config: &Config,
    start: Option<String>,
    end: Option<String>,
    range: Option<TimeRange>,
) -> Result<TimeContext> {
    if let (Some(start), Some(end)) = (start, end) {
        return Ok(TimeContext::custom(
            ledger.parse_date(&start)?,
            ledger.parse_date(&end)?,
        ));
    }

    let preset = range.unwrap_or(config.time_range.default_range);
    if preset == TimeRange::Custom {
        bail!("A custom range needs --start and --end");
    }
    Ok(TimeContext::new(preset))
}

fn run_view(
    ledger: &Ledger,
    config: &Config,
    range: DateRange,
    series: bool,
    json: bool,
) -> Result<()> {
    let report = ledger.query_range(range).context("Failed to read ledger")?;
    let daily = if series { report.daily_series()? } else { None };

    if json {
        let mut value = serde_json::to_value(&report)?;
        if let Some(daily) = &daily {
            value["series"] = serde_json::to_value(daily)?;
            value["chart"] = serde_json::to_value(ledger.daily_chart_data(daily, &config.charts))?;
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_report(ledger, &config.currency, &report);
    if let Some(daily) = &daily {
        print_series(ledger, &config.currency, daily);
    }
    Ok(())
}

fn run_summary(ledger: &Ledger, currency: &CurrencyConfig) -> Result<()> {
    let summary = ledger.summary().context("Failed to read ledger")?;

    println!("Entries: {}", summary.total_records);
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        println!("From {} to {}", ledger.format_date(first), ledger.format_date(last));
    }
    println!("Total Income: {}", money(currency, summary.totals.total_income));
    println!("Total Expense: {}", money(currency, summary.totals.total_expense));
    println!("Net Savings: {}", money(currency, summary.totals.net_savings));
    Ok(())
}

fn print_report(ledger: &Ledger, currency: &CurrencyConfig, report: &RangeReport) {
    for line in report_lines(ledger, currency, report) {
        println!("{}", line);
    }
}

/// The notice alone when nothing matched, otherwise header, rows and totals
fn report_lines(ledger: &Ledger, currency: &CurrencyConfig, report: &RangeReport) -> Vec<String> {
    if let Some(notice) = &report.notice {
        return vec![notice.clone()];
    }

    let mut lines = vec![format!(
        "Transactions from {} to {}",
        display_bound(ledger, report.range.start),
        display_bound(ledger, report.range.end)
    )];
    for record in &report.records {
        lines.push(format!(
            "{:<12} {:>14}  {:<8} {}",
            ledger.format_date(record.date),
            money(currency, record.amount),
            record.category,
            record.description
        ));
    }
    lines.push(String::new());
    lines.push("Summary:".to_string());
    lines.push(format!("Total Income: {}", money(currency, report.total_income())));
    lines.push(format!("Total Expense: {}", money(currency, report.total_expense())));
    lines.push(format!("Net Savings: {}", money(currency, report.net_savings())));
    lines
}

fn print_series(ledger: &Ledger, currency: &CurrencyConfig, series: &DailySeries) {
    println!();
    println!("{:<12} {:>14} {:>14}", "Date", "Income", "Expense");
    for (income, expense) in series.income.iter().zip(&series.expense) {
        println!(
            "{:<12} {:>14} {:>14}",
            ledger.format_date(income.date),
            money(currency, income.value),
            money(currency, expense.value)
        );
    }
}

/// Open bounds of an "all" range print as a word rather than as extreme years
fn display_bound(ledger: &Ledger, date: NaiveDate) -> String {
    if date == NaiveDate::MIN {
        "the beginning".to_string()
    } else if date == NaiveDate::MAX {
        "the end".to_string()
    } else {
        ledger.format_date(date)
    }
}

fn money(currency: &CurrencyConfig, amount: Decimal) -> String {
    let formatted = format_amount(
        amount,
        currency.decimal_places,
        &currency.thousands_separator,
    );
    with_symbol(
        &formatted,
        &currency.symbol,
        currency.symbol_position == SymbolPosition::Before,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pennybook_config::StoreConfig;
    use pennybook_store::MemoryStorage;
    use std::sync::Arc;

    fn memory_ledger() -> Ledger {
        let storage = Arc::new(MemoryStorage::new(4));
        let ledger = Ledger::with_storage(StoreConfig::new("memory.csv"), storage).unwrap();
        ledger.initialize().unwrap();
        ledger
    }

    #[test]
    fn test_empty_report_prints_only_notice() {
        let ledger = memory_ledger();
        let report = ledger.query_range_str("01-01-2024", "31-01-2024").unwrap();

        let lines = report_lines(&ledger, &CurrencyConfig::default(), &report);
        assert_eq!(lines, vec![pennybook_core::NO_TRANSACTIONS_MESSAGE.to_string()]);
    }

    #[test]
    fn test_report_starts_with_range_header() {
        let ledger = memory_ledger();
        ledger
            .append("02-01-2024", Decimal::new(1250, 0), Category::Income, "salary")
            .unwrap();
        let report = ledger.query_range_str("01-01-2024", "31-01-2024").unwrap();

        let lines = report_lines(&ledger, &CurrencyConfig::default(), &report);
        assert_eq!(lines[0], "Transactions from 01-01-2024 to 31-01-2024");
        assert!(lines.contains(&"Total Income: £1,250.00".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("Net Savings: £1,250.00"));
    }

    #[test]
    fn test_core_error_lines_carry_severity_and_hints() {
        let ledger = memory_ledger();
        let error = anyhow::Error::new(ledger.parse_date("2024/01/01").unwrap_err())
            .context("Failed to add entry");

        let lines = error_lines(&error);
        assert!(lines[0].starts_with("warning: Failed to add entry: Invalid date"));
        assert!(lines[1].contains("15-03-2024"));
    }

    #[test]
    fn test_config_error_lines_carry_hints() {
        let error = anyhow::Error::new(ConfigError::InvalidYaml {
            message: "bad indent".to_string(),
        });

        let lines = error_lines(&error);
        assert!(lines[0].starts_with("error: Invalid YAML format"));
        assert!(lines[1].contains("default-config"));
    }
}
