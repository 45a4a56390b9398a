//! CLI definition and dispatch.
//!
//! The command line plays the presentation layer: each subcommand is one UI
//! event against the [`Journal`] service, followed by a fresh view.

use chrono::{Local, NaiveDateTime, Timelike};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_blob_adapter::FileBlobAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::memory_blob_adapter::MemoryBlobAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::adapters::text_table::{format_record, format_stats, format_trade_table};
use crate::domain::config_validation::{validate_ledger_config, DEFAULT_BACKEND, DEFAULT_LOG_LEVEL};
use crate::domain::error::JournalError;
use crate::domain::journal::{Journal, PreviewFields};
use crate::domain::ledger::{LedgerStore, DEFAULT_LEDGER_KEY};
use crate::domain::pnl::format_amount;
use crate::domain::query::Category;
use crate::domain::trade::{parse_trade_date, Direction, TradeDraft};
use crate::ports::blob_port::BlobPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

const BACKEND_HELP: &str = "Ledger backends ([ledger] backend in the config file):
  file     <[file] dir>/<key>.json (default)
  sqlite   table in the database at [sqlite] path
  memory   dry run: changes are discarded when the command exits";

#[derive(Parser, Debug)]
#[command(name = "tradejournal", about = "Personal trade ledger", after_help = BACKEND_HELP)]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `tradejournal=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a closed trade
    Add(AddArgs),
    /// Show the P/L the formula gives for partial inputs
    Preview {
        #[arg(long, default_value = "Long")]
        direction: Direction,
        #[arg(long, allow_negative_numbers = true)]
        size: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        entry: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        exit: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        fee: Option<f64>,
    },
    /// Show every field of one trade
    Show { id: String },
    /// Replace a trade; omitted fields keep their current values
    Update {
        id: String,
        #[command(flatten)]
        edit: EditArgs,
        /// Derive the result from the formula instead of keeping the stored one
        #[arg(long, conflicts_with = "result")]
        recompute: bool,
    },
    /// Reset a trade's result to the formula value
    Recompute { id: String },
    /// Delete a trade
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// List trades, most recent first
    List(FilterArgs),
    /// Summary statistics over the whole ledger
    Stats,
    /// Write the profit and win-rate charts as SVG
    Chart {
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Write the (filtered) trade table as CSV
    Export {
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Append trades from a CSV file
    Import {
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Case-insensitive match on symbol or notes
    #[arg(long, default_value = "")]
    pub search: String,
    /// all, winning, losing, long or short
    #[arg(long, default_value = "all")]
    pub filter: Category,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Defaults to now
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDateTime>,
    #[arg(long)]
    pub symbol: String,
    #[arg(long)]
    pub direction: Direction,
    #[arg(long, allow_negative_numbers = true)]
    pub size: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub entry: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub exit: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub stop_loss: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub take_profit: Option<f64>,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub fee: f64,
    /// Overrides the computed result
    #[arg(long, allow_negative_numbers = true)]
    pub result: Option<f64>,
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl AddArgs {
    pub fn into_draft(self) -> TradeDraft {
        TradeDraft {
            date: self.date.unwrap_or_else(now_to_minute),
            symbol: self.symbol,
            direction: self.direction,
            size: self.size,
            entry: self.entry,
            exit: self.exit,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            fee: self.fee,
            result: self.result,
            notes: self.notes,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct EditArgs {
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDateTime>,
    #[arg(long)]
    pub symbol: Option<String>,
    #[arg(long)]
    pub direction: Option<Direction>,
    #[arg(long, allow_negative_numbers = true)]
    pub size: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub entry: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub exit: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub stop_loss: Option<f64>,
    #[arg(long, conflicts_with = "stop_loss")]
    pub clear_stop_loss: bool,
    #[arg(long, allow_negative_numbers = true)]
    pub take_profit: Option<f64>,
    #[arg(long, conflicts_with = "take_profit")]
    pub clear_take_profit: bool,
    #[arg(long, allow_negative_numbers = true)]
    pub fee: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub result: Option<f64>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl EditArgs {
    /// Overlay the given fields on the current form contents.
    ///
    /// The result is taken from `--result` if given; it is re-derived when
    /// `recompute` is set or any formula input changed; otherwise the stored
    /// value is kept.
    pub fn apply(self, mut draft: TradeDraft, recompute: bool) -> TradeDraft {
        let inputs_changed = self.direction.is_some()
            || self.size.is_some()
            || self.entry.is_some()
            || self.exit.is_some()
            || self.fee.is_some();

        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(symbol) = self.symbol {
            draft.symbol = symbol;
        }
        if let Some(direction) = self.direction {
            draft.direction = direction;
        }
        if let Some(size) = self.size {
            draft.size = size;
        }
        if let Some(entry) = self.entry {
            draft.entry = entry;
        }
        if let Some(exit) = self.exit {
            draft.exit = exit;
        }
        if self.clear_stop_loss {
            draft.stop_loss = None;
        } else if self.stop_loss.is_some() {
            draft.stop_loss = self.stop_loss;
        }
        if self.clear_take_profit {
            draft.take_profit = None;
        } else if self.take_profit.is_some() {
            draft.take_profit = self.take_profit;
        }
        if let Some(fee) = self.fee {
            draft.fee = fee;
        }
        if let Some(notes) = self.notes {
            draft.notes = notes;
        }

        draft.result = match self.result {
            Some(result) => Some(result),
            None if recompute || inputs_changed => None,
            None => draft.result,
        };
        draft
    }
}

fn parse_date_arg(value: &str) -> Result<NaiveDateTime, String> {
    parse_trade_date(value).map_err(|e| e.to_string())
}

fn now_to_minute() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match load_config(cli.config.as_ref()) {
        Ok(c) => c,
        Err(code) => return code,
    };

    init_logging(cli.log_level.as_deref(), &config);

    if let Err(e) = validate_ledger_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let mut journal = match open_journal(&config) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match execute(&mut journal, cli.command, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    let Some(path) = path else {
        return Ok(FileConfigAdapter::empty());
    };
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Install the stderr subscriber. `--log-level` wins, then `RUST_LOG`, then
/// `[logging] level`.
pub fn init_logging(cli_level: Option<&str>, config: &dyn ConfigPort) {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(config.get_string_or("logging", "level", DEFAULT_LOG_LEVEL))
        }),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn open_blob_port(config: &dyn ConfigPort) -> Result<Box<dyn BlobPort>, JournalError> {
    let backend = config
        .get_string_or("ledger", "backend", DEFAULT_BACKEND)
        .to_lowercase();
    debug!(backend = %backend, "opening ledger backend");
    match backend.as_str() {
        "sqlite" => open_sqlite(config),
        "memory" => {
            warn!("memory backend selected, changes will not be kept");
            Ok(Box::new(MemoryBlobAdapter::new()))
        }
        _ => Ok(Box::new(FileBlobAdapter::from_config(config))),
    }
}

#[cfg(feature = "sqlite")]
fn open_sqlite(config: &dyn ConfigPort) -> Result<Box<dyn BlobPort>, JournalError> {
    use crate::adapters::sqlite_adapter::SqliteAdapter;
    Ok(Box::new(SqliteAdapter::from_config(config)?))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_config: &dyn ConfigPort) -> Result<Box<dyn BlobPort>, JournalError> {
    Err(JournalError::ConfigInvalid {
        section: "ledger".into(),
        key: "backend".into(),
        reason: "sqlite feature is required for the sqlite backend".into(),
    })
}

pub fn open_journal(config: &dyn ConfigPort) -> Result<Journal<Box<dyn BlobPort>>, JournalError> {
    let key = config.get_string_or("ledger", "key", DEFAULT_LEDGER_KEY);
    let port = open_blob_port(config)?;
    Ok(Journal::new(LedgerStore::with_key(port, key)))
}

/// Run one subcommand against `journal`, writing user-facing output to `out`.
pub fn execute<B: BlobPort, W: Write>(
    journal: &mut Journal<B>,
    command: Command,
    out: &mut W,
) -> Result<(), JournalError> {
    match command {
        Command::Add(args) => {
            let record = journal.submit(args.into_draft())?;
            writeln!(
                out,
                "Recorded trade {}: {} {} result {}",
                record.id,
                record.direction,
                record.symbol,
                format_amount(record.result)
            )?;
        }
        Command::Preview {
            direction,
            size,
            entry,
            exit,
            fee,
        } => {
            let fields = PreviewFields {
                direction,
                size,
                entry,
                exit,
                fee,
            };
            match journal.preview(fields) {
                Some(result) => writeln!(out, "{}", format_amount(result))?,
                None => eprintln!("size, entry and exit are needed for a preview"),
            }
        }
        Command::Show { id } => {
            let record = journal
                .store()
                .get(&id)
                .ok_or(JournalError::TradeNotFound { id })?;
            write!(out, "{}", format_record(&record))?;
        }
        Command::Update {
            id,
            edit,
            recompute,
        } => {
            let form = journal
                .edit(&id)
                .ok_or_else(|| JournalError::TradeNotFound { id: id.clone() })?;
            let draft = edit.apply(form, recompute);
            if !journal.update(&id, draft)? {
                return Err(JournalError::TradeNotFound { id });
            }
            if let Some(record) = journal.store().get(&id) {
                write!(out, "{}", format_record(&record))?;
            }
        }
        Command::Recompute { id } => {
            let record = journal
                .recompute(&id)?
                .ok_or(JournalError::TradeNotFound { id })?;
            write!(out, "{}", format_record(&record))?;
        }
        Command::Delete { id, yes } => {
            if !yes {
                writeln!(out, "Not deleted: pass --yes to delete trade {}", id)?;
                return Ok(());
            }
            if !journal.delete(&id)? {
                return Err(JournalError::TradeNotFound { id });
            }
            writeln!(out, "Deleted trade {}", id)?;
        }
        Command::List(filter) => {
            journal.set_search(filter.search);
            journal.set_category(filter.filter);
            let view = journal.view();
            write!(out, "{}", format_trade_table(&view.rows))?;
        }
        Command::Stats => {
            let view = journal.view();
            write!(out, "{}", format_stats(&view.stats))?;
        }
        Command::Chart { output } => {
            let view = journal.view();
            SvgChartAdapter::new().write(&view, &output)?;
            writeln!(out, "Charts written to {}", output.display())?;
        }
        Command::Export { output, filter } => {
            journal.set_search(filter.search);
            journal.set_category(filter.filter);
            let view = journal.view();
            CsvAdapter::new().write(&view, &output)?;
            writeln!(out, "{} trades written to {}", view.rows.len(), output.display())?;
        }
        Command::Import { input } => {
            let drafts = CsvAdapter::read_drafts_from_path(&input)?;
            let added = journal.import(drafts)?;
            writeln!(out, "Imported {} trades", added.len())?;
        }
    }
    Ok(())
}
