//! CSV export and import of trades.
//!
//! Columns use the ledger's JSON field names. Export writes the view's rows
//! including `id`; import ignores any `id` column and assigns fresh ids.

use crate::domain::error::JournalError;
use crate::domain::journal::JournalView;
use crate::domain::trade::{parse_trade_date, Direction, TradeDraft, TradeRecord};
use crate::ports::report_port::ReportPort;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvTrade {
    date: String,
    symbol: String,
    direction: String,
    size: f64,
    entry: f64,
    exit: f64,
    #[serde(default)]
    stop_loss: Option<f64>,
    #[serde(default)]
    take_profit: Option<f64>,
    #[serde(default)]
    fee: Option<f64>,
    #[serde(default)]
    result: Option<f64>,
    #[serde(default)]
    notes: Option<String>,
}

impl CsvTrade {
    fn into_draft(self) -> Result<TradeDraft, JournalError> {
        Ok(TradeDraft {
            date: parse_trade_date(&self.date)?,
            symbol: self.symbol,
            direction: self.direction.parse::<Direction>()?,
            size: self.size,
            entry: self.entry,
            exit: self.exit,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            fee: self.fee.unwrap_or(0.0),
            result: self.result,
            notes: self.notes.unwrap_or_default(),
        })
    }
}

pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_rows<W: Write>(rows: &[TradeRecord], writer: W) -> Result<(), JournalError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for row in rows {
            wtr.serialize(row).map_err(|e| JournalError::Csv {
                reason: e.to_string(),
            })?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn read_drafts<R: Read>(reader: R) -> Result<Vec<TradeDraft>, JournalError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut drafts = Vec::new();

        for (index, result) in rdr.deserialize::<CsvTrade>().enumerate() {
            let line = index + 2;
            let row = result.map_err(|e| JournalError::Csv {
                reason: format!("row {}: {}", line, e),
            })?;
            let draft = row.into_draft().map_err(|e| JournalError::Csv {
                reason: format!("row {}: {}", line, e),
            })?;
            drafts.push(draft);
        }

        Ok(drafts)
    }

    pub fn read_drafts_from_path(path: &Path) -> Result<Vec<TradeDraft>, JournalError> {
        let file = File::open(path)?;
        let drafts = Self::read_drafts(file)?;
        debug!(path = %path.display(), count = drafts.len(), "csv trades read");
        Ok(drafts)
    }
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvAdapter {
    fn write(&self, view: &JournalView, output_path: &Path) -> Result<(), JournalError> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(output_path)?;
        Self::write_rows(&view.rows, file)?;
        debug!(path = %output_path.display(), rows = view.rows.len(), "csv export written");
        Ok(())
    }
}
