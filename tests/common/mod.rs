#![allow(dead_code)]

use chrono::NaiveDateTime;
use std::io::Write;
use tradejournal::domain::trade::{parse_trade_date, Direction, TradeDraft, TradeRecord};

pub fn at(date: &str) -> NaiveDateTime {
    parse_trade_date(date).unwrap()
}

/// Draft with size 1 and entry 100, so the result is `exit - 100`.
pub fn make_draft(symbol: &str, date: &str, direction: Direction, exit: f64) -> TradeDraft {
    TradeDraft::new(at(date), symbol, direction, 1.0, 100.0, exit)
}

pub fn make_record(id: &str, date: &str, direction: Direction, result: f64) -> TradeRecord {
    let draft = TradeDraft::new(at(date), "TEST", direction, 1.0, 100.0, 100.0).with_result(result);
    TradeRecord::from_draft(id.to_string(), draft)
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// `ExitCode` has no `PartialEq`; compare the debug forms instead.
pub fn same_exit_code(a: std::process::ExitCode, b: std::process::ExitCode) -> bool {
    format!("{:?}", a) == format!("{:?}", b)
}
