//! Trade records: the unit of persisted ledger data.

use super::error::JournalError;
use super::pnl::compute_result;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Results closer than this to the formula value are not considered overrides.
const OVERRIDE_TOLERANCE: f64 = 0.005;

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" => Ok(Direction::Long),
            "short" => Ok(Direction::Short),
            _ => Err(JournalError::InvalidDirection {
                value: s.to_string(),
            }),
        }
    }
}

/// Parse a trade timestamp. Accepts the datetime-local form (`2024-01-15T10:30`),
/// full seconds with optional fraction, a space separator, or a bare date.
pub fn parse_trade_date(value: &str) -> Result<NaiveDateTime, JournalError> {
    let value = value.trim();
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| JournalError::InvalidDate {
            value: value.to_string(),
        })
}

/// Canonical written form of a trade timestamp. Whole minutes drop the seconds.
pub fn format_trade_date(date: NaiveDateTime) -> String {
    if date.second() == 0 && date.nanosecond() == 0 {
        date.format("%Y-%m-%dT%H:%M").to_string()
    } else {
        date.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

mod trade_date {
    use super::{format_trade_date, parse_trade_date};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_trade_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_trade_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// One closed position as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredTrade")]
pub struct TradeRecord {
    pub id: String,
    #[serde(with = "trade_date")]
    pub date: NaiveDateTime,
    pub symbol: String,
    pub direction: Direction,
    pub size: f64,
    pub entry: f64,
    pub exit: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub fee: f64,
    pub result: f64,
    pub notes: String,
}

/// Lenient read shape: legacy blobs carry `null` for an unparseable result
/// and may omit the optional fields.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTrade {
    id: String,
    #[serde(with = "trade_date")]
    date: NaiveDateTime,
    symbol: String,
    direction: Direction,
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

impl From<StoredTrade> for TradeRecord {
    fn from(raw: StoredTrade) -> Self {
        let fee = raw.fee.unwrap_or(0.0);
        let result = raw
            .result
            .unwrap_or_else(|| compute_result(raw.direction, raw.size, raw.entry, raw.exit, fee));
        TradeRecord {
            id: raw.id,
            date: raw.date,
            symbol: raw.symbol,
            direction: raw.direction,
            size: raw.size,
            entry: raw.entry,
            exit: raw.exit,
            stop_loss: raw.stop_loss,
            take_profit: raw.take_profit,
            fee,
            result,
            notes: raw.notes.unwrap_or_default(),
        }
    }
}

impl TradeRecord {
    /// Build a record from submitted fields. The symbol is upper-cased and a
    /// missing result is filled from the formula.
    pub fn from_draft(id: String, draft: TradeDraft) -> Self {
        let result = draft.resolved_result();
        TradeRecord {
            id,
            date: draft.date,
            symbol: draft.symbol.trim().to_uppercase(),
            direction: draft.direction,
            size: draft.size,
            entry: draft.entry,
            exit: draft.exit,
            stop_loss: draft.stop_loss,
            take_profit: draft.take_profit,
            fee: draft.fee,
            result,
            notes: draft.notes,
        }
    }

    /// What the P/L formula gives for the stored inputs.
    pub fn formula_result(&self) -> f64 {
        compute_result(self.direction, self.size, self.entry, self.exit, self.fee)
    }

    /// True when the stored result was entered by hand and no longer matches
    /// the inputs. Aggregation still trusts the stored value.
    pub fn is_result_overridden(&self) -> bool {
        (self.result - self.formula_result()).abs() > OVERRIDE_TOLERANCE
    }

    /// Breakeven counts as a win.
    pub fn is_win(&self) -> bool {
        self.result >= 0.0
    }

    /// Form contents for editing this record.
    pub fn to_draft(&self) -> TradeDraft {
        TradeDraft {
            date: self.date,
            symbol: self.symbol.clone(),
            direction: self.direction,
            size: self.size,
            entry: self.entry,
            exit: self.exit,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            fee: self.fee,
            result: Some(self.result),
            notes: self.notes.clone(),
        }
    }
}

/// Submitted trade fields, without an id.
///
/// `result: None` means "derive from the formula"; `Some` is stored verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeDraft {
    pub date: NaiveDateTime,
    pub symbol: String,
    pub direction: Direction,
    pub size: f64,
    pub entry: f64,
    pub exit: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub fee: f64,
    pub result: Option<f64>,
    pub notes: String,
}

impl TradeDraft {
    pub fn new(
        date: NaiveDateTime,
        symbol: impl Into<String>,
        direction: Direction,
        size: f64,
        entry: f64,
        exit: f64,
    ) -> Self {
        TradeDraft {
            date,
            symbol: symbol.into(),
            direction,
            size,
            entry,
            exit,
            stop_loss: None,
            take_profit: None,
            fee: 0.0,
            result: None,
            notes: String::new(),
        }
    }

    pub fn with_fee(mut self, fee: f64) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_stop_loss(mut self, stop_loss: f64) -> Self {
        self.stop_loss = Some(stop_loss);
        self
    }

    pub fn with_take_profit(mut self, take_profit: f64) -> Self {
        self.take_profit = Some(take_profit);
        self
    }

    pub fn with_result(mut self, result: f64) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn resolved_result(&self) -> f64 {
        self.result.unwrap_or_else(|| {
            compute_result(self.direction, self.size, self.entry, self.exit, self.fee)
        })
    }

    pub fn validate(&self) -> Result<(), JournalError> {
        if self.symbol.trim().is_empty() {
            return Err(JournalError::invalid_trade("symbol", "must not be empty"));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(JournalError::invalid_trade("size", "must be positive"));
        }
        if !self.entry.is_finite() {
            return Err(JournalError::invalid_trade("entry", "must be a number"));
        }
        if !self.exit.is_finite() {
            return Err(JournalError::invalid_trade("exit", "must be a number"));
        }
        if !self.fee.is_finite() || self.fee < 0.0 {
            return Err(JournalError::invalid_trade("fee", "must be non-negative"));
        }
        if self.stop_loss.is_some_and(|v| !v.is_finite()) {
            return Err(JournalError::invalid_trade("stopLoss", "must be a number"));
        }
        if self.take_profit.is_some_and(|v| !v.is_finite()) {
            return Err(JournalError::invalid_trade("takeProfit", "must be a number"));
        }
        if self.result.is_some_and(|v| !v.is_finite()) {
            return Err(JournalError::invalid_trade("result", "must be a number"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn at(date: &str) -> NaiveDateTime {
        parse_trade_date(date).unwrap()
    }

    fn sample_draft() -> TradeDraft {
        TradeDraft::new(at("2024-03-01T09:30"), " eurusd ", Direction::Long, 10.0, 100.0, 110.0)
            .with_fee(2.0)
            .with_notes("breakout")
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("long".parse::<Direction>().unwrap(), Direction::Long);
        assert_eq!("SHORT".parse::<Direction>().unwrap(), Direction::Short);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn parses_datetime_local_form() {
        let dt = at("2024-01-15T10:30");
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
        assert_eq!(dt.second(), 0);
    }

    #[test]
    fn parses_seconds_space_and_bare_date() {
        assert_eq!(at("2024-01-15T10:30:15").second(), 15);
        assert_eq!(at("2024-01-15 10:30").minute(), 30);
        assert_eq!(at("2024-01-15").hour(), 0);
        assert!(parse_trade_date("15/01/2024").is_err());
    }

    #[test]
    fn format_drops_zero_seconds() {
        assert_eq!(format_trade_date(at("2024-01-15T10:30:00")), "2024-01-15T10:30");
        assert_eq!(format_trade_date(at("2024-01-15T10:30:15")), "2024-01-15T10:30:15");
    }

    #[test]
    fn from_draft_uppercases_and_derives_result() {
        let record = TradeRecord::from_draft("1".into(), sample_draft());
        assert_eq!(record.symbol, "EURUSD");
        assert_abs_diff_eq!(record.result, 98.0, epsilon = 1e-9);
        assert!(!record.is_result_overridden());
    }

    #[test]
    fn explicit_result_is_kept_and_flagged() {
        let record = TradeRecord::from_draft("1".into(), sample_draft().with_result(50.0));
        assert_abs_diff_eq!(record.result, 50.0, epsilon = 1e-9);
        assert!(record.is_result_overridden());
    }

    #[test]
    fn rounded_result_is_not_an_override() {
        let draft = TradeDraft::new(at("2024-03-01"), "X", Direction::Long, 3.0, 1.0, 1.3333)
            .with_result(1.0);
        let record = TradeRecord::from_draft("1".into(), draft);
        assert!(!record.is_result_overridden());
    }

    #[test]
    fn json_uses_camel_case_fields() {
        let record = TradeRecord::from_draft("42".into(), sample_draft().with_stop_loss(95.0));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["stopLoss"], 95.0);
        assert!(json["takeProfit"].is_null());
        assert_eq!(json["direction"], "Long");
        assert_eq!(json["date"], "2024-03-01T09:30");
    }

    #[test]
    fn null_result_is_derived_on_read() {
        let json = r#"{"id":"1","date":"2024-03-01T09:30","symbol":"BTC","direction":"Short",
            "size":5,"entry":50,"exit":40,"stopLoss":null,"takeProfit":null,"fee":1,
            "result":null,"notes":""}"#;
        let record: TradeRecord = serde_json::from_str(json).unwrap();
        assert_abs_diff_eq!(record.result, 49.0, epsilon = 1e-9);
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"id":"1","date":"2024-03-01","symbol":"BTC","direction":"Long",
            "size":1,"entry":10,"exit":12,"result":2}"#;
        let record: TradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.fee, 0.0);
        assert_eq!(record.notes, "");
        assert_eq!(record.stop_loss, None);
    }

    #[test]
    fn validate_rejects_bad_fields() {
        let mut draft = sample_draft();
        draft.size = 0.0;
        assert!(matches!(
            draft.validate(),
            Err(JournalError::InvalidTrade { field, .. }) if field == "size"
        ));

        let mut draft = sample_draft();
        draft.fee = -1.0;
        assert!(matches!(
            draft.validate(),
            Err(JournalError::InvalidTrade { field, .. }) if field == "fee"
        ));

        let mut draft = sample_draft();
        draft.symbol = "   ".into();
        assert!(draft.validate().is_err());

        let mut draft = sample_draft();
        draft.entry = f64::NAN;
        assert!(draft.validate().is_err());

        assert!(sample_draft().validate().is_ok());
    }

    #[test]
    fn to_draft_round_trips_record() {
        let record = TradeRecord::from_draft("7".into(), sample_draft());
        let again = TradeRecord::from_draft("7".into(), record.to_draft());
        assert_eq!(record, again);
    }
}
