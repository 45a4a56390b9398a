//! Plain-text rendering of the trade table and the stats summary.

use crate::domain::pnl::{format_amount, format_signed};
use crate::domain::stats::Stats;
use crate::domain::trade::TradeRecord;

pub const EMPTY_TABLE: &str = "No trades recorded yet";

/// Rows as a fixed-width table. A `*` after the result marks a hand-entered
/// value that differs from the formula.
pub fn format_trade_table(rows: &[TradeRecord]) -> String {
    if rows.is_empty() {
        return format!("{}\n", EMPTY_TABLE);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<16}  {:<10}  {:<5}  {:>10}  {:>12}  {:>12}  {:>12}  {}\n",
        "Date", "Symbol", "Dir", "Size", "Entry", "Exit", "Result", "Id"
    ));
    out.push_str(&format!("{}\n", "-".repeat(100)));

    for row in rows {
        let marker = if row.is_result_overridden() { "*" } else { " " };
        out.push_str(&format!(
            "{:<16}  {:<10}  {:<5}  {:>10}  {:>12.4}  {:>12.4}  {:>11}{}  {}\n",
            row.date.format("%Y-%m-%d %H:%M"),
            row.symbol,
            row.direction,
            row.size,
            row.entry,
            row.exit,
            format_signed(row.result),
            marker,
            row.id
        ));
    }
    out
}

pub fn format_stats(stats: &Stats) -> String {
    let mut out = String::new();
    out.push_str(&format!("Trades:         {}\n", stats.total_trades));
    out.push_str(&format!("Win Rate:       {:.1}%\n", stats.win_rate));
    out.push_str(&format!("Avg Win:        ${}\n", format_amount(stats.avg_win)));
    out.push_str(&format!("Avg Loss:       ${}\n", format_amount(stats.avg_loss)));
    out.push_str(&format!("Profit Factor:  {}\n", stats.profit_factor));
    out.push_str(&format!("Net Profit:     ${}\n", format_amount(stats.net_profit)));
    out.push_str(&format!("Largest Win:    ${}\n", format_amount(stats.largest_win)));
    out.push_str(&format!("Largest Loss:   ${}\n", format_amount(stats.largest_loss)));
    out
}

/// Every field of one record, for the edit flow.
pub fn format_record(record: &TradeRecord) -> String {
    let optional = |v: Option<f64>| v.map(|p| format!("{:.4}", p)).unwrap_or_else(|| "-".into());
    let mut out = String::new();
    out.push_str(&format!("Id:           {}\n", record.id));
    out.push_str(&format!("Date:         {}\n", record.date.format("%Y-%m-%d %H:%M")));
    out.push_str(&format!("Symbol:       {}\n", record.symbol));
    out.push_str(&format!("Direction:    {}\n", record.direction));
    out.push_str(&format!("Size:         {}\n", record.size));
    out.push_str(&format!("Entry:        {:.4}\n", record.entry));
    out.push_str(&format!("Exit:         {:.4}\n", record.exit));
    out.push_str(&format!("Stop Loss:    {}\n", optional(record.stop_loss)));
    out.push_str(&format!("Take Profit:  {}\n", optional(record.take_profit)));
    out.push_str(&format!("Fee:          {}\n", format_amount(record.fee)));
    out.push_str(&format!("Result:       {}\n", format_signed(record.result)));
    if record.is_result_overridden() {
        out.push_str(&format!(
            "              (formula gives {})\n",
            format_signed(record.formula_result())
        ));
    }
    out.push_str(&format!("Notes:        {}\n", record.notes));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stats::aggregate;
    use crate::domain::trade::{parse_trade_date, Direction, TradeDraft};

    fn record(id: &str, result: Option<f64>) -> TradeRecord {
        let mut draft = TradeDraft::new(
            parse_trade_date("2024-02-10T08:05").unwrap(),
            "gbpusd",
            Direction::Long,
            10.0,
            1.2650,
            1.2710,
        );
        draft.result = result;
        TradeRecord::from_draft(id.to_string(), draft)
    }

    #[test]
    fn empty_table_message() {
        assert_eq!(format_trade_table(&[]), "No trades recorded yet\n");
    }

    #[test]
    fn table_row_formats_prices_and_result() {
        let table = format_trade_table(&[record("17", None)]);
        let row = table.lines().nth(2).unwrap();
        assert!(row.starts_with("2024-02-10 08:05"));
        assert!(row.contains("GBPUSD"));
        assert!(row.contains("1.2650"));
        assert!(row.contains("1.2710"));
        assert!(row.contains("+0.06 "));
        assert!(row.ends_with("17"));
    }

    #[test]
    fn negative_zero_result_shows_unsigned_zero() {
        let table = format_trade_table(&[record("17", Some(-0.0))]);
        assert!(table.contains("+0.00*"));
        assert!(!table.contains("+-"));
    }

    #[test]
    fn overridden_result_is_marked() {
        let table = format_trade_table(&[record("17", Some(-3.0))]);
        assert!(table.contains("-3.00*"));
    }

    #[test]
    fn stats_summary_lines() {
        let records: Vec<TradeRecord> = [100.0, -50.0, 30.0, -10.0]
            .iter()
            .enumerate()
            .map(|(i, &r)| record(&i.to_string(), Some(r)))
            .collect();
        let text = format_stats(&aggregate(&records));
        assert!(text.contains("Win Rate:       50.0%"));
        assert!(text.contains("Avg Win:        $65.00"));
        assert!(text.contains("Avg Loss:       $30.00"));
        assert!(text.contains("Profit Factor:  2.17"));
    }

    #[test]
    fn stats_summary_infinite_factor() {
        let text = format_stats(&aggregate(&[record("1", Some(5.0))]));
        assert!(text.contains("Profit Factor:  ∞"));
    }

    #[test]
    fn record_detail_shows_formula_gap() {
        let text = format_record(&record("9", Some(1.0)));
        assert!(text.contains("Stop Loss:    -"));
        assert!(text.contains("formula gives +0.06"));
    }
}
