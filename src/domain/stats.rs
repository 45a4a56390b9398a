//! Ledger performance statistics and chart series.
//!
//! A result of exactly zero is a win everywhere in this module.

use super::trade::TradeRecord;
use chrono::NaiveDateTime;
use std::fmt;

/// Gross wins over gross losses. `Infinite` when there are wins and no losses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfitFactor {
    Finite(f64),
    Infinite,
}

impl ProfitFactor {
    pub fn is_infinite(&self) -> bool {
        matches!(self, ProfitFactor::Infinite)
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            ProfitFactor::Finite(v) => *v,
            ProfitFactor::Infinite => f64::INFINITY,
        }
    }
}

impl fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitFactor::Finite(v) => write!(f, "{:.2}", v),
            ProfitFactor::Infinite => f.write_str("∞"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percentage in `0..=100`.
    pub win_rate: f64,
    pub avg_win: f64,
    /// Mean absolute loss.
    pub avg_loss: f64,
    pub profit_factor: ProfitFactor,
    pub net_profit: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
}

impl Stats {
    pub fn compute(records: &[TradeRecord]) -> Self {
        let mut wins = 0usize;
        let mut losses = 0usize;
        let mut gross_wins = 0.0_f64;
        let mut gross_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;

        for record in records {
            let result = record.result;
            if record.is_win() {
                wins += 1;
                gross_wins += result;
                if result > largest_win {
                    largest_win = result;
                }
            } else {
                losses += 1;
                gross_losses += result.abs();
                if result.abs() > largest_loss {
                    largest_loss = result.abs();
                }
            }
        }

        let total_trades = records.len();
        let win_rate = if total_trades > 0 {
            wins as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };

        let avg_win = if wins > 0 {
            gross_wins / wins as f64
        } else {
            0.0
        };

        let avg_loss = if losses > 0 {
            gross_losses / losses as f64
        } else {
            0.0
        };

        let profit_factor = if gross_losses > 0.0 {
            ProfitFactor::Finite(gross_wins / gross_losses)
        } else if gross_wins > 0.0 {
            ProfitFactor::Infinite
        } else {
            ProfitFactor::Finite(0.0)
        };

        Stats {
            total_trades,
            wins,
            losses,
            win_rate,
            avg_win,
            avg_loss,
            profit_factor,
            net_profit: gross_wins - gross_losses,
            largest_win,
            largest_loss,
        }
    }
}

/// Shorthand for [`Stats::compute`].
pub fn aggregate(records: &[TradeRecord]) -> Stats {
    Stats::compute(records)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CumulativePoint {
    pub date: NaiveDateTime,
    pub cumulative: f64,
}

/// Running total of results in ascending date order. Equal dates keep their
/// ledger order.
pub fn cumulative_profit(records: &[TradeRecord]) -> Vec<CumulativePoint> {
    let mut sorted: Vec<&TradeRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let mut running = 0.0_f64;
    sorted
        .into_iter()
        .map(|record| {
            running += record.result;
            CumulativePoint {
                date: record.date,
                cumulative: running,
            }
        })
        .collect()
}

/// Series for the two ledger charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub cumulative: Vec<CumulativePoint>,
    pub wins: usize,
    pub losses: usize,
}

impl ChartData {
    pub fn compute(records: &[TradeRecord]) -> Self {
        let wins = records.iter().filter(|r| r.is_win()).count();
        ChartData {
            cumulative: cumulative_profit(records),
            wins,
            losses: records.len() - wins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::{parse_trade_date, Direction, TradeDraft};
    use approx::assert_abs_diff_eq;

    fn make_record(id: &str, date: &str, result: f64) -> TradeRecord {
        let draft = TradeDraft::new(
            parse_trade_date(date).unwrap(),
            "ABC",
            Direction::Long,
            1.0,
            100.0,
            100.0 + result,
        )
        .with_result(result);
        TradeRecord::from_draft(id.to_string(), draft)
    }

    fn with_results(results: &[f64]) -> Vec<TradeRecord> {
        results
            .iter()
            .enumerate()
            .map(|(i, &r)| make_record(&i.to_string(), "2024-01-01", r))
            .collect()
    }

    #[test]
    fn stats_empty_ledger() {
        let stats = Stats::compute(&[]);
        assert_eq!(stats.total_trades, 0);
        assert_abs_diff_eq!(stats.win_rate, 0.0);
        assert_abs_diff_eq!(stats.avg_win, 0.0);
        assert_abs_diff_eq!(stats.avg_loss, 0.0);
        assert_eq!(stats.profit_factor, ProfitFactor::Finite(0.0));
    }

    #[test]
    fn stats_mixed_results() {
        let stats = aggregate(&with_results(&[100.0, -50.0, 30.0, -10.0]));
        assert_abs_diff_eq!(stats.win_rate, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(stats.avg_win, 65.0, epsilon = 1e-9);
        assert_abs_diff_eq!(stats.avg_loss, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(stats.profit_factor.as_f64(), 130.0 / 60.0, epsilon = 1e-9);
        assert_eq!(stats.profit_factor.to_string(), "2.17");
        assert_abs_diff_eq!(stats.net_profit, 70.0, epsilon = 1e-9);
        assert_abs_diff_eq!(stats.largest_win, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(stats.largest_loss, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn stats_no_losers_is_infinite() {
        let stats = aggregate(&with_results(&[10.0, 20.0]));
        assert!(stats.profit_factor.is_infinite());
        assert_eq!(stats.profit_factor.to_string(), "∞");
        assert_abs_diff_eq!(stats.win_rate, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn stats_only_breakeven_is_zero_factor() {
        let stats = aggregate(&with_results(&[0.0, 0.0]));
        assert_eq!(stats.profit_factor, ProfitFactor::Finite(0.0));
        assert_eq!(stats.wins, 2);
    }

    #[test]
    fn zero_result_counts_as_win() {
        let stats = aggregate(&with_results(&[0.0, -10.0]));
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 1);
        assert_abs_diff_eq!(stats.win_rate, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(stats.avg_win, 0.0, epsilon = 1e-9);
        assert_eq!(stats.profit_factor, ProfitFactor::Finite(0.0));
    }

    #[test]
    fn only_losses() {
        let stats = aggregate(&with_results(&[-5.0, -15.0]));
        assert_abs_diff_eq!(stats.win_rate, 0.0);
        assert_abs_diff_eq!(stats.avg_loss, 10.0, epsilon = 1e-9);
        assert_eq!(stats.profit_factor, ProfitFactor::Finite(0.0));
    }

    #[test]
    fn cumulative_series_sorted_ascending() {
        let records = vec![
            make_record("a", "2024-01-03", 5.0),
            make_record("b", "2024-01-01", 10.0),
            make_record("c", "2024-01-02", -4.0),
        ];
        let series = cumulative_profit(&records);
        let totals: Vec<f64> = series.iter().map(|p| p.cumulative).collect();
        assert_eq!(totals, vec![10.0, 6.0, 11.0]);
        assert_eq!(series[0].date, parse_trade_date("2024-01-01").unwrap());
    }

    #[test]
    fn cumulative_series_equal_dates_keep_order() {
        let records = vec![
            make_record("a", "2024-01-01", 1.0),
            make_record("b", "2024-01-01", 2.0),
        ];
        let series = cumulative_profit(&records);
        assert_eq!(series[0].cumulative, 1.0);
        assert_eq!(series[1].cumulative, 3.0);
    }

    #[test]
    fn chart_data_counts() {
        let chart = ChartData::compute(&with_results(&[1.0, 0.0, -1.0]));
        assert_eq!(chart.wins, 2);
        assert_eq!(chart.losses, 1);
        assert_eq!(chart.cumulative.len(), 3);

        let empty = ChartData::compute(&[]);
        assert!(empty.cumulative.is_empty());
        assert_eq!((empty.wins, empty.losses), (0, 0));
    }
}
