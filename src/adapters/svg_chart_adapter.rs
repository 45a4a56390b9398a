//! SVG rendering of the ledger charts: cumulative profit line and win/loss ring.

use crate::domain::error::JournalError;
use crate::domain::journal::JournalView;
use crate::domain::stats::{ChartData, CumulativePoint};
use crate::ports::report_port::ReportPort;
use std::f64::consts::PI;
use std::fs;
use std::path::Path;
use tracing::debug;

const WIDTH: f64 = 500.0;
const HEIGHT: f64 = 240.0;
const PADDING: f64 = 40.0;

const LINE_COLOR: &str = "#3498db";
const FILL_COLOR: &str = "rgba(52, 152, 219, 0.1)";
const WIN_COLOR: &str = "#27ae60";
const LOSS_COLOR: &str = "#e74c3c";
const EMPTY_COLOR: &str = "#dddddd";

fn placeholder(title: &str, message: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">
  <text x="{cx:.1}" y="20" text-anchor="middle" font-weight="bold">{title}</text>
  <text x="{cx:.1}" y="{cy:.1}" text-anchor="middle" fill="#888">{message}</text>
</svg>
"##,
        w = WIDTH,
        h = HEIGHT,
        cx = WIDTH / 2.0,
        cy = HEIGHT / 2.0,
    )
}

/// Line chart of the running profit total, one point per trade.
pub fn profit_chart_svg(series: &[CumulativePoint]) -> String {
    if series.is_empty() {
        return placeholder("Profit Over Time", "No trades recorded yet");
    }

    let min_value = series
        .iter()
        .map(|p| p.cumulative)
        .fold(0.0_f64, f64::min);
    let max_value = series
        .iter()
        .map(|p| p.cumulative)
        .fold(0.0_f64, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let range = max_value - min_value;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if series.len() > 1 {
        plot_width / (series.len() - 1) as f64
    } else {
        0.0
    };
    let y_of = |v: f64| HEIGHT - PADDING - (v - min_value) * scale_y;

    let points: Vec<String> = series
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:.1},{:.1}", PADDING + i as f64 * scale_x, y_of(p.cumulative)))
        .collect();
    let polyline = points.join(" ");

    let zero_y = y_of(0.0);
    let last_x = PADDING + (series.len() - 1) as f64 * scale_x;
    let area = format!(
        "{:.1},{:.1} {} {:.1},{:.1}",
        PADDING, zero_y, polyline, last_x, zero_y
    );

    let first_label = series[0].date.format("%Y-%m-%d");
    let last_label = series[series.len() - 1].date.format("%Y-%m-%d");

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r#"  <text x="{:.1}" y="20" text-anchor="middle" font-weight="bold">Profit Over Time</text>"#,
        WIDTH / 2.0
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r#"  <line x1="{p:.1}" y1="{p:.1}" x2="{p:.1}" y2="{b:.1}" stroke="black"/>"#,
        p = PADDING,
        b = HEIGHT - PADDING
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r##"  <line x1="{p:.1}" y1="{z:.1}" x2="{r:.1}" y2="{z:.1}" stroke="#999" stroke-dasharray="4 2"/>"##,
        p = PADDING,
        z = zero_y,
        r = WIDTH - PADDING
    ));
    svg.push('\n');
    svg.push_str(&format!(
        "  <polygon points=\"{}\" fill=\"{}\" stroke=\"none\"/>\n",
        area, FILL_COLOR
    ));
    svg.push_str(&format!(
        "  <polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
        polyline, LINE_COLOR
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\">${:.2}</text>\n",
        PADDING - 4.0,
        PADDING + 4.0,
        max_value
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\">${:.2}</text>\n",
        PADDING - 4.0,
        HEIGHT - PADDING,
        min_value
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\">{}</text>\n",
        PADDING,
        HEIGHT - PADDING + 16.0,
        first_label
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\">{}</text>\n",
        WIDTH - PADDING,
        HEIGHT - PADDING + 16.0,
        last_label
    ));
    svg.push_str("</svg>\n");
    svg
}

/// Ring chart of winning versus losing trades.
pub fn win_rate_svg(wins: usize, losses: usize) -> String {
    let cx = WIDTH / 2.0;
    let cy = HEIGHT / 2.0 + 5.0;
    let radius = 70.0;
    let ring = 28.0;
    let circumference = 2.0 * PI * radius;
    let total = wins + losses;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push('\n');
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"20\" text-anchor=\"middle\" font-weight=\"bold\">Win Rate</text>\n",
        cx
    ));

    if total == 0 {
        svg.push_str(&ring_circle(cx, cy, radius, ring, EMPTY_COLOR));
    } else {
        svg.push_str(&ring_circle(cx, cy, radius, ring, LOSS_COLOR));
        if wins > 0 {
            let win_len = circumference * wins as f64 / total as f64;
            svg.push_str(&format!(
                "  <circle cx=\"{cx:.1}\" cy=\"{cy:.1}\" r=\"{radius:.1}\" fill=\"none\" stroke=\"{WIN_COLOR}\" stroke-width=\"{ring:.1}\" stroke-dasharray=\"{win_len:.2} {circumference:.2}\" transform=\"rotate(-90 {cx:.1} {cy:.1})\"/>\n"
            ));
        }
    }

    let legend_y = HEIGHT - 14.0;
    svg.push_str(&format!(
        "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"10\" height=\"10\" fill=\"{WIN_COLOR}\"/><text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\">Winning Trades ({wins})</text>\n",
        cx - 150.0,
        legend_y - 9.0,
        cx - 135.0,
        legend_y
    ));
    svg.push_str(&format!(
        "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"10\" height=\"10\" fill=\"{LOSS_COLOR}\"/><text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\">Losing Trades ({losses})</text>\n",
        cx + 20.0,
        legend_y - 9.0,
        cx + 35.0,
        legend_y
    ));
    svg.push_str("</svg>\n");
    svg
}

fn ring_circle(cx: f64, cy: f64, radius: f64, ring: f64, color: &str) -> String {
    format!(
        "  <circle cx=\"{cx:.1}\" cy=\"{cy:.1}\" r=\"{radius:.1}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{ring:.1}\"/>\n"
    )
}

/// Both charts stacked in one SVG document.
pub fn chart_document(chart: &ChartData) -> String {
    let profit = profit_chart_svg(&chart.cumulative);
    let ring = win_rate_svg(chart.wins, chart.losses);
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">
<g>
{profit}</g>
<g transform="translate(0 {offset:.0})">
{ring}</g>
</svg>
"#,
        w = WIDTH,
        h = HEIGHT * 2.0,
        offset = HEIGHT,
    )
}

pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgChartAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for SvgChartAdapter {
    fn write(&self, view: &JournalView, output_path: &Path) -> Result<(), JournalError> {
        let svg = chart_document(&view.chart);
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, svg)?;
        debug!(path = %output_path.display(), points = view.chart.cumulative.len(), "charts written");
        Ok(())
    }
}
