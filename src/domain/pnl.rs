//! Realized profit/loss calculation.

use super::trade::Direction;

/// Realized P/L of a closed position, net of fees.
pub fn compute_result(direction: Direction, size: f64, entry: f64, exit: f64, fee: f64) -> f64 {
    match direction {
        Direction::Long => (exit - entry) * size - fee,
        Direction::Short => (entry - exit) * size - fee,
    }
}

/// Live preview while a form is being filled in.
///
/// Returns `None` unless size, entry and exit are all present, finite and
/// non-zero; the caller then leaves its result field as it was. A missing or
/// unusable fee counts as zero.
pub fn preview_result(
    direction: Direction,
    size: Option<f64>,
    entry: Option<f64>,
    exit: Option<f64>,
    fee: Option<f64>,
) -> Option<f64> {
    let usable = |v: Option<f64>| v.filter(|x| x.is_finite() && *x != 0.0);
    let size = usable(size)?;
    let entry = usable(entry)?;
    let exit = usable(exit)?;
    let fee = fee.filter(|f| f.is_finite()).unwrap_or(0.0);
    Some(compute_result(direction, size, entry, exit, fee))
}

fn drop_negative_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// Two-decimal display form. Stored values keep full precision.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", drop_negative_zero(value))
}

/// Two decimals with an explicit `+` on non-negative values.
pub fn format_signed(value: f64) -> String {
    let value = drop_negative_zero(value);
    if value >= 0.0 {
        format!("+{:.2}", value)
    } else {
        format!("{:.2}", value)
    }
}
