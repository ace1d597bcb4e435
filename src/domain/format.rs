//! Metric formatting for console summaries and text reports.

/// Fixed-decimal rendering.
pub fn round(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Fraction rendered as a percentage: `0.5` becomes `"50.00%"`.
pub fn percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0)
}

/// Currency rendering with the sign ahead of the symbol: `-12.3` becomes
/// `"-$12.30"`.
pub fn dollar(value: f64, decimals: usize) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${:.decimals$}", value.abs())
}

/// `Some` rendered by `fmt`, `None` rendered as `"n/a"` — the display form
/// of an undefined statistic.
pub fn or_na<F>(value: Option<f64>, fmt: F) -> String
where
    F: Fn(f64) -> String,
{
    match value {
        Some(v) => fmt(v),
        None => "n/a".to_string(),
    }
}
