//! Plain-text report adapter implementing ReportPort.

use std::fs;

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::JournalError;
use crate::domain::format::{dollar, or_na, percent, round};
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, result: &AnalysisResult, output_path: &str) -> Result<(), JournalError> {
        let content = render(result);
        fs::write(output_path, content).map_err(|e| JournalError::Io {
            reason: format!("failed to write report {}: {}", output_path, e),
        })
    }
}

/// Render the full report. Undefined statistics show as `n/a` rather than
/// dropping their row.
pub fn render(result: &AnalysisResult) -> String {
    let stats = &result.stats;
    let mut out = String::new();

    out.push_str("=== Account ===\n");
    out.push_str(&format!(
        "Initial Balance:   {}\n",
        dollar(result.equity.initial_balance, 2)
    ));
    out.push_str(&format!(
        "Final Balance:     {}\n",
        dollar(result.equity.final_balance(), 2)
    ));
    let net_worth = result
        .equity
        .net_worth_ratios()
        .and_then(|r| r.last().copied());
    out.push_str(&format!(
        "Net Worth Ratio:   {}\n",
        or_na(net_worth, |v| round(v, 4))
    ));
    out.push_str(&format!(
        "Total Net Profit:  {}\n",
        dollar(stats.total_net_profit, 2)
    ));

    out.push_str("\n=== Statistics ===\n");
    out.push_str(&format!("Trades:            {}\n", stats.trade_count));
    out.push_str(&format!(
        "Won / Lost / Flat: {} / {} / {}\n",
        stats.trades_won, stats.trades_lost, stats.trades_breakeven
    ));
    out.push_str(&format!(
        "Win Rate:          {}\n",
        or_na(stats.win_rate, |v| percent(v, 1))
    ));
    out.push_str(&format!(
        "Average Win:       {}\n",
        or_na(stats.average_win, |v| dollar(v, 2))
    ));
    out.push_str(&format!(
        "Average Loss:      {}\n",
        or_na(stats.average_loss, |v| dollar(v, 2))
    ));
    out.push_str(&format!(
        "Largest Win:       {}\n",
        or_na(stats.largest_win, |v| dollar(v, 2))
    ));
    out.push_str(&format!(
        "Largest Loss:      {}\n",
        or_na(stats.largest_loss, |v| dollar(v, 2))
    ));
    out.push_str(&format!(
        "Reward/Risk:       {}\n",
        or_na(stats.reward_risk_ratio, |v| round(v, 2))
    ));
    out.push_str(&format!(
        "Expectancy:        {}\n",
        or_na(stats.expectancy, |v| dollar(v, 2))
    ));
    out.push_str(&format!(
        "Profit Factor:     {}\n",
        or_na(stats.profit_factor, |v| round(v, 2))
    ));
    out.push_str(&format!(
        "Consistency:       {}\n",
        or_na(stats.consistency_score, |v| percent(v, 1))
    ));

    out.push_str("\n=== Daily Breakdown ===\n");
    if result.daily.is_empty() {
        out.push_str("(no trading days)\n");
    } else {
        out.push_str("date        trades  volume    profit        commissions   net profit\n");
        for day in &result.daily {
            out.push_str(&format!(
                "{}  {:<6}  {:<8}  {:<12}  {:<12}  {}\n",
                day.day,
                day.trades,
                round(day.volume, 2),
                dollar(day.profit, 2),
                dollar(day.commissions, 2),
                dollar(day.net_profit, 2),
            ));
        }
    }

    out
}
