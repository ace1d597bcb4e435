//! Trading-performance statistics.

use super::daily::DailyAggregate;
use super::equity::NetProfitSeries;

/// Derived performance statistics over a net-profit series.
///
/// Ratio statistics are `Option<f64>`: `None` means the statistic is
/// undefined for this input (zero denominator), and callers choose how to
/// display that. No `NaN` or infinity ever leaves this module, and one
/// undefined ratio never invalidates the others.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub trade_count: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub total_net_profit: f64,
    pub largest_win: Option<f64>,
    /// Most negative single net profit.
    pub largest_loss: Option<f64>,
    pub win_rate: Option<f64>,
    pub average_win: Option<f64>,
    /// Mean of the losing trades' net profit — a negative number.
    pub average_loss: Option<f64>,
    pub reward_risk_ratio: Option<f64>,
    pub expectancy: Option<f64>,
    pub profit_factor: Option<f64>,
    pub consistency_score: Option<f64>,
}

impl Statistics {
    /// Compute the full statistic set. Breakeven trades (net profit exactly
    /// zero) count toward the denominator of win-rate-style ratios but
    /// toward neither the win nor the loss set.
    pub fn compute(series: &NetProfitSeries, daily: &[DailyAggregate]) -> Self {
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win: Option<f64> = None;
        let mut largest_loss: Option<f64> = None;

        for entry in series.entries() {
            let net = entry.net_profit;
            if net > 0.0 {
                trades_won += 1;
                total_wins += net;
                if largest_win.is_none_or(|w| net > w) {
                    largest_win = Some(net);
                }
            } else if net < 0.0 {
                trades_lost += 1;
                total_losses += net;
                if largest_loss.is_none_or(|l| net < l) {
                    largest_loss = Some(net);
                }
            } else {
                trades_breakeven += 1;
            }
        }

        let trade_count = trades_won + trades_lost + trades_breakeven;

        let win_rate = if trade_count > 0 {
            Some(trades_won as f64 / trade_count as f64)
        } else {
            None
        };

        let average_win = if trades_won > 0 {
            Some(total_wins / trades_won as f64)
        } else {
            None
        };

        let average_loss = if trades_lost > 0 {
            Some(total_losses / trades_lost as f64)
        } else {
            None
        };

        let reward_risk_ratio = match (average_win, average_loss) {
            (Some(win), Some(loss)) => Some((win / loss).abs()),
            _ => None,
        };

        // an absent side contributes zero weight, so the expectancy of an
        // all-win or all-loss series is still defined
        let expectancy = win_rate.map(|rate| {
            rate * average_win.unwrap_or(0.0) + (1.0 - rate) * average_loss.unwrap_or(0.0)
        });

        let profit_factor = if trades_lost > 0 {
            Some((total_wins / total_losses).abs())
        } else {
            None
        };

        Statistics {
            trade_count,
            trades_won,
            trades_lost,
            trades_breakeven,
            total_net_profit: series.total(),
            largest_win,
            largest_loss,
            win_rate,
            average_win,
            average_loss,
            reward_risk_ratio,
            expectancy,
            profit_factor,
            consistency_score: consistency_score(daily),
        }
    }
}

/// `1 - max(|daily net|) / sum(|daily net|)` over the daily aggregates: how
/// evenly P&L is spread across trading days, 1 being perfectly even.
/// Undefined when there is no absolute daily profit to spread.
fn consistency_score(daily: &[DailyAggregate]) -> Option<f64> {
    let sum: f64 = daily.iter().map(|d| d.net_profit.abs()).sum();
    if sum == 0.0 {
        return None;
    }
    let max = daily
        .iter()
        .map(|d| d.net_profit.abs())
        .fold(0.0_f64, f64::max);
    Some(1.0 - max / sum)
}
