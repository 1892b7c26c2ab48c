use serde::{Deserialize, Serialize};

use crate::config::StopConfig;

/// Fee and slippage rates for one order, both as fractions of notional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeCosts {
    pub fee_rate: f64,
    pub slip_rate: f64,
}

/// Size-banded maker/taker fee plus volatility-adjusted slippage.
///
/// Fees step down with notional (0.30% below 1k down to 0.10% above
/// 100k) and are inflated by the desk's own price impact. Slippage
/// grows logarithmically with size, widens with regime volatility, and
/// is divided by the book's liquidity factor.
pub fn trade_costs(
    position_size: f64,
    price_impact: f64,
    liquidity_factor: f64,
    regime_volatility: f64,
) -> TradeCosts {
    let fee_rate = if position_size < 1_000.0 {
        0.003
    } else if position_size < 10_000.0 {
        0.002
    } else if position_size < 100_000.0 {
        0.0015
    } else {
        0.001
    } * (1.0 + price_impact);

    let base_slip = 0.0005;
    let size_slip = (0.0001 * (position_size / 1_000.0).ln_1p()).min(0.01);
    let slip_rate = (base_slip + size_slip + (regime_volatility - 1.0) * 0.0002) / liquidity_factor;

    TradeCosts {
        fee_rate,
        slip_rate: slip_rate.max(0.0001),
    }
}

/// Check take-profit and trailing-stop against the day's candle.
///
/// Returns the overriding P&L when either stop closes the trade, or
/// `None` when the trade settles on its stochastic outcome. Take-profit
/// pays a fixed fraction of the position; the trailing stop realizes
/// the open-to-close move as a loss.
pub(crate) fn stop_override(
    position_size: f64,
    open: f64,
    close: f64,
    stops: &StopConfig,
) -> Option<f64> {
    let move_pct = (close - open) / open * 100.0;
    if move_pct >= stops.take_profit * 100.0 {
        return Some(position_size * stops.take_profit);
    }

    let max_price = open.max(close);
    if close <= max_price * (1.0 - stops.trailing_stop) {
        return Some(-((open - close) / open) * position_size);
    }
    None
}

/// Why the run-level stop check would halt trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HaltReason {
    MaxDrawdown,
    DailyLoss,
}

/// Run-level circuit breaker: drawdown from peak versus the configured
/// ceiling, and single-trade loss versus the daily-loss budget.
pub fn halt_reason(
    capital: f64,
    peak_capital: f64,
    trade_pnl: f64,
    stops: &StopConfig,
) -> Option<HaltReason> {
    if peak_capital > 0.0 {
        let drawdown_pct = (peak_capital - capital) / peak_capital * 100.0;
        if drawdown_pct >= stops.max_drawdown * 100.0 {
            return Some(HaltReason::MaxDrawdown);
        }
    }
    if trade_pnl <= -stops.max_daily_loss * capital {
        return Some(HaltReason::DailyLoss);
    }
    None
}
