use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::config::SimConfig;
use crate::market::MarketModel;
use crate::metrics::{self, ReturnMetrics};
use crate::rng::{ChaChaSource, RandomSource};
use crate::types::{CompoundFrequency, DailyResult, SimulationResult, TradeRecord};
use crate::Result;

use super::edge;
use super::execution;
use super::psychology::{self, PsychologyReason, TraderPool};
use super::selector::StrategySelector;
use super::tiers::RiskTierTable;

/// Oldest trades are evicted beyond this many log entries.
pub const TRADE_LOG_CAP: usize = 10_000;

/// Capital never falls below this; the account is effectively
/// liquidated once it reaches the floor.
pub const LIQUIDATION_FLOOR: f64 = 0.01;

/// Daily capital multiplier under daily compounding.
const DAILY_COMPOUND: f64 = 1.0002;

/// Reference position divisor: notional is normalized against five
/// units at full leverage before P&L scaling.
const BASE_POSITION_LEVERAGE: f64 = 5.0;

/// Settled outcome of a single trade.
#[derive(Debug, Clone)]
struct TradeOutcome {
    result: f64,
    is_win: bool,
    fee: f64,
    final_slip: f64,
    new_capital: f64,
}

/// One stochastic run of the trading desk.
///
/// The engine owns all mutable run state. Construct a fresh engine per
/// run; `simulate` consumes the random stream, so re-running the same
/// engine would continue the stream rather than replay it.
pub struct SimEngine {
    config: SimConfig,
    tiers: RiskTierTable,
    pool: TraderPool,
    market: MarketModel,
    selector: StrategySelector,
    rng: Box<dyn RandomSource>,
    consecutive_wins: u32,
    consecutive_losses: u32,
    peak_capital: f64,
    trade_log: VecDeque<TradeRecord>,
    cancel: Option<Arc<AtomicBool>>,
}

impl SimEngine {
    /// Build an engine from a validated configuration, seeded from
    /// entropy. Use [`with_seed`](Self::with_seed) for reproducible runs.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let tiers = RiskTierTable::new(config.risk_tiers.clone());
        let pool = TraderPool::new(config.num_traders, &config.trader_efficiency);
        let market = MarketModel::new(&config);
        let selector = StrategySelector::from_weights(&config.strategy_weights);
        let peak_capital = config.starting_capital;
        Ok(Self {
            config,
            tiers,
            pool,
            market,
            selector,
            rng: Box::new(ChaChaSource::from_entropy()),
            consecutive_wins: 0,
            consecutive_losses: 0,
            peak_capital,
            trade_log: VecDeque::new(),
            cancel: None,
        })
    }

    /// Replace the random source with a deterministic seeded stream.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Box::new(ChaChaSource::seeded(seed));
        self
    }

    /// Replace the random source entirely.
    #[must_use]
    pub fn with_random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    /// Attach a cooperative cancellation flag. Checked at each day
    /// boundary; a cancelled run returns the partial result.
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn streak(&self) -> i32 {
        self.consecutive_wins as i32 - self.consecutive_losses as i32
    }

    /// The desk's projected edge at a point in the run, before
    /// per-trade noise. Useful for charting the glide path.
    pub fn projected_edge(&self, day: u32, total_days: u32, capital: f64) -> f64 {
        let drawdown_pct = if self.peak_capital > 0.0 {
            (self.peak_capital - capital) / self.peak_capital * 100.0
        } else {
            0.0
        };
        edge::base_profitability(
            day,
            total_days,
            drawdown_pct,
            self.streak(),
            self.trade_log.len(),
            &self.config,
        )
    }

    fn execute_trade(&mut self, capital: f64, day: u32, trader_idx: usize) -> TradeOutcome {
        let strat = self
            .selector
            .pick(&self.config.strategies, day, self.rng.as_mut())
            .clone();
        let regime = self.market.regime_for(day);
        let (asset_idx, candle) = self.market.advance(day, regime, self.rng.as_mut());
        let asset_name = self.market.asset(asset_idx).name.clone();

        self.peak_capital = self.peak_capital.max(capital);
        let streak = self.streak();
        let (psyche_mult, psyche_reason) =
            psychology::psychology_effect(streak, capital, self.peak_capital);

        let risk_percent = (self.tiers.tier_for(capital).risk_percent
            * psyche_mult
            * self.config.risk_tolerance.risk_scale())
        .clamp(0.01, 1.0);

        let strat_edge = strat.base_edge
            * (1.0 - (self.trade_log.len() as f64 / TRADE_LOG_CAP as f64) * strat.decay_rate)
                .max(0.5);
        let vol_mult = (regime.volatility * self.config.base_volatility
            + (self.rng.next_unit() - 0.5) * 0.2)
            .max(0.4);
        let fatigue_mult = self.pool.fatigue_multiplier(trader_idx);
        let win_rate =
            edge::stochastic_win_rate(strat_edge, vol_mult, streak, fatigue_mult, self.rng.as_mut());

        let mut position_size = capital * risk_percent * self.config.leverage;
        let costs = execution::trade_costs(
            position_size,
            self.config.price_impact,
            self.config.liquidity_factor,
            regime.volatility,
        );
        let fee = position_size * costs.fee_rate;
        let slip_loss = position_size * costs.slip_rate;
        position_size -= fee + slip_loss;

        let base_position = BASE_POSITION_LEVERAGE * self.config.leverage;
        let efficiency = self.pool.profile(trader_idx).base_efficiency;
        let scaled = position_size / base_position * efficiency;

        let shock = self.market.news_shock(day, self.rng.as_mut());
        let mut is_win = self.rng.next_unit() < win_rate;
        if let Some(shock) = &shock {
            let shocked_rate = (win_rate - shock.edge_penalty).max(0.45);
            is_win = self.rng.next_unit() < shocked_rate;
        }

        let mut result =
            match execution::stop_override(scaled, candle.open, candle.close, &self.config.stops) {
                Some(pnl) => {
                    is_win = pnl > 0.0;
                    pnl
                }
                None => {
                    if is_win {
                        scaled * vol_mult
                    } else {
                        -scaled * vol_mult
                    }
                }
            };

        let final_slip = self.rng.next_unit() * 0.005;
        result *= 1.0 - final_slip;
        let new_capital = (capital + result).max(LIQUIDATION_FLOOR);

        if is_win {
            self.consecutive_wins += 1;
            self.consecutive_losses = 0;
        } else {
            self.consecutive_losses += 1;
            self.consecutive_wins = 0;
        }
        self.pool.record_outcome(trader_idx, is_win);

        let note = if psyche_reason != PsychologyReason::Normal {
            format!("Psychology: {psyche_reason}")
        } else if let Some(shock) = &shock {
            shock.reason.clone()
        } else {
            String::new()
        };

        self.trade_log.push_back(TradeRecord {
            day,
            trader_id: self.pool.profile(trader_idx).id.clone(),
            strategy: strat.name,
            position_size,
            result,
            is_win,
            fee,
            slippage: slip_loss + final_slip * position_size,
            new_capital,
            candle,
            asset: asset_name,
            note,
        });
        if self.trade_log.len() > TRADE_LOG_CAP {
            self.trade_log.pop_front();
        }

        TradeOutcome {
            result,
            is_win,
            fee,
            final_slip,
            new_capital,
        }
    }

    /// Run the simulation for `days` days.
    pub fn simulate(&mut self, days: u32) -> SimulationResult {
        self.simulate_with(days, |_| {})
    }

    /// Run the simulation, reporting whole-percent progress after each
    /// simulated day.
    pub fn simulate_with<F>(&mut self, days: u32, mut progress: F) -> SimulationResult
    where
        F: FnMut(u8),
    {
        let mut capital = self.config.starting_capital;
        let mut total_trades: u64 = 0;
        let mut winning_trades: u64 = 0;
        let mut total_fees = 0.0;
        let mut total_slippage = 0.0;
        let mut peak = capital;
        let mut max_drawdown_pct = 0.0_f64;
        let mut daily_results = Vec::new();
        let mut returns = Vec::new();
        let mut days_completed = 0;

        // Each trader works their share of the desk's hours, with a
        // partial remainder rounded up to a full slot.
        let slots_per_trader = self.config.trading_hours.div_ceil(self.config.num_traders);

        'days: for day in 1..=days {
            if let Some(cancel) = &self.cancel {
                if cancel.load(Ordering::Relaxed) {
                    break 'days;
                }
            }

            let day_start = capital;
            for trader_idx in 0..self.pool.len() {
                for _ in 0..slots_per_trader {
                    if capital <= LIQUIDATION_FLOOR {
                        break;
                    }
                    let outcome = self.execute_trade(capital, day, trader_idx);
                    capital = outcome.new_capital;
                    total_trades += 1;
                    total_fees += outcome.fee;
                    total_slippage += outcome.result.abs() * outcome.final_slip;
                    if outcome.is_win {
                        winning_trades += 1;
                    }
                }
            }

            if self.config.compound_frequency == CompoundFrequency::Daily {
                capital *= DAILY_COMPOUND;
            }
            capital = capital.max(LIQUIDATION_FLOOR);

            let daily_growth_percent = (capital - day_start) / day_start * 100.0;
            returns.push(if daily_growth_percent.is_finite() {
                daily_growth_percent / 100.0
            } else {
                0.0
            });

            peak = peak.max(capital);
            let drawdown_pct = (peak - capital) / peak * 100.0;
            max_drawdown_pct = max_drawdown_pct.max(drawdown_pct);

            daily_results.push(DailyResult {
                day,
                capital,
                daily_growth_percent,
            });
            days_completed = day;
            progress((day as f64 / days as f64 * 100.0).floor() as u8);
        }

        let return_metrics = ReturnMetrics::compute(&returns);
        let total_growth_percent =
            (capital - self.config.starting_capital) / self.config.starting_capital * 100.0;
        let calmar_ratio =
            metrics::calmar_ratio(total_growth_percent, days_completed.max(1), max_drawdown_pct);

        SimulationResult {
            final_capital: capital,
            total_trades,
            winning_trades,
            actual_win_rate: if total_trades > 0 {
                winning_trades as f64 / total_trades as f64
            } else {
                0.0
            },
            daily_results,
            total_growth_percent,
            total_fees,
            total_slippage,
            max_drawdown_percent: max_drawdown_pct,
            sharpe_ratio: return_metrics.sharpe_ratio,
            sortino_ratio: return_metrics.sortino_ratio,
            calmar_ratio,
            profit_factor: return_metrics.profit_factor,
            trade_log: self.trade_log.iter().cloned().collect(),
            days_completed,
            config: self.config.clone(),
            generated_at: Utc::now(),
        }
    }
}
