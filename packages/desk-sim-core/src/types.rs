//! Core data types for the desk simulation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::metrics::ProfitFactor;

/// Market-wide condition selecting the baseline volatility/drift regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarketCondition {
    #[default]
    Normal,
    Bull,
    Bear,
    Volatile,
}

/// How often capital is compounded during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompoundFrequency {
    None,
    #[default]
    Daily,
}

/// Scales the tier-derived risk percentage up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl RiskTolerance {
    /// Multiplier applied to the tier risk percentage.
    pub fn risk_scale(&self) -> f64 {
        match self {
            RiskTolerance::Conservative => 0.7,
            RiskTolerance::Moderate => 1.0,
            RiskTolerance::Aggressive => 1.3,
        }
    }
}

/// One synthetic OHLCV candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Candle {
    /// Whether `low <= min(open, close) <= max(open, close) <= high` holds.
    pub fn is_ordered(&self) -> bool {
        self.low <= self.open.min(self.close) && self.open.max(self.close) <= self.high
    }
}

/// A tradeable asset with its per-run synthetic price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Display name (e.g. "BTC")
    pub name: String,
    /// Volatility multiplier relative to the regime baseline
    pub volatility: f64,
    /// Drift multiplier (1.0 = flat)
    pub drift: f64,
    /// Correlation knob feeding the shared correlation-strength adjustment
    pub correlation: f64,
    /// Append-only candle history, grown as the run advances
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub price_history: Vec<Candle>,
}

impl Asset {
    /// Create an asset with an empty price history.
    pub fn new(name: &str, volatility: f64, drift: f64, correlation: f64) -> Self {
        Self {
            name: name.to_string(),
            volatility,
            drift,
            correlation,
            price_history: Vec::new(),
        }
    }

    /// Close of the most recent candle, if any has been generated.
    pub fn last_close(&self) -> Option<f64> {
        self.price_history.last().map(|c| c.close)
    }
}

/// Capital-range-keyed position-sizing bracket.
///
/// A table of tiers partitions `[0, inf)` into contiguous half-open
/// intervals `[threshold, max_threshold)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskTier {
    pub threshold: f64,
    pub max_threshold: f64,
    pub risk_percent: f64,
}

impl RiskTier {
    /// Whether this tier's interval contains the given capital.
    pub fn contains(&self, capital: f64) -> bool {
        capital >= self.threshold && capital < self.max_threshold
    }
}

/// Per-trader mutable state, owned by one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderProfile {
    /// Identifier of the form `TRADER_1`, `TRADER_2`, ...
    pub id: String,
    /// Execution-quality scalar, clamped to `[0.5, 1.5]`
    pub base_efficiency: f64,
    /// Accumulates with losses, decays with wins; in `[0, 1]`
    pub fatigue: f64,
    /// Consecutive wins (positive) or losses (negative)
    pub streak: i32,
}

impl TraderProfile {
    /// Create the profile for the trader at `index` (zero-based).
    pub fn new(index: usize, efficiency: f64) -> Self {
        Self {
            id: format!("TRADER_{}", index + 1),
            base_efficiency: efficiency.clamp(0.5, 1.5),
            fatigue: 0.0,
            streak: 0,
        }
    }
}

/// Static strategy catalog entry, shared read-only across trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySpec {
    pub name: String,
    /// Baseline win probability before noise and decay
    pub base_edge: f64,
    pub volatility_multiplier: f64,
    /// How quickly the edge erodes with cumulative trade count
    pub decay_rate: f64,
}

impl StrategySpec {
    pub fn new(name: &str, base_edge: f64, volatility_multiplier: f64, decay_rate: f64) -> Self {
        Self {
            name: name.to_string(),
            base_edge,
            volatility_multiplier,
            decay_rate,
        }
    }
}

/// Direction a scheduled economic event pushes the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventEffect {
    Bull,
    Bear,
    Volatile,
}

/// Severity class of a scheduled economic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactClass {
    High,
    Medium,
    Low,
}

impl ImpactClass {
    /// Scalar applied to the event regime's volatility.
    pub fn scalar(&self) -> f64 {
        match self {
            ImpactClass::High => 1.5,
            ImpactClass::Medium => 1.2,
            ImpactClass::Low => 1.0,
        }
    }
}

/// Scheduled shock that overrides the configured market condition for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicEvent {
    pub day: u32,
    pub effect: EventEffect,
    pub impact: ImpactClass,
    pub name: String,
}

/// Scheduled news headline keyed by simulation day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub day: u32,
    pub text: String,
}

/// Active news/event shock for a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsShock {
    pub severity: f64,
    /// Extra slippage rate applied while the shock is active
    pub slippage: f64,
    /// Penalty subtracted from the drawn win rate
    pub edge_penalty: f64,
    pub reason: String,
}

/// Immutable record of one executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub day: u32,
    pub trader_id: String,
    pub strategy: String,
    /// Notional after fee and slippage deduction
    pub position_size: f64,
    /// Realized profit or loss
    pub result: f64,
    pub is_win: bool,
    pub fee: f64,
    pub slippage: f64,
    pub new_capital: f64,
    pub candle: Candle,
    pub asset: String,
    /// Psychology or news annotation, empty for unremarkable trades
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
}

/// Capital snapshot recorded at the end of each simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyResult {
    pub day: u32,
    pub capital: f64,
    pub daily_growth_percent: f64,
}

/// Final aggregate of one completed (or cancelled) simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub final_capital: f64,
    pub total_trades: u64,
    pub winning_trades: u64,
    /// Fraction of trades won, 0 when no trades executed
    pub actual_win_rate: f64,
    pub daily_results: Vec<DailyResult>,
    pub total_growth_percent: f64,
    pub total_fees: f64,
    pub total_slippage: f64,
    pub max_drawdown_percent: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    pub profit_factor: ProfitFactor,
    /// FIFO-capped trade log (most recent 10 000 trades)
    pub trade_log: Vec<TradeRecord>,
    /// Days actually simulated; fewer than requested when cancelled
    pub days_completed: u32,
    /// Echo of the configuration the run used
    pub config: SimConfig,
    pub generated_at: DateTime<Utc>,
}
