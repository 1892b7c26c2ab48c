//! Simulation configuration.
//!
//! All knobs for a run live in a single [`SimConfig`] value object that
//! is validated once and handed to the engine constructor. Nothing in
//! the engine reaches back into caller state mid-run.

use serde::{Deserialize, Serialize};

use crate::engine::RiskTierTable;
use crate::types::{
    Asset, CompoundFrequency, EconomicEvent, MarketCondition, NewsItem, RiskTier, RiskTolerance,
    StrategySpec,
};
use crate::{Error, Result};

/// Stop-management thresholds, all expressed as fractions (0.05 = 5%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopConfig {
    /// Per-trade loss fraction that trips the daily halt check
    pub max_daily_loss: f64,
    /// Run drawdown fraction that trips the drawdown halt check
    pub max_drawdown: f64,
    /// Intra-candle move that closes the trade at a fixed profit
    pub take_profit: f64,
    /// Retreat from `max(open, close)` that closes the trade at a loss
    pub trailing_stop: f64,
}

impl Default for StopConfig {
    fn default() -> Self {
        Self {
            max_daily_loss: 0.05,
            max_drawdown: 0.20,
            take_profit: 0.10,
            trailing_stop: 0.05,
        }
    }
}

/// Immutable per-run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub starting_capital: f64,
    pub leverage: f64,
    /// Desk-wide trading hours per day, split across traders
    pub trading_hours: u32,
    pub num_traders: u32,
    /// Target win probability at the start of the horizon
    pub initial_profitability: f64,
    /// Target win probability the edge decays toward
    pub final_profitability: f64,
    pub market_condition: MarketCondition,
    pub compound_frequency: CompoundFrequency,
    pub risk_tolerance: RiskTolerance,
    pub base_volatility: f64,
    /// Period (days) of the cyclical component of the edge curve
    pub cyclical_period: f64,
    pub risk_tiers: Vec<RiskTier>,
    pub assets: Vec<Asset>,
    pub strategies: Vec<StrategySpec>,
    /// Per-strategy sampling weights; empty means deterministic rotation
    #[serde(default)]
    pub strategy_weights: Vec<(String, f64)>,
    /// Efficiency override per trader index; missing entries default to 1.0
    #[serde(default)]
    pub trader_efficiency: Vec<f64>,
    #[serde(default)]
    pub economic_events: Vec<EconomicEvent>,
    #[serde(default)]
    pub news_events: Vec<NewsItem>,
    pub stops: StopConfig,
    /// Fee inflation from market impact of the desk's own orders
    pub price_impact: f64,
    /// Divides the slippage rate; deeper books slip less
    pub liquidity_factor: f64,
    /// Single knob coupling apparent volatility across all assets
    pub correlation_strength: f64,
    /// Scales both slippage and edge penalty of news shocks
    pub news_sensitivity: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_capital: 1_000.0,
            leverage: 25.0,
            trading_hours: 8,
            num_traders: 2,
            initial_profitability: 0.80,
            final_profitability: 0.65,
            market_condition: MarketCondition::Normal,
            compound_frequency: CompoundFrequency::Daily,
            risk_tolerance: RiskTolerance::Moderate,
            base_volatility: 1.0,
            cyclical_period: 14.0,
            risk_tiers: RiskTierTable::default_tiers(),
            assets: default_assets(),
            strategies: default_strategies(),
            strategy_weights: Vec::new(),
            trader_efficiency: Vec::new(),
            economic_events: Vec::new(),
            news_events: Vec::new(),
            stops: StopConfig::default(),
            price_impact: 0.05,
            liquidity_factor: 1.0,
            correlation_strength: 0.7,
            news_sensitivity: 0.5,
        }
    }
}

impl SimConfig {
    #[must_use]
    pub fn with_starting_capital(mut self, capital: f64) -> Self {
        self.starting_capital = capital;
        self
    }

    #[must_use]
    pub fn with_leverage(mut self, leverage: f64) -> Self {
        self.leverage = leverage;
        self
    }

    #[must_use]
    pub fn with_desk(mut self, num_traders: u32, trading_hours: u32) -> Self {
        self.num_traders = num_traders;
        self.trading_hours = trading_hours;
        self
    }

    #[must_use]
    pub fn with_profitability(mut self, initial: f64, final_: f64) -> Self {
        self.initial_profitability = initial;
        self.final_profitability = final_;
        self
    }

    #[must_use]
    pub fn with_market_condition(mut self, condition: MarketCondition) -> Self {
        self.market_condition = condition;
        self
    }

    #[must_use]
    pub fn with_risk_tolerance(mut self, tolerance: RiskTolerance) -> Self {
        self.risk_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_compounding(mut self, frequency: CompoundFrequency) -> Self {
        self.compound_frequency = frequency;
        self
    }

    #[must_use]
    pub fn with_base_volatility(mut self, volatility: f64) -> Self {
        self.base_volatility = volatility;
        self
    }

    #[must_use]
    pub fn with_risk_tiers(mut self, tiers: Vec<RiskTier>) -> Self {
        self.risk_tiers = tiers;
        self
    }

    #[must_use]
    pub fn with_assets(mut self, assets: Vec<Asset>) -> Self {
        self.assets = assets;
        self
    }

    #[must_use]
    pub fn with_strategy_weights(mut self, weights: Vec<(String, f64)>) -> Self {
        self.strategy_weights = weights;
        self
    }

    #[must_use]
    pub fn with_trader_efficiency(mut self, efficiency: Vec<f64>) -> Self {
        self.trader_efficiency = efficiency;
        self
    }

    #[must_use]
    pub fn with_economic_events(mut self, events: Vec<EconomicEvent>) -> Self {
        self.economic_events = events;
        self
    }

    #[must_use]
    pub fn with_news_events(mut self, news: Vec<NewsItem>) -> Self {
        self.news_events = news;
        self
    }

    #[must_use]
    pub fn with_stops(mut self, stops: StopConfig) -> Self {
        self.stops = stops;
        self
    }

    #[must_use]
    pub fn with_microstructure(
        mut self,
        price_impact: f64,
        liquidity_factor: f64,
        correlation_strength: f64,
        news_sensitivity: f64,
    ) -> Self {
        self.price_impact = price_impact;
        self.liquidity_factor = liquidity_factor;
        self.correlation_strength = correlation_strength;
        self.news_sensitivity = news_sensitivity;
        self
    }

    /// Reject configurations the engine is not defined for.
    ///
    /// The engine itself never re-validates; behavior is undefined if a
    /// configuration that fails here is forced through construction.
    pub fn validate(&self) -> Result<()> {
        if !(self.starting_capital.is_finite() && self.starting_capital > 0.0) {
            return Err(Error::InvalidConfig(
                "starting capital must be positive and finite".to_string(),
            ));
        }
        if !(self.leverage.is_finite() && self.leverage > 0.0) {
            return Err(Error::InvalidConfig(
                "leverage must be positive and finite".to_string(),
            ));
        }
        if self.num_traders == 0 {
            return Err(Error::InvalidConfig(
                "at least one trader is required".to_string(),
            ));
        }
        if self.trading_hours == 0 {
            return Err(Error::InvalidConfig(
                "trading hours must be positive".to_string(),
            ));
        }
        for (label, p) in [
            ("initial profitability", self.initial_profitability),
            ("final profitability", self.final_profitability),
        ] {
            if !(p.is_finite() && p > 0.0 && p < 1.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must lie in (0, 1)",
                    label
                )));
            }
        }
        if self.final_profitability > self.initial_profitability {
            return Err(Error::InvalidConfig(
                "final profitability cannot exceed initial profitability".to_string(),
            ));
        }
        if !(self.base_volatility.is_finite() && self.base_volatility > 0.0) {
            return Err(Error::InvalidConfig(
                "base volatility must be positive".to_string(),
            ));
        }
        if !(self.cyclical_period.is_finite() && self.cyclical_period > 0.0) {
            return Err(Error::InvalidConfig(
                "cyclical period must be positive".to_string(),
            ));
        }
        if !(self.liquidity_factor.is_finite() && self.liquidity_factor > 0.0) {
            return Err(Error::InvalidConfig(
                "liquidity factor must be positive".to_string(),
            ));
        }
        if self.assets.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one asset is required".to_string(),
            ));
        }
        for asset in &self.assets {
            if !(asset.volatility.is_finite() && asset.volatility > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "asset {} has non-positive volatility",
                    asset.name
                )));
            }
        }
        if self.strategies.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one strategy is required".to_string(),
            ));
        }
        for tier in &self.risk_tiers {
            if !(tier.risk_percent.is_finite() && tier.risk_percent > 0.0 && tier.risk_percent <= 1.0)
            {
                return Err(Error::InvalidTiers(
                    "tier risk percent must lie in (0, 1]".to_string(),
                ));
            }
            if !tier.threshold.is_finite() || tier.threshold < 0.0 {
                return Err(Error::InvalidTiers(
                    "tier threshold must be finite and non-negative".to_string(),
                ));
            }
        }
        RiskTierTable::new(self.risk_tiers.clone()).validate()?;
        Ok(())
    }
}

/// Default asset list when the caller supplies none.
pub fn default_assets() -> Vec<Asset> {
    vec![
        Asset::new("BTC", 1.0, 1.00, 0.7),
        Asset::new("ETH", 1.2, 1.00, 0.8),
        Asset::new("SOL", 1.5, 1.00, 0.6),
    ]
}

/// Built-in strategy catalog.
pub fn default_strategies() -> Vec<StrategySpec> {
    vec![
        StrategySpec::new("scalp", 0.75, 1.2, 1.5),
        StrategySpec::new("swing", 0.65, 1.0, 1.0),
        StrategySpec::new("breakout", 0.70, 1.4, 1.2),
    ]
}
