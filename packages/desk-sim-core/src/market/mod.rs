//! Synthetic market data.
//!
//! The market model owns the asset universe, the per-day regime
//! resolution, candle synthesis, and news shocks. Asset rotation is
//! deterministic per day; only candle shapes and shock severities draw
//! from the run's random source.

mod candles;
mod news;
mod regime;

pub use regime::Regime;

pub(crate) use candles::sinusoidal_index;

use crate::config::SimConfig;
use crate::rng::RandomSource;
use crate::types::{Asset, Candle, EconomicEvent, MarketCondition, NewsItem, NewsShock};

/// Fallback previous close for an asset with no history yet.
const INITIAL_PRICE: f64 = 10_000.0;

#[derive(Debug, Clone)]
pub struct MarketModel {
    condition: MarketCondition,
    assets: Vec<Asset>,
    events: Vec<EconomicEvent>,
    news: Vec<NewsItem>,
    correlation_strength: f64,
    news_sensitivity: f64,
}

impl MarketModel {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            condition: config.market_condition,
            assets: config.assets.clone(),
            events: config.economic_events.clone(),
            news: config.news_events.clone(),
            correlation_strength: config.correlation_strength,
            news_sensitivity: config.news_sensitivity,
        }
    }

    /// Regime in effect for `day`, after event overrides.
    pub fn regime_for(&self, day: u32) -> Regime {
        regime::regime_for(day, self.condition, &self.events)
    }

    /// Asset index traded on `day`. Deterministic rotation.
    pub fn pick_asset(&self, day: u32) -> usize {
        sinusoidal_index(day as f64 * 0.314, self.assets.len())
    }

    /// Asset volatility after the cross-asset correlation adjustment.
    pub fn effective_volatility(&self, idx: usize) -> f64 {
        let effect = 1.0 + (self.correlation_strength - 0.5) * 0.5;
        self.assets[idx].volatility * effect
    }

    /// Generate the day's candle for the rotated asset and append it to
    /// that asset's price history. Returns the asset index and candle.
    pub fn advance(&mut self, day: u32, regime: Regime, rng: &mut dyn RandomSource) -> (usize, Candle) {
        let idx = self.pick_asset(day);
        let volatility = self.effective_volatility(idx);
        let drift = self.assets[idx].drift;
        let prev_close = self.assets[idx].last_close().unwrap_or(INITIAL_PRICE);

        let candle = candles::generate_candle(prev_close, volatility, drift, regime.volatility, rng);
        self.assets[idx].price_history.push(candle);
        (idx, candle)
    }

    /// News shock for the day, if one fires.
    pub fn news_shock(&self, day: u32, rng: &mut dyn RandomSource) -> Option<NewsShock> {
        news::news_shock(day, &self.news, self.news_sensitivity, rng)
    }

    pub fn asset(&self, idx: usize) -> &Asset {
        &self.assets[idx]
    }
}
