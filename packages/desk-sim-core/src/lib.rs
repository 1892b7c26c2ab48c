//! Desk Sim Core - Stochastic trading-desk simulation library.
//!
//! This crate simulates a leveraged multi-trader crypto desk day by day:
//!
//! - **Synthetic markets**: regime-driven OHLCV candles, economic events, news shocks
//! - **Position sizing**: capital-tiered risk brackets with psychology adjustments
//! - **Trader behavior**: fatigue, streaks, revenge tilt, over-confidence
//! - **Execution costs**: size-banded fees, liquidity-aware slippage, stops
//! - **Analytics**: Sharpe, Sortino, Calmar, profit factor, drawdown tracking
//! - **Monte Carlo**: seeded batches of independent runs
//!
//! # Example
//!
//! ```rust,no_run
//! use desk_sim_core::{SimConfig, SimEngine};
//!
//! let config = SimConfig::default()
//!     .with_starting_capital(1_000.0)
//!     .with_leverage(25.0);
//!
//! // Seeded engines replay exactly; drop the seed for a fresh run.
//! let mut engine = SimEngine::new(config).unwrap().with_seed(42);
//! let result = engine.simulate(30);
//! println!(
//!     "final capital {:.2}, win rate {:.1}%",
//!     result.final_capital,
//!     result.actual_win_rate * 100.0
//! );
//! ```

pub mod config;
pub mod engine;
pub mod market;
pub mod metrics;
pub mod monte_carlo;
pub mod rng;
pub mod types;

// Re-export commonly used types
pub use config::{default_assets, default_strategies, SimConfig, StopConfig};
pub use types::{
    Asset, Candle, CompoundFrequency, DailyResult, EconomicEvent, EventEffect, ImpactClass,
    MarketCondition, NewsItem, NewsShock, RiskTier, RiskTolerance, SimulationResult,
    StrategySpec, TradeRecord, TraderProfile,
};

// Re-export main functionality
pub use engine::{
    psychology_effect, HaltReason, PsychologyReason, RiskTierTable, SimEngine, StrategySelector,
    TraderPool,
};
pub use market::{MarketModel, Regime};
pub use metrics::{
    calmar_ratio, profit_factor, sharpe_ratio, sortino_ratio, ProfitFactor, ReturnMetrics,
};
pub use monte_carlo::{MonteCarloRunner, MonteCarloSummary};
pub use rng::{ChaChaSource, RandomSource, SequenceSource};

/// Error types for desk-sim-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid risk tiers: {0}")]
    InvalidTiers(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for desk-sim-core operations.
pub type Result<T> = std::result::Result<T, Error>;
