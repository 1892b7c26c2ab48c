//! The simulation engine.
//!
//! One [`SimEngine`] owns all mutable state for one run: the trader
//! pool, the market model, the shared win/loss streaks, and the
//! FIFO-capped trade log. Supporting pieces live in their own modules:
//! tiered position sizing, trader psychology, edge decay, and
//! execution costs.

mod edge;
mod execution;
mod psychology;
mod selector;
mod sim;
mod tiers;

pub use execution::{halt_reason, trade_costs, HaltReason, TradeCosts};
pub use psychology::{psychology_effect, PsychologyReason, TraderPool};
pub use selector::StrategySelector;
pub use sim::{SimEngine, LIQUIDATION_FLOOR, TRADE_LOG_CAP};
pub use tiers::RiskTierTable;
