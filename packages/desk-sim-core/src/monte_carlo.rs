//! Monte Carlo batches of independent simulation runs.
//!
//! Each run gets a fresh engine and a distinct seed derived from the
//! batch seed, so runs are independent and the whole batch replays
//! from one number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::engine::SimEngine;
use crate::{Error, Result};

/// Batch runner configuration.
#[derive(Debug, Clone)]
pub struct MonteCarloRunner {
    config: SimConfig,
    runs: u32,
    days: u32,
    seed: Option<u64>,
}

/// Aggregate statistics over a completed batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloSummary {
    pub runs: u32,
    pub days: u32,
    /// Batch seed actually used; recorded for replay
    pub seed: u64,
    pub avg_final_capital: f64,
    pub min_final_capital: f64,
    pub max_final_capital: f64,
    /// Percentage of runs that ended above starting capital
    pub success_rate: f64,
    /// Mean of per-run maximum drawdowns, in percent
    pub avg_drawdown: f64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl MonteCarloRunner {
    pub fn new(config: SimConfig, runs: u32, days: u32) -> Self {
        Self {
            config,
            runs,
            days,
            seed: None,
        }
    }

    /// Fix the batch seed for a reproducible batch.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run the batch.
    pub fn run(&self) -> Result<MonteCarloSummary> {
        self.run_with(|_| {})
    }

    /// Run the batch, reporting whole-percent progress after each run.
    pub fn run_with<F>(&self, mut progress: F) -> Result<MonteCarloSummary>
    where
        F: FnMut(u8),
    {
        if self.runs == 0 {
            return Err(Error::InvalidConfig(
                "monte carlo batch needs at least one run".to_string(),
            ));
        }

        let started_at = Utc::now();
        let base_seed = self.seed.unwrap_or_else(rand::random);

        let mut finals = Vec::with_capacity(self.runs as usize);
        let mut drawdowns = Vec::with_capacity(self.runs as usize);
        for i in 0..self.runs {
            let mut engine = SimEngine::new(self.config.clone())?
                .with_seed(base_seed.wrapping_add(u64::from(i)));
            let result = engine.simulate(self.days);
            finals.push(result.final_capital);
            drawdowns.push(result.max_drawdown_percent);
            progress(((i + 1) as f64 / self.runs as f64 * 100.0).floor() as u8);
        }

        let n = finals.len() as f64;
        let successes = finals
            .iter()
            .filter(|&&c| c > self.config.starting_capital)
            .count();

        Ok(MonteCarloSummary {
            runs: self.runs,
            days: self.days,
            seed: base_seed,
            avg_final_capital: finals.iter().sum::<f64>() / n,
            min_final_capital: finals.iter().copied().fold(f64::INFINITY, f64::min),
            max_final_capital: finals.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            success_rate: successes as f64 / n * 100.0,
            avg_drawdown: drawdowns.iter().sum::<f64>() / n,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
