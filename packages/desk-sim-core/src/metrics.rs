//! Performance metrics over a run's daily return series.
//!
//! Returns are plain fractions (0.01 = 1% daily growth). Variance is
//! population variance, and annualization assumes crypto's 365 trading
//! days.

use serde::{Deserialize, Serialize};

/// Crypto markets never close.
pub const TRADING_DAYS_PER_YEAR: f64 = 365.0;

/// Annual risk-free rate used by Sharpe and Sortino.
pub const ANNUAL_RISK_FREE: f64 = 0.02;

/// Gross-profit to gross-loss ratio with an explicit no-loss case, so
/// serialized results never carry a raw infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProfitFactor {
    Ratio(f64),
    NoLosses,
}

impl ProfitFactor {
    /// Numeric value; the no-loss case maps to infinity.
    pub fn value(&self) -> f64 {
        match self {
            ProfitFactor::Ratio(r) => *r,
            ProfitFactor::NoLosses => f64::INFINITY,
        }
    }

    pub fn is_no_losses(&self) -> bool {
        matches!(self, ProfitFactor::NoLosses)
    }
}

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation. Zero for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.max(0.0).sqrt()
}

/// Annualized Sharpe ratio over daily returns. Zero when the series is
/// empty or has no variance.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    let std = std_dev(returns);
    if std <= 0.0 || !std.is_finite() {
        return 0.0;
    }
    let daily_rf = ANNUAL_RISK_FREE / TRADING_DAYS_PER_YEAR;
    let sharpe = (mean(returns) - daily_rf) / std * TRADING_DAYS_PER_YEAR.sqrt();
    if sharpe.is_finite() {
        sharpe
    } else {
        0.0
    }
}

/// Annualized Sortino ratio, penalizing only downside deviation. Zero
/// when there are no negative returns.
pub fn sortino_ratio(returns: &[f64]) -> f64 {
    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    if downside.is_empty() {
        return 0.0;
    }
    let downside_var = downside.iter().map(|r| r * r).sum::<f64>() / downside.len() as f64;
    let downside_std = downside_var.max(0.0).sqrt();
    if downside_std <= 0.0 || !downside_std.is_finite() {
        return 0.0;
    }
    let daily_rf = ANNUAL_RISK_FREE / TRADING_DAYS_PER_YEAR;
    let sortino = (mean(returns) - daily_rf) / downside_std * TRADING_DAYS_PER_YEAR.sqrt();
    if sortino.is_finite() {
        sortino
    } else {
        0.0
    }
}

/// Sum of positive returns over the absolute sum of negative returns.
pub fn profit_factor(returns: &[f64]) -> ProfitFactor {
    let wins: f64 = returns.iter().copied().filter(|r| *r > 0.0).sum();
    let losses: f64 = returns
        .iter()
        .copied()
        .filter(|r| *r < 0.0)
        .sum::<f64>()
        .abs();
    if losses > 0.0 {
        ProfitFactor::Ratio(wins / losses)
    } else if wins > 0.0 {
        ProfitFactor::NoLosses
    } else {
        ProfitFactor::Ratio(0.0)
    }
}

/// Compound annual growth rate from total growth over `days`.
pub fn annualized_growth(total_growth_pct: f64, days: u32) -> f64 {
    if total_growth_pct == 0.0 {
        return 0.0;
    }
    let years = days.max(1) as f64 / TRADING_DAYS_PER_YEAR;
    (1.0 + total_growth_pct / 100.0).powf(1.0 / years) - 1.0
}

/// Annualized growth over maximum drawdown. Zero when the run had no
/// drawdown or the ratio degenerates.
pub fn calmar_ratio(total_growth_pct: f64, days: u32, max_drawdown_pct: f64) -> f64 {
    if max_drawdown_pct <= 0.0 {
        return 0.0;
    }
    let calmar = annualized_growth(total_growth_pct, days) / (max_drawdown_pct / 100.0);
    if calmar.is_finite() {
        calmar
    } else {
        0.0
    }
}

/// The return-series metrics bundled into a simulation result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnMetrics {
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub profit_factor: ProfitFactor,
}

impl ReturnMetrics {
    pub fn compute(returns: &[f64]) -> Self {
        Self {
            sharpe_ratio: sharpe_ratio(returns),
            sortino_ratio: sortino_ratio(returns),
            profit_factor: profit_factor(returns),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_and_std_of_known_series() {
        let values = [0.01, 0.03, -0.02, 0.02];
        assert_relative_eq!(mean(&values), 0.01);
        // Population variance of the series is 0.000350.
        assert_relative_eq!(std_dev(&values), 0.000_35_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn empty_series_yields_zeroes() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(sharpe_ratio(&[]), 0.0);
        assert_eq!(sortino_ratio(&[]), 0.0);
        assert_eq!(profit_factor(&[]), ProfitFactor::Ratio(0.0));
    }

    #[test]
    fn zero_variance_sharpe_is_zero() {
        assert_eq!(sharpe_ratio(&[0.01, 0.01, 0.01]), 0.0);
    }

    #[test]
    fn sharpe_known_value() {
        let returns = [0.01, -0.01, 0.02, 0.0];
        let avg = 0.005;
        let std = std_dev(&returns);
        let expected = (avg - 0.02 / 365.0) / std * 365.0_f64.sqrt();
        assert_relative_eq!(sharpe_ratio(&returns), expected, epsilon = 1e-12);
    }

    #[test]
    fn sortino_only_penalizes_downside() {
        // All-positive series has no downside deviation.
        assert_eq!(sortino_ratio(&[0.01, 0.02, 0.03]), 0.0);

        let returns = [0.02, -0.01, 0.02, -0.03];
        let downside_std = ((0.0001_f64 + 0.0009) / 2.0).sqrt();
        let expected = (mean(&returns) - 0.02 / 365.0) / downside_std * 365.0_f64.sqrt();
        assert_relative_eq!(sortino_ratio(&returns), expected, epsilon = 1e-12);
    }

    #[test]
    fn profit_factor_cases() {
        assert_eq!(profit_factor(&[0.02, -0.01]), ProfitFactor::Ratio(2.0));
        assert_eq!(profit_factor(&[0.01, 0.02]), ProfitFactor::NoLosses);
        assert_eq!(profit_factor(&[-0.01, -0.02]), ProfitFactor::Ratio(0.0));
        assert_eq!(profit_factor(&[0.0, 0.0]), ProfitFactor::Ratio(0.0));
    }

    #[test]
    fn profit_factor_serializes_without_infinity() {
        let json = serde_json::to_string(&ProfitFactor::NoLosses).unwrap();
        assert!(!json.contains("inf"));
        let back: ProfitFactor = serde_json::from_str(&json).unwrap();
        assert!(back.is_no_losses());
        assert_eq!(back.value(), f64::INFINITY);
    }

    #[test]
    fn annualized_growth_known_values() {
        // A full year passes straight through.
        assert_relative_eq!(annualized_growth(10.0, 365), 0.1, epsilon = 1e-12);
        // Half a year compounds up.
        let half_year = annualized_growth(10.0, 182);
        assert!(half_year > 0.1 && half_year < 0.25);
        assert_eq!(annualized_growth(0.0, 30), 0.0);
    }

    #[test]
    fn calmar_needs_a_drawdown() {
        assert_eq!(calmar_ratio(50.0, 365, 0.0), 0.0);
        assert_relative_eq!(calmar_ratio(10.0, 365, 5.0), 0.1 / 0.05, epsilon = 1e-12);
    }
}
