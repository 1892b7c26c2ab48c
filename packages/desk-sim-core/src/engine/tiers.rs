use crate::types::RiskTier;
use crate::{Error, Result};

/// Upper clamp on capital before tier lookup; guards the infinity tier
/// against pathological capital values.
const CAPITAL_CLAMP: f64 = 1e12;

/// Normalized, sorted risk-tier table partitioning `[0, inf)`.
#[derive(Debug, Clone)]
pub struct RiskTierTable {
    tiers: Vec<RiskTier>,
}

impl RiskTierTable {
    /// Build a table from raw tiers. Tiers are sorted by threshold and
    /// their upper bounds rewritten so the intervals chain without gaps,
    /// with the last tier open-ended. An empty input falls back to the
    /// built-in table.
    pub fn new(mut tiers: Vec<RiskTier>) -> Self {
        if tiers.is_empty() {
            tiers = Self::default_tiers();
        }
        tiers.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        let len = tiers.len();
        for i in 0..len - 1 {
            tiers[i].max_threshold = tiers[i + 1].threshold;
        }
        tiers[len - 1].max_threshold = f64::INFINITY;
        Self { tiers }
    }

    /// The tier whose interval contains `capital`, after clamping
    /// capital to `[0, 1e12]`.
    pub fn tier_for(&self, capital: f64) -> RiskTier {
        let capital = capital.clamp(0.0, CAPITAL_CLAMP);
        self.tiers
            .iter()
            .copied()
            .find(|t| t.contains(capital))
            .unwrap_or(RiskTier {
                threshold: 0.0,
                max_threshold: f64::INFINITY,
                risk_percent: 0.05,
            })
    }

    /// A normalized table must start at zero to cover all of `[0, inf)`.
    pub fn validate(&self) -> Result<()> {
        if self.tiers[0].threshold != 0.0 {
            return Err(Error::InvalidTiers(
                "first tier threshold must be 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tiers(&self) -> &[RiskTier] {
        &self.tiers
    }

    /// The built-in five-bracket table: aggressive sizing below 100,
    /// tapering to 2% above 5000.
    pub fn default_tiers() -> Vec<RiskTier> {
        vec![
            RiskTier {
                threshold: 0.0,
                max_threshold: 100.0,
                risk_percent: 0.8,
            },
            RiskTier {
                threshold: 100.0,
                max_threshold: 500.0,
                risk_percent: 0.08,
            },
            RiskTier {
                threshold: 500.0,
                max_threshold: 1_000.0,
                risk_percent: 0.04,
            },
            RiskTier {
                threshold: 1_000.0,
                max_threshold: 5_000.0,
                risk_percent: 0.03,
            },
            RiskTier {
                threshold: 5_000.0,
                max_threshold: f64::INFINITY,
                risk_percent: 0.02,
            },
        ]
    }
}

impl Default for RiskTierTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_uses_default_table() {
        let table = RiskTierTable::new(Vec::new());
        assert_eq!(table.tiers().len(), 5);
        assert_eq!(table.tier_for(50.0).risk_percent, 0.8);
        assert_eq!(table.tier_for(10_000.0).risk_percent, 0.02);
    }

    #[test]
    fn normalization_sorts_and_chains() {
        let table = RiskTierTable::new(vec![
            RiskTier {
                threshold: 500.0,
                max_threshold: f64::INFINITY,
                risk_percent: 0.02,
            },
            RiskTier {
                threshold: 0.0,
                max_threshold: f64::INFINITY,
                risk_percent: 0.5,
            },
        ]);
        assert_eq!(table.tiers()[0].max_threshold, 500.0);
        assert_eq!(table.tiers()[1].max_threshold, f64::INFINITY);
        assert_eq!(table.tier_for(499.999).risk_percent, 0.5);
        assert_eq!(table.tier_for(500.0).risk_percent, 0.02);
    }

    #[test]
    fn boundaries_are_half_open() {
        let table = RiskTierTable::default();
        assert_eq!(table.tier_for(99.999_999).risk_percent, 0.8);
        assert_eq!(table.tier_for(100.0).risk_percent, 0.08);
        assert_eq!(table.tier_for(999.999).risk_percent, 0.04);
        assert_eq!(table.tier_for(1_000.0).risk_percent, 0.03);
    }

    #[test]
    fn capital_is_clamped_before_lookup() {
        let table = RiskTierTable::default();
        assert_eq!(table.tier_for(-50.0).risk_percent, 0.8);
        assert_eq!(table.tier_for(f64::INFINITY).risk_percent, 0.02);
    }

    #[test]
    fn validate_rejects_nonzero_first_threshold() {
        let table = RiskTierTable::new(vec![RiskTier {
            threshold: 100.0,
            max_threshold: f64::INFINITY,
            risk_percent: 0.05,
        }]);
        assert!(matches!(table.validate(), Err(Error::InvalidTiers(_))));
    }
}
