use crate::market::sinusoidal_index;
use crate::rng::RandomSource;
use crate::types::StrategySpec;

/// How the day's strategy is chosen from the catalog.
#[derive(Debug, Clone)]
pub enum StrategySelector {
    /// Weighted sampling over named strategies.
    Weighted(Vec<(String, f64)>),
    /// Deterministic day-keyed rotation through the catalog.
    Cyclic,
}

impl StrategySelector {
    /// Weighted when usable weights exist, otherwise cyclic.
    pub fn from_weights(weights: &[(String, f64)]) -> Self {
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        if weights.is_empty() || total <= 0.0 {
            StrategySelector::Cyclic
        } else {
            StrategySelector::Weighted(weights.to_vec())
        }
    }

    /// Pick the strategy for `day`. Weighted selection consumes one
    /// random draw; a weight entry naming an unknown strategy falls
    /// back to the cyclic rotation for that pick.
    pub fn pick<'a>(
        &self,
        catalog: &'a [StrategySpec],
        day: u32,
        rng: &mut dyn RandomSource,
    ) -> &'a StrategySpec {
        if let StrategySelector::Weighted(weights) = self {
            let total: f64 = weights.iter().map(|(_, w)| w).sum();
            let draw = rng.next_unit() * total;
            let mut cumulative = 0.0;
            for (name, weight) in weights {
                cumulative += weight;
                if draw <= cumulative {
                    match catalog.iter().find(|s| &s.name == name) {
                        Some(strategy) => return strategy,
                        None => break,
                    }
                }
            }
        }
        &catalog[sinusoidal_index(day as f64 * 0.5, catalog.len())]
    }
}
