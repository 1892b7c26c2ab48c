use crate::types::{EconomicEvent, EventEffect, MarketCondition};

/// Volatility and drift multipliers in effect for one trading day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regime {
    pub condition: MarketCondition,
    /// Volatility multiplier applied on top of asset volatility
    pub volatility: f64,
    /// Daily drift multiplier; 1.0 is flat
    pub drift: f64,
}

/// Resolve the regime for a day. A scheduled economic event overrides
/// the configured baseline condition for that day only.
pub fn regime_for(day: u32, condition: MarketCondition, events: &[EconomicEvent]) -> Regime {
    if let Some(event) = events.iter().find(|e| e.day == day) {
        let impact = event.impact.scalar();
        return match event.effect {
            EventEffect::Bull => Regime {
                condition: MarketCondition::Bull,
                volatility: 0.8 * impact,
                drift: 1.05,
            },
            EventEffect::Bear => Regime {
                condition: MarketCondition::Bear,
                volatility: 1.4 * impact,
                drift: 0.85,
            },
            EventEffect::Volatile => Regime {
                condition: MarketCondition::Volatile,
                volatility: 2.0 * impact,
                drift: 1.00,
            },
        };
    }

    match condition {
        MarketCondition::Normal => Regime {
            condition,
            volatility: 1.1,
            drift: 1.00,
        },
        MarketCondition::Bull => Regime {
            condition,
            volatility: 0.8,
            drift: 1.05,
        },
        MarketCondition::Bear => Regime {
            condition,
            volatility: 1.4,
            drift: 0.85,
        },
        MarketCondition::Volatile => Regime {
            condition,
            volatility: 2.0,
            drift: 1.00,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImpactClass;

    #[test]
    fn baseline_conditions() {
        let regime = regime_for(1, MarketCondition::Normal, &[]);
        assert_eq!(regime.volatility, 1.1);
        assert_eq!(regime.drift, 1.00);

        let regime = regime_for(1, MarketCondition::Bull, &[]);
        assert_eq!(regime.volatility, 0.8);
        assert_eq!(regime.drift, 1.05);

        let regime = regime_for(1, MarketCondition::Bear, &[]);
        assert_eq!(regime.volatility, 1.4);
        assert_eq!(regime.drift, 0.85);

        let regime = regime_for(1, MarketCondition::Volatile, &[]);
        assert_eq!(regime.volatility, 2.0);
        assert_eq!(regime.drift, 1.00);
    }

    #[test]
    fn event_overrides_condition_on_its_day() {
        let events = vec![EconomicEvent {
            day: 7,
            effect: EventEffect::Bear,
            impact: ImpactClass::High,
            name: "rate decision".to_string(),
        }];

        let regime = regime_for(7, MarketCondition::Bull, &events);
        assert_eq!(regime.condition, MarketCondition::Bear);
        assert_eq!(regime.volatility, 1.4 * 1.5);
        assert_eq!(regime.drift, 0.85);

        // Other days are untouched.
        let regime = regime_for(8, MarketCondition::Bull, &events);
        assert_eq!(regime.condition, MarketCondition::Bull);
        assert_eq!(regime.volatility, 0.8);
    }

    #[test]
    fn medium_impact_scales_volatility() {
        let events = vec![EconomicEvent {
            day: 3,
            effect: EventEffect::Volatile,
            impact: ImpactClass::Medium,
            name: "cpi print".to_string(),
        }];
        let regime = regime_for(3, MarketCondition::Normal, &events);
        assert_eq!(regime.volatility, 2.0 * 1.2);
    }
}
