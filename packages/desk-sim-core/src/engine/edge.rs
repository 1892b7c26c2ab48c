use crate::config::SimConfig;
use crate::rng::RandomSource;

/// Hard floor and ceiling on any single trade's win probability.
const WIN_RATE_FLOOR: f64 = 0.45;
const WIN_RATE_CEIL: f64 = 0.99;

/// Perturb a base win rate with volatility-scaled noise, streak tilt,
/// and a fatigue penalty. Consumes one random draw.
pub(crate) fn stochastic_win_rate(
    base_rate: f64,
    volatility_mult: f64,
    streak: i32,
    fatigue_mult: f64,
    rng: &mut dyn RandomSource,
) -> f64 {
    let noise = (rng.next_unit() - 0.5) * 0.12 * volatility_mult;
    let tilt = if streak <= -3 {
        -0.05
    } else if streak >= 5 {
        0.03
    } else {
        0.0
    };
    let fatigue_penalty = (1.0 - fatigue_mult) * 0.15;
    (base_rate + noise + tilt - fatigue_penalty).clamp(WIN_RATE_FLOOR, WIN_RATE_CEIL)
}

/// The desk's edge for a given day: the configured profitability glide
/// path (initial down to final over the horizon, superlinear in time)
/// scaled by the decay multiplier.
pub(crate) fn base_profitability(
    day: u32,
    total_days: u32,
    drawdown_pct: f64,
    win_streak: i32,
    trade_count: usize,
    config: &SimConfig,
) -> f64 {
    let initial = config.initial_profitability;
    let final_ = config.final_profitability;
    let decay = decay_multiplier(
        day,
        drawdown_pct,
        win_streak,
        trade_count,
        config.cyclical_period,
    );
    let progress = (day as f64 / total_days as f64).powf(1.5);
    let raw_edge = initial - (initial - final_) * progress;
    (raw_edge * decay).clamp(final_, 0.99)
}

/// Multiplicative erosion of the edge from crowding, drawdown stress,
/// streak effects, and a slow sinusoidal market cycle.
pub(crate) fn decay_multiplier(
    day: u32,
    drawdown_pct: f64,
    win_streak: i32,
    trade_count: usize,
    cyclical_period: f64,
) -> f64 {
    let crowding = (trade_count as f64 / 10_000.0).min(0.3);
    let dd_decay = if drawdown_pct > 30.0 {
        0.2
    } else if drawdown_pct > 15.0 {
        0.08 + (drawdown_pct - 15.0) * 0.008
    } else {
        0.0
    };
    let streak_bonus = if win_streak >= 5 {
        -0.05
    } else if win_streak <= -5 {
        0.05
    } else {
        0.0
    };
    let cycle = (day as f64 / cyclical_period).sin() * 0.04;
    1.0 - crowding - dd_decay + streak_bonus + cycle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceSource;
    use approx::assert_relative_eq;

    #[test]
    fn win_rate_clamps_to_band() {
        let mut rng = SequenceSource::constant(0.0);
        // Massive negative noise bottoms out at the floor.
        let rate = stochastic_win_rate(0.5, 10.0, 0, 1.0, &mut rng);
        assert_relative_eq!(rate, 0.45);

        let mut rng = SequenceSource::constant(1.0);
        let rate = stochastic_win_rate(0.98, 10.0, 0, 1.0, &mut rng);
        assert_relative_eq!(rate, 0.99);
    }

    #[test]
    fn streak_tilts_apply() {
        // Zero-noise draws isolate the tilt terms.
        let mut rng = SequenceSource::constant(0.5);
        let base = stochastic_win_rate(0.7, 1.0, 0, 1.0, &mut rng);
        assert_relative_eq!(base, 0.7);

        let mut rng = SequenceSource::constant(0.5);
        let tilted = stochastic_win_rate(0.7, 1.0, -3, 1.0, &mut rng);
        assert_relative_eq!(tilted, 0.65);

        let mut rng = SequenceSource::constant(0.5);
        let confident = stochastic_win_rate(0.7, 1.0, 6, 1.0, &mut rng);
        assert_relative_eq!(confident, 0.73);
    }

    #[test]
    fn fatigue_penalizes_win_rate() {
        let mut rng = SequenceSource::constant(0.5);
        let rate = stochastic_win_rate(0.7, 1.0, 0, 0.5, &mut rng);
        assert_relative_eq!(rate, 0.7 - 0.075);
    }

    #[test]
    fn profitability_glides_from_initial_toward_final() {
        let config = SimConfig::default();
        // Early, calm conditions: edge near initial (cycle term aside).
        let early = base_profitability(1, 365, 0.0, 0, 0, &config);
        assert!(early > 0.75);

        let late = base_profitability(365, 365, 0.0, 0, 0, &config);
        assert!(late < early);
        assert!(late >= config.final_profitability);
    }

    #[test]
    fn profitability_never_drops_below_final() {
        let config = SimConfig::default();
        // Heavy drawdown and crowding still respect the floor.
        let edge = base_profitability(300, 365, 50.0, -6, 10_000, &config);
        assert_relative_eq!(edge, config.final_profitability);
    }

    #[test]
    fn crowding_caps_at_30_percent() {
        let a = decay_multiplier(1, 0.0, 0, 1_000, 14.0);
        let b = decay_multiplier(1, 0.0, 0, 10_000, 14.0);
        let c = decay_multiplier(1, 0.0, 0, 100_000, 14.0);
        assert!(a > b);
        assert_relative_eq!(b, c);
    }

    #[test]
    fn drawdown_decay_ramps_then_saturates() {
        let mild = decay_multiplier(1, 10.0, 0, 0, 14.0);
        let stressed = decay_multiplier(1, 20.0, 0, 0, 14.0);
        let deep = decay_multiplier(1, 40.0, 0, 0, 14.0);
        assert!(mild > stressed);
        assert!(stressed > deep);
        // 0.08 + 5 * 0.008 at 20% drawdown.
        assert_relative_eq!(mild - stressed, 0.12);
    }

    #[test]
    fn cycle_term_oscillates_with_period() {
        let quarter = decay_multiplier(
            (std::f64::consts::FRAC_PI_2 * 14.0).round() as u32,
            0.0,
            0,
            0,
            14.0,
        );
        assert!(quarter > 1.03);
    }
}
