use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::TraderProfile;

/// Behavioral state detected from streak and drawdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PsychologyReason {
    Normal,
    RevengeTilt,
    OverConfidence,
    FomoDrawdown,
}

impl fmt::Display for PsychologyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PsychologyReason::Normal => "normal",
            PsychologyReason::RevengeTilt => "revenge-tilt",
            PsychologyReason::OverConfidence => "over-confidence",
            PsychologyReason::FomoDrawdown => "fomo-drawdown",
        };
        f.write_str(s)
    }
}

/// Risk multiplier from the desk's behavioral state.
///
/// Losing streaks trigger revenge tilt (oversizing up to 1.5x), winning
/// streaks trigger over-confidence (up to 1.4x), and a deep drawdown
/// with a flat streak triggers FOMO sizing at 1.2x.
pub fn psychology_effect(streak: i32, capital: f64, peak: f64) -> (f64, PsychologyReason) {
    let drawdown_pct = if peak > 0.0 {
        (peak - capital) / peak * 100.0
    } else {
        0.0
    };

    if streak <= -3 {
        let tilt = (1.0 + (streak.abs() as f64 - 2.0) * 0.3).min(1.5);
        return (tilt, PsychologyReason::RevengeTilt);
    }
    if streak >= 5 {
        let greed = (1.0 + (streak as f64 - 4.0) * 0.1).min(1.4);
        return (greed, PsychologyReason::OverConfidence);
    }
    if drawdown_pct > 20.0 && streak == 0 {
        return (1.2, PsychologyReason::FomoDrawdown);
    }
    (1.0, PsychologyReason::Normal)
}

/// The desk's trader roster with per-trader fatigue and streak state.
#[derive(Debug, Clone)]
pub struct TraderPool {
    profiles: Vec<TraderProfile>,
}

impl TraderPool {
    /// Build `count` traders, applying per-index efficiency overrides
    /// where supplied and defaulting the rest to 1.0.
    pub fn new(count: u32, efficiency: &[f64]) -> Self {
        let profiles = (0..count as usize)
            .map(|i| TraderProfile::new(i, efficiency.get(i).copied().unwrap_or(1.0)))
            .collect();
        Self { profiles }
    }

    /// Update fatigue and streak after a trade settles.
    pub fn record_outcome(&mut self, idx: usize, is_win: bool) {
        let profile = &mut self.profiles[idx];
        if is_win {
            profile.streak = (profile.streak + 1).max(0);
            profile.fatigue -= 0.02;
        } else {
            profile.streak = (profile.streak - 1).min(0);
            profile.fatigue += 0.03;
        }
        profile.fatigue = profile.fatigue.clamp(0.0, 1.0);
    }

    /// Logistic de-rating of execution quality as fatigue accumulates.
    /// 1.0 at zero fatigue is not quite reached; the curve is centered
    /// at fatigue 0.5 where the multiplier is exactly 0.5.
    pub fn fatigue_multiplier(&self, idx: usize) -> f64 {
        let fatigue = self.profiles[idx].fatigue;
        1.0 / (1.0 + (4.0 * (fatigue - 0.5)).exp())
    }

    pub fn profile(&self, idx: usize) -> &TraderProfile {
        &self.profiles[idx]
    }

    pub fn profiles(&self) -> &[TraderProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn revenge_tilt_grows_with_losing_streak() {
        let (m, r) = psychology_effect(-3, 900.0, 1_000.0);
        assert_relative_eq!(m, 1.3);
        assert_eq!(r, PsychologyReason::RevengeTilt);

        let (m, _) = psychology_effect(-4, 900.0, 1_000.0);
        assert_relative_eq!(m, 1.5);

        // Capped at 1.5.
        let (m, _) = psychology_effect(-10, 900.0, 1_000.0);
        assert_relative_eq!(m, 1.5);
    }

    #[test]
    fn over_confidence_grows_with_winning_streak() {
        let (m, r) = psychology_effect(5, 1_200.0, 1_200.0);
        assert_relative_eq!(m, 1.1);
        assert_eq!(r, PsychologyReason::OverConfidence);

        let (m, _) = psychology_effect(9, 1_200.0, 1_200.0);
        assert_relative_eq!(m, 1.4);

        let (m, _) = psychology_effect(20, 1_200.0, 1_200.0);
        assert_relative_eq!(m, 1.4);
    }

    #[test]
    fn deep_drawdown_with_flat_streak_triggers_fomo() {
        let (m, r) = psychology_effect(0, 700.0, 1_000.0);
        assert_relative_eq!(m, 1.2);
        assert_eq!(r, PsychologyReason::FomoDrawdown);

        // Non-flat streak masks it.
        let (m, r) = psychology_effect(1, 700.0, 1_000.0);
        assert_relative_eq!(m, 1.0);
        assert_eq!(r, PsychologyReason::Normal);
    }

    #[test]
    fn mild_state_is_normal() {
        let (m, r) = psychology_effect(-2, 950.0, 1_000.0);
        assert_relative_eq!(m, 1.0);
        assert_eq!(r, PsychologyReason::Normal);

        let (_, r) = psychology_effect(4, 1_000.0, 1_000.0);
        assert_eq!(r, PsychologyReason::Normal);
    }

    #[test]
    fn zero_peak_means_zero_drawdown() {
        let (m, r) = psychology_effect(0, 0.0, 0.0);
        assert_relative_eq!(m, 1.0);
        assert_eq!(r, PsychologyReason::Normal);
    }

    #[test]
    fn pool_applies_efficiency_overrides() {
        let pool = TraderPool::new(3, &[1.2, 0.3]);
        assert_eq!(pool.len(), 3);
        assert_relative_eq!(pool.profile(0).base_efficiency, 1.2);
        // Below the clamp floor.
        assert_relative_eq!(pool.profile(1).base_efficiency, 0.5);
        // No override given.
        assert_relative_eq!(pool.profile(2).base_efficiency, 1.0);
        assert_eq!(pool.profile(2).id, "TRADER_3");
    }

    #[test]
    fn outcomes_move_fatigue_and_streak() {
        let mut pool = TraderPool::new(1, &[]);
        pool.record_outcome(0, false);
        pool.record_outcome(0, false);
        assert_eq!(pool.profile(0).streak, -2);
        assert_relative_eq!(pool.profile(0).fatigue, 0.06);

        pool.record_outcome(0, true);
        assert_eq!(pool.profile(0).streak, 0);
        assert_relative_eq!(pool.profile(0).fatigue, 0.04);
    }

    #[test]
    fn fatigue_stays_in_unit_interval() {
        let mut pool = TraderPool::new(1, &[]);
        for _ in 0..100 {
            pool.record_outcome(0, false);
        }
        assert_relative_eq!(pool.profile(0).fatigue, 1.0);

        for _ in 0..100 {
            pool.record_outcome(0, true);
        }
        assert_relative_eq!(pool.profile(0).fatigue, 0.0);
    }

    #[test]
    fn fatigue_multiplier_is_half_at_curve_center() {
        let mut pool = TraderPool::new(1, &[]);
        // 18 losses then 2 wins lands fatigue on 0.5 exactly.
        for _ in 0..18 {
            pool.record_outcome(0, false);
        }
        pool.record_outcome(0, true);
        pool.record_outcome(0, true);
        assert_relative_eq!(pool.profile(0).fatigue, 0.5, epsilon = 1e-12);
        assert_relative_eq!(pool.fatigue_multiplier(0), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn fatigue_multiplier_is_logistic() {
        let mut pool = TraderPool::new(1, &[]);
        let fresh = pool.fatigue_multiplier(0);
        assert!(fresh > 0.85 && fresh < 1.0);

        for _ in 0..100 {
            pool.record_outcome(0, false);
        }
        let exhausted = pool.fatigue_multiplier(0);
        assert!(exhausted < 0.15);
    }
}
