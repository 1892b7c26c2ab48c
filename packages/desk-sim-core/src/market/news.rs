use crate::rng::RandomSource;
use crate::types::{NewsItem, NewsShock};

/// Probability gate for unscheduled shocks, in parts per thousand.
const RANDOM_SHOCK_PER_MILLE: f64 = 20.0;

/// Resolve a news shock for the day, if any.
///
/// Scheduled items always fire on their day with severity in
/// [0.5, 1.0). Otherwise a deterministic per-day dice roll gives an
/// unscheduled shock about 2% of days with severity in [0.2, 1.0).
/// Both slippage and edge penalty scale with `news_sensitivity`.
pub(crate) fn news_shock(
    day: u32,
    news: &[NewsItem],
    news_sensitivity: f64,
    rng: &mut dyn RandomSource,
) -> Option<NewsShock> {
    let (severity, reason) = if let Some(item) = news.iter().find(|n| n.day == day) {
        (
            0.5 + rng.next_unit() * 0.5,
            format!("Scheduled news: {}", item.text),
        )
    } else {
        let dice = ((day as f64 * 0.314).sin() * 10_000.0).rem_euclid(1_000.0);
        if dice < RANDOM_SHOCK_PER_MILLE {
            (
                0.2 + rng.next_unit() * 0.8,
                "Random market shock".to_string(),
            )
        } else {
            return None;
        }
    };

    Some(NewsShock {
        severity,
        slippage: severity * 0.01 * news_sensitivity,
        edge_penalty: severity * 0.15 * news_sensitivity,
        reason,
    })
}
