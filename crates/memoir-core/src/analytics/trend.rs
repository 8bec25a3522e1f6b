//! Success-rate trend classification shared by the call and promise
//! analyses.

use memoir_types::analytics::Trend;

/// Classify the direction of a success-rate change. The 0.1 dead band
/// keeps small fluctuations from flapping between labels.
pub fn classify_rates(recent_rate: f64, previous_rate: f64) -> Trend {
    if recent_rate > previous_rate + 0.1 {
        Trend::Improving
    } else if recent_rate < previous_rate - 0.1 {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Trend over a newest-first outcome sequence, comparing the first
/// `window` outcomes against the next `window`.
///
/// When there is no previous window, the previous rate defaults to the
/// recent rate, which always yields `stable`.
pub fn windowed_trend(outcomes: &[bool], window: usize) -> Trend {
    if outcomes.is_empty() {
        return Trend::Stable;
    }
    let recent = &outcomes[..outcomes.len().min(window)];
    let previous = &outcomes[outcomes.len().min(window)..outcomes.len().min(window * 2)];

    let rate = |slice: &[bool]| slice.iter().filter(|s| **s).count() as f64 / slice.len() as f64;
    let recent_rate = rate(recent);
    let previous_rate = if previous.is_empty() {
        recent_rate
    } else {
        rate(previous)
    };
    classify_rates(recent_rate, previous_rate)
}

/// Rounded success percentage (0-100).
pub fn success_percent(successes: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (successes as f64 / total as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rates_boundaries() {
        assert_eq!(classify_rates(0.9, 0.7), Trend::Improving);
        assert_eq!(classify_rates(0.5, 0.5), Trend::Stable);
        assert_eq!(classify_rates(0.3, 0.6), Trend::Declining);
        // Exactly 0.1 apart sits inside the dead band.
        assert_eq!(classify_rates(0.6, 0.5), Trend::Stable);
    }

    #[test]
    fn test_windowed_trend_short_history_is_stable() {
        // Fewer outcomes than one window: previous defaults to recent.
        assert_eq!(windowed_trend(&[true, false, true], 10), Trend::Stable);
        assert_eq!(windowed_trend(&[], 10), Trend::Stable);
    }

    #[test]
    fn test_windowed_trend_improving() {
        // Newest first: 9/10 recent vs 5/10 previous.
        let mut outcomes = vec![true; 9];
        outcomes.push(false);
        outcomes.extend([true, false, true, false, true, false, true, false, true, false]);
        assert_eq!(windowed_trend(&outcomes, 10), Trend::Improving);
    }

    #[test]
    fn test_success_percent_rounds() {
        assert_eq!(success_percent(2, 3), 67);
        assert_eq!(success_percent(0, 0), 0);
        assert_eq!(success_percent(5, 5), 100);
    }
}
