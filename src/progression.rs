// Year-over-year progression and the trend band derived from it.
use crate::types::Trend;

/// Progression above this percentage counts as growth.
pub const PROGRESSING_THRESHOLD: f64 = 5.0;
/// Progression below this percentage counts as decline.
pub const REGRESSING_THRESHOLD: f64 = -5.0;

/// Round to one decimal place, halves away from zero.
pub fn round1(value: f64) -> f64 {
    // `f64::round` already rounds half away from zero; scale first.
    (value * 10.0).round() / 10.0
}

/// Percentage change from `year1` to `year2`, rounded to one decimal.
///
/// Returns `0.0` when `year1` is not strictly positive: a percentage over a
/// zero or negative base is undefined.
pub fn progression_pct(year1: f64, year2: f64) -> f64 {
    if year1 > 0.0 {
        round1((year2 - year1) / year1 * 100.0)
    } else {
        0.0
    }
}

/// `part` as a rounded percentage of `total`, or `0.0` for a non-positive total.
pub fn share_pct(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        round1(part / total * 100.0)
    } else {
        0.0
    }
}

impl Trend {
    pub fn from_pct(pct: f64) -> Trend {
        if pct > PROGRESSING_THRESHOLD {
            Trend::Progressing
        } else if pct < REGRESSING_THRESHOLD {
            Trend::Regressing
        } else {
            Trend::Stable
        }
    }
}

/// Progression and trend for a pair of yearly totals.
pub fn progression(year1: f64, year2: f64) -> (f64, Trend) {
    let pct = progression_pct(year1, year2);
    (pct, Trend::from_pct(pct))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(progression_pct(1000.0, 1234.0), 23.4);
        assert_eq!(progression_pct(1000.0, 1500.0), 50.0);
        assert_eq!(progression_pct(2000.0, 1000.0), -50.0);
    }

    #[test]
    fn halves_round_away_from_zero() {
        assert_eq!(round1(0.25), 0.3);
        assert_eq!(round1(-0.25), -0.3);
        assert_eq!(round1(12.34), 12.3);
    }

    #[test]
    fn zero_base_gives_zero_progression() {
        assert_eq!(progression_pct(0.0, 500.0), 0.0);
        assert_eq!(progression_pct(-100.0, 500.0), 0.0);
        assert_eq!(progression(0.0, 500.0), (0.0, Trend::Stable));
    }

    #[test]
    fn trend_band_is_exclusive_at_five_percent() {
        assert_eq!(Trend::from_pct(5.0), Trend::Stable);
        assert_eq!(Trend::from_pct(5.1), Trend::Progressing);
        assert_eq!(Trend::from_pct(-5.0), Trend::Stable);
        assert_eq!(Trend::from_pct(-5.1), Trend::Regressing);
    }

    #[test]
    fn share_of_empty_total_is_zero() {
        assert_eq!(share_pct(10.0, 0.0), 0.0);
        assert_eq!(share_pct(250.0, 1000.0), 25.0);
    }
}
