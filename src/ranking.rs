// Rank assignment and the top/flop leaderboards.
use crate::types::{EntitySummary, RankedSelection, Ranks};
use std::cmp::Ordering;
use std::fmt;

/// Maximum length of every leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// 1-based positions of each summary when stably sorted by `revenue` descending.
fn positions_by(
    summaries: &[EntitySummary],
    revenue: impl Fn(&EntitySummary) -> f64,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..summaries.len()).collect();
    // `sort_by` is stable: equal revenue keeps input order.
    order.sort_by(|&a, &b| desc(revenue(&summaries[a]), revenue(&summaries[b])));
    let mut positions = vec![0; summaries.len()];
    for (pos, idx) in order.into_iter().enumerate() {
        positions[idx] = pos + 1;
    }
    positions
}

/// Assign year-1 and year-2 ranks in place.
pub fn assign_ranks(summaries: &mut [EntitySummary]) {
    let by_year1 = positions_by(summaries, |s| s.revenue_year1);
    let by_year2 = positions_by(summaries, |s| s.revenue_year2);
    for (i, s) in summaries.iter_mut().enumerate() {
        s.ranks = Some(Ranks {
            year1: by_year1[i],
            year2: by_year2[i],
            delta: by_year2[i] as i64 - by_year1[i] as i64,
        });
    }
}

pub fn top_revenue(summaries: &[EntitySummary]) -> Vec<EntitySummary> {
    let mut eligible: Vec<EntitySummary> = summaries
        .iter()
        .filter(|s| s.revenue_year2 > 0.0)
        .cloned()
        .collect();
    eligible.sort_by(|a, b| desc(a.revenue_year2, b.revenue_year2));
    eligible.truncate(LEADERBOARD_SIZE);
    eligible
}

fn with_progression(summaries: &[EntitySummary]) -> Vec<EntitySummary> {
    summaries
        .iter()
        .filter(|s| s.has_baseline() && s.revenue_year2 > 0.0)
        .cloned()
        .collect()
}

pub fn top_progression(summaries: &[EntitySummary]) -> Vec<EntitySummary> {
    let mut eligible = with_progression(summaries);
    eligible.sort_by(|a, b| desc(a.progression_pct, b.progression_pct));
    eligible.truncate(LEADERBOARD_SIZE);
    eligible
}

pub fn top_regression(summaries: &[EntitySummary]) -> Vec<EntitySummary> {
    let mut eligible = with_progression(summaries);
    eligible.sort_by(|a, b| {
        a.progression_pct
            .partial_cmp(&b.progression_pct)
            .unwrap_or(Ordering::Equal)
    });
    eligible.truncate(LEADERBOARD_SIZE);
    eligible
}

/// Rank member summaries and derive the three leaderboards.
///
/// `ranked` keeps the input order; only the leaderboards are re-sorted.
pub fn rank_and_select(mut summaries: Vec<EntitySummary>) -> RankedSelection {
    assign_ranks(&mut summaries);
    let top_revenue = top_revenue(&summaries);
    let top_progression = top_progression(&summaries);
    let top_regression = top_regression(&summaries);
    tracing::debug!(
        entities = summaries.len(),
        top_revenue = top_revenue.len(),
        top_progression = top_progression.len(),
        top_regression = top_regression.len(),
        "ranked entities"
    );
    RankedSelection {
        ranked: summaries,
        top_revenue,
        top_progression,
        top_regression,
    }
}

/// Direction of a rank change between the two years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMovement {
    Up(usize),
    Down(usize),
    Steady,
}

impl RankMovement {
    pub fn from_delta(delta: i64) -> RankMovement {
        match delta.cmp(&0) {
            Ordering::Less => RankMovement::Up(delta.unsigned_abs() as usize),
            Ordering::Greater => RankMovement::Down(delta as usize),
            Ordering::Equal => RankMovement::Steady,
        }
    }
}

impl fmt::Display for RankMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: usize| if n > 1 { "s" } else { "" };
        match *self {
            RankMovement::Up(n) => write!(f, "+{n} place{}", plural(n)),
            RankMovement::Down(n) => write!(f, "-{n} place{}", plural(n)),
            RankMovement::Steady => f.write_str("Stable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
    Chocolate,
    Plain(usize),
}

impl Medal {
    pub fn from_rank(rank: usize) -> Medal {
        match rank {
            1 => Medal::Gold,
            2 => Medal::Silver,
            3 => Medal::Bronze,
            4 => Medal::Chocolate,
            n => Medal::Plain(n),
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Medal::Gold => f.write_str("Gold"),
            Medal::Silver => f.write_str("Silver"),
            Medal::Bronze => f.write_str("Bronze"),
            Medal::Chocolate => f.write_str("Chocolate"),
            Medal::Plain(n) => write!(f, "#{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::progression;
    use crate::types::EntityIdentity;

    fn member(code: &str, year1: f64, year2: f64) -> EntitySummary {
        let (progression_pct, trend) = progression(year1, year2);
        EntitySummary {
            identity: EntityIdentity::Member {
                code: code.to_string(),
                name: code.to_string(),
                group: String::new(),
            },
            revenue_year1: year1,
            revenue_year2: year2,
            progression_pct,
            trend,
            share_year1_pct: 0.0,
            share_year2_pct: 0.0,
            total_revenue_year2: 0.0,
            ranks: None,
        }
    }

    fn codes(list: &[EntitySummary]) -> Vec<&str> {
        list.iter().map(|s| s.identity.key()).collect()
    }

    #[test]
    fn swapped_leaders_get_opposite_deltas() {
        let sel = rank_and_select(vec![member("A", 1000.0, 1500.0), member("B", 2000.0, 1000.0)]);
        let a = sel.ranked[0].ranks.unwrap();
        let b = sel.ranked[1].ranks.unwrap();
        assert_eq!((a.year1, a.year2, a.delta), (2, 1, -1));
        assert_eq!((b.year1, b.year2, b.delta), (1, 2, 1));
        assert_eq!(codes(&sel.top_progression), vec!["A", "B"]);
        assert_eq!(codes(&sel.top_regression), vec!["B", "A"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let mut list = vec![
            member("X", 50.0, 50.0),
            member("Y", 50.0, 50.0),
            member("Z", 50.0, 50.0),
        ];
        assign_ranks(&mut list);
        let ranks: Vec<_> = list.iter().map(|s| s.ranks.unwrap().year2).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn zero_base_is_excluded_from_progression_boards() {
        let sel = rank_and_select(vec![member("N", 0.0, 500.0), member("O", 100.0, 90.0)]);
        assert_eq!(codes(&sel.top_revenue), vec!["N", "O"]);
        assert_eq!(codes(&sel.top_progression), vec!["O"]);
        assert_eq!(codes(&sel.top_regression), vec!["O"]);
        assert_eq!(sel.ranked[0].progression_pct, 0.0);
    }

    #[test]
    fn leaderboards_cap_at_ten_without_padding() {
        let list: Vec<_> = (0..15)
            .map(|i| member(&format!("M{i:02}"), 100.0, 100.0 + i as f64 * 10.0))
            .collect();
        let sel = rank_and_select(list);
        assert_eq!(sel.ranked.len(), 15);
        assert_eq!(sel.top_revenue.len(), LEADERBOARD_SIZE);
        assert_eq!(sel.top_revenue[0].identity.key(), "M14");
        assert_eq!(sel.top_progression[0].identity.key(), "M14");
        assert_eq!(sel.top_regression[0].identity.key(), "M00");

        let few = rank_and_select(vec![member("A", 0.0, 0.0), member("B", 10.0, 0.0)]);
        assert!(few.top_revenue.is_empty());
        assert!(few.top_progression.is_empty());
    }

    #[test]
    fn empty_input_gives_empty_selection() {
        assert_eq!(rank_and_select(Vec::new()), RankedSelection::default());
    }

    #[test]
    fn movement_labels_follow_delta_sign() {
        assert_eq!(RankMovement::from_delta(-3).to_string(), "+3 places");
        assert_eq!(RankMovement::from_delta(1).to_string(), "-1 place");
        assert_eq!(RankMovement::from_delta(0).to_string(), "Stable");
    }

    #[test]
    fn medals_cover_the_podium() {
        assert_eq!(Medal::from_rank(1), Medal::Gold);
        assert_eq!(Medal::from_rank(4), Medal::Chocolate);
        assert_eq!(Medal::from_rank(7).to_string(), "#7");
    }
}
