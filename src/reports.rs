use crate::dashboard::Dashboard;
use crate::ranking::{Medal, RankMovement};
use crate::scope::RegionScope;
use crate::types::{
    EntityIdentity, EntitySummary, FamilyRow, LeaderboardRow, MemberRankingRow, SummaryStats,
    SupplierRow,
};
use crate::util::{format_number, format_pct};
use chrono::Utc;

fn pct(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Member ranking, ordered by year-2 rank.
pub fn member_ranking_report(dash: &Dashboard) -> Vec<MemberRankingRow> {
    let mut rows: Vec<MemberRankingRow> = dash
        .members
        .ranked
        .iter()
        .filter_map(|s| {
            let ranks = s.ranks?;
            let EntityIdentity::Member { code, name, group } = &s.identity else {
                return None;
            };
            Some(MemberRankingRow {
                rank: ranks.year2,
                previous_rank: ranks.year1,
                movement: RankMovement::from_delta(ranks.delta).to_string(),
                medal: Medal::from_rank(ranks.year2).to_string(),
                member_code: code.clone(),
                member_name: name.clone(),
                member_group: group.clone(),
                revenue_year1: format_number(s.revenue_year1, 2),
                revenue_year2: format_number(s.revenue_year2, 2),
                progression: format_pct(s.progression_pct),
                trend: s.trend.to_string(),
                share: pct(s.share_year2_pct),
            })
        })
        .collect();
    rows.sort_by_key(|r| r.rank);
    rows
}

pub fn supplier_report(suppliers: &[EntitySummary]) -> Vec<SupplierRow> {
    suppliers
        .iter()
        .map(|s| {
            let adherents = match &s.identity {
                EntityIdentity::Supplier {
                    member_count,
                    total_members,
                    ..
                } => format!("{}/{}", member_count, total_members),
                _ => String::new(),
            };
            SupplierRow {
                supplier: s.identity.label().to_string(),
                revenue_year1: format_number(s.revenue_year1, 2),
                revenue_year2: format_number(s.revenue_year2, 2),
                progression: format_pct(s.progression_pct),
                share_year1: pct(s.share_year1_pct),
                share_year2: pct(s.share_year2_pct),
                adherents,
            }
        })
        .collect()
}

pub fn family_report(families: &[EntitySummary]) -> Vec<FamilyRow> {
    families
        .iter()
        .map(|s| FamilyRow {
            sub_family: s.identity.label().to_string(),
            revenue_year1: format_number(s.revenue_year1, 2),
            revenue_year2: format_number(s.revenue_year2, 2),
            progression: format_pct(s.progression_pct),
            share: pct(s.share_year2_pct),
        })
        .collect()
}

pub fn leaderboard_report(board: &[EntitySummary]) -> Vec<LeaderboardRow> {
    board
        .iter()
        .enumerate()
        .map(|(idx, s)| LeaderboardRow {
            position: idx + 1,
            member_code: s.identity.key().to_string(),
            member_name: s.identity.label().to_string(),
            revenue_year1: format_number(s.revenue_year1, 2),
            revenue_year2: format_number(s.revenue_year2, 2),
            progression: format_pct(s.progression_pct),
        })
        .collect()
}

pub fn generate_summary(dash: &Dashboard) -> SummaryStats {
    let region = match &dash.scope.region {
        RegionScope::All => "all".to_string(),
        RegionScope::Only(r) => r.clone(),
    };
    SummaryStats {
        generated_at: Utc::now(),
        year1: dash.years.year1,
        year2: dash.years.year2,
        platforms: dash.scope.platforms.iter().copied().collect(),
        region,
        rows_in_scope: dash.rows_in_scope,
        total_members: dash.members.ranked.len(),
        total_suppliers: dash.suppliers.len(),
        total_families: dash.families.len(),
        metrics: dash.metrics,
        platform_stats: dash.platform_stats.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::YearPair;
    use crate::platform::FallbackStrategy;
    use crate::scope::ScopeFilter;
    use crate::types::TransactionRow;

    fn row(code: &str, name: &str, supplier: &str, year: i32, revenue: f64) -> TransactionRow {
        TransactionRow {
            member_code: code.to_string(),
            member_name: name.to_string(),
            supplier: supplier.to_string(),
            sub_family: "Freinage".to_string(),
            fiscal_year: year,
            revenue,
            ..Default::default()
        }
    }

    fn dashboard() -> Dashboard {
        let rows = vec![
            row("A", "Garage A", "Bosch", 2024, 1000.0),
            row("A", "Garage A", "Bosch", 2025, 1500.0),
            row("B", "Garage B", "Bosch", 2024, 2000.0),
            row("B", "Garage B", "Valeo", 2025, 1000.0),
        ];
        Dashboard::compute(
            &rows,
            &ScopeFilter::default(),
            YearPair::default(),
            FallbackStrategy::RowIndex,
        )
    }

    #[test]
    fn member_report_is_ordered_by_current_rank() {
        let report = member_ranking_report(&dashboard());
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].member_code, "A");
        assert_eq!(report[0].rank, 1);
        assert_eq!(report[0].previous_rank, 2);
        assert_eq!(report[0].movement, "+1 place");
        assert_eq!(report[0].medal, "Gold");
        assert_eq!(report[0].progression, "+50.0%");
        assert_eq!(report[0].trend, "progressing");
        assert_eq!(report[0].share, "60.0%");
        assert_eq!(report[1].movement, "-1 place");
        assert_eq!(report[1].revenue_year1, "2,000.00");
    }

    #[test]
    fn supplier_report_shows_adherent_ratio() {
        let dash = dashboard();
        let report = supplier_report(&dash.suppliers);
        assert_eq!(report[0].supplier, "Bosch");
        assert_eq!(report[0].adherents, "2/2");
        assert_eq!(report[1].supplier, "Valeo");
        assert_eq!(report[1].adherents, "1/2");
        assert_eq!(report[1].progression, "0.0%");
    }

    #[test]
    fn leaderboards_are_numbered_from_one() {
        let dash = dashboard();
        let report = leaderboard_report(&dash.members.top_regression);
        assert_eq!(report[0].position, 1);
        assert_eq!(report[0].member_code, "B");
        assert_eq!(report[0].progression, "-50.0%");
    }

    #[test]
    fn summary_counts_entities() {
        let summary = generate_summary(&dashboard());
        assert_eq!(summary.total_members, 2);
        assert_eq!(summary.total_suppliers, 2);
        assert_eq!(summary.total_families, 1);
        assert_eq!(summary.region, "all");
        assert_eq!(summary.platforms.len(), 4);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["metrics"]["revenue_year2"], 2500.0);
        assert_eq!(json["platforms"][0], "acr");
    }
}
