// One full recomputation of every derived view for a row set and scope.
use crate::aggregate::{aggregate, global_metrics};
use crate::platform::{classify_platforms_with, platform_stats, FallbackStrategy};
use crate::ranking::rank_and_select;
use crate::scope::{apply_scope, ScopeFilter};
use crate::types::{
    EntityKey, EntitySummary, GlobalMetrics, PlatformStat, RankedSelection, TransactionRow,
};

/// Fiscal years being compared; `year1` is the earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearPair {
    pub year1: i32,
    pub year2: i32,
}

impl Default for YearPair {
    fn default() -> Self {
        YearPair { year1: 2024, year2: 2025 }
    }
}

/// Everything the reports display, derived from one pass.
///
/// Nothing here is updated incrementally; a filter change means building a
/// new `Dashboard`.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub years: YearPair,
    pub scope: ScopeFilter,
    pub rows_in_scope: usize,
    pub metrics: GlobalMetrics,
    pub platform_stats: Vec<PlatformStat>,
    pub members: RankedSelection,
    pub suppliers: Vec<EntitySummary>,
    pub families: Vec<EntitySummary>,
}

impl Dashboard {
    pub fn compute(
        rows: &[TransactionRow],
        scope: &ScopeFilter,
        years: YearPair,
        fallback: FallbackStrategy,
    ) -> Dashboard {
        let classified = classify_platforms_with(rows, fallback);
        let scoped = apply_scope(&classified, scope);
        let YearPair { year1, year2 } = years;

        let members = rank_and_select(aggregate(&scoped, EntityKey::Member, year1, year2));
        let suppliers = aggregate(&scoped, EntityKey::Supplier, year1, year2);
        let families = aggregate(&scoped, EntityKey::SubFamily, year1, year2);

        tracing::info!(
            rows = rows.len(),
            in_scope = scoped.len(),
            members = members.ranked.len(),
            suppliers = suppliers.len(),
            families = families.len(),
            "dashboard computed"
        );
        Dashboard {
            years,
            scope: scope.clone(),
            rows_in_scope: scoped.len(),
            metrics: global_metrics(&scoped, year1, year2),
            platform_stats: platform_stats(&scoped, year1, year2),
            members,
            suppliers,
            families,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::RegionScope;
    use crate::types::Platform;

    fn row(code: &str, supplier: &str, year: i32, revenue: f64, region: &str) -> TransactionRow {
        TransactionRow {
            member_code: code.to_string(),
            supplier: supplier.to_string(),
            sub_family: "Freinage".to_string(),
            fiscal_year: year,
            revenue,
            region: Some(region.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn computes_every_view_from_one_scope() {
        let rows = vec![
            row("A", "Bosch", 2024, 1000.0, "Nord"),
            row("A", "Bosch", 2025, 1500.0, "Nord"),
            row("B", "Valeo", 2024, 2000.0, "Sud"),
            row("B", "Valeo", 2025, 1000.0, "Sud"),
        ];
        let dash = Dashboard::compute(
            &rows,
            &ScopeFilter::default(),
            YearPair::default(),
            FallbackStrategy::RowIndex,
        );
        assert_eq!(dash.rows_in_scope, 4);
        assert_eq!(dash.members.ranked.len(), 2);
        assert_eq!(dash.suppliers.len(), 2);
        assert_eq!(dash.families.len(), 1);
        assert_eq!(dash.metrics.revenue_year1, 3000.0);
        assert_eq!(dash.metrics.revenue_year2, 2500.0);
        assert_eq!(dash.metrics.progression_pct, -16.7);
        let tagged: usize = dash.platform_stats.iter().take(4).map(|s| s.rows).sum();
        assert_eq!(tagged, 4);
    }

    #[test]
    fn region_with_no_rows_gives_empty_views() {
        let rows = vec![row("A", "Bosch", 2025, 10.0, "Nord")];
        let scope = ScopeFilter::new(Platform::ALL, RegionScope::Only("Est".into()));
        let dash = Dashboard::compute(
            &rows,
            &scope,
            YearPair::default(),
            FallbackStrategy::RowIndex,
        );
        assert_eq!(dash.rows_in_scope, 0);
        assert!(dash.members.ranked.is_empty());
        assert!(dash.members.top_revenue.is_empty());
        assert!(dash.suppliers.is_empty());
        assert!(dash.families.is_empty());
    }
}
