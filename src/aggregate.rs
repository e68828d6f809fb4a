// Grouping scoped rows into per-entity yearly totals.
use crate::progression::{progression, progression_pct, share_pct};
use crate::types::{EntityIdentity, EntityKey, EntitySummary, GlobalMetrics, TransactionRow};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

struct Acc<'a> {
    first: &'a TransactionRow,
    revenue_year1: f64,
    revenue_year2: f64,
    members: HashSet<&'a str>,
}

/// Sum revenue per entity for `year1` and `year2`.
///
/// Entities appear in first-seen order for members; suppliers and
/// sub-families come back sorted by `year2` revenue, highest first, ties
/// keeping first-seen order. Rows from any other year are ignored.
pub fn aggregate(
    rows: &[TransactionRow],
    key: EntityKey,
    year1: i32,
    year2: i32,
) -> Vec<EntitySummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut accs: Vec<Acc> = Vec::new();
    let mut all_members: HashSet<&str> = HashSet::new();
    let (mut total_year1, mut total_year2) = (0.0, 0.0);

    for r in rows {
        let slot = *index.entry(key.key_of(r)).or_insert_with(|| {
            accs.push(Acc {
                first: r,
                revenue_year1: 0.0,
                revenue_year2: 0.0,
                members: HashSet::new(),
            });
            accs.len() - 1
        });
        let e = &mut accs[slot];
        let revenue = r.revenue_or_zero();
        if r.fiscal_year == year1 {
            e.revenue_year1 += revenue;
            total_year1 += revenue;
        } else if r.fiscal_year == year2 {
            e.revenue_year2 += revenue;
            total_year2 += revenue;
        }
        if key == EntityKey::Supplier {
            e.members.insert(&r.member_code);
            all_members.insert(&r.member_code);
        }
    }

    let total_members = all_members.len();
    let mut summaries: Vec<EntitySummary> = accs
        .into_iter()
        .map(|acc| {
            let identity = match key {
                EntityKey::Member => EntityIdentity::Member {
                    code: acc.first.member_code.clone(),
                    name: acc.first.member_name.clone(),
                    group: acc.first.member_group.clone(),
                },
                EntityKey::Supplier => EntityIdentity::Supplier {
                    name: acc.first.supplier.clone(),
                    member_count: acc.members.len(),
                    total_members,
                },
                EntityKey::SubFamily => EntityIdentity::Family {
                    sub_family: acc.first.sub_family.clone(),
                },
            };
            let (progression_pct, trend) = progression(acc.revenue_year1, acc.revenue_year2);
            EntitySummary {
                identity,
                revenue_year1: acc.revenue_year1,
                revenue_year2: acc.revenue_year2,
                progression_pct,
                trend,
                share_year1_pct: share_pct(acc.revenue_year1, total_year1),
                share_year2_pct: share_pct(acc.revenue_year2, total_year2),
                total_revenue_year2: total_year2,
                ranks: None,
            }
        })
        .collect();

    if key != EntityKey::Member {
        summaries.sort_by(|a, b| {
            b.revenue_year2
                .partial_cmp(&a.revenue_year2)
                .unwrap_or(Ordering::Equal)
        });
    }
    tracing::debug!(
        ?key,
        rows = rows.len(),
        entities = summaries.len(),
        "aggregated entities"
    );
    summaries
}

/// Scope-wide totals for both years and their progression.
pub fn global_metrics(rows: &[TransactionRow], year1: i32, year2: i32) -> GlobalMetrics {
    let sum_for = |year: i32| -> f64 {
        rows.iter()
            .filter(|r| r.fiscal_year == year)
            .map(TransactionRow::revenue_or_zero)
            .sum()
    };
    let revenue_year1 = sum_for(year1);
    let revenue_year2 = sum_for(year2);
    GlobalMetrics {
        revenue_year1,
        revenue_year2,
        progression_pct: progression_pct(revenue_year1, revenue_year2),
    }
}
