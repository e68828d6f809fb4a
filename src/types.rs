use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// Membership platform a transaction row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Acr,
    Dca,
    Exadis,
    Alliance,
}

impl Platform {
    /// Every platform, in classifier precedence order.
    pub const ALL: [Platform; 4] = [
        Platform::Acr,
        Platform::Dca,
        Platform::Exadis,
        Platform::Alliance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Acr => "acr",
            Platform::Dca => "dca",
            Platform::Exadis => "exadis",
            Platform::Alliance => "alliance",
        }
    }

    /// Parse a platform tag, ignoring case and surrounding whitespace.
    ///
    /// Unknown tags yield `None`, which downstream code treats the same as
    /// an untagged row.
    pub fn from_tag(tag: &str) -> Option<Platform> {
        let tag = tag.trim().to_lowercase();
        Platform::ALL.into_iter().find(|p| p.as_str() == tag)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// One raw CSV line before normalization. Every column is optional so a
/// short or sparse line still deserializes.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "memberCode")]
    pub member_code: Option<String>,
    #[serde(rename = "memberName")]
    pub member_name: Option<String>,
    #[serde(rename = "memberGroup")]
    pub member_group: Option<String>,
    #[serde(rename = "supplier")]
    pub supplier: Option<String>,
    #[serde(rename = "brand")]
    pub brand: Option<String>,
    #[serde(rename = "subFamily")]
    pub sub_family: Option<String>,
    #[serde(rename = "supplierGroup")]
    pub supplier_group: Option<String>,
    #[serde(rename = "fiscalYear")]
    pub fiscal_year: Option<String>,
    #[serde(rename = "revenue")]
    pub revenue: Option<String>,
    #[serde(rename = "platform")]
    pub platform: Option<String>,
    #[serde(rename = "region")]
    pub region: Option<String>,
}

/// A yearly revenue line for one member, supplier and sub-family.
///
/// Rows are never patched in place: the classifier and the scope filter
/// both hand back fresh collections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionRow {
    pub member_code: String,
    pub member_name: String,
    pub member_group: String,
    pub supplier: String,
    pub brand: String,
    pub sub_family: String,
    pub supplier_group: String,
    pub fiscal_year: i32,
    pub revenue: f64,
    pub platform: Option<Platform>,
    pub region: Option<String>,
}

impl TransactionRow {
    /// Revenue with NaN and infinities read as `0`.
    pub fn revenue_or_zero(&self) -> f64 {
        if self.revenue.is_finite() {
            self.revenue
        } else {
            0.0
        }
    }
}

/// Year-over-year direction, using the ±5% policy band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Progressing,
    Regressing,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Progressing => "progressing",
            Trend::Regressing => "regressing",
            Trend::Stable => "stable",
        };
        f.write_str(s)
    }
}

/// Which field of a row groups it into an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKey {
    Member,
    Supplier,
    SubFamily,
}

impl EntityKey {
    pub fn key_of(self, row: &TransactionRow) -> &str {
        match self {
            EntityKey::Member => &row.member_code,
            EntityKey::Supplier => &row.supplier,
            EntityKey::SubFamily => &row.sub_family,
        }
    }
}

/// Identity fields of a summary, copied from the first contributing row.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityIdentity {
    Member {
        code: String,
        name: String,
        group: String,
    },
    Supplier {
        name: String,
        /// Distinct members buying from this supplier in scope.
        member_count: usize,
        /// Distinct members in the whole scope.
        total_members: usize,
    },
    Family {
        sub_family: String,
    },
}

impl EntityIdentity {
    pub fn key(&self) -> &str {
        match self {
            EntityIdentity::Member { code, .. } => code,
            EntityIdentity::Supplier { name, .. } => name,
            EntityIdentity::Family { sub_family } => sub_family,
        }
    }

    /// Human-facing name: member company name, supplier or sub-family.
    pub fn label(&self) -> &str {
        match self {
            EntityIdentity::Member { name, .. } => name,
            EntityIdentity::Supplier { name, .. } => name,
            EntityIdentity::Family { sub_family } => sub_family,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranks {
    pub year1: usize,
    pub year2: usize,
    /// `year2 - year1`; negative means the entity moved up.
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntitySummary {
    pub identity: EntityIdentity,
    pub revenue_year1: f64,
    pub revenue_year2: f64,
    pub progression_pct: f64,
    pub trend: Trend,
    pub share_year1_pct: f64,
    pub share_year2_pct: f64,
    /// Year-2 revenue of the whole scope, the base of `share_year2_pct`.
    pub total_revenue_year2: f64,
    /// Filled in by the rank assigner; `None` straight out of aggregation.
    pub ranks: Option<Ranks>,
}

impl EntitySummary {
    /// Whether a year-over-year percentage is meaningful for this entity.
    pub fn has_baseline(&self) -> bool {
        self.revenue_year1 > 0.0
    }
}

/// Output of one ranking pass over member summaries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedSelection {
    /// Every input summary, in input order, with ranks assigned.
    pub ranked: Vec<EntitySummary>,
    pub top_revenue: Vec<EntitySummary>,
    pub top_progression: Vec<EntitySummary>,
    pub top_regression: Vec<EntitySummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GlobalMetrics {
    pub revenue_year1: f64,
    pub revenue_year2: f64,
    pub progression_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformStat {
    /// Platform tag, or `"unassigned"` for untagged rows.
    pub platform: String,
    pub rows: usize,
    pub revenue_year1: f64,
    pub revenue_year2: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MemberRankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "PreviousRank")]
    #[tabled(rename = "PreviousRank")]
    pub previous_rank: usize,
    #[serde(rename = "Movement")]
    #[tabled(rename = "Movement")]
    pub movement: String,
    #[serde(rename = "Medal")]
    #[tabled(rename = "Medal")]
    pub medal: String,
    #[serde(rename = "MemberCode")]
    #[tabled(rename = "MemberCode")]
    pub member_code: String,
    #[serde(rename = "MemberName")]
    #[tabled(rename = "MemberName")]
    pub member_name: String,
    #[serde(rename = "MemberGroup")]
    #[tabled(rename = "MemberGroup")]
    pub member_group: String,
    #[serde(rename = "RevenueYear1")]
    #[tabled(rename = "RevenueYear1")]
    pub revenue_year1: String,
    #[serde(rename = "RevenueYear2")]
    #[tabled(rename = "RevenueYear2")]
    pub revenue_year2: String,
    #[serde(rename = "Progression")]
    #[tabled(rename = "Progression")]
    pub progression: String,
    #[serde(rename = "Trend")]
    #[tabled(rename = "Trend")]
    pub trend: String,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share")]
    pub share: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SupplierRow {
    #[serde(rename = "Supplier")]
    #[tabled(rename = "Supplier")]
    pub supplier: String,
    #[serde(rename = "RevenueYear1")]
    #[tabled(rename = "RevenueYear1")]
    pub revenue_year1: String,
    #[serde(rename = "RevenueYear2")]
    #[tabled(rename = "RevenueYear2")]
    pub revenue_year2: String,
    #[serde(rename = "Progression")]
    #[tabled(rename = "Progression")]
    pub progression: String,
    #[serde(rename = "ShareYear1")]
    #[tabled(rename = "ShareYear1")]
    pub share_year1: String,
    #[serde(rename = "ShareYear2")]
    #[tabled(rename = "ShareYear2")]
    pub share_year2: String,
    #[serde(rename = "Adherents")]
    #[tabled(rename = "Adherents")]
    pub adherents: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct FamilyRow {
    #[serde(rename = "SubFamily")]
    #[tabled(rename = "SubFamily")]
    pub sub_family: String,
    #[serde(rename = "RevenueYear1")]
    #[tabled(rename = "RevenueYear1")]
    pub revenue_year1: String,
    #[serde(rename = "RevenueYear2")]
    #[tabled(rename = "RevenueYear2")]
    pub revenue_year2: String,
    #[serde(rename = "Progression")]
    #[tabled(rename = "Progression")]
    pub progression: String,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share")]
    pub share: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct LeaderboardRow {
    #[serde(rename = "Position")]
    #[tabled(rename = "Position")]
    pub position: usize,
    #[serde(rename = "MemberCode")]
    #[tabled(rename = "MemberCode")]
    pub member_code: String,
    #[serde(rename = "MemberName")]
    #[tabled(rename = "MemberName")]
    pub member_name: String,
    #[serde(rename = "RevenueYear1")]
    #[tabled(rename = "RevenueYear1")]
    pub revenue_year1: String,
    #[serde(rename = "RevenueYear2")]
    #[tabled(rename = "RevenueYear2")]
    pub revenue_year2: String,
    #[serde(rename = "Progression")]
    #[tabled(rename = "Progression")]
    pub progression: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub generated_at: DateTime<Utc>,
    pub year1: i32,
    pub year2: i32,
    pub platforms: Vec<Platform>,
    pub region: String,
    pub rows_in_scope: usize,
    pub total_members: usize,
    pub total_suppliers: usize,
    pub total_families: usize,
    pub metrics: GlobalMetrics,
    pub platform_stats: Vec<PlatformStat>,
}
