// Narrowing the row set by active platforms and region.
use crate::error::{Error, Result};
use crate::types::{Platform, TransactionRow};
use std::collections::BTreeSet;
use std::fmt;

/// Region selection value meaning "no region filter".
pub const ALL_REGIONS: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionScope {
    #[default]
    All,
    Only(String),
}

impl RegionScope {
    /// Build from a selection string, mapping the `"all"` sentinel to `All`.
    pub fn from_selection(selection: &str) -> RegionScope {
        if selection == ALL_REGIONS {
            RegionScope::All
        } else {
            RegionScope::Only(selection.to_string())
        }
    }
}

impl fmt::Display for RegionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionScope::All => f.write_str(ALL_REGIONS),
            RegionScope::Only(r) => f.write_str(r),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFilter {
    pub platforms: BTreeSet<Platform>,
    pub region: RegionScope,
}

impl Default for ScopeFilter {
    fn default() -> Self {
        ScopeFilter {
            platforms: Platform::ALL.into_iter().collect(),
            region: RegionScope::All,
        }
    }
}

impl ScopeFilter {
    pub fn new(platforms: impl IntoIterator<Item = Platform>, region: RegionScope) -> Self {
        ScopeFilter {
            platforms: platforms.into_iter().collect(),
            region,
        }
    }

    /// True when every platform is active, which disables the platform predicate.
    pub fn all_platforms(&self) -> bool {
        Platform::ALL.iter().all(|p| self.platforms.contains(p))
    }

    pub fn keeps(&self, row: &TransactionRow) -> bool {
        platform_predicate(row, self) && region_predicate(row, &self.region)
    }
}

/// Untagged rows are never excluded here.
pub fn platform_predicate(row: &TransactionRow, scope: &ScopeFilter) -> bool {
    if scope.all_platforms() {
        return true;
    }
    match row.platform {
        Some(p) => scope.platforms.contains(&p),
        None => true,
    }
}

/// Exact, case-sensitive match on the trimmed row region.
pub fn region_predicate(row: &TransactionRow, region: &RegionScope) -> bool {
    match region {
        RegionScope::All => true,
        RegionScope::Only(selected) => row
            .region
            .as_deref()
            .is_some_and(|r| r.trim() == selected.as_str()),
    }
}

pub fn apply_scope(rows: &[TransactionRow], scope: &ScopeFilter) -> Vec<TransactionRow> {
    let kept: Vec<TransactionRow> = rows.iter().filter(|r| scope.keeps(r)).cloned().collect();
    tracing::debug!(
        rows_in = rows.len(),
        rows_out = kept.len(),
        region = %scope.region,
        "applied scope"
    );
    kept
}

/// Parse a platform selection: `all`, or a comma-separated list of tags.
pub fn parse_platforms(input: &str) -> Result<BTreeSet<Platform>> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") {
        return Ok(Platform::ALL.into_iter().collect());
    }
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| Platform::from_tag(t).ok_or_else(|| Error::PlatformSelection(t.to_string())))
        .collect()
}

/// Distinct non-empty regions, trimmed and sorted.
pub fn available_regions(rows: &[TransactionRow]) -> Vec<String> {
    let regions: BTreeSet<&str> = rows
        .iter()
        .filter_map(|r| r.region.as_deref())
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .collect();
    regions.into_iter().map(str::to_string).collect()
}
