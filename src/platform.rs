// Platform classification and per-platform statistics.
//
// Rows that already carry a platform pass through untouched. Untagged rows
// are matched against an ordered list of signals; the first match wins and
// rows with no signal are spread over the four platforms.
use crate::types::{Platform, PlatformStat, TransactionRow};
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// How untagged rows with no signal get a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// `row index mod 4` over the input sequence.
    #[default]
    RowIndex,
    /// Hash of the row's identifying fields, independent of row order.
    StableHash,
}

struct Signal {
    platform: Platform,
    /// Lowercase needle searched in supplier and brand.
    needle: &'static str,
    /// Case-sensitive prefix matched against the member code.
    code_prefix: &'static str,
}

// Precedence order matters.
const SIGNALS: [Signal; 4] = [
    Signal {
        platform: Platform::Acr,
        needle: "acr",
        code_prefix: "ACR",
    },
    Signal {
        platform: Platform::Dca,
        needle: "dca",
        code_prefix: "DCA",
    },
    Signal {
        platform: Platform::Exadis,
        needle: "exadis",
        code_prefix: "EX",
    },
    Signal {
        platform: Platform::Alliance,
        needle: "alliance",
        code_prefix: "AL",
    },
];

/// The platform signalled by a row's supplier, brand or member code, if any.
pub fn detect_platform(row: &TransactionRow) -> Option<Platform> {
    let supplier = row.supplier.to_lowercase();
    let brand = row.brand.to_lowercase();
    SIGNALS
        .iter()
        .find(|s| {
            supplier.contains(s.needle)
                || brand.contains(s.needle)
                || row.member_code.starts_with(s.code_prefix)
        })
        .map(|s| s.platform)
}

fn fallback_platform(row: &TransactionRow, index: usize, strategy: FallbackStrategy) -> Platform {
    let slot = match strategy {
        FallbackStrategy::RowIndex => index,
        FallbackStrategy::StableHash => {
            (stable_hash(row) % Platform::ALL.len() as u64) as usize
        }
    };
    Platform::ALL[slot % Platform::ALL.len()]
}

// First 8 bytes of a SHA-256 over `member_code|supplier|brand|sub_family`.
fn stable_hash(row: &TransactionRow) -> u64 {
    let mut hasher = Sha256::new();
    for field in [&row.member_code, &row.supplier, &row.brand, &row.sub_family] {
        hasher.update(field.as_bytes());
        hasher.update(b"|");
    }
    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head)
}

/// Classify one row. `index` is its position in the input sequence.
pub fn classify_row(
    row: &TransactionRow,
    index: usize,
    strategy: FallbackStrategy,
) -> TransactionRow {
    if row.platform.is_some() {
        return row.clone();
    }
    let platform =
        detect_platform(row).unwrap_or_else(|| fallback_platform(row, index, strategy));
    TransactionRow {
        platform: Some(platform),
        ..row.clone()
    }
}

/// Tag every untagged row, spreading signal-less rows by position.
pub fn classify_platforms(rows: &[TransactionRow]) -> Vec<TransactionRow> {
    classify_platforms_with(rows, FallbackStrategy::RowIndex)
}

pub fn classify_platforms_with(
    rows: &[TransactionRow],
    strategy: FallbackStrategy,
) -> Vec<TransactionRow> {
    let out: Vec<TransactionRow> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| classify_row(r, i, strategy))
        .collect();
    tracing::debug!(rows = out.len(), ?strategy, "classified platforms");
    out
}

/// Row counts and yearly revenue per platform, with a trailing
/// `"unassigned"` bucket for untagged rows.
pub fn platform_stats(rows: &[TransactionRow], year1: i32, year2: i32) -> Vec<PlatformStat> {
    let mut stats: Vec<PlatformStat> = Platform::ALL
        .iter()
        .map(|p| p.as_str())
        .chain(std::iter::once("unassigned"))
        .map(|name| PlatformStat {
            platform: name.to_string(),
            rows: 0,
            revenue_year1: 0.0,
            revenue_year2: 0.0,
        })
        .collect();
    let unassigned = Platform::ALL.len();
    for r in rows {
        let slot = r
            .platform
            .and_then(|p| Platform::ALL.iter().position(|q| *q == p))
            .unwrap_or(unassigned);
        let e = &mut stats[slot];
        e.rows += 1;
        if r.fiscal_year == year1 {
            e.revenue_year1 += r.revenue_or_zero();
        } else if r.fiscal_year == year2 {
            e.revenue_year2 += r.revenue_or_zero();
        }
    }
    stats
}
