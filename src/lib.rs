//! Sales aggregation and ranking for a purchasing cooperative.
//!
//! Raw yearly transaction rows go through platform classification, scope
//! filtering, per-entity aggregation and ranking. Every stage is a pure
//! function over plain collections; callers recompute from scratch when the
//! rows or the filters change.
pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod output;
pub mod platform;
pub mod progression;
pub mod ranking;
pub mod reports;
pub mod scope;
pub mod types;
pub mod util;

pub use aggregate::{aggregate, global_metrics};
pub use dashboard::{Dashboard, YearPair};
pub use error::{Error, Result};
pub use platform::{classify_platforms, classify_platforms_with, FallbackStrategy};
pub use ranking::rank_and_select;
pub use scope::{apply_scope, RegionScope, ScopeFilter};
pub use types::{
    EntityIdentity, EntityKey, EntitySummary, Platform, RankedSelection, Ranks, TransactionRow,
    Trend,
};
