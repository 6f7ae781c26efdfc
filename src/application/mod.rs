//! Application services (use cases).
//!
//! These services drive the outbound ports and the domain types to answer
//! one question per refresh: which venue pair has the widest funding spread
//! right now, and how often has it cleared the threshold lately.

pub mod align;
pub mod monitor;
pub mod paginator;
pub mod ranking;
pub mod stats;

pub use align::{align, Cadence, FillPolicy, SeriesAligner};
pub use monitor::{
    Coverage, FundingMonitor, RefreshOutcome, ScanQuery, Snapshot, VenueCoverage,
    DEFAULT_FETCH_DEADLINE, MAX_GRID_CELLS, MAX_LOOKBACK_DAYS,
};
pub use paginator::Paginator;
pub use ranking::{best_pair, Annualization, SpreadRanker};
pub use stats::{pair_stats, summarize, top_spreads, venue_stats};
