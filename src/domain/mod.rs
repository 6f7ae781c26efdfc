//! Exchange-agnostic domain types.

pub mod error;

mod frame;
mod frequency;
mod observation;
mod pair;
mod predicted;
mod range;
mod summary;
mod venue;

pub use frame::{spread_name, AlignedFrame, FrameGap, FrameRow, SpreadCell};
pub use frequency::Frequency;
pub use observation::{to_bps, FundingObservation, VenueSeries, BPS_PER_UNIT};
pub use pair::BestPair;
pub use predicted::PredictedFunding;
pub use range::TimeRange;
pub use summary::{OpportunitySummary, PairStats, SpreadPoint, VenueStats};
pub use venue::{Instrument, Venue};
