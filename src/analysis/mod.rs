//! # Analysis Engine
//!
//! Turns track ids into memoized per-track analysis records and folds whole
//! collections into one aggregate profile.
//!
//! ```text
//! CollectionAggregator
//!     ↓ per track (in order, optionally several at once)
//! TrackAnalyzer ── TrackCache (hit: return record verbatim)
//!     ├── FeatureProvider   (title, artist, audio features; cooldown retry)
//!     ├── LyricsSource      → segmenter::segment
//!     └── TextAnalyzer      (one call per track)
//!     ↓
//! AudioFeatures::mean + merger::merge → CollectionAggregate
//! ```
//!
//! Partial failure is normal: unavailable tracks are skipped and the
//! aggregate covers whatever succeeded. Missing lyrics or a failed text
//! analysis leave `ai.nlu` empty rather than failing the track.

mod aggregator;
mod analyzer;
pub mod merger;
pub mod retry;
pub mod segmenter;

pub use aggregator::AggregateError;
pub use aggregator::CollectionAggregator;
pub use aggregator::TrackBreakdown;
pub use analyzer::AnalysisError;
pub use analyzer::TrackAnalyzer;
pub use retry::Cooldown;
pub use retry::RetryPolicy;
