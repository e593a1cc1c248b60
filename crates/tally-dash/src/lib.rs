//! tally-dash: the dashboard aggregation engine.
//!
//! Given the full set of task records belonging to a user, derive a
//! multi-metric analytics snapshot: status histogram, gap-filled daily
//! completion timeline, top tag frequencies, mean completion latency, and
//! a weekly completion rate.
//!
//! The engine is a pure, single-threaded computation: one pass per user
//! over that user's task set, no I/O, no shared mutable state. Fetching
//! task sets and reading/writing the snapshot cache belong to the caller
//! (see `tally-core`).
//!
//! # Module layout
//!
//! - [`histogram`] — task counts per recognized status.
//! - [`timeline`] — gap-filled daily completion series.
//! - [`tags`] — tag frequency ranking with stable tie-breaking.
//! - [`stats`] — completion latency and weekly rate.
//! - [`snapshot`] — per-user assembly and the roster-driven mapping.

pub mod histogram;
pub mod snapshot;
pub mod stats;
pub mod tags;
pub mod timeline;

pub use histogram::status_histogram;
pub use snapshot::{Snapshot, aggregate, aggregate_all};
pub use stats::{CompletionStats, completion_stats};
pub use tags::{TOP_TAGS, TagCount, UNKNOWN_LABEL, top_tags};
pub use timeline::{DailyCount, daily_completions};
