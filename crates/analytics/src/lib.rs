//! # Analytics Engines
//!
//! Grouped statistics and within-partition ranking over a `RecordStore`.
//!
//! ## Architectural Principles
//!
//! - **Pure logic crate:** no I/O, no external systems; it reads an
//!   immutable store snapshot and returns freshly allocated results.
//! - **Stateless calculators:** `GroupAggregator` and `WindowRanker`
//!   hold no state between calls, which keeps them trivial to test and
//!   safe to share across threads.
//! - **Deterministic output:** aggregate rows come back sorted
//!   lexicographically by group key, so downstream reporting is stable
//!   across runs and input orderings.
//!
//! ## Public API
//!
//! - `GroupAggregator`: per-group count / mean / sample stddev.
//! - `WindowRanker`: 1-based row-number ranks within partitions.
//! - `Welford`: the streaming accumulator behind both this crate's
//!   stddev and the pivot crate's cell means.

pub mod engine;
pub mod error;
pub mod report;
pub mod welford;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{GroupAggregator, WindowRanker};
pub use error::AnalyticsError;
pub use report::{AggregateResult, RankedRecord};
pub use welford::Welford;
