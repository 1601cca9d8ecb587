use core_types::{GroupKey, Record};
use serde::Serialize;

/// Summary statistics for one group of records.
///
/// Groups with zero matching rows are never emitted, so `count` is
/// always at least 1 and `mean` is always defined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    /// The group-by tuple identifying this partition.
    pub key: GroupKey,
    pub count: u64,
    pub mean: f64,
    /// Sample standard deviation; `None` when the group holds fewer
    /// than two rows (undefined, not zero).
    pub stddev: Option<f64>,
}

/// A record paired with its 1-based ordinal rank within its partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedRecord<'a> {
    pub record: &'a Record,
    pub rank: u32,
}
