//! Key scalars used by the grouping, windowing and pivoting engines.
//!
//! Group keys must be hashable (partitioning) and totally ordered
//! (deterministic, lexicographically sorted output), which rules out a
//! bare `f64`. `OrderedF64` wraps one with a bitwise total order.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::Status;

/// Wrapper around f64 that implements `Eq`, `Ord` and `Hash` so measured
/// values can participate in group keys.
///
/// Equality and ordering use `f64::total_cmp`, so two keys are equal
/// exactly when their bit patterns are (NaN groups with NaN, and
/// -0.0 sorts before +0.0). That matches the "equality on raw value,
/// not normalized" grouping contract.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedF64(pub f64);

impl OrderedF64 {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl PartialEq for OrderedF64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == std::cmp::Ordering::Equal
    }
}

impl Eq for OrderedF64 {}

impl PartialOrd for OrderedF64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedF64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::hash::Hash for OrderedF64 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // Consistent with total_cmp equality: equal iff same bits.
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for OrderedF64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One typed value extracted from a record column, used as a grouping,
/// ordering or spread key.
///
/// In practice a key tuple always mixes values from the same columns, so
/// comparisons never cross variants; the derived ordering still gives a
/// total order if they do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyValue {
    Text(String),
    Date(NaiveDate),
    Number(OrderedF64),
    Status(Status),
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Text(s) => f.write_str(s),
            KeyValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            KeyValue::Number(n) => write!(f, "{}", n),
            KeyValue::Status(s) => write!(f, "{}", s),
        }
    }
}

/// A tuple of column values identifying one partition of the store.
///
/// Ordering is lexicographic over the tuple, which is the row order
/// contract for aggregate and pivot output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey(Vec<KeyValue>);

impl GroupKey {
    pub fn new(values: Vec<KeyValue>) -> Self {
        GroupKey(values)
    }

    pub fn values(&self) -> &[KeyValue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
