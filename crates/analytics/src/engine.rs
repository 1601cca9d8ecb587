use std::collections::{BTreeMap, HashMap};

use core_types::{Column, GroupKey, KeyValue};
use record_store::RecordStore;

use crate::error::AnalyticsError;
use crate::report::{AggregateResult, RankedRecord};
use crate::welford::Welford;

/// A stateless calculator for per-group summary statistics.
#[derive(Debug, Default)]
pub struct GroupAggregator {}

impl GroupAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partitions the store by the `group_by` tuple and computes count,
    /// mean and sample standard deviation of `metric` per partition.
    ///
    /// The result is sorted ascending, lexicographically, by the group
    /// key — a visible contract that downstream reporting relies on.
    /// Groups with no matching rows are absent, not emitted as zeros.
    pub fn aggregate(
        &self,
        store: &RecordStore,
        group_by: &[Column],
        metric: Column,
    ) -> Result<Vec<AggregateResult>, AnalyticsError> {
        if store.is_empty() {
            return Err(AnalyticsError::EmptyStore);
        }
        if group_by.is_empty() {
            return Err(AnalyticsError::EmptyGroupKey);
        }
        if !metric.is_numeric() {
            return Err(AnalyticsError::NonNumericColumn(metric));
        }

        // BTreeMap keys are the group tuples, so iteration order is
        // already the lexicographic output order.
        let mut groups: BTreeMap<GroupKey, Welford> = BTreeMap::new();
        for record in store.scan() {
            let key = GroupKey::new(group_by.iter().map(|&c| record.key(c)).collect());
            let value = record
                .numeric(metric)
                .ok_or(AnalyticsError::NonNumericColumn(metric))?;
            groups.entry(key).or_default().add(value);
        }

        tracing::debug!(groups = groups.len(), rows = store.len(), "aggregated store");

        Ok(groups
            .into_iter()
            .map(|(key, acc)| AggregateResult {
                key,
                count: acc.count(),
                mean: acc.mean(),
                stddev: acc.sample_stddev(),
            })
            .collect())
    }
}

/// A stateless calculator assigning row-number ranks within partitions.
#[derive(Debug, Default)]
pub struct WindowRanker {}

impl WindowRanker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns each record a 1-based rank within its `partition_by`
    /// group, ordered by `order_by` ascending.
    ///
    /// Row-number semantics: ranks are contiguous with no gaps even for
    /// tied order keys, ties resolving by original insertion order
    /// (the sort below is stable over insertion-ordered indices).
    ///
    /// One output row per input row, returned in store order; only the
    /// rank values themselves are contractual.
    pub fn rank<'a>(
        &self,
        store: &'a RecordStore,
        partition_by: Column,
        order_by: Column,
    ) -> Vec<RankedRecord<'a>> {
        let records = store.records();

        let mut partitions: HashMap<KeyValue, Vec<usize>> = HashMap::new();
        for (idx, record) in records.iter().enumerate() {
            partitions.entry(record.key(partition_by)).or_default().push(idx);
        }

        let mut ranks = vec![0u32; records.len()];
        for indices in partitions.values_mut() {
            indices.sort_by(|&a, &b| records[a].key(order_by).cmp(&records[b].key(order_by)));
            for (pos, &idx) in indices.iter().enumerate() {
                ranks[idx] = pos as u32 + 1;
            }
        }

        records
            .iter()
            .zip(ranks)
            .map(|(record, rank)| RankedRecord { record, rank })
            .collect()
    }
}
