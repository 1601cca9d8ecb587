use std::collections::{BTreeMap, BTreeSet};

use analytics::Welford;
use core_types::{Column, GroupKey, KeyValue};
use record_store::RecordStore;

use crate::error::PivotError;
use crate::table::{PivotRow, PivotTable};

/// A stateless calculator that cross-tabulates a record store.
#[derive(Debug, Default)]
pub struct PivotBuilder {}

impl PivotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pivots the store: rows keyed by the `row_keys` tuple, one output
    /// column per distinct value of `spread`, cells holding the mean of
    /// `value` over the matching records.
    ///
    /// Two phases: column discovery over the whole store first, then
    /// cell accumulation. A (row key, spread value) pair with no
    /// matching records yields an explicit `None` cell.
    pub fn pivot(
        &self,
        store: &RecordStore,
        row_keys: &[Column],
        spread: Column,
        value: Column,
    ) -> Result<PivotTable, PivotError> {
        if store.is_empty() {
            return Err(PivotError::EmptyStore);
        }
        if row_keys.is_empty() {
            return Err(PivotError::EmptyRowKey);
        }
        if !value.is_numeric() {
            return Err(PivotError::NonNumericColumn(value));
        }

        // Phase 1: discover the dynamic output columns. BTreeSet makes
        // the column order lexicographic, independent of scan order.
        let spread_values: Vec<KeyValue> =
            store.scan().map(|r| r.key(spread)).collect::<BTreeSet<_>>().into_iter().collect();

        tracing::debug!(
            columns = spread_values.len(),
            rows = store.len(),
            "discovered pivot columns"
        );

        // Phase 2: one accumulator per (row key, spread column) cell.
        let mut rows: BTreeMap<GroupKey, Vec<Welford>> = BTreeMap::new();
        for record in store.scan() {
            let key = GroupKey::new(row_keys.iter().map(|&c| record.key(c)).collect());
            let cells = rows
                .entry(key)
                .or_insert_with(|| vec![Welford::new(); spread_values.len()]);

            // Every spread key was collected in phase 1.
            if let Ok(col) = spread_values.binary_search(&record.key(spread)) {
                let metric = record
                    .numeric(value)
                    .ok_or(PivotError::NonNumericColumn(value))?;
                cells[col].add(metric);
            }
        }

        let rows = rows
            .into_iter()
            .map(|(key, accumulators)| PivotRow {
                key,
                cells: accumulators
                    .into_iter()
                    .map(|acc| if acc.count() > 0 { Some(acc.mean()) } else { None })
                    .collect(),
            })
            .collect();

        Ok(PivotTable {
            row_key_columns: row_keys.to_vec(),
            spread_column: spread,
            value_column: value,
            spread_values,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{DomainPolicy, ParameterDomain, Record, Status};
    use record_store::RecordStore;

    fn domain() -> ParameterDomain {
        ParameterDomain::new()
            .with_parameter("Noise", None)
            .with_parameter("Temperature", None)
            .with_parameter("Vibration", None)
    }

    fn record(day: u32, location: &str, parameter: &str, value: f64) -> Record {
        Record {
            id: "sensor1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            location: location.to_string(),
            parameter: parameter.to_string(),
            value,
            status: Status::Good,
        }
    }

    fn store(records: Vec<Record>) -> RecordStore {
        RecordStore::from_records(records, &domain(), DomainPolicy::Strict).unwrap()
    }

    #[test]
    fn missing_combination_yields_an_explicit_null_cell() {
        // Two dates, two parameters, one combination absent.
        let store = store(vec![
            record(1, "Hungary", "Temperature", 10.0),
            record(1, "Hungary", "Noise", 40.0),
            record(2, "Hungary", "Temperature", 20.0),
        ]);

        let table = PivotBuilder::new()
            .pivot(&store, &[Column::Date], Column::Parameter, Column::Value)
            .unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_spread_columns(), 2);

        let noise = KeyValue::Text("Noise".to_string());
        let temperature = KeyValue::Text("Temperature".to_string());

        assert_eq!(table.cell(0, &noise), Some(40.0));
        assert_eq!(table.cell(0, &temperature), Some(10.0));
        assert_eq!(table.cell(1, &temperature), Some(20.0));
        // Absent (day 2, Noise) combination: null, not zero.
        assert_eq!(table.cell(1, &noise), None);
        assert_eq!(table.rows[1].cells[0], None);
    }

    #[test]
    fn cells_average_all_matching_records() {
        let store = store(vec![
            record(1, "Hungary", "Temperature", 10.0),
            record(1, "Hungary", "Temperature", 30.0),
        ]);

        let table = PivotBuilder::new()
            .pivot(&store, &[Column::Date], Column::Parameter, Column::Value)
            .unwrap();

        let temperature = KeyValue::Text("Temperature".to_string());
        assert_eq!(table.cell(0, &temperature), Some(20.0));
    }

    #[test]
    fn coverage_holds_in_both_directions() {
        let store = store(vec![
            record(1, "Hungary", "Temperature", 1.0),
            record(1, "Germany", "Noise", 2.0),
            record(2, "Hungary", "Vibration", 3.0),
            record(2, "Germany", "Temperature", 4.0),
        ]);

        let table = PivotBuilder::new()
            .pivot(
                &store,
                &[Column::Date, Column::Location],
                Column::Parameter,
                Column::Value,
            )
            .unwrap();

        // Every input (row key, spread value) pair has a non-null cell.
        for r in store.scan() {
            let key = GroupKey::new(vec![r.key(Column::Date), r.key(Column::Location)]);
            let row_idx = table.rows.iter().position(|row| row.key == key).unwrap();
            assert!(table.cell(row_idx, &r.key(Column::Parameter)).is_some());
        }

        // Every null cell corresponds to zero matching input rows.
        for (row_idx, row) in table.rows.iter().enumerate() {
            for (col, cell) in row.cells.iter().enumerate() {
                if cell.is_none() {
                    let spread = &table.spread_values[col];
                    let matches = store.scan().any(|r| {
                        GroupKey::new(vec![r.key(Column::Date), r.key(Column::Location)])
                            == table.rows[row_idx].key
                            && r.key(Column::Parameter) == *spread
                    });
                    assert!(!matches);
                }
            }
        }
    }

    #[test]
    fn columns_and_rows_are_lexicographically_ordered() {
        let store = store(vec![
            record(2, "Hungary", "Vibration", 1.0),
            record(1, "Hungary", "Temperature", 2.0),
            record(1, "Germany", "Noise", 3.0),
        ]);

        let table = PivotBuilder::new()
            .pivot(
                &store,
                &[Column::Date, Column::Location],
                Column::Parameter,
                Column::Value,
            )
            .unwrap();

        assert_eq!(
            table.column_names(),
            vec!["Date", "Location", "Noise", "Temperature", "Vibration"]
        );
        let keys: Vec<_> = table.rows.iter().map(|r| r.key.clone()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn pivot_is_invariant_under_input_permutation() {
        let rows = vec![
            record(1, "Hungary", "Temperature", 1.0),
            record(2, "Germany", "Noise", 2.0),
            record(1, "Germany", "Vibration", 3.0),
            record(2, "Hungary", "Temperature", 4.0),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();

        let first = PivotBuilder::new()
            .pivot(
                &store(rows),
                &[Column::Date, Column::Location],
                Column::Parameter,
                Column::Value,
            )
            .unwrap();
        let second = PivotBuilder::new()
            .pivot(
                &store(reversed),
                &[Column::Date, Column::Location],
                Column::Parameter,
                Column::Value,
            )
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn empty_store_is_rejected() {
        let empty = store(vec![]);
        let err = PivotBuilder::new()
            .pivot(&empty, &[Column::Date], Column::Parameter, Column::Value)
            .unwrap_err();
        assert!(matches!(err, PivotError::EmptyStore));
    }

    #[test]
    fn empty_row_key_is_rejected() {
        let one = store(vec![record(1, "Hungary", "Temperature", 1.0)]);
        let err = PivotBuilder::new()
            .pivot(&one, &[], Column::Parameter, Column::Value)
            .unwrap_err();
        assert!(matches!(err, PivotError::EmptyRowKey));
    }

    #[test]
    fn non_numeric_value_column_is_rejected() {
        let one = store(vec![record(1, "Hungary", "Temperature", 1.0)]);
        let err = PivotBuilder::new()
            .pivot(&one, &[Column::Date], Column::Parameter, Column::Location)
            .unwrap_err();
        assert!(matches!(err, PivotError::NonNumericColumn(Column::Location)));
    }
}
