//! # Table Writer
//!
//! Serializes engine output — aggregate summaries and pivot tables — to
//! columnar Parquet files via Arrow record batches. The engines
//! themselves know nothing about this crate or the on-disk format;
//! this is the serialization collaborator they hand results to.
//!
//! Null cells and undefined standard deviations are written as Parquet
//! nulls, preserving the "not computable vs. zero" distinction on disk.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use analytics::AggregateResult;
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use core_types::{Column, KeyValue};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use pivot::PivotTable;

pub mod error;

pub use error::WriterError;

/// Writes an aggregate summary as Parquet: one Utf8/Date32 column per
/// group-by key, then `count_rows`, `avg_value` and a nullable
/// `stddev_value` (the Spark-era column aliases).
pub fn write_aggregates(
    path: &Path,
    group_by: &[Column],
    results: &[AggregateResult],
) -> Result<(), WriterError> {
    for result in results {
        if result.key.len() != group_by.len() {
            return Err(WriterError::KeyShapeMismatch {
                expected: group_by.len(),
                found: result.key.len(),
            });
        }
    }

    let mut fields = Vec::with_capacity(group_by.len() + 3);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(group_by.len() + 3);
    for (idx, &column) in group_by.iter().enumerate() {
        let keys: Vec<&KeyValue> = results.iter().map(|r| &r.key.values()[idx]).collect();
        fields.push(key_field(column));
        arrays.push(key_array(column, &keys));
    }

    fields.push(Field::new("count_rows", DataType::UInt64, false));
    arrays.push(Arc::new(UInt64Array::from(
        results.iter().map(|r| r.count).collect::<Vec<_>>(),
    )));

    fields.push(Field::new("avg_value", DataType::Float64, false));
    arrays.push(Arc::new(Float64Array::from(
        results.iter().map(|r| r.mean).collect::<Vec<_>>(),
    )));

    fields.push(Field::new("stddev_value", DataType::Float64, true));
    arrays.push(Arc::new(Float64Array::from(
        results.iter().map(|r| r.stddev).collect::<Vec<_>>(),
    )));

    write_batch(path, fields, arrays)
}

/// Writes a pivot table as Parquet: the row-key columns followed by one
/// nullable Float64 column per discovered spread value.
pub fn write_pivot(path: &Path, table: &PivotTable) -> Result<(), WriterError> {
    let key_width = table.row_key_columns.len();
    for row in &table.rows {
        if row.key.len() != key_width {
            return Err(WriterError::KeyShapeMismatch {
                expected: key_width,
                found: row.key.len(),
            });
        }
    }

    let width = key_width + table.spread_values.len();
    let mut fields = Vec::with_capacity(width);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(width);
    for (idx, &column) in table.row_key_columns.iter().enumerate() {
        let keys: Vec<&KeyValue> = table.rows.iter().map(|r| &r.key.values()[idx]).collect();
        fields.push(key_field(column));
        arrays.push(key_array(column, &keys));
    }

    for (col, spread_value) in table.spread_values.iter().enumerate() {
        fields.push(Field::new(spread_value.to_string(), DataType::Float64, true));
        arrays.push(Arc::new(Float64Array::from(
            table.rows.iter().map(|r| r.cells[col]).collect::<Vec<_>>(),
        )));
    }

    write_batch(path, fields, arrays)
}

fn key_field(column: Column) -> Field {
    let data_type = match column {
        Column::Date => DataType::Date32,
        _ => DataType::Utf8,
    };
    Field::new(column.name(), data_type, false)
}

fn key_array(column: Column, keys: &[&KeyValue]) -> ArrayRef {
    match column {
        Column::Date => Arc::new(Date32Array::from(
            keys.iter()
                .map(|kv| match kv {
                    KeyValue::Date(d) => days_since_epoch(*d),
                    // Key tuples are built from the same column list,
                    // so a non-date here cannot happen; epoch keeps the
                    // array dense rather than poisoning it with nulls.
                    _ => 0,
                })
                .collect::<Vec<i32>>(),
        )),
        _ => Arc::new(StringArray::from(
            keys.iter().map(|kv| kv.to_string()).collect::<Vec<_>>(),
        )),
    }
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    // NaiveDate::default() is the Unix epoch, 1970-01-01.
    date.signed_duration_since(NaiveDate::default()).num_days() as i32
}

fn write_batch(path: &Path, fields: Vec<Field>, arrays: Vec<ArrayRef>) -> Result<(), WriterError> {
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;

    let file = File::create(path)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    tracing::info!(path = %path.display(), rows = batch.num_rows(), "wrote parquet file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use core_types::{GroupKey, OrderedF64, Status};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use pivot::PivotRow;

    fn read_batches(path: &Path) -> Vec<RecordBatch> {
        let file = File::open(path).unwrap();
        ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn aggregates_round_trip_through_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aggregates.parquet");

        let results = vec![
            AggregateResult {
                key: GroupKey::new(vec![
                    KeyValue::Text("Temperature".to_string()),
                    KeyValue::Status(Status::Bad),
                ]),
                count: 1,
                mean: 5.0,
                stddev: None,
            },
            AggregateResult {
                key: GroupKey::new(vec![
                    KeyValue::Text("Temperature".to_string()),
                    KeyValue::Status(Status::Good),
                ]),
                count: 2,
                mean: 15.0,
                stddev: Some(7.0710678118654755),
            },
        ];

        write_aggregates(&path, &[Column::Parameter, Column::Status], &results).unwrap();

        let batches = read_batches(&path);
        assert_eq!(batches.len(), 1);
        let batch = batches.into_iter().next().unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(
            batch
                .schema()
                .fields()
                .iter()
                .map(|f| f.name().clone())
                .collect::<Vec<_>>(),
            vec!["Parameter", "Status", "count_rows", "avg_value", "stddev_value"]
        );

        // The undefined stddev must come back as a null, not a zero.
        let stddev = batch
            .column(4)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert!(stddev.is_null(0));
        assert!((stddev.value(1) - 7.0710678118654755).abs() < 1e-12);
    }

    #[test]
    fn pivot_round_trips_through_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pivot.parquet");

        let day1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let table = PivotTable {
            row_key_columns: vec![Column::Date, Column::Location],
            spread_column: Column::Parameter,
            value_column: Column::Value,
            spread_values: vec![
                KeyValue::Text("Noise".to_string()),
                KeyValue::Text("Temperature".to_string()),
            ],
            rows: vec![
                PivotRow {
                    key: GroupKey::new(vec![
                        KeyValue::Date(day1),
                        KeyValue::Text("Hungary".to_string()),
                    ]),
                    cells: vec![Some(40.0), Some(10.0)],
                },
                PivotRow {
                    key: GroupKey::new(vec![
                        KeyValue::Date(day2),
                        KeyValue::Text("Hungary".to_string()),
                    ]),
                    cells: vec![None, Some(20.0)],
                },
            ],
        };

        write_pivot(&path, &table).unwrap();

        let batches = read_batches(&path);
        let batch = batches.into_iter().next().unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(
            batch
                .schema()
                .fields()
                .iter()
                .map(|f| f.name().clone())
                .collect::<Vec<_>>(),
            vec!["Date", "Location", "Noise", "Temperature"]
        );

        let dates = batch
            .column(0)
            .as_any()
            .downcast_ref::<Date32Array>()
            .unwrap();
        assert_eq!(dates.value(0), days_since_epoch(day1));

        let noise = batch
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(noise.value(0), 40.0);
        assert!(noise.is_null(1));
    }

    #[test]
    fn mismatched_key_width_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.parquet");

        let results = vec![AggregateResult {
            key: GroupKey::new(vec![KeyValue::Number(OrderedF64(1.0))]),
            count: 1,
            mean: 1.0,
            stddev: None,
        }];
        let err =
            write_aggregates(&path, &[Column::Parameter, Column::Status], &results).unwrap_err();
        assert!(matches!(
            err,
            WriterError::KeyShapeMismatch { expected: 2, found: 1 }
        ));
    }
}
