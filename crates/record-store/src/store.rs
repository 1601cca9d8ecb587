use core_types::{DomainPolicy, ParameterDomain, Record, Status};
use chrono::NaiveDate;

use crate::error::StoreError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One source row before type coercion. Fields are `None` when the
/// corresponding column was absent from the source.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    pub id: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub parameter: Option<String>,
    pub value: Option<String>,
    pub status: Option<String>,
}

/// An immutable, ordered, in-memory collection of typed records.
///
/// Insertion order is the default order; grouping and windowing impose
/// their own orders and never rely on it unless stated.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Ingests a sequence of raw rows, coercing every field to its
    /// semantic type and validating parameters against `domain`.
    ///
    /// Fails with a `StoreError` on the first schema violation; no
    /// partially-loaded store is ever returned.
    pub fn load<I>(
        rows: I,
        domain: &ParameterDomain,
        policy: DomainPolicy,
    ) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut records = Vec::new();
        for (row, raw) in rows.into_iter().enumerate() {
            records.push(coerce_row(row, raw, domain, policy)?);
        }
        tracing::info!(rows = records.len(), "record store loaded");
        Ok(RecordStore { records })
    }

    /// Wraps already-typed records, applying the same domain validation
    /// as `load`.
    pub fn from_records(
        records: Vec<Record>,
        domain: &ParameterDomain,
        policy: DomainPolicy,
    ) -> Result<Self, StoreError> {
        for (row, record) in records.iter().enumerate() {
            validate_domain(row, record, domain, policy)?;
        }
        Ok(RecordStore { records })
    }

    /// A lazy, restartable iterator over records in insertion order.
    pub fn scan(&self) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn coerce_row(
    row: usize,
    raw: RawRecord,
    domain: &ParameterDomain,
    policy: DomainPolicy,
) -> Result<Record, StoreError> {
    let id = require(raw.id, "Sensor_ID", row)?;
    let date_text = require(raw.date, "Date", row)?;
    let location = require(raw.location, "Location", row)?;
    let parameter = require(raw.parameter, "Parameter", row)?;
    let value_text = require(raw.value, "Value", row)?;
    let status_text = require(raw.status, "Status", row)?;

    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        StoreError::InvalidValue {
            column: "Date",
            value: date_text.clone(),
            row,
        }
    })?;

    let value: f64 = value_text.parse().map_err(|_| StoreError::InvalidValue {
        column: "Value",
        value: value_text.clone(),
        row,
    })?;

    let status: Status = status_text.parse().map_err(|_| StoreError::InvalidValue {
        column: "Status",
        value: status_text.clone(),
        row,
    })?;

    let record = Record {
        id,
        date,
        location,
        parameter,
        value,
        status,
    };
    validate_domain(row, &record, domain, policy)?;
    Ok(record)
}

fn require(field: Option<String>, column: &'static str, row: usize) -> Result<String, StoreError> {
    field.ok_or(StoreError::MissingField { column, row })
}

fn validate_domain(
    row: usize,
    record: &Record,
    domain: &ParameterDomain,
    policy: DomainPolicy,
) -> Result<(), StoreError> {
    if !domain.contains(&record.parameter) {
        match policy {
            DomainPolicy::Strict => {
                return Err(StoreError::UnknownParameter {
                    parameter: record.parameter.clone(),
                    row,
                });
            }
            DomainPolicy::Permissive => return Ok(()),
        }
    }

    // Bad readings are expected to stray outside the nominal range; a
    // Good reading out of range is worth flagging, but never fatal.
    if record.status == Status::Good {
        if let Some(range) = domain.range(&record.parameter) {
            if !range.contains(record.value) {
                tracing::warn!(
                    row,
                    parameter = %record.parameter,
                    value = record.value,
                    "good-status reading outside nominal range"
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ParameterRange;

    fn test_domain() -> ParameterDomain {
        ParameterDomain::new()
            .with_parameter("Temperature", Some(ParameterRange { min: -20.0, max: 120.0 }))
            .with_parameter("Noise", Some(ParameterRange { min: 0.0, max: 150.0 }))
    }

    fn raw(parameter: &str, value: &str) -> RawRecord {
        RawRecord {
            id: Some("sensor1".to_string()),
            date: Some("2025-01-15".to_string()),
            location: Some("Hungary".to_string()),
            parameter: Some(parameter.to_string()),
            value: Some(value.to_string()),
            status: Some("Good".to_string()),
        }
    }

    #[test]
    fn load_coerces_typed_fields() {
        let store = RecordStore::load(
            vec![raw("Temperature", "21.5")],
            &test_domain(),
            DomainPolicy::Strict,
        )
        .unwrap();

        assert_eq!(store.len(), 1);
        let record = &store.records()[0];
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(record.value, 21.5);
        assert_eq!(record.status, Status::Good);
    }

    #[test]
    fn missing_column_is_fatal() {
        let mut row = raw("Temperature", "21.5");
        row.location = None;
        let err = RecordStore::load(vec![row], &test_domain(), DomainPolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            StoreError::MissingField { column: "Location", row: 0 }
        ));
    }

    #[test]
    fn unparseable_date_is_fatal() {
        let mut row = raw("Temperature", "21.5");
        row.date = Some("15/01/2025".to_string());
        let err = RecordStore::load(vec![row], &test_domain(), DomainPolicy::Strict).unwrap_err();
        assert!(matches!(err, StoreError::InvalidValue { column: "Date", .. }));
    }

    #[test]
    fn non_numeric_value_is_fatal() {
        let err = RecordStore::load(
            vec![raw("Temperature", "warm")],
            &test_domain(),
            DomainPolicy::Strict,
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidValue { column: "Value", .. }));
    }

    #[test]
    fn unknown_status_is_fatal() {
        let mut row = raw("Temperature", "21.5");
        row.status = Some("Unknown".to_string());
        let err = RecordStore::load(vec![row], &test_domain(), DomainPolicy::Strict).unwrap_err();
        assert!(matches!(err, StoreError::InvalidValue { column: "Status", .. }));
    }

    #[test]
    fn strict_policy_rejects_unknown_parameters() {
        let err = RecordStore::load(
            vec![raw("Pressure", "1.0")],
            &test_domain(),
            DomainPolicy::Strict,
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::UnknownParameter { .. }));
    }

    #[test]
    fn permissive_policy_accepts_unknown_parameters() {
        let store = RecordStore::load(
            vec![raw("Pressure", "1.0")],
            &test_domain(),
            DomainPolicy::Permissive,
        )
        .unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn scan_preserves_insertion_order_and_restarts() {
        let rows = vec![raw("Temperature", "1.0"), raw("Noise", "2.0")];
        let store = RecordStore::load(rows, &test_domain(), DomainPolicy::Strict).unwrap();

        let first: Vec<_> = store.scan().map(|r| r.parameter.clone()).collect();
        let second: Vec<_> = store.scan().map(|r| r.parameter.clone()).collect();
        assert_eq!(first, vec!["Temperature", "Noise"]);
        assert_eq!(first, second);
    }
}
