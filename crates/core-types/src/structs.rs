use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::{Column, Status};
use crate::keys::{KeyValue, OrderedF64};

/// A single sensor/weather observation.
///
/// Records are immutable once ingested: every engine in the workspace
/// treats them as read-only input and produces freshly allocated output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque source identifier; not required to be unique across a store.
    pub id: String,
    /// Calendar date of the observation (no time-of-day component).
    pub date: NaiveDate,
    pub location: String,
    /// Drawn from the closed parameter domain configured for the dataset.
    pub parameter: String,
    pub value: f64,
    pub status: Status,
}

impl Record {
    /// Extracts the given column as a typed grouping/ordering key.
    pub fn key(&self, column: Column) -> KeyValue {
        match column {
            Column::Id => KeyValue::Text(self.id.clone()),
            Column::Date => KeyValue::Date(self.date),
            Column::Location => KeyValue::Text(self.location.clone()),
            Column::Parameter => KeyValue::Text(self.parameter.clone()),
            Column::Value => KeyValue::Number(OrderedF64(self.value)),
            Column::Status => KeyValue::Status(self.status),
        }
    }

    /// Extracts the given column as a metric, if it is numeric.
    pub fn numeric(&self, column: Column) -> Option<f64> {
        match column {
            Column::Value => Some(self.value),
            _ => None,
        }
    }
}
