use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Quality flag attached to every reading by the upstream source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Good,
    Bad,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Good => "Good",
            Status::Bad => "Bad",
        }
    }
}

// Status participates in group keys, which sort lexicographically by the
// raw column value. Comparing the string form keeps "Bad" < "Good".
impl Ord for Status {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Status {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Good" => Ok(Status::Good),
            "Bad" => Ok(Status::Bad),
            other => Err(CoreError::InvalidInput(
                "status".to_string(),
                other.to_string(),
            )),
        }
    }
}

/// Selects one column of a `Record` for grouping, ordering or metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Id,
    Date,
    Location,
    Parameter,
    Value,
    Status,
}

impl Column {
    /// The column's name as it appears in source files and result tables.
    pub fn name(&self) -> &'static str {
        match self {
            Column::Id => "Sensor_ID",
            Column::Date => "Date",
            Column::Location => "Location",
            Column::Parameter => "Parameter",
            Column::Value => "Value",
            Column::Status => "Status",
        }
    }

    /// Whether the column holds a floating-point measurement.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Value)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
