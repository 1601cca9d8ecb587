use core_types::{Column, GroupKey, KeyValue};
use serde::Serialize;

/// One output row: a row-key tuple plus one optional cell per
/// discovered spread value (same order as `PivotTable::spread_values`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    pub key: GroupKey,
    pub cells: Vec<Option<f64>>,
}

/// The reshaped table: a fixed set of row-key columns plus one dynamic
/// column per distinct spread value observed in the input.
///
/// `spread_values` is sorted ascending and `rows` are sorted
/// lexicographically by key, so equal inputs produce byte-identical
/// tables regardless of scan order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotTable {
    pub row_key_columns: Vec<Column>,
    pub spread_column: Column,
    pub value_column: Column,
    pub spread_values: Vec<KeyValue>,
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    /// Header names: the row-key columns followed by the dynamic
    /// columns in their discovered (lexicographic) order.
    pub fn column_names(&self) -> Vec<String> {
        self.row_key_columns
            .iter()
            .map(|c| c.name().to_string())
            .chain(self.spread_values.iter().map(|v| v.to_string()))
            .collect()
    }

    /// Index of a spread value's column, if it was discovered.
    pub fn spread_index(&self, value: &KeyValue) -> Option<usize> {
        self.spread_values.binary_search(value).ok()
    }

    /// The cell at (row index, spread value); `None` either when the
    /// cell is null or when the coordinates do not exist.
    pub fn cell(&self, row: usize, value: &KeyValue) -> Option<f64> {
        let col = self.spread_index(value)?;
        self.rows.get(row)?.cells.get(col).copied().flatten()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_spread_columns(&self) -> usize {
        self.spread_values.len()
    }
}
