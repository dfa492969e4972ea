//! Trip dataset: loading, schema, and read-only access

pub mod loader;
pub mod schema;

pub use loader::DatasetLoader;
pub use schema::{ColumnKind, ColumnSpec, FeatureSchema, FEATURE_COLUMNS};

use crate::types::value::Value;
use schema::{INDEX_COLUMN, TARGET_COLUMN, VENDOR_COLUMN};

/// One kept row: synthetic index, features in model order, target
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Zero-based position of the row in the source file
    pub index: usize,
    pub features: Vec<Value>,
    pub target: Value,
}

/// Loaded trip table. Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<Row>,
    schema: FeatureSchema,
    dropped: usize,
}

impl Dataset {
    pub(crate) fn new(rows: Vec<Row>, schema: FeatureSchema, dropped: usize) -> Self {
        Self {
            rows,
            schema,
            dropped,
        }
    }

    /// Column names in display order: index, features, target
    pub fn column_names(&self) -> Vec<&str> {
        std::iter::once(INDEX_COLUMN)
            .chain(self.schema.names())
            .chain(std::iter::once(TARGET_COLUMN))
            .collect()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Number of source rows discarded for missing values
    pub fn dropped_rows(&self) -> usize {
        self.dropped
    }

    /// Smallest and largest index still present
    pub fn index_bounds(&self) -> Option<(usize, usize)> {
        // Rows stay in file order, so the index column is ascending.
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => Some((first.index, last.index)),
            _ => None,
        }
    }

    /// Row whose synthetic index equals `index`
    pub fn find(&self, index: usize) -> Option<&Row> {
        self.rows
            .binary_search_by_key(&index, |row| row.index)
            .ok()
            .map(|pos| &self.rows[pos])
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Value of a named feature in `row`
    pub fn feature<'a>(&self, row: &'a Row, name: &str) -> Option<&'a Value> {
        self.schema
            .position(name)
            .and_then(|pos| row.features.get(pos))
    }

    /// Distinct vendor ids in order of first appearance
    pub fn vendors(&self) -> Vec<Value> {
        let mut vendors: Vec<Value> = Vec::new();
        for row in &self.rows {
            if let Some(vendor) = self.feature(row, VENDOR_COLUMN) {
                if !vendors.contains(vendor) {
                    vendors.push(vendor.clone());
                }
            }
        }
        vendors
    }

    /// Smallest and largest numeric value of a feature
    pub fn numeric_range(&self, name: &str) -> Option<(f64, f64)> {
        self.rows
            .iter()
            .filter_map(|row| self.feature(row, name).and_then(Value::as_f64))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order() {
        let dataset = fixtures::three_trips();
        let names = dataset.column_names();
        assert_eq!(names.len(), 17);
        assert_eq!(names[0], INDEX_COLUMN);
        assert_eq!(&names[1..16], &FEATURE_COLUMNS[..]);
        assert_eq!(names[16], TARGET_COLUMN);
    }

    #[test]
    fn test_find_and_bounds() {
        let dataset = fixtures::with_gap();
        assert_eq!(dataset.index_bounds(), Some((0, 3)));
        assert!(dataset.find(1).is_none());
        assert_eq!(dataset.find(3).map(|r| r.index), Some(3));
    }

    #[test]
    fn test_vendors_first_appearance() {
        let dataset = fixtures::three_trips();
        assert_eq!(
            dataset.vendors(),
            vec![Value::Number(1.0), Value::Number(2.0)]
        );
    }

    #[test]
    fn test_numeric_range() {
        let dataset = fixtures::three_trips();
        assert_eq!(dataset.numeric_range("passenger_count"), Some((1.0, 3.0)));
        assert_eq!(dataset.numeric_range("unknown"), None);
    }

    #[test]
    fn test_head() {
        let dataset = fixtures::three_trips();
        assert_eq!(dataset.head(2).len(), 2);
        assert_eq!(dataset.head(10).len(), 3);
    }
}
