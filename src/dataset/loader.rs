//! CSV loader for the trip dataset

use super::schema::{self, ColumnKind, FeatureSchema, FEATURE_COLUMNS, TARGET_COLUMN};
use super::{Dataset, Row};
use crate::types::value::Value;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Cell spellings read as missing, the same set pandas treats as NA
const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty()
        || MISSING_MARKERS.contains(&cell)
        || cell.parse::<f64>().map_or(false, f64::is_nan)
}

/// Loader for the trip CSV
pub struct DatasetLoader {
    path: PathBuf,
}

impl DatasetLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read the configured file into a [`Dataset`].
    ///
    /// Every row gets its zero-based file position as index, rows with any
    /// missing cell are dropped, and columns are reduced to
    /// index, features, target.
    pub fn load(&self) -> Result<Dataset> {
        info!(path = %self.path.display(), "Loading dataset");

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open dataset {}", self.path.display()))?;
        let dataset = Self::from_reader(file)
            .with_context(|| format!("Failed to load dataset {}", self.path.display()))?;

        info!(
            rows = dataset.len(),
            dropped = dataset.dropped_rows(),
            "Dataset loaded"
        );

        Ok(dataset)
    }

    /// Parse CSV text from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Dataset> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        let headers = csv.headers().context("Failed to read CSV header")?.clone();

        let column_of = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .with_context(|| format!("Dataset is missing required column '{}'", name))
        };
        let feature_positions = FEATURE_COLUMNS
            .iter()
            .map(|name| column_of(name))
            .collect::<Result<Vec<usize>>>()?;
        let target_position = column_of(TARGET_COLUMN)?;

        // (index, feature cells, target cell) for every complete row
        let mut kept: Vec<(usize, Vec<String>, String)> = Vec::new();
        let mut dropped = 0;

        for (index, record) in csv.records().enumerate() {
            let record = record.with_context(|| format!("Malformed CSV record at row {}", index))?;

            if record.len() > headers.len() {
                bail!(
                    "Malformed CSV record at row {}: expected {} fields, found {}",
                    index,
                    headers.len(),
                    record.len()
                );
            }

            // Short records are padded with missing cells, so they drop too.
            if record.len() < headers.len() || record.iter().any(is_missing) {
                debug!(index, "Dropping row with missing values");
                dropped += 1;
                continue;
            }

            let features = feature_positions
                .iter()
                .map(|&pos| record[pos].to_string())
                .collect();
            kept.push((index, features, record[target_position].to_string()));
        }

        let kinds: Vec<ColumnKind> = FEATURE_COLUMNS
            .iter()
            .enumerate()
            .map(|(col, name)| {
                let cells: Vec<&str> = kept.iter().map(|(_, f, _)| f[col].as_str()).collect();
                schema::infer_kind(name, &cells)
            })
            .collect();

        let rows: Vec<Row> = kept
            .into_iter()
            .map(|(index, features, target)| Row {
                index,
                features: features
                    .iter()
                    .zip(&kinds)
                    .map(|(cell, kind)| typed_cell(cell, *kind))
                    .collect(),
                target: Value::parse(&target),
            })
            .collect();

        let columns: Vec<Vec<Value>> = (0..FEATURE_COLUMNS.len())
            .map(|col| rows.iter().map(|row| row.features[col].clone()).collect())
            .collect();
        let schema = FeatureSchema::resolve(&kinds, &columns);

        Ok(Dataset::new(rows, schema, dropped))
    }
}

fn typed_cell(cell: &str, kind: ColumnKind) -> Value {
    match kind {
        ColumnKind::Integer | ColumnKind::Numeric => Value::parse(cell),
        ColumnKind::Categorical => Value::Text(cell.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures;
    use std::collections::HashSet;
    use std::io::Write;

    #[test]
    fn test_index_is_file_position() {
        let dataset = fixtures::three_trips();
        let indices: Vec<usize> = dataset.rows().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_drops_rows_with_missing_values() {
        let dataset = fixtures::with_gap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.dropped_rows(), 1);

        let indices: Vec<usize> = dataset.rows().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 2, 3]);

        let unique: HashSet<usize> = indices.iter().copied().collect();
        assert_eq!(unique.len(), indices.len());
    }

    #[test]
    fn test_no_missing_values_survive() {
        let text = fixtures::csv(&[
            fixtures::trip("1", "1", "8", 1.0, "600"),
            fixtures::trip("NA", "1", "8", 1.0, "600"),
            fixtures::trip("1", "1", "nan", 1.0, "600"),
            fixtures::trip("1", "1", "8", 1.0, ""),
            fixtures::trip("1", "1", "-nan", 1.0, "600"),
            fixtures::trip("1", "#NA", "8", 1.0, "600"),
            fixtures::trip("1", "#N/A N/A", "8", 1.0, "600"),
            fixtures::trip("1", "1", "-1.#IND", 1.0, "600"),
            fixtures::trip("1", "1", "1.#QNAN", 1.0, "600"),
            fixtures::trip("1", "2", "10", 1.0, "NaN"),
        ]);
        let dataset = DatasetLoader::from_reader(text.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.dropped_rows(), 9);
        for row in dataset.rows() {
            assert!(row
                .features
                .iter()
                .all(|v| v.as_f64().map_or(false, f64::is_finite)));
        }

        let schema = dataset.schema();
        assert_eq!(schema.get("passenger_count").unwrap().kind, ColumnKind::Numeric);
        assert_eq!(schema.get("pickup_hour").unwrap().default, Value::Number(8.0));
    }

    #[test]
    fn test_cells_parsing_to_nan_are_missing() {
        assert!(is_missing(" -nan "));
        assert!(is_missing("NAN"));
        assert!(is_missing("#NA"));
        assert!(!is_missing("0"));
        assert!(!is_missing("inf"));
    }

    #[test]
    fn test_missing_value_in_extra_column_drops_row() {
        let mut text = format!("id,{}\n", fixtures::header());
        text.push_str(&format!("a1,{}\n", fixtures::trip("1", "1", "8", 1.0, "600")));
        text.push_str(&format!(",{}\n", fixtures::trip("2", "1", "8", 1.0, "600")));

        let dataset = DatasetLoader::from_reader(text.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.rows()[0].index, 0);
    }

    #[test]
    fn test_extra_columns_are_reordered_away() {
        let mut header: Vec<&str> = FEATURE_COLUMNS.iter().rev().copied().collect();
        header.insert(0, TARGET_COLUMN);
        header.push("pickup_datetime");
        let values: Vec<String> = (0..15).rev().map(|i| i.to_string()).collect();
        let text = format!(
            "{}\n99,{},2016-03-14 17:24:55\n",
            header.join(","),
            values.join(",")
        );

        let dataset = DatasetLoader::from_reader(text.as_bytes()).unwrap();
        let row = &dataset.rows()[0];
        let expected: Vec<Value> = (0..15).map(|i| Value::Number(i as f64)).collect();
        assert_eq!(row.features, expected);
        assert_eq!(row.target, Value::Number(99.0));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let text = "vendor_id,passenger_count\n1,2\n";
        let err = DatasetLoader::from_reader(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("pickup_longitude"));
    }

    #[test]
    fn test_short_record_is_dropped() {
        let mut text = fixtures::csv(&[
            fixtures::trip("1", "1", "8", 1.0, "600"),
            fixtures::trip("2", "2", "12", 2.0, "900"),
        ]);
        text.push_str("1,2,-73.9\n");

        let dataset = DatasetLoader::from_reader(text.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dropped_rows(), 1);
        assert_eq!(dataset.index_bounds(), Some((0, 1)));
    }

    #[test]
    fn test_long_record_is_fatal() {
        let line = format!("{},extra", fixtures::trip("1", "1", "8", 1.0, "600"));
        let text = fixtures::csv(&[line]);
        let err = DatasetLoader::from_reader(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("expected 16 fields, found 17"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        assert!(DatasetLoader::new("no/such/trips.csv").load().is_err());
    }

    #[test]
    fn test_load_is_repeatable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", fixtures::csv(&[fixtures::trip("1", "1", "8", 1.0, "600")])).unwrap();

        let loader = DatasetLoader::new(file.path());
        let first = loader.load().unwrap();
        let second = loader.load().unwrap();
        assert_eq!(first.rows(), second.rows());
        assert_eq!(first.schema(), second.schema());
    }

    #[test]
    fn test_text_feature_becomes_categorical() {
        let text = fixtures::csv(&[
            fixtures::trip("1", "1", "8", 1.0, "600"),
            fixtures::trip("1", "1", "8", 1.0, "600").replacen(",1,8,", ",long,8,", 1),
        ]);
        let dataset = DatasetLoader::from_reader(text.as_bytes()).unwrap();
        let spec = dataset.schema().get("trip_category_encoded").unwrap();
        assert_eq!(spec.kind, ColumnKind::Categorical);
        assert_eq!(dataset.rows()[0].features[7], Value::Text("1".to_string()));
    }
}
