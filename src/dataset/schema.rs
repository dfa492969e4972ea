//! Column layout of the trip dataset and per-feature input descriptors.

use crate::types::value::Value;
use std::collections::HashMap;

/// Synthetic row index column, always first
pub const INDEX_COLUMN: &str = "index";

/// Regression target, always last
pub const TARGET_COLUMN: &str = "trip_duration";

/// Vendor column; always treated as integer-valued
pub const VENDOR_COLUMN: &str = "vendor_id";

pub const PASSENGER_COLUMN: &str = "passenger_count";

pub const PICKUP_HOUR_COLUMN: &str = "pickup_hour";

/// Feature columns in the exact order every model expects.
pub const FEATURE_COLUMNS: [&str; 15] = [
    "vendor_id",
    "passenger_count",
    "pickup_longitude",
    "pickup_latitude",
    "dropoff_longitude",
    "dropoff_latitude",
    "trip_distance",
    "trip_category_encoded",
    "pickup_hour",
    "pickup_day",
    "pickup_month",
    "pickup_weekday",
    "trip_duration_hours",
    "speed",
    "hourly_avg_duration",
];

/// How a feature is entered and how its default is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Whole numbers; default is the column mode
    Integer,
    /// Real numbers; default is the column mean
    Numeric,
    /// Free text; default is the column mode
    Categorical,
}

impl ColumnKind {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "text",
        }
    }
}

/// Descriptor of one feature column, resolved once when the dataset loads
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    pub default: Value,
}

/// Ordered feature descriptors
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    columns: Vec<ColumnSpec>,
}

impl FeatureSchema {
    /// Build descriptors from the kept column values.
    ///
    /// `values[i]` holds every kept cell of `FEATURE_COLUMNS[i]`, already
    /// typed according to `kinds[i]`.
    pub(crate) fn resolve(kinds: &[ColumnKind], values: &[Vec<Value>]) -> Self {
        let columns = FEATURE_COLUMNS
            .iter()
            .zip(kinds)
            .zip(values)
            .map(|((name, kind), cells)| ColumnSpec {
                name: name.to_string(),
                kind: *kind,
                default: default_for(*kind, cells),
            })
            .collect();

        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a feature in model order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Default values in model order
    pub fn defaults(&self) -> Vec<Value> {
        self.columns.iter().map(|c| c.default.clone()).collect()
    }
}

/// Kind of a feature column given its raw kept cells.
pub(crate) fn infer_kind(name: &str, raw_cells: &[&str]) -> ColumnKind {
    if name == VENDOR_COLUMN {
        return ColumnKind::Integer;
    }
    if raw_cells.iter().all(|cell| cell.trim().parse::<f64>().is_ok()) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

fn default_for(kind: ColumnKind, cells: &[Value]) -> Value {
    match kind {
        ColumnKind::Numeric => mean(cells).map(Value::Number).unwrap_or(Value::Number(0.0)),
        ColumnKind::Integer => match mode(cells) {
            Some(Value::Number(n)) => Value::Number(n.trunc()),
            Some(other) => other,
            None => Value::Number(0.0),
        },
        ColumnKind::Categorical => mode(cells).unwrap_or_else(|| Value::Text(String::new())),
    }
}

/// Arithmetic mean of the numeric cells
pub fn mean(cells: &[Value]) -> Option<f64> {
    let numbers: Vec<f64> = cells.iter().filter_map(Value::as_f64).collect();
    if numbers.is_empty() {
        return None;
    }
    Some(numbers.iter().sum::<f64>() / numbers.len() as f64)
}

/// Most frequent cell; ties resolve to the smallest value.
pub fn mode(cells: &[Value]) -> Option<Value> {
    let mut counts: HashMap<String, (usize, &Value)> = HashMap::new();
    for cell in cells {
        let key = match cell {
            Value::Number(n) => format!("n:{}", n.to_bits()),
            Value::Text(t) => format!("t:{}", t),
        };
        counts.entry(key).or_insert((0, cell)).0 += 1;
    }

    counts
        .into_values()
        .max_by(|(count_a, a), (count_b, b)| count_a.cmp(count_b).then_with(|| b.total_cmp(a)))
        .map(|(_, value)| value.clone())
}
