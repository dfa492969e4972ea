//! Display filter over the dataset.
//!
//! Narrows what is shown; never feeds the resolver or the models.

use crate::dataset::schema::{PASSENGER_COLUMN, PICKUP_HOUR_COLUMN, VENDOR_COLUMN};
use crate::dataset::{Dataset, Row};
use crate::types::value::Value;

/// Vendor, passenger count and pickup hour predicates, combined with AND
#[derive(Debug, Clone, PartialEq)]
pub struct RowFilter {
    /// Exact vendor match
    pub vendor: Value,
    /// Inclusive passenger count range
    pub passenger_range: (i64, i64),
    /// Inclusive pickup hour range
    pub hour_range: (i64, i64),
}

impl RowFilter {
    pub fn new(vendor: Value, passenger_range: (i64, i64), hour_range: (i64, i64)) -> Self {
        Self {
            vendor,
            passenger_range,
            hour_range,
        }
    }

    /// Whether a row satisfies all three predicates
    pub fn matches(&self, dataset: &Dataset, row: &Row) -> bool {
        let vendor_matches = dataset
            .feature(row, VENDOR_COLUMN)
            .is_some_and(|vendor| vendor_eq(vendor, &self.vendor));

        vendor_matches
            && within(dataset.feature(row, PASSENGER_COLUMN), self.passenger_range)
            && within(dataset.feature(row, PICKUP_HOUR_COLUMN), self.hour_range)
    }

    /// Matching rows in dataset order
    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Vec<&'a Row> {
        dataset
            .rows()
            .iter()
            .filter(|row| self.matches(dataset, row))
            .collect()
    }
}

fn vendor_eq(cell: &Value, wanted: &Value) -> bool {
    match (cell.as_f64(), wanted.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => cell == wanted,
    }
}

fn within(cell: Option<&Value>, (lo, hi): (i64, i64)) -> bool {
    cell.and_then(Value::as_f64)
        .is_some_and(|v| v >= lo as f64 && v <= hi as f64)
}

/// Parse an inclusive range written as `A..B`, `A..=B`, `A-B` or a single `A`
pub fn parse_range(text: &str) -> Result<(i64, i64), String> {
    let text = text.trim();
    let (lo, hi) = if let Some((lo, hi)) = text.split_once("..=") {
        (lo, hi)
    } else if let Some((lo, hi)) = text.split_once("..") {
        (lo, hi)
    } else if let Some((lo, hi)) = text.get(1..).and_then(|rest| rest.split_once('-')) {
        // Skip the first character so a leading minus sign is not a separator.
        (&text[..lo.len() + 1], hi)
    } else {
        (text, text)
    };

    let parse = |s: &str| {
        s.trim()
            .parse::<i64>()
            .map_err(|_| format!("'{}' is not a whole number", s.trim()))
    };
    let (lo, hi) = (parse(lo)?, parse(hi)?);

    if lo > hi {
        return Err(format!("range start {} is greater than end {}", lo, hi));
    }
    Ok((lo, hi))
}
