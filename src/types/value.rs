//! Cell values of the trip dataset

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single cell, either numeric or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Parse a raw cell, preferring a number when the text reads as one
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(number) => Value::Number(number),
            Err(_) => Value::Text(raw.to_string()),
        }
    }

    /// Numeric reading of the value. Text is accepted when it parses as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            Value::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }

    /// Total order used for mode tie-breaking: numbers before text,
    /// numbers ascending, text lexicographic.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Number(_), Value::Text(_)) => Ordering::Less,
            (Value::Text(_), Value::Number(_)) => Ordering::Greater,
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(number) if number.fract() == 0.0 && number.abs() < 1e15 => {
                write!(f, "{}", *number as i64)
            }
            Value::Number(number) => write!(f, "{}", number),
            Value::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Number(number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefers_numbers() {
        assert_eq!(Value::parse("2"), Value::Number(2.0));
        assert_eq!(Value::parse(" -73.98 "), Value::Number(-73.98));
        assert_eq!(Value::parse("short"), Value::Text("short".to_string()));
    }

    #[test]
    fn test_text_numeric_reading() {
        assert_eq!(Value::from("3").as_f64(), Some(3.0));
        assert_eq!(Value::from("three").as_f64(), None);
        assert_eq!(Value::from("").as_f64(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(2.0).to_string(), "2");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::from("N").to_string(), "N");
    }

    #[test]
    fn test_total_cmp() {
        assert_eq!(Value::Number(1.0).total_cmp(&Value::Number(2.0)), Ordering::Less);
        assert_eq!(Value::from("a").total_cmp(&Value::Number(9.0)), Ordering::Greater);
        assert_eq!(Value::from("a").total_cmp(&Value::from("b")), Ordering::Less);
    }
}
