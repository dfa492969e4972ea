//! Single-row model input

use crate::dataset::FEATURE_COLUMNS;
use crate::error::PredictError;
use crate::types::value::Value;

/// One row of feature values, keyed by column name.
///
/// An empty vector is the "no valid input" value produced when an index
/// cannot be resolved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl FeatureVector {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Vector over the model feature columns, in model order
    pub fn from_features(values: Vec<Value>) -> Self {
        let columns = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
        Self::new(columns, values)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|pos| &self.values[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Numeric model input restricted to the feature columns, in model order.
    ///
    /// Refuses empty vectors, vectors missing a feature column, and values
    /// that do not read as numbers.
    pub fn to_model_input(&self) -> Result<Vec<f64>, PredictError> {
        if self.is_empty() {
            return Err(PredictError::EmptyInput);
        }

        let mut input = Vec::with_capacity(FEATURE_COLUMNS.len());
        for feature in FEATURE_COLUMNS {
            let value = self.get(feature).ok_or_else(|| PredictError::ColumnMismatch {
                expected: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
                found: self.columns.clone(),
            })?;
            let number = value
                .as_f64()
                .filter(|n| n.is_finite())
                .ok_or_else(|| PredictError::NonNumeric {
                    feature: feature.to_string(),
                    value: value.to_string(),
                })?;
            input.push(number);
        }

        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureVector {
        FeatureVector::from_features((0..15).map(|i| Value::Number(i as f64)).collect())
    }

    #[test]
    fn test_model_input_order() {
        let input = sample().to_model_input().unwrap();
        assert_eq!(input, (0..15).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_vector_refused() {
        assert_eq!(
            FeatureVector::empty().to_model_input(),
            Err(PredictError::EmptyInput)
        );
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let mut columns = vec!["index".to_string()];
        columns.extend(FEATURE_COLUMNS.iter().rev().map(|c| c.to_string()));
        let mut values = vec![Value::Number(100.0)];
        values.extend((0..15).rev().map(|i| Value::Number(i as f64)));

        let vector = FeatureVector::new(columns, values);
        let input = vector.to_model_input().unwrap();
        assert_eq!(input[0], 0.0);
        assert_eq!(input[14], 14.0);
    }

    #[test]
    fn test_missing_column_refused() {
        let vector = FeatureVector::new(vec!["vendor_id".to_string()], vec![Value::Number(1.0)]);
        assert!(matches!(
            vector.to_model_input(),
            Err(PredictError::ColumnMismatch { .. })
        ));
    }

    #[test]
    fn test_non_numeric_text_refused() {
        let mut values: Vec<Value> = (0..15).map(|i| Value::Number(i as f64)).collect();
        values[0] = Value::from("two");
        let err = FeatureVector::from_features(values).to_model_input().unwrap_err();
        assert_eq!(
            err,
            PredictError::NonNumeric {
                feature: "vendor_id".to_string(),
                value: "two".to_string()
            }
        );
    }

    #[test]
    fn test_numeric_text_accepted() {
        let mut values: Vec<Value> = (0..15).map(|i| Value::Number(i as f64)).collect();
        values[7] = Value::from(" 3 ");
        let input = FeatureVector::from_features(values).to_model_input().unwrap();
        assert_eq!(input[7], 3.0);
    }
}
