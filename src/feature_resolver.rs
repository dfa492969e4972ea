//! Feature resolution for model inference.
//!
//! Turns either a selected dataset index or a set of manually entered values
//! into a single [`FeatureVector`] in the exact column order the models
//! expect.

use crate::dataset::{ColumnKind, Dataset};
use crate::error::ResolveError;
use crate::types::feature_vector::FeatureVector;
use crate::types::value::Value;

/// Manually entered feature values, one per feature in model order.
///
/// Starts from the schema defaults: column mean for numeric features, column
/// mode for categorical features and `vendor_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualInput {
    values: Vec<Value>,
}

impl ManualInput {
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Resolves user input against the loaded dataset
pub struct FeatureResolver<'a> {
    dataset: &'a Dataset,
}

impl<'a> FeatureResolver<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Inclusive bounds accepted by index mode
    pub fn index_bounds(&self) -> Option<(usize, usize)> {
        self.dataset.index_bounds()
    }

    /// Look up the dataset row with the given synthetic index.
    ///
    /// Indices outside [min, max] are out of range; indices inside the bounds
    /// whose row was dropped at load time have no matching row.
    pub fn resolve_index(&self, index: i64) -> Result<FeatureVector, ResolveError> {
        let (min, max) = self.index_bounds().ok_or(ResolveError::EmptyDataset)?;

        if index < min as i64 || index > max as i64 {
            return Err(ResolveError::OutOfRange { index, min, max });
        }

        let index = index as usize;
        let row = self
            .dataset
            .find(index)
            .ok_or(ResolveError::NoMatchingRow { index })?;

        Ok(FeatureVector::from_features(row.features.clone()))
    }

    /// Default manual entry values
    pub fn defaults(&self) -> ManualInput {
        ManualInput {
            values: self.dataset.schema().defaults(),
        }
    }

    /// Replace one manual value, parsing `raw` according to the column kind.
    ///
    /// Text columns take the raw text unchanged, blank included.
    pub fn set_manual(
        &self,
        input: &mut ManualInput,
        feature: &str,
        raw: &str,
    ) -> Result<(), ResolveError> {
        let schema = self.dataset.schema();
        let position = schema
            .position(feature)
            .ok_or_else(|| ResolveError::UnknownFeature(feature.to_string()))?;
        let kind = schema.columns()[position].kind;

        let invalid = || ResolveError::InvalidValue {
            feature: feature.to_string(),
            kind: kind.label(),
            value: raw.to_string(),
        };

        let value = match kind {
            ColumnKind::Integer => {
                let number = raw.trim().parse::<i64>().map_err(|_| invalid())?;
                Value::Number(number as f64)
            }
            ColumnKind::Numeric => {
                let number = raw.trim().parse::<f64>().map_err(|_| invalid())?;
                if !number.is_finite() {
                    return Err(invalid());
                }
                Value::Number(number)
            }
            ColumnKind::Categorical => Value::Text(raw.to_string()),
        };

        input.values[position] = value;
        Ok(())
    }

    /// Single-row vector from manual values
    pub fn resolve_manual(&self, input: &ManualInput) -> FeatureVector {
        FeatureVector::from_features(input.values.clone())
    }
}
