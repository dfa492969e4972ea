//! User-facing error categories.
//!
//! Startup failures go through `anyhow`; the errors here are the recoverable
//! ones a user can correct from the dashboard.

use crate::models::predictor::ModelError;
use thiserror::Error;

/// Failure to turn user input into a feature vector
#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error("Index {index} is outside the dataset range [{min}, {max}]")]
    OutOfRange { index: i64, min: usize, max: usize },

    #[error("Invalid index selected. Please choose a valid index.")]
    NoMatchingRow { index: usize },

    #[error("The dataset has no rows")]
    EmptyDataset,

    #[error("Unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("'{value}' is not a valid {kind} value for {feature}")]
    InvalidValue {
        feature: String,
        kind: &'static str,
        value: String,
    },
}

/// Refusal to run the models on a trigger
#[derive(Debug, Error, PartialEq)]
pub enum PredictError {
    #[error("Please enter valid input data.")]
    EmptyInput,

    #[error("Feature columns do not match the model schema (expected {expected:?}, got {found:?})")]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Feature {feature} has non-numeric value '{value}'")]
    NonNumeric { feature: String, value: String },

    #[error("Model {model} failed: {source}")]
    Model {
        model: String,
        #[source]
        source: ModelError,
    },
}
