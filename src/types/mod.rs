//! Type definitions shared across the dashboard

pub mod feature_vector;
pub mod prediction;
pub mod value;

pub use feature_vector::FeatureVector;
pub use prediction::{ModelPrediction, PredictionReport};
pub use value::Value;
