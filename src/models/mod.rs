//! Trip duration models: artifact format, loading, and inference

pub mod inference;
pub mod loader;
pub mod predictor;

pub use inference::InferenceEngine;
pub use loader::{LoadedModel, ModelLoader};
pub use predictor::{Model, ModelError, Predictor};
