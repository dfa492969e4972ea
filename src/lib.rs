//! Trip Duration Dashboard Library
//!
//! Loads pre-trained trip duration models and the NYC taxi trip dataset,
//! resolves a feature row from a dataset index or manual entry, and runs
//! every model on it.

pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod feature_resolver;
pub mod filter;
pub mod logging;
pub mod models;
pub mod types;

pub use config::AppConfig;
pub use dashboard::{Dashboard, Session};
pub use dataset::{Dataset, DatasetLoader};
pub use error::{PredictError, ResolveError};
pub use feature_resolver::FeatureResolver;
pub use filter::RowFilter;
pub use models::inference::InferenceEngine;
pub use types::{FeatureVector, PredictionReport};
