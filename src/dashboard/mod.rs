//! Dashboard: startup wiring plus the interactive session

pub mod command;
pub mod render;
pub mod session;

pub use command::{FilterArgs, InputMode, SessionCommand, SessionLine};
pub use session::{Flow, Session};

use crate::config::{AppConfig, FilterConfig};
use crate::dataset::{Dataset, DatasetLoader};
use crate::error::PredictError;
use crate::feature_resolver::FeatureResolver;
use crate::filter::RowFilter;
use crate::models::InferenceEngine;
use crate::types::{FeatureVector, PredictionReport, Value};
use anyhow::Result;
use tracing::info;

/// Read-only state built once at startup: the dataset and the model store
#[derive(Debug)]
pub struct Dashboard {
    dataset: Dataset,
    engine: InferenceEngine,
    preview_rows: usize,
    filter_defaults: FilterConfig,
}

impl Dashboard {
    /// Load the dataset and every model. Any failure is fatal.
    pub fn start(config: &AppConfig) -> Result<Self> {
        let dataset = DatasetLoader::new(&config.data.csv_path).load()?;
        let engine = InferenceEngine::new(config)?;

        info!(
            rows = dataset.len(),
            models = engine.model_count(),
            "Dashboard ready"
        );

        Ok(Self::new(
            dataset,
            engine,
            config.data.preview_rows,
            config.filter.clone(),
        ))
    }

    pub fn new(
        dataset: Dataset,
        engine: InferenceEngine,
        preview_rows: usize,
        filter_defaults: FilterConfig,
    ) -> Self {
        Self {
            dataset,
            engine,
            preview_rows,
            filter_defaults,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    pub fn preview_rows(&self) -> usize {
        self.preview_rows
    }

    pub fn resolver(&self) -> FeatureResolver<'_> {
        FeatureResolver::new(&self.dataset)
    }

    /// Apply filter arguments on top of `base`, falling back to the
    /// configured ranges and the first vendor in the dataset.
    ///
    /// Returns `None` when no vendor is given and the dataset has none.
    pub fn build_filter(&self, base: Option<&RowFilter>, args: &FilterArgs) -> Option<RowFilter> {
        let vendor = match &args.vendor {
            Some(raw) => Value::parse(raw),
            None => match base {
                Some(filter) => filter.vendor.clone(),
                None => self.dataset.vendors().into_iter().next()?,
            },
        };

        let passenger_range = args
            .passengers
            .or(base.map(|f| f.passenger_range))
            .unwrap_or(self.filter_defaults.passenger_range);
        let hour_range = args
            .hours
            .or(base.map(|f| f.hour_range))
            .unwrap_or(self.filter_defaults.hour_range);

        Some(RowFilter::new(vendor, passenger_range, hour_range))
    }

    /// Distinct vendors offered by the filter
    pub fn vendor_choices(&self) -> Vec<Value> {
        self.dataset.vendors()
    }

    /// Run every model on the vector
    pub fn predict(&self, vector: &FeatureVector) -> Result<PredictionReport, PredictError> {
        self.engine.predict(vector)
    }
}
