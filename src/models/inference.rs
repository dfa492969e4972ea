//! Multi-model inference engine

use crate::config::AppConfig;
use crate::error::PredictError;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::feature_vector::FeatureVector;
use crate::types::prediction::{ModelPrediction, PredictionReport};
use anyhow::Result;
use tracing::{debug, info, warn};

/// Runs every loaded model over a resolved feature vector
#[derive(Debug)]
pub struct InferenceEngine {
    /// Loaded models in display order
    models: Vec<LoadedModel>,
}

impl InferenceEngine {
    /// Load every configured model
    pub fn new(config: &AppConfig) -> Result<Self> {
        let models = ModelLoader::new().load_all(&config.model_paths())?;
        Ok(Self::with_models(models))
    }

    /// Create inference engine from already loaded models
    pub fn with_models(models: Vec<LoadedModel>) -> Self {
        info!(
            count = models.len(),
            models = ?models.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            "Inference engine initialized"
        );
        Self { models }
    }

    /// Get the number of loaded models
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Get loaded model names
    pub fn model_names(&self) -> Vec<String> {
        self.models.iter().map(|m| m.name.clone()).collect()
    }

    pub fn models(&self) -> &[LoadedModel] {
        &self.models
    }

    /// Run every model on the vector.
    ///
    /// The vector is validated before any model runs; an empty or malformed
    /// vector invokes nothing. A model failure discards all results.
    pub fn predict(&self, vector: &FeatureVector) -> Result<PredictionReport, PredictError> {
        let input = match vector.to_model_input() {
            Ok(input) => input,
            Err(e) => {
                warn!(error = %e, "Prediction refused");
                return Err(e);
            }
        };

        let mut predictions = Vec::with_capacity(self.models.len());
        for model in &self.models {
            let value = model
                .predictor
                .predict(&input)
                .map_err(|source| PredictError::Model {
                    model: model.name.clone(),
                    source,
                })?;
            debug!(model = %model.name, value, "Model prediction");
            predictions.push(ModelPrediction {
                model: model.name.clone(),
                value,
            });
        }

        let report = PredictionReport::new(predictions);
        info!(
            models = report.len(),
            generated_at = %report.generated_at,
            "Prediction complete"
        );
        Ok(report)
    }
}
