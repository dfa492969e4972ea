//! Model artifact loader

use crate::models::predictor::{Model, Predictor};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Loaded model with its display name
pub struct LoadedModel {
    /// Model name
    pub name: String,
    /// Predict capability
    pub predictor: Box<dyn Predictor>,
}

impl LoadedModel {
    pub fn new(name: impl Into<String>, predictor: Box<dyn Predictor>) -> Self {
        Self {
            name: name.into(),
            predictor,
        }
    }
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("name", &self.name)
            .field("family", &self.predictor.family())
            .finish()
    }
}

/// Loader for JSON model artifacts
#[derive(Debug, Default)]
pub struct ModelLoader;

impl ModelLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a single model from file
    pub fn load_model<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<LoadedModel> {
        let path = path.as_ref();

        info!(model = %name, path = %path.display(), "Loading model");

        let file = File::open(path)
            .with_context(|| format!("Failed to open model {} at {}", name, path.display()))?;
        let model: Model = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to load model {} from {}", name, path.display()))?;

        info!(model = %name, family = model.family(), "Model loaded successfully");

        Ok(LoadedModel::new(name, Box::new(model)))
    }

    /// Load every model in order. Any failure aborts the whole load.
    pub fn load_all<P: AsRef<Path>>(&self, entries: &[(String, P)]) -> Result<Vec<LoadedModel>> {
        let models = entries
            .iter()
            .map(|(name, path)| self.load_model(path, name))
            .collect::<Result<Vec<_>>>()?;

        if models.is_empty() {
            anyhow::bail!("No models configured");
        }

        info!(count = models.len(), "Loaded {} models", models.len());

        Ok(models)
    }
}
