//! Prediction results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output of a single model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub model: String,
    /// Predicted trip duration
    pub value: f64,
}

/// Predictions of every loaded model for one trigger, in store order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    pub predictions: Vec<ModelPrediction>,
    /// Report generation timestamp
    pub generated_at: DateTime<Utc>,
}

impl PredictionReport {
    pub fn new(predictions: Vec<ModelPrediction>) -> Self {
        Self {
            predictions,
            generated_at: Utc::now(),
        }
    }

    /// Prediction of the named model
    pub fn get(&self, model: &str) -> Option<f64> {
        self.predictions
            .iter()
            .find(|p| p.model == model)
            .map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn model_names(&self) -> Vec<&str> {
        self.predictions.iter().map(|p| p.model.as_str()).collect()
    }

    /// One display line per model
    pub fn lines(&self) -> Vec<String> {
        self.predictions
            .iter()
            .map(|p| format!("{}: {:.2} minutes", p.model, p.value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> PredictionReport {
        PredictionReport::new(vec![
            ModelPrediction {
                model: "Linear Regression".to_string(),
                value: 12.345,
            },
            ModelPrediction {
                model: "LightGBM".to_string(),
                value: 9.0,
            },
        ])
    }

    #[test]
    fn test_lookup_and_order() {
        let report = report();
        assert_eq!(report.get("LightGBM"), Some(9.0));
        assert_eq!(report.get("Decision Tree"), None);
        assert_eq!(report.model_names(), vec!["Linear Regression", "LightGBM"]);
    }

    #[test]
    fn test_lines() {
        assert_eq!(
            report().lines(),
            vec![
                "Linear Regression: 12.35 minutes".to_string(),
                "LightGBM: 9.00 minutes".to_string()
            ]
        );
    }

    #[test]
    fn test_report_serialization() {
        let report = report();
        let json = serde_json::to_string(&report).unwrap();
        let deserialized: PredictionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.predictions, report.predictions);
        assert_eq!(deserialized.generated_at, report.generated_at);
    }
}
