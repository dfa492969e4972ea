//! Model families and the common predict capability
//!
//! Artifacts are JSON documents tagged by `kind`:
//!
//! ```json
//! {"kind": "linear", "coefficients": [..15 values..], "intercept": 4.2}
//! {"kind": "decision_tree", "nodes": [{"feature": 6, "threshold": 2.5, "left": 1, "right": 2},
//!                                     {"value": 8.0}, {"value": 21.0}]}
//! {"kind": "random_forest", "trees": [{"nodes": [..]}, {"nodes": [..]}]}
//! {"kind": "gradient_boosting", "init_score": 12.0, "trees": [{"nodes": [..]}]}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural problems discovered while evaluating a model
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("expected {expected} features, got {found}")]
    FeatureCount { expected: usize, found: usize },

    #[error("tree node {node} does not exist")]
    MissingNode { node: usize },

    #[error("split references feature {feature}, input has {available}")]
    FeatureOutOfRange { feature: usize, available: usize },

    #[error("tree does not terminate in a leaf")]
    Cycle,

    #[error("ensemble has no trees")]
    EmptyEnsemble,
}

/// Anything that maps one feature row to a trip duration
pub trait Predictor {
    /// Predict from features in model order
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError>;

    /// Short family name used in logs and listings
    fn family(&self) -> &'static str;
}

/// Ordinary least squares model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl Predictor for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.coefficients.len() {
            return Err(ModelError::FeatureCount {
                expected: self.coefficients.len(),
                found: features.len(),
            });
        }

        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();
        Ok(self.intercept + dot)
    }

    fn family(&self) -> &'static str {
        "linear"
    }
}

/// Node of a flattened regression tree. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go left when `features[feature] <= threshold`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Single regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn evaluate(&self, features: &[f64]) -> Result<f64, ModelError> {
        let mut current = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..=self.nodes.len() {
            let node = self
                .nodes
                .get(current)
                .ok_or(ModelError::MissingNode { node: current })?;

            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = features.get(*feature).ok_or(ModelError::FeatureOutOfRange {
                        feature: *feature,
                        available: features.len(),
                    })?;
                    current = if *x <= *threshold { *left } else { *right };
                }
            }
        }

        Err(ModelError::Cycle)
    }
}

impl Predictor for DecisionTree {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        self.evaluate(features)
    }

    fn family(&self) -> &'static str {
        "decision_tree"
    }
}

/// Bagged trees; prediction is the mean of all trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl Predictor for RandomForest {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::EmptyEnsemble);
        }

        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.evaluate(features)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    fn family(&self) -> &'static str {
        "random_forest"
    }
}

/// Boosted trees; prediction is the initial score plus every tree output.
/// Leaf values are expected to already include the learning rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoosting {
    #[serde(default)]
    pub init_score: f64,
    pub trees: Vec<DecisionTree>,
}

impl Predictor for GradientBoosting {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        let mut score = self.init_score;
        for tree in &self.trees {
            score += tree.evaluate(features)?;
        }
        Ok(score)
    }

    fn family(&self) -> &'static str {
        "gradient_boosting"
    }
}

/// Deserialized model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    Linear(LinearModel),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
    GradientBoosting(GradientBoosting),
}

impl Predictor for Model {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        match self {
            Model::Linear(m) => m.predict(features),
            Model::DecisionTree(m) => m.predict(features),
            Model::RandomForest(m) => m.predict(features),
            Model::GradientBoosting(m) => m.predict(features),
        }
    }

    fn family(&self) -> &'static str {
        match self {
            Model::Linear(m) => m.family(),
            Model::DecisionTree(m) => m.family(),
            Model::RandomForest(m) => m.family(),
            Model::GradientBoosting(m) => m.family(),
        }
    }
}
