//! Sample Artifact Generator
//!
//! Writes a synthetic trip dataset and one JSON artifact per model family so
//! the dashboard can be run without the real training outputs.
//!
//! Usage: sample_artifacts [OUTPUT_DIR] [ROWS] [MISSING_RATE]

use anyhow::{Context, Result};
use rand::Rng;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use taxi_duration_dashboard::dataset::schema::{FEATURE_COLUMNS, TARGET_COLUMN};
use taxi_duration_dashboard::models::predictor::{
    DecisionTree, GradientBoosting, LinearModel, Model, RandomForest, TreeNode,
};
use tracing::info;

const TRIP_DISTANCE: usize = 6;
const PICKUP_HOUR: usize = 8;
const SPEED: usize = 13;

/// Synthetic trip generator
struct TripGenerator {
    rng: rand::rngs::ThreadRng,
    counter: u64,
    missing_rate: f64,
}

impl TripGenerator {
    fn new(missing_rate: f64) -> Self {
        Self {
            rng: rand::thread_rng(),
            counter: 0,
            missing_rate,
        }
    }

    /// One CSV record: id, 15 features, trip duration in minutes
    fn generate(&mut self) -> Vec<String> {
        self.counter += 1;

        let pickup_lon = self.rng.gen_range(-74.02..-73.93);
        let pickup_lat = self.rng.gen_range(40.70..40.80);
        let dropoff_lon = pickup_lon + self.rng.gen_range(-0.05..0.05);
        let dropoff_lat = pickup_lat + self.rng.gen_range(-0.05..0.05);
        let distance: f64 = self.rng.gen_range(0.5..20.0);
        let hour: u32 = self.rng.gen_range(0..24);
        let rush = (7..=9).contains(&hour) || (16..=19).contains(&hour);
        let speed: f64 = if rush {
            self.rng.gen_range(6.0..18.0)
        } else {
            self.rng.gen_range(12.0..35.0)
        };
        let hours = distance / speed;
        let category = match distance {
            d if d < 2.0 => 0,
            d if d < 8.0 => 1,
            _ => 2,
        };

        let mut passengers = self.rng.gen_range(1..=6).to_string();
        if self.rng.gen_bool(self.missing_rate) {
            passengers.clear();
        }

        vec![
            format!("id{:07}", self.counter),
            self.rng.gen_range(1..=2).to_string(),
            passengers,
            format!("{:.6}", pickup_lon),
            format!("{:.6}", pickup_lat),
            format!("{:.6}", dropoff_lon),
            format!("{:.6}", dropoff_lat),
            format!("{:.3}", distance),
            category.to_string(),
            hour.to_string(),
            self.rng.gen_range(1..=28).to_string(),
            self.rng.gen_range(1..=6).to_string(),
            self.rng.gen_range(0..7).to_string(),
            format!("{:.4}", hours),
            format!("{:.2}", speed),
            if rush { "18.5" } else { "12.0" }.to_string(),
            format!("{:.2}", hours * 60.0),
        ]
    }
}

fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
    TreeNode::Split {
        feature,
        threshold,
        left,
        right,
    }
}

fn leaf(value: f64) -> TreeNode {
    TreeNode::Leaf { value }
}

fn distance_tree(cut: f64, short: f64, long: f64) -> DecisionTree {
    DecisionTree {
        nodes: vec![
            split(TRIP_DISTANCE, cut, 1, 2),
            leaf(short),
            split(SPEED, 15.0, 3, 4),
            leaf(long * 1.4),
            leaf(long),
        ],
    }
}

/// Fixed parameters so repeated runs produce identical artifacts
fn sample_models() -> Vec<(&'static str, Model)> {
    let mut coefficients = vec![0.0; FEATURE_COLUMNS.len()];
    coefficients[TRIP_DISTANCE] = 3.1;
    coefficients[PICKUP_HOUR] = 0.15;
    coefficients[SPEED] = -0.4;
    coefficients[FEATURE_COLUMNS.len() - 1] = 0.5;

    vec![
        (
            "linear_reg.json",
            Model::Linear(LinearModel {
                coefficients,
                intercept: 4.0,
            }),
        ),
        (
            "decision_tree.json",
            Model::DecisionTree(distance_tree(4.0, 9.0, 30.0)),
        ),
        (
            "random_forest.json",
            Model::RandomForest(RandomForest {
                trees: vec![
                    distance_tree(3.5, 8.5, 28.0),
                    distance_tree(4.5, 10.0, 32.0),
                    distance_tree(6.0, 12.0, 36.0),
                ],
            }),
        ),
        (
            "light_gbm.json",
            Model::GradientBoosting(GradientBoosting {
                init_score: 15.0,
                trees: vec![
                    distance_tree(4.0, -5.0, 9.0),
                    DecisionTree {
                        nodes: vec![split(PICKUP_HOUR, 6.5, 1, 2), leaf(-1.5), leaf(1.0)],
                    },
                ],
            }),
        ),
    ]
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let out_dir = Path::new(args.get(1).map(|s| s.as_str()).unwrap_or("."));
    let rows: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(500);
    let missing_rate: f64 = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.02_f64)
        .clamp(0.0, 1.0);

    info!(out_dir = %out_dir.display(), rows, missing_rate, "Generating sample artifacts");

    let models_dir = out_dir.join("models");
    fs::create_dir_all(&models_dir)
        .with_context(|| format!("Failed to create {}", models_dir.display()))?;

    let csv_path = out_dir.join("train_updated.csv");
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("Failed to create {}", csv_path.display()))?;

    let mut header = vec!["id"];
    header.extend(FEATURE_COLUMNS);
    header.push(TARGET_COLUMN);
    writer.write_record(&header)?;

    let mut generator = TripGenerator::new(missing_rate);
    for _ in 0..rows {
        writer.write_record(generator.generate())?;
    }
    writer.flush()?;
    info!(path = %csv_path.display(), rows, "Wrote dataset");

    for (file, model) in sample_models() {
        let path = models_dir.join(file);
        write_json(&path, &model)?;
        info!(path = %path.display(), "Wrote model");
    }

    info!("Sample artifacts ready");
    Ok(())
}
