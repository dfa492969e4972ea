//! Trip Duration Dashboard - Main Entry Point
//!
//! Loads the trip dataset and the trained models once, then serves either the
//! interactive dashboard or a single one-shot command.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use taxi_duration_dashboard::{
    config::{AppConfig, DEFAULT_CONFIG_PATH},
    dashboard::{render, Dashboard, FilterArgs, Flow, Session},
    logging, FeatureVector,
};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "taxi-duration-dashboard",
    version,
    about = "Predict NYC taxi trip durations with pre-trained models",
    long_about = "Loads the trip dataset and every configured model, then runs the models on a \
        dataset row or on manually entered feature values.\n\n\
        EXAMPLES:\n\
        \n  taxi-duration-dashboard                          Start the interactive dashboard\
        \n  taxi-duration-dashboard predict --index 42       Predict for dataset row 42\
        \n  taxi-duration-dashboard predict --set speed=14   Predict from defaults with one override\
        \n  taxi-duration-dashboard filter --vendor 2 --hours 7..9"
)]
struct Cli {
    /// Configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the interactive dashboard (default)
    Interactive,

    /// Show the first rows of the dataset
    Preview {
        /// Number of rows (defaults to the configured preview size)
        #[arg(long)]
        rows: Option<usize>,
    },

    /// Show manual entry kinds and default values
    Defaults,

    /// Show the dataset filtered by vendor, passenger count and pickup hour
    Filter(FilterArgs),

    /// Run every model once and print the predictions
    Predict(PredictArgs),

    /// List the loaded models
    Models,
}

#[derive(Debug, Args)]
struct PredictArgs {
    /// Use the dataset row with this index
    #[arg(long, conflicts_with = "set", allow_negative_numbers = true)]
    index: Option<i64>,

    /// Override a manual default, e.g. --set passenger_count=2
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, String)>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn parse_assignment(text: &str) -> Result<(String, String), String> {
    text.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", text))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Dashboard failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = AppConfig::load_from_path(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    logging::init(&config.logging)?;
    info!(config = %cli.config.display(), "Configuration loaded successfully");

    let dashboard = Dashboard::start(&config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let code = match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            drop(out);
            run_interactive(&dashboard)?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Preview { rows } => {
            let n = rows.unwrap_or(dashboard.preview_rows());
            let rows: Vec<_> = dashboard.dataset().head(n).iter().collect();
            render::write_rows(&mut out, dashboard.dataset(), &rows)?;
            ExitCode::SUCCESS
        }
        Command::Defaults => {
            let defaults = dashboard.resolver().defaults();
            render::write_manual(&mut out, dashboard.dataset().schema(), &defaults)?;
            ExitCode::SUCCESS
        }
        Command::Filter(args) => match dashboard.build_filter(None, &args) {
            Some(filter) => {
                let rows = filter.apply(dashboard.dataset());
                render::write_rows(&mut out, dashboard.dataset(), &rows)?;
                ExitCode::SUCCESS
            }
            None => {
                writeln!(out, "No vendors to filter by")?;
                ExitCode::FAILURE
            }
        },
        Command::Predict(args) => predict(&dashboard, args, &mut out)?,
        Command::Models => {
            render::write_models(&mut out, dashboard.engine())?;
            ExitCode::SUCCESS
        }
    };

    out.flush()?;
    Ok(code)
}

/// Line-edited dashboard session. Ctrl-C clears the line, Ctrl-D leaves.
fn run_interactive(dashboard: &Dashboard) -> Result<()> {
    let mut editor =
        Editor::<(), DefaultHistory>::new().context("Failed to initialize line editor")?;
    let mut session = Session::new(dashboard);
    let stdout = io::stdout();

    session.write_banner(&mut stdout.lock())?;
    loop {
        match editor.readline(session.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = editor.add_history_entry(trimmed);
                }

                let mut out = stdout.lock();
                let flow = session.handle_line(&line, &mut out)?;
                out.flush()?;
                if flow == Flow::Quit {
                    return Ok(());
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(e).context("Failed to read dashboard input"),
        }
    }
}

/// One-shot prediction. User input problems print a message and exit with
/// status 2 instead of failing as a startup error.
fn predict<W: Write>(dashboard: &Dashboard, args: PredictArgs, out: &mut W) -> Result<ExitCode> {
    let resolver = dashboard.resolver();

    let vector = match args.index {
        Some(index) => match resolver.resolve_index(index) {
            Ok(vector) => vector,
            Err(e) => {
                writeln!(out, "Warning: {}", e)?;
                FeatureVector::empty()
            }
        },
        None => {
            let mut input = resolver.defaults();
            for (name, value) in &args.set {
                if let Err(e) = resolver.set_manual(&mut input, name, value) {
                    writeln!(out, "Error: {}", e)?;
                    return Ok(ExitCode::from(2));
                }
            }
            resolver.resolve_manual(&input)
        }
    };

    match dashboard.predict(&vector) {
        Ok(report) if args.json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(report) => {
            render::write_report(out, &report)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            writeln!(out, "Error: {}", e)?;
            Ok(ExitCode::from(2))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxi_duration_dashboard::config::FilterConfig;
    use taxi_duration_dashboard::models::{LoadedModel, ModelError, Predictor};
    use taxi_duration_dashboard::{DatasetLoader, InferenceEngine};

    struct Fixed(f64);

    impl Predictor for Fixed {
        fn predict(&self, _features: &[f64]) -> Result<f64, ModelError> {
            Ok(self.0)
        }

        fn family(&self) -> &'static str {
            "fixed"
        }
    }

    /// Rows at index 0 and 2; index 1 has a blank passenger count
    fn dashboard() -> Dashboard {
        let header = "vendor_id,passenger_count,pickup_longitude,pickup_latitude,\
            dropoff_longitude,dropoff_latitude,trip_distance,trip_category_encoded,pickup_hour,\
            pickup_day,pickup_month,pickup_weekday,trip_duration_hours,speed,hourly_avg_duration,\
            trip_duration";
        let text = format!(
            "{}\n{}\n{}\n{}\n",
            header,
            "1,1,-73.9,40.7,-73.8,40.8,1,1,8,15,3,2,0.1,10,800,600",
            "2,,-73.9,40.7,-73.8,40.8,2,1,9,15,3,2,0.2,10,800,700",
            "2,3,-73.9,40.7,-73.8,40.8,3,1,10,15,3,2,0.3,10,800,800",
        );
        let dataset = DatasetLoader::from_reader(text.as_bytes()).unwrap();
        let engine = InferenceEngine::with_models(vec![
            LoadedModel::new("Linear Regression", Box::new(Fixed(12.5))),
            LoadedModel::new("LightGBM", Box::new(Fixed(7.0))),
        ]);
        Dashboard::new(dataset, engine, 5, FilterConfig::default())
    }

    /// Exit status as comparable text
    fn status(code: ExitCode) -> String {
        format!("{:?}", code)
    }

    fn run_predict(args: PredictArgs) -> (String, String) {
        let mut out = Vec::new();
        let code = predict(&dashboard(), args, &mut out).unwrap();
        (status(code), String::from_utf8(out).unwrap())
    }

    fn by_index(index: i64) -> PredictArgs {
        PredictArgs {
            index: Some(index),
            set: Vec::new(),
            json: false,
        }
    }

    #[test]
    fn test_predict_index_prints_report() {
        let (code, text) = run_predict(by_index(2));
        assert_eq!(code, status(ExitCode::SUCCESS));
        assert_eq!(
            text,
            "Predicted Trip Durations\nLinear Regression: 12.50 minutes\nLightGBM: 7.00 minutes\n"
        );
    }

    #[test]
    fn test_predict_gap_index_is_refused() {
        let (code, text) = run_predict(by_index(1));
        assert_eq!(code, status(ExitCode::from(2)));
        assert!(text.contains("Warning: Invalid index selected. Please choose a valid index."));
        assert!(text.contains("Error: Please enter valid input data."));
        assert!(!text.contains("Predicted Trip Durations"));
    }

    #[test]
    fn test_predict_out_of_range_index_is_refused() {
        let (code, text) = run_predict(by_index(7));
        assert_eq!(code, status(ExitCode::from(2)));
        assert!(text.starts_with("Warning: "));
        assert!(text.contains("Error: Please enter valid input data."));
    }

    #[test]
    fn test_predict_bad_assignment_is_refused() {
        let (code, text) = run_predict(PredictArgs {
            index: None,
            set: vec![("vendor_id".to_string(), "two".to_string())],
            json: false,
        });
        assert_eq!(code, status(ExitCode::from(2)));
        assert!(text.contains("Error: 'two' is not a valid integer value for vendor_id"));
    }

    #[test]
    fn test_predict_json_keeps_model_order() {
        let (code, text) = run_predict(PredictArgs {
            index: None,
            set: vec![("speed".to_string(), "14".to_string())],
            json: true,
        });
        assert_eq!(code, status(ExitCode::SUCCESS));

        let report: serde_json::Value = serde_json::from_str(&text).unwrap();
        let predictions = report["predictions"].as_array().unwrap();
        let names: Vec<&str> = predictions
            .iter()
            .map(|p| p["model"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Linear Regression", "LightGBM"]);
        assert_eq!(predictions[0]["value"].as_f64(), Some(12.5));
        assert!(report["generated_at"].is_string());
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("speed=12.5"),
            Ok(("speed".to_string(), "12.5".to_string()))
        );
        assert_eq!(
            parse_assignment("trip_category_encoded="),
            Ok(("trip_category_encoded".to_string(), String::new()))
        );
        assert!(parse_assignment("speed").is_err());
    }

    #[test]
    fn test_cli_parses_predict() {
        let cli = Cli::try_parse_from([
            "taxi-duration-dashboard",
            "predict",
            "--set",
            "speed=3",
            "--set",
            "vendor_id=2",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Predict(args)) => {
                assert_eq!(args.index, None);
                assert_eq!(args.set.len(), 2);
                assert!(args.json);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_cli_index_conflicts_with_set() {
        let result = Cli::try_parse_from([
            "taxi-duration-dashboard",
            "predict",
            "--index",
            "1",
            "--set",
            "speed=3",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_defaults_to_config_path() {
        let cli = Cli::try_parse_from(["taxi-duration-dashboard"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(cli.command.is_none());
    }
}
