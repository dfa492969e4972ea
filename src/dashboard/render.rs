//! Plain-text rendering of dashboard views

use crate::dataset::{Dataset, FeatureSchema, Row};
use crate::feature_resolver::ManualInput;
use crate::models::InferenceEngine;
use crate::types::{FeatureVector, PredictionReport};
use std::io::{self, Write};

/// Rows as an aligned table with the dataset column header
pub fn write_rows<W: Write>(out: &mut W, dataset: &Dataset, rows: &[&Row]) -> io::Result<()> {
    let header: Vec<String> = dataset.column_names().iter().map(|c| c.to_string()).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            std::iter::once(row.index.to_string())
                .chain(row.features.iter().map(|v| v.to_string()))
                .chain(std::iter::once(row.target.to_string()))
                .collect()
        })
        .collect();

    write_table(out, &header, &body)?;
    writeln!(out, "[{} rows x {} columns]", rows.len(), header.len())
}

/// Feature/value pairs of a model input
pub fn write_vector<W: Write>(out: &mut W, vector: &FeatureVector) -> io::Result<()> {
    let header = vec!["feature".to_string(), "value".to_string()];
    let body: Vec<Vec<String>> = vector
        .iter()
        .map(|(name, value)| vec![name.to_string(), value.to_string()])
        .collect();
    write_table(out, &header, &body)
}

/// Manual entry form: kind, default and current value of every feature
pub fn write_manual<W: Write>(
    out: &mut W,
    schema: &FeatureSchema,
    input: &ManualInput,
) -> io::Result<()> {
    let header: Vec<String> = ["feature", "kind", "default", "current"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let body: Vec<Vec<String>> = schema
        .columns()
        .iter()
        .zip(input.values())
        .map(|(spec, current)| {
            vec![
                spec.name.clone(),
                spec.kind.label().to_string(),
                spec.default.to_string(),
                current.to_string(),
            ]
        })
        .collect();
    write_table(out, &header, &body)
}

pub fn write_report<W: Write>(out: &mut W, report: &PredictionReport) -> io::Result<()> {
    writeln!(out, "Predicted Trip Durations")?;
    for line in report.lines() {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

pub fn write_models<W: Write>(out: &mut W, engine: &InferenceEngine) -> io::Result<()> {
    let header = vec!["model".to_string(), "family".to_string()];
    let body: Vec<Vec<String>> = engine
        .models()
        .iter()
        .map(|m| vec![m.name.clone(), m.predictor.family().to_string()])
        .collect();
    write_table(out, &header, &body)
}

fn write_table<W: Write>(out: &mut W, header: &[String], body: &[Vec<String>]) -> io::Result<()> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    writeln!(out, "{}", line(header))?;
    for row in body {
        writeln!(out, "{}", line(row.as_slice()))?;
    }
    Ok(())
}
