//! Fraud Inference Pipeline - Batch Entry Point
//!
//! Reads a CSV dataset, validates it against the configured schema, runs
//! model inference, and writes the labelled dataset back out.

use anyhow::{Context, Result};
use fraud_inference_pipeline::{
    config::AppConfig, pipeline::PredictionPipeline, predictor::PREDICTION_COLUMN, types::Dataset,
};
use std::collections::BTreeMap;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fraud_inference_pipeline=info".parse()?),
        )
        .init();

    info!("Starting Fraud Inference Pipeline");

    let mut args = std::env::args().skip(1);
    let input_path = args
        .next()
        .unwrap_or_else(|| "data/sample_claims.csv".to_string());
    let output_path = args.next().unwrap_or_else(|| "predictions.csv".to_string());

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");
    info!(
        backend = ?config.model_store.backend,
        key = %config.model_store.model_key,
        schema = %config.schema.path,
        "Model store configured"
    );

    let mut pipeline = PredictionPipeline::new(&config)?;

    let dataset = Dataset::from_csv_path(&input_path)?;
    info!(
        input = %input_path,
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "Dataset loaded"
    );

    match pipeline.initiate(dataset)? {
        Some(result) => {
            info!(summary = %label_summary(&result)?, "Prediction summary");

            if output_path.ends_with(".json") {
                let records = serde_json::to_string_pretty(&result.to_json_records())
                    .context("failed to encode output records")?;
                std::fs::write(&output_path, records)
                    .with_context(|| format!("failed to write output file {:?}", output_path))?;
            } else {
                result.to_csv_path(&output_path)?;
            }
            info!(output = %output_path, rows = result.row_count(), "Predictions written");
        }
        None => {
            warn!("Dataset rejected by validation, no predictions produced");
        }
    }

    Ok(())
}

/// Count predictions per label, rendered as a JSON object.
fn label_summary(dataset: &Dataset) -> Result<String> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    if let Some(values) = dataset.column(PREDICTION_COLUMN) {
        for value in values {
            *counts.entry(value.render()).or_insert(0) += 1;
        }
    }
    serde_json::to_string(&counts).context("failed to encode prediction summary")
}
