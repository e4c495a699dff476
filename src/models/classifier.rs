//! Trained fraud classifier and its serialized form

use crate::types::dataset::{Dataset, Value};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A trained binary classifier over a feature table.
///
/// Scores each row with a logistic model: numeric columns contribute
/// `weight * value`, categorical columns contribute the weight of the
/// observed level (unseen levels contribute nothing). Rows scoring at or
/// above the decision threshold emit code 1, the rest code 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudClassifier {
    /// Per-column weights for numeric features
    pub numeric_weights: HashMap<String, f64>,
    /// Per-column, per-level weights for categorical features
    pub category_weights: HashMap<String, HashMap<String, f64>>,
    /// Intercept term
    pub bias: f64,
    /// Decision threshold on the logistic score
    pub threshold: f64,
}

impl FraudClassifier {
    pub fn new(bias: f64, threshold: f64) -> Self {
        Self {
            numeric_weights: HashMap::new(),
            category_weights: HashMap::new(),
            bias,
            threshold,
        }
    }

    pub fn with_numeric_weight(mut self, column: &str, weight: f64) -> Self {
        self.numeric_weights.insert(column.to_string(), weight);
        self
    }

    pub fn with_category_weight(mut self, column: &str, level: &str, weight: f64) -> Self {
        self.category_weights
            .entry(column.to_string())
            .or_default()
            .insert(level.to_string(), weight);
        self
    }

    /// Produce one raw label code per row of the feature table.
    ///
    /// Every column the classifier was trained on must be present, and
    /// numeric columns must hold numbers; a violation is a shape mismatch
    /// between the model and the feature table.
    pub fn predict(&self, dataset: &Dataset) -> Result<Vec<i64>> {
        let mut numeric_columns = Vec::with_capacity(self.numeric_weights.len());
        for (name, weight) in &self.numeric_weights {
            let values = dataset
                .column(name)
                .with_context(|| format!("feature table is missing model column {:?}", name))?;
            numeric_columns.push((name, values, *weight));
        }

        let mut categorical_columns = Vec::with_capacity(self.category_weights.len());
        for (name, levels) in &self.category_weights {
            let values = dataset
                .column(name)
                .with_context(|| format!("feature table is missing model column {:?}", name))?;
            categorical_columns.push((name, values, levels));
        }

        let mut codes = Vec::with_capacity(dataset.row_count());
        for row in 0..dataset.row_count() {
            let mut score = self.bias;

            for (name, values, weight) in &numeric_columns {
                match &values[row] {
                    Value::Number(n) => score += weight * n,
                    other => bail!(
                        "numeric model column {:?} holds non-numeric cell {:?} at row {}",
                        name,
                        other,
                        row
                    ),
                }
            }

            for (name, values, levels) in &categorical_columns {
                let cell = &values[row];
                if cell.is_missing() {
                    bail!(
                        "model column {:?} holds a missing cell at row {}",
                        name,
                        row
                    );
                }
                score += levels.get(&cell.render()).copied().unwrap_or(0.0);
            }

            let probability = 1.0 / (1.0 + (-score).exp());
            codes.push(i64::from(probability >= self.threshold));
        }

        Ok(codes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).context("failed to serialize classifier")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).context("failed to deserialize classifier")
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create model directory {:?}", parent))?;
            }
        }
        std::fs::write(path, self.to_bytes()?)
            .with_context(|| format!("failed to write model file {:?}", path))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read model file {:?}", path))?;
        Self::from_bytes(&bytes)
    }
}
