//! Estimator wrapper pairing a stored model with lazy-load and predict

use crate::models::classifier::FraudClassifier;
use crate::models::store::{FsModelStore, HttpObjectStore, ModelStore};
use crate::types::dataset::Dataset;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Pairs a model's storage location with load, save, and predict.
///
/// The first `load` fetches the model from the store and caches it for the
/// lifetime of the wrapper; there is no invalidation, so forcing a re-load
/// means constructing a new wrapper. The remote and local variants differ
/// only in the store backend behind them.
pub struct ModelEstimator {
    store: Box<dyn ModelStore>,
    key: String,
    loaded: Option<FraudClassifier>,
}

impl ModelEstimator {
    /// Estimator over an S3-compatible HTTP object store.
    pub fn remote(endpoint: &str, bucket: &str, key: &str) -> Self {
        Self::with_store(Box::new(HttpObjectStore::new(endpoint, bucket)), key)
    }

    /// Estimator over a local filesystem directory.
    pub fn local<P: AsRef<Path>>(root: P, key: &str) -> Self {
        Self::with_store(Box::new(FsModelStore::new(root)), key)
    }

    pub fn with_store(store: Box<dyn ModelStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
            loaded: None,
        }
    }

    /// Whether the model key exists in the store. A failing probe is
    /// reported as absent after logging; `load` remains the authoritative
    /// failure path.
    pub fn is_present(&self) -> bool {
        match self.store.exists(&self.key) {
            Ok(found) => found,
            Err(error) => {
                warn!(key = %self.key, error = %error, "Model existence check failed");
                false
            }
        }
    }

    /// Fetch and deserialize the model, memoized per wrapper instance.
    pub fn load(&mut self) -> Result<&FraudClassifier> {
        if self.loaded.is_none() {
            let bytes = self
                .store
                .download(&self.key)
                .with_context(|| format!("model load failed for key {:?}", self.key))?;
            let model = FraudClassifier::from_bytes(&bytes)
                .with_context(|| format!("model load failed for key {:?}", self.key))?;
            info!(key = %self.key, bytes = bytes.len(), "Model loaded from store");
            self.loaded = Some(model);
        }
        self.loaded.as_ref().context("model cache is empty")
    }

    /// Upload a trained artifact file to this estimator's key.
    pub fn save(&self, from_file: &Path, remove_local: bool) -> Result<()> {
        self.store
            .upload(from_file, &self.key, remove_local)
            .with_context(|| format!("model save failed for key {:?}", self.key))
    }

    /// Predict raw label codes, lazily loading the model on first use.
    pub fn predict(&mut self, dataset: &Dataset) -> Result<Vec<i64>> {
        let model = self.load()?;
        model.predict(dataset)
    }
}
