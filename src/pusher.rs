//! One-shot push of a trained model into the model store

use crate::config::ModelStoreConfig;
use crate::models::classifier::FraudClassifier;
use crate::models::estimator::ModelEstimator;
use crate::types::artifact::{LocalModelPusherArtifact, ModelPusherArtifact};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Uploads an evaluated model artifact to the remote object store.
pub struct ModelPusher {
    estimator: ModelEstimator,
    bucket: String,
    key: String,
}

impl ModelPusher {
    pub fn new(config: &ModelStoreConfig) -> Self {
        Self {
            estimator: ModelEstimator::remote(
                &config.endpoint,
                &config.bucket,
                &config.model_key,
            ),
            bucket: config.bucket.clone(),
            key: config.model_key.clone(),
        }
    }

    /// Upload the trained artifact file as-is and record where it landed.
    pub fn push(&self, trained_model_path: &Path) -> Result<ModelPusherArtifact> {
        info!(
            path = %trained_model_path.display(),
            bucket = %self.bucket,
            key = %self.key,
            "Uploading trained model to object store"
        );

        self.estimator
            .save(trained_model_path, false)
            .context("model push failed")?;

        let artifact = ModelPusherArtifact::new(self.bucket.clone(), self.key.clone());
        info!(artifact_id = %artifact.artifact_id, "Model pushed");
        Ok(artifact)
    }
}

/// Writes an evaluated model to a configured local path.
///
/// The model is deserialized and re-serialized through its in-memory
/// representation rather than copied byte-for-byte.
pub struct LocalModelPusher {
    model_path: PathBuf,
}

impl LocalModelPusher {
    pub fn new<P: AsRef<Path>>(model_path: P) -> Self {
        Self {
            model_path: model_path.as_ref().to_path_buf(),
        }
    }

    /// Destination path resolved from the configured local store.
    pub fn from_config(config: &ModelStoreConfig) -> Self {
        Self::new(Path::new(&config.local_dir).join(&config.model_key))
    }

    pub fn push(&self, trained_model_path: &Path) -> Result<LocalModelPusherArtifact> {
        info!(
            from = %trained_model_path.display(),
            to = %self.model_path.display(),
            "Publishing trained model to local path"
        );

        let model =
            FraudClassifier::load_from_file(trained_model_path).context("model push failed")?;
        model
            .save_to_file(&self.model_path)
            .context("model push failed")?;

        let artifact = LocalModelPusherArtifact::new(self.model_path.clone());
        info!(artifact_id = %artifact.artifact_id, "Model pushed");
        Ok(artifact)
    }
}
