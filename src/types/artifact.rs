//! Artifact records describing where a pushed model resides

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Record of a model uploaded to the remote object store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPusherArtifact {
    /// Unique artifact identifier
    pub artifact_id: String,

    /// Bucket the model was uploaded to
    pub bucket: String,

    /// Object key within the bucket
    pub key: String,

    /// Upload timestamp
    pub pushed_at: DateTime<Utc>,
}

impl ModelPusherArtifact {
    pub fn new(bucket: String, key: String) -> Self {
        Self {
            artifact_id: uuid::Uuid::new_v4().to_string(),
            bucket,
            key,
            pushed_at: Utc::now(),
        }
    }
}

/// Record of a model written to a local path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalModelPusherArtifact {
    /// Unique artifact identifier
    pub artifact_id: String,

    /// Filesystem path the model was written to
    pub model_path: PathBuf,

    /// Write timestamp
    pub pushed_at: DateTime<Utc>,
}

impl LocalModelPusherArtifact {
    pub fn new(model_path: PathBuf) -> Self {
        Self {
            artifact_id: uuid::Uuid::new_v4().to_string(),
            model_path,
            pushed_at: Utc::now(),
        }
    }
}
