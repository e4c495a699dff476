//! Configuration management for the fraud inference pipeline

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Storage backend the trained model is pulled from
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Local filesystem directory
    #[default]
    Local,
    /// S3-compatible HTTP object store
    Remote,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub model_store: ModelStoreConfig,
    pub schema: SchemaConfig,
    pub logging: LoggingConfig,
}

/// Model store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelStoreConfig {
    /// Backend to resolve the model key against
    #[serde(default)]
    pub backend: StoreBackend,
    /// Object store endpoint URL (remote backend)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Bucket holding model artifacts (remote backend)
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Key the trained model is stored under
    #[serde(default = "default_model_key")]
    pub model_key: String,
    /// Root directory for the local backend
    #[serde(default = "default_local_dir")]
    pub local_dir: String,
}

fn default_endpoint() -> String {
    "http://localhost:9000".to_string()
}

fn default_bucket() -> String {
    "fraud-models".to_string()
}

fn default_model_key() -> String {
    "registry/fraud_classifier.bin".to_string()
}

fn default_local_dir() -> String {
    "models".to_string()
}

/// Schema document configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaConfig {
    /// Path to the YAML schema describing expected dataset columns
    #[serde(default = "default_schema_path")]
    pub path: String,
}

fn default_schema_path() -> String {
    "config/schema.yaml".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_store: ModelStoreConfig {
                backend: StoreBackend::Local,
                endpoint: default_endpoint(),
                bucket: default_bucket(),
                model_key: default_model_key(),
                local_dir: default_local_dir(),
            },
            schema: SchemaConfig {
                path: default_schema_path(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
