//! Fraud Inference Pipeline Library
//!
//! Validates tabular datasets against a declared schema, loads a trained
//! classifier from an object store or a local path, and produces
//! predictions with human-readable labels.

pub mod config;
pub mod models;
pub mod pipeline;
pub mod predictor;
pub mod pusher;
pub mod schema;
pub mod transform;
pub mod types;
pub mod validator;

pub use config::AppConfig;
pub use models::{FraudClassifier, ModelEstimator, ModelStore};
pub use pipeline::PredictionPipeline;
pub use predictor::FraudPredictor;
pub use pusher::{LocalModelPusher, ModelPusher};
pub use schema::DatasetSchema;
pub use types::{Dataset, TargetLabelMapping, Value};
pub use validator::DatasetValidator;
