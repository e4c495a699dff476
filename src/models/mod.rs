//! Model persistence and inference

pub mod classifier;
pub mod estimator;
pub mod store;

pub use classifier::FraudClassifier;
pub use estimator::ModelEstimator;
pub use store::{FsModelStore, HttpObjectStore, ModelStore};
