//! Type definitions for the fraud inference pipeline

pub mod artifact;
pub mod dataset;
pub mod labels;

pub use artifact::{LocalModelPusherArtifact, ModelPusherArtifact};
pub use dataset::{Dataset, Value};
pub use labels::TargetLabelMapping;
