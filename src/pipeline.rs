//! Prediction pipeline orchestration

use crate::config::{AppConfig, StoreBackend};
use crate::models::estimator::ModelEstimator;
use crate::predictor::FraudPredictor;
use crate::schema::DatasetSchema;
use crate::types::dataset::Dataset;
use crate::validator::DatasetValidator;
use anyhow::{Context, Result};
use tracing::{error, info};

/// Orchestrates validation and prediction over one dataset.
///
/// Validation rejection is a normal terminal outcome (`Ok(None)`), distinct
/// from an operational failure (`Err`): the caller can always tell "no
/// prediction produced" apart from "something broke".
pub struct PredictionPipeline {
    validator: DatasetValidator,
    predictor: FraudPredictor,
    estimator: ModelEstimator,
}

impl PredictionPipeline {
    /// Build the pipeline from configuration: load the schema document once
    /// and wire the estimator for the configured store backend.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let schema =
            DatasetSchema::load_from_path(&config.schema.path).context("pipeline setup failed")?;

        let store = &config.model_store;
        let estimator = match store.backend {
            StoreBackend::Remote => {
                ModelEstimator::remote(&store.endpoint, &store.bucket, &store.model_key)
            }
            StoreBackend::Local => ModelEstimator::local(&store.local_dir, &store.model_key),
        };

        Ok(Self::with_parts(schema, estimator))
    }

    /// Assemble a pipeline from already-constructed parts.
    pub fn with_parts(schema: DatasetSchema, estimator: ModelEstimator) -> Self {
        Self {
            validator: DatasetValidator::new(schema.clone()),
            predictor: FraudPredictor::new(schema),
            estimator,
        }
    }

    /// Run one dataset through validation and prediction.
    ///
    /// Returns the labelled dataset, or `None` when validation rejected the
    /// input. Operational failures propagate.
    pub fn initiate(&mut self, dataset: Dataset) -> Result<Option<Dataset>> {
        info!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Initiating prediction pipeline"
        );

        let report = self.validator.validate(&dataset);
        if !report.is_valid() {
            error!(
                expected_columns = report.expected_columns,
                actual_columns = report.actual_columns,
                missing_numerical = ?report.missing_numerical,
                missing_categorical = ?report.missing_categorical,
                "Data validation failed"
            );
            return Ok(None);
        }

        let result = self.predictor.predict(dataset, &mut self.estimator)?;
        info!(rows = result.row_count(), "Prediction pipeline complete");
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classifier::FraudClassifier;
    use crate::predictor::PREDICTION_COLUMN;
    use crate::types::dataset::Value;

    fn schema() -> DatasetSchema {
        DatasetSchema {
            feature_columns: vec![
                "total_claim_amount".to_string(),
                "collision_type".to_string(),
            ],
            drop_columns: vec![],
            numerical_columns: vec!["total_claim_amount".to_string()],
            categorical_columns: vec!["collision_type".to_string()],
        }
    }

    fn classifier() -> FraudClassifier {
        FraudClassifier::new(-5.0, 0.5)
            .with_numeric_weight("total_claim_amount", 0.001)
            .with_category_weight("collision_type", "Rear Collision", 2.0)
    }

    fn pipeline_with_model(dir: &std::path::Path) -> PredictionPipeline {
        classifier()
            .save_to_file(dir.join("model.bin"))
            .unwrap();
        PredictionPipeline::with_parts(schema(), ModelEstimator::local(dir, "model.bin"))
    }

    fn valid_dataset() -> Dataset {
        Dataset::from_columns(vec![
            (
                "total_claim_amount".to_string(),
                vec![Value::Number(20_000.0), Value::Number(100.0)],
            ),
            (
                "collision_type".to_string(),
                vec![
                    Value::Text("Rear Collision".to_string()),
                    Value::Text("Side Collision".to_string()),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_valid_dataset_produces_labels() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_with_model(dir.path());

        let result = pipeline.initiate(valid_dataset()).unwrap();
        let result = result.expect("valid dataset should produce a result");

        assert_eq!(
            result.column(PREDICTION_COLUMN).unwrap(),
            &[
                Value::Text("fraud".to_string()),
                Value::Text("legitimate".to_string())
            ]
        );
    }

    #[test]
    fn test_invalid_dataset_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_with_model(dir.path());

        let dataset = Dataset::from_columns(vec![(
            "total_claim_amount".to_string(),
            vec![Value::Number(1.0)],
        )])
        .unwrap();

        // Missing column: a normal empty outcome, not a failure.
        assert!(pipeline.initiate(dataset).unwrap().is_none());
    }

    #[test]
    fn test_absent_model_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = PredictionPipeline::with_parts(
            schema(),
            ModelEstimator::local(dir.path(), "registry/nowhere.bin"),
        );

        assert!(pipeline.initiate(valid_dataset()).is_err());
    }

    #[test]
    fn test_model_loads_once_across_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_with_model(dir.path());

        pipeline.initiate(valid_dataset()).unwrap();
        // Remove the backing file: a second run must hit the cached model.
        std::fs::remove_file(dir.path().join("model.bin")).unwrap();
        let result = pipeline.initiate(valid_dataset()).unwrap();

        assert!(result.is_some());
    }
}
