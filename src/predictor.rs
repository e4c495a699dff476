//! Feature preparation, inference, and label remapping

use crate::models::estimator::ModelEstimator;
use crate::schema::DatasetSchema;
use crate::transform::DataTransformer;
use crate::types::dataset::{Dataset, Value};
use crate::types::labels::TargetLabelMapping;
use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

/// Name of the column appended to the dataset.
pub const PREDICTION_COLUMN: &str = "prediction";

/// Sentinel string marking a missing value in raw datasets.
pub const MISSING_SENTINEL: &str = "?";

/// Runs a validated dataset through the trained model and appends a
/// `prediction` column of domain labels.
pub struct FraudPredictor {
    schema: DatasetSchema,
    transformer: DataTransformer,
    mapping: TargetLabelMapping,
}

impl FraudPredictor {
    pub fn new(schema: DatasetSchema) -> Self {
        let transformer = DataTransformer::new(&schema);
        Self {
            schema,
            transformer,
            mapping: TargetLabelMapping::default(),
        }
    }

    pub fn with_mapping(mut self, mapping: TargetLabelMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Prepare the feature table, predict, and relabel. Steps run in fixed
    /// order: drop configured columns on a working copy, normalize the
    /// `"?"` sentinel to the missing marker, impute only when markers are
    /// present, feed the model, then remap the appended raw codes to
    /// domain labels in place.
    pub fn predict(
        &self,
        mut dataset: Dataset,
        estimator: &mut ModelEstimator,
    ) -> Result<Dataset> {
        let mut features = dataset.clone();
        features.drop_columns(&self.schema.drop_columns);
        features.normalize_missing(MISSING_SENTINEL);

        let missing = self.transformer.columns_with_missing_values(&features);
        if missing.is_empty() {
            debug!("No missing values present, skipping imputation");
        } else {
            info!(columns = ?missing, "Imputing missing values before inference");
            self.transformer.impute_missing_values(&mut features, &missing);
        }

        let codes = estimator
            .predict(&features)
            .context("prediction failed")?;
        info!(rows = codes.len(), "Model prediction complete");

        dataset
            .append_column(
                PREDICTION_COLUMN,
                codes.iter().map(|&code| Value::Number(code as f64)).collect(),
            )
            .context("prediction failed")?;
        self.relabel(&mut dataset)?;

        Ok(dataset)
    }

    /// Replace raw codes in the prediction column with mapped labels.
    fn relabel(&self, dataset: &mut Dataset) -> Result<()> {
        let values = dataset
            .column_mut(PREDICTION_COLUMN)
            .ok_or_else(|| anyhow!("prediction column missing after append"))?;

        for value in values.iter_mut() {
            let code = value
                .as_number()
                .ok_or_else(|| anyhow!("prediction column holds non-numeric code"))?
                as i64;
            let label = self
                .mapping
                .label_for(code)
                .ok_or_else(|| anyhow!("model emitted unmapped label code {}", code))?;
            *value = Value::Text(label.to_string());
        }
        Ok(())
    }
}
