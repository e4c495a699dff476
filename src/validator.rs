//! Schema-driven validation of incoming datasets

use crate::schema::DatasetSchema;
use crate::types::dataset::Dataset;
use tracing::info;

/// Outcome of validating a dataset against the schema.
///
/// Both checks always run, so the report carries complete diagnostics even
/// when the column count already failed. Missing-column lists preserve the
/// order the names appear in the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub expected_columns: usize,
    pub actual_columns: usize,
    pub missing_numerical: Vec<String>,
    pub missing_categorical: Vec<String>,
}

impl ValidationReport {
    pub fn column_count_matches(&self) -> bool {
        self.expected_columns == self.actual_columns
    }

    pub fn all_columns_present(&self) -> bool {
        self.missing_numerical.is_empty() && self.missing_categorical.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.column_count_matches() && self.all_columns_present()
    }
}

/// Validates a dataset's shape and column set against the declared schema.
///
/// Structural mismatches are reported, never raised.
#[derive(Debug, Clone)]
pub struct DatasetValidator {
    schema: DatasetSchema,
}

impl DatasetValidator {
    pub fn new(schema: DatasetSchema) -> Self {
        Self { schema }
    }

    /// Check column count and column existence. Zero-row datasets with the
    /// right columns pass; cell values are not inspected.
    pub fn validate(&self, dataset: &Dataset) -> ValidationReport {
        info!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Starting data validation"
        );

        let report = ValidationReport {
            expected_columns: self.schema.feature_columns.len(),
            actual_columns: dataset.column_count(),
            missing_numerical: self.missing_from(&self.schema.numerical_columns, dataset),
            missing_categorical: self.missing_from(&self.schema.categorical_columns, dataset),
        };

        info!(
            status = report.column_count_matches(),
            expected = report.expected_columns,
            actual = report.actual_columns,
            "Column count check"
        );
        if !report.missing_numerical.is_empty() {
            info!(columns = ?report.missing_numerical, "Missing numerical columns");
        }
        if !report.missing_categorical.is_empty() {
            info!(columns = ?report.missing_categorical, "Missing categorical columns");
        }
        if report.is_valid() {
            info!("Data validation successful");
        }

        report
    }

    fn missing_from(&self, declared: &[String], dataset: &Dataset) -> Vec<String> {
        declared
            .iter()
            .filter(|column| !dataset.has_column(column))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::dataset::Value;

    fn schema() -> DatasetSchema {
        DatasetSchema {
            feature_columns: vec!["a".to_string(), "b".to_string()],
            drop_columns: vec![],
            numerical_columns: vec!["a".to_string()],
            categorical_columns: vec!["b".to_string()],
        }
    }

    fn dataset_with(columns: &[&str]) -> Dataset {
        Dataset::from_columns(
            columns
                .iter()
                .map(|name| (name.to_string(), vec![Value::Number(1.0)]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_matching_dataset_is_valid() {
        let validator = DatasetValidator::new(schema());
        let report = validator.validate(&dataset_with(&["a", "b"]));
        assert!(report.is_valid());
    }

    #[test]
    fn test_missing_column_fails_both_checks() {
        let validator = DatasetValidator::new(schema());
        let report = validator.validate(&dataset_with(&["a"]));

        assert!(!report.is_valid());
        assert!(!report.column_count_matches());
        assert_eq!(report.missing_categorical, vec!["b".to_string()]);
        assert!(report.missing_numerical.is_empty());
    }

    #[test]
    fn test_extra_column_fails_count_check() {
        let validator = DatasetValidator::new(schema());
        let report = validator.validate(&dataset_with(&["a", "b", "c"]));

        assert!(!report.is_valid());
        assert!(!report.column_count_matches());
        // Existence diagnostics are still complete.
        assert!(report.all_columns_present());
    }

    #[test]
    fn test_missing_names_preserve_schema_order() {
        let schema = DatasetSchema {
            feature_columns: vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string(),
            ],
            drop_columns: vec![],
            numerical_columns: vec!["a".to_string(), "c".to_string(), "d".to_string()],
            categorical_columns: vec!["b".to_string()],
        };
        let validator = DatasetValidator::new(schema);
        let report = validator.validate(&dataset_with(&["b"]));

        assert_eq!(
            report.missing_numerical,
            vec!["a".to_string(), "c".to_string(), "d".to_string()]
        );
    }

    #[test]
    fn test_zero_row_dataset_passes() {
        let validator = DatasetValidator::new(schema());
        let dataset = Dataset::from_columns(vec![
            ("a".to_string(), vec![]),
            ("b".to_string(), vec![]),
        ])
        .unwrap();

        assert!(validator.validate(&dataset).is_valid());
    }
}
