//! Dataset schema loaded from a YAML document

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Declarative description of the columns an incoming dataset must carry.
///
/// Loaded once at pipeline construction and never mutated. Construction
/// fails fast when the document is malformed rather than deferring string
/// lookups to each use site.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSchema {
    /// Every column the incoming dataset is expected to have, in order
    pub feature_columns: Vec<String>,

    /// Columns removed before the feature table reaches the model
    pub drop_columns: Vec<String>,

    /// Columns that must be present and carry numeric values
    pub numerical_columns: Vec<String>,

    /// Columns that must be present and carry categorical values
    pub categorical_columns: Vec<String>,
}

impl DatasetSchema {
    /// Load and validate a schema from a YAML file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read schema file {:?}", path))?;
        let schema: Self =
            serde_yaml::from_str(&raw).context("failed to parse schema document")?;
        schema.validate()?;

        info!(
            feature_columns = schema.feature_columns.len(),
            drop_columns = schema.drop_columns.len(),
            numerical_columns = schema.numerical_columns.len(),
            categorical_columns = schema.categorical_columns.len(),
            "Schema loaded"
        );
        Ok(schema)
    }

    fn validate(&self) -> Result<()> {
        if self.feature_columns.is_empty() {
            bail!("schema declares no feature columns");
        }
        for column in self.numerical_columns.iter().chain(&self.categorical_columns) {
            if !self.feature_columns.contains(column) {
                bail!(
                    "schema column {:?} is not listed in feature_columns",
                    column
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_schema(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_schema() {
        let file = write_schema(
            "feature_columns: [claim_id, age, collision_type]\n\
             drop_columns: [claim_id]\n\
             numerical_columns: [age]\n\
             categorical_columns: [collision_type]\n",
        );

        let schema = DatasetSchema::load_from_path(file.path()).unwrap();
        assert_eq!(schema.feature_columns.len(), 3);
        assert_eq!(schema.numerical_columns, vec!["age"]);
    }

    #[test]
    fn test_missing_key_fails() {
        let file = write_schema("feature_columns: [age]\ndrop_columns: []\n");
        assert!(DatasetSchema::load_from_path(file.path()).is_err());
    }

    #[test]
    fn test_empty_feature_columns_fails() {
        let file = write_schema(
            "feature_columns: []\n\
             drop_columns: []\n\
             numerical_columns: []\n\
             categorical_columns: []\n",
        );
        assert!(DatasetSchema::load_from_path(file.path()).is_err());
    }

    #[test]
    fn test_undeclared_numerical_column_fails() {
        let file = write_schema(
            "feature_columns: [age]\n\
             drop_columns: []\n\
             numerical_columns: [premium]\n\
             categorical_columns: []\n",
        );
        assert!(DatasetSchema::load_from_path(file.path()).is_err());
    }
}
