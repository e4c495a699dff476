//! Missing-value detection and imputation

use crate::schema::DatasetSchema;
use crate::types::dataset::{Dataset, Value};
use std::collections::HashMap;
use tracing::debug;

/// Per-column imputation of missing values: mean for columns the schema
/// declares numerical, most frequent value otherwise.
#[derive(Debug, Clone)]
pub struct DataTransformer {
    numerical_columns: Vec<String>,
}

impl DataTransformer {
    pub fn new(schema: &DatasetSchema) -> Self {
        Self {
            numerical_columns: schema.numerical_columns.clone(),
        }
    }

    /// Names of columns containing at least one missing marker, in dataset
    /// column order.
    pub fn columns_with_missing_values(&self, dataset: &Dataset) -> Vec<String> {
        dataset
            .column_names()
            .into_iter()
            .filter(|name| {
                dataset
                    .column(name)
                    .is_some_and(|values| values.iter().any(Value::is_missing))
            })
            .map(str::to_string)
            .collect()
    }

    /// Impute missing markers in the named columns.
    pub fn impute_missing_values(&self, dataset: &mut Dataset, columns: &[String]) {
        for name in columns {
            let replacement = if self.numerical_columns.contains(name) {
                self.column_mean(dataset, name)
            } else {
                self.column_mode(dataset, name)
            };

            debug!(column = %name, replacement = %replacement.render(), "Imputing missing values");

            if let Some(values) = dataset.column_mut(name) {
                for value in values.iter_mut() {
                    if value.is_missing() {
                        *value = replacement.clone();
                    }
                }
            }
        }
    }

    /// Mean of the numeric cells. A column with no numeric cells imputes
    /// to zero.
    fn column_mean(&self, dataset: &Dataset, name: &str) -> Value {
        let Some(values) = dataset.column(name) else {
            return Value::Number(0.0);
        };
        let numbers: Vec<f64> = values.iter().filter_map(Value::as_number).collect();
        if numbers.is_empty() {
            return Value::Number(0.0);
        }
        Value::Number(numbers.iter().sum::<f64>() / numbers.len() as f64)
    }

    /// Most frequent non-missing value, first occurrence winning ties.
    /// A column with only missing cells imputes to "unknown".
    fn column_mode(&self, dataset: &Dataset, name: &str) -> Value {
        let Some(values) = dataset.column(name) else {
            return Value::Text("unknown".to_string());
        };

        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut best: Option<(Value, usize)> = None;
        for value in values.iter().filter(|v| !v.is_missing()) {
            let count = counts.entry(value.render()).or_insert(0);
            *count += 1;
            match &best {
                Some((_, best_count)) if *count <= *best_count => {}
                _ => best = Some((value.clone(), *count)),
            }
        }

        best.map(|(value, _)| value)
            .unwrap_or_else(|| Value::Text("unknown".to_string()))
    }
}
