//! Tabular dataset structures for batch fraud inference

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

/// A single cell in a dataset.
///
/// `Missing` is a distinct marker: it is not `0.0` and not the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Canonical string form used for CSV output and categorical keys.
    /// Whole numbers render without a trailing fraction.
    pub fn render(&self) -> String {
        match self {
            Value::Number(n) => format!("{}", n),
            Value::Text(s) => s.clone(),
            Value::Missing => String::new(),
        }
    }
}

/// A named column of values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

/// An in-memory table of rows by named columns.
///
/// Column order is preserved from the source. All columns hold the same
/// number of rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Create an empty dataset with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from named columns, checking that lengths agree.
    pub fn from_columns(columns: Vec<(String, Vec<Value>)>) -> Result<Self> {
        let mut dataset = Self::new();
        for (name, values) in columns {
            dataset.append_column(&name, values)?;
        }
        Ok(dataset)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .map(|c| &mut c.values)
    }

    /// Remove the named columns. Names not present are ignored.
    pub fn drop_columns(&mut self, names: &[String]) {
        self.columns
            .retain(|c| !names.iter().any(|n| n == &c.name));
    }

    /// Replace every `Text` cell equal to `sentinel` with `Value::Missing`.
    pub fn normalize_missing(&mut self, sentinel: &str) {
        for column in &mut self.columns {
            for value in &mut column.values {
                if value.as_text() == Some(sentinel) {
                    *value = Value::Missing;
                }
            }
        }
    }

    /// Append a new column. Fails on a duplicate name or a row-count
    /// mismatch with the existing columns.
    pub fn append_column(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        if self.has_column(name) {
            bail!("column {:?} already exists", name);
        }
        if !self.columns.is_empty() && values.len() != self.row_count() {
            bail!(
                "column {:?} has {} rows, dataset has {}",
                name,
                values.len(),
                self.row_count()
            );
        }
        self.columns.push(Column {
            name: name.to_string(),
            values,
        });
        Ok(())
    }

    /// Read a dataset from CSV with a header row. Cells that parse as a
    /// number become `Value::Number`; everything else stays text, including
    /// the `"?"` sentinel, which is normalized later in the pipeline.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers: Vec<String> = csv_reader
            .headers()
            .context("failed to read CSV header")?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
        for record in csv_reader.records() {
            let record = record.context("failed to read CSV record")?;
            if record.len() != headers.len() {
                bail!(
                    "CSV record has {} fields, header has {}",
                    record.len(),
                    headers.len()
                );
            }
            for (idx, field) in record.iter().enumerate() {
                columns[idx].push(parse_cell(field));
            }
        }

        Self::from_columns(headers.into_iter().zip(columns).collect())
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open dataset file {:?}", path))?;
        Self::from_csv_reader(file)
    }

    /// Write the dataset as CSV with a header row. Missing cells render
    /// as empty fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer
            .write_record(self.column_names())
            .context("failed to write CSV header")?;
        for row in 0..self.row_count() {
            let record: Vec<String> = self
                .columns
                .iter()
                .map(|c| c.values[row].render())
                .collect();
            csv_writer
                .write_record(&record)
                .context("failed to write CSV record")?;
        }
        csv_writer.flush().context("failed to flush CSV output")?;
        Ok(())
    }

    pub fn to_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create output file {:?}", path))?;
        self.write_csv(file)
    }

    /// Export rows as JSON objects keyed by column name.
    pub fn to_json_records(&self) -> Vec<serde_json::Value> {
        let mut records = Vec::with_capacity(self.row_count());
        for row in 0..self.row_count() {
            let mut object = serde_json::Map::new();
            for column in &self.columns {
                let value = match &column.values[row] {
                    Value::Number(n) => serde_json::Number::from_f64(*n)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null),
                    Value::Text(s) => serde_json::Value::String(s.clone()),
                    Value::Missing => serde_json::Value::Null,
                };
                object.insert(column.name.clone(), value);
            }
            records.push(serde_json::Value::Object(object));
        }
        records
    }
}

fn parse_cell(field: &str) -> Value {
    match field.parse::<f64>() {
        Ok(n) => Value::Number(n),
        Err(_) => Value::Text(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_columns(vec![
            (
                "age".to_string(),
                vec![Value::Number(34.0), Value::Number(51.0)],
            ),
            (
                "collision_type".to_string(),
                vec![Value::Text("Rear Collision".to_string()), Value::Text("?".to_string())],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_csv_round_trip() {
        let csv = "age,collision_type\n34,Rear Collision\n51,?\n";
        let dataset = Dataset::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(dataset.column_count(), 2);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.column("age").unwrap()[0], Value::Number(34.0));
        // The sentinel survives ingestion as text.
        assert_eq!(
            dataset.column("collision_type").unwrap()[1],
            Value::Text("?".to_string())
        );

        let mut out = Vec::new();
        dataset.write_csv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), csv);
    }

    #[test]
    fn test_normalize_missing() {
        let mut dataset = sample();
        dataset.normalize_missing("?");

        assert_eq!(dataset.column("collision_type").unwrap()[1], Value::Missing);
        // Non-sentinel text is untouched.
        assert_eq!(
            dataset.column("collision_type").unwrap()[0],
            Value::Text("Rear Collision".to_string())
        );
    }

    #[test]
    fn test_drop_columns_ignores_absent_names() {
        let mut dataset = sample();
        dataset.drop_columns(&["collision_type".to_string(), "no_such_column".to_string()]);

        assert_eq!(dataset.column_names(), vec!["age"]);
    }

    #[test]
    fn test_append_column_rejects_length_mismatch() {
        let mut dataset = sample();
        let result = dataset.append_column("prediction", vec![Value::Number(1.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_append_column_rejects_duplicate_name() {
        let mut dataset = sample();
        let result = dataset.append_column("age", vec![Value::Number(1.0), Value::Number(2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_dataset_serialization() {
        let dataset = sample();

        let json = serde_json::to_string(&dataset).unwrap();
        let deserialized: Dataset = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.column_count(), dataset.column_count());
        assert_eq!(deserialized.column("age").unwrap(), dataset.column("age").unwrap());
    }

    #[test]
    fn test_json_records() {
        let mut dataset = sample();
        dataset.normalize_missing("?");
        let records = dataset.to_json_records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["age"], serde_json::json!(34.0));
        assert_eq!(records[1]["collision_type"], serde_json::Value::Null);
    }
}
