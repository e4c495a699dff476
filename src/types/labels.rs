//! Mapping between domain labels and the integer codes the model emits

use anyhow::{bail, Result};

/// Two-way mapping between human-readable classification labels and the
/// integer codes used internally by the trained model.
///
/// The mapping must be bijective over the codes the model can emit; the
/// reverse direction is applied to the `prediction` column after inference.
#[derive(Debug, Clone)]
pub struct TargetLabelMapping {
    pairs: Vec<(String, i64)>,
}

impl TargetLabelMapping {
    /// Build a mapping from label/code pairs, rejecting duplicates on
    /// either side.
    pub fn new(pairs: Vec<(String, i64)>) -> Result<Self> {
        for (idx, (label, code)) in pairs.iter().enumerate() {
            for (other_label, other_code) in &pairs[idx + 1..] {
                if label == other_label {
                    bail!("duplicate label {:?} in target mapping", label);
                }
                if code == other_code {
                    bail!("duplicate code {} in target mapping", code);
                }
            }
        }
        Ok(Self { pairs })
    }

    pub fn code_for(&self, label: &str) -> Option<i64> {
        self.pairs
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| *c)
    }

    pub fn label_for(&self, code: i64) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(l, _)| l.as_str())
    }

    /// Codes in mapping order.
    pub fn codes(&self) -> Vec<i64> {
        self.pairs.iter().map(|(_, c)| *c).collect()
    }
}

impl Default for TargetLabelMapping {
    fn default() -> Self {
        Self {
            pairs: vec![
                ("legitimate".to_string(), 0),
                ("fraud".to_string(), 1),
            ],
        }
    }
}
