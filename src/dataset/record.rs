use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Categorical column carrying the model verdict
pub const PREDICTION_FIELD: &str = "Prediction";
pub const FAILURE_LABEL: &str = "Failure";
pub const NORMAL_LABEL: &str = "No Failure";

/// One flat dataset row as received
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Normal,
    Failure,
}

impl Label {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            FAILURE_LABEL => Some(Self::Failure),
            NORMAL_LABEL => Some(Self::Normal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => NORMAL_LABEL,
            Self::Failure => FAILURE_LABEL,
        }
    }
}

/// Read-only labeled dataset.
///
/// Feature columns are the numeric fields of the first record, in key order,
/// excluding the prediction column. String-typed fields never count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    records: Vec<Record>,
    features: Vec<String>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        let features = records
            .first()
            .map(|first| {
                first
                    .iter()
                    .filter(|(key, value)| key.as_str() != PREDICTION_FIELD && value.is_number())
                    .map(|(key, _)| key.clone())
                    .collect()
            })
            .unwrap_or_default();

        Self { records, features }
    }

    /// Parse a JSON array of flat objects (the prediction endpoint body)
    pub fn from_json_value(value: Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(Error::Dataset("expected a JSON array of records".into()));
        };

        let mut records = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(record) => records.push(record),
                other => {
                    return Err(Error::Dataset(format!(
                        "record {} is not an object: {}",
                        idx, other
                    )))
                }
            }
        }

        Ok(Self::from_records(records))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_json_value(serde_json::from_str(text)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn label(&self, row: usize) -> Option<Label> {
        self.records
            .get(row)?
            .get(PREDICTION_FIELD)?
            .as_str()
            .and_then(Label::parse)
    }

    pub fn is_failure(&self, row: usize) -> bool {
        self.label(row) == Some(Label::Failure)
    }

    pub fn value(&self, row: usize, feature: &str) -> Option<f64> {
        self.records.get(row)?.get(feature)?.as_f64()
    }

    /// `(label, value)` for every row holding a number in `feature`
    pub fn column<'a>(
        &'a self,
        feature: &'a str,
    ) -> impl Iterator<Item = (Option<Label>, f64)> + 'a {
        (0..self.records.len())
            .filter_map(move |row| self.value(row, feature).map(|v| (self.label(row), v)))
    }

    /// Failure rows among the first `rows` records
    pub fn failures_in(&self, rows: usize) -> u64 {
        (0..rows.min(self.records.len()))
            .filter(|&row| self.is_failure(row))
            .count() as u64
    }
}
