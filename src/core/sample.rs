use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declared normal operating range of a channel (inclusive on both ends)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalRange {
    pub min: f64,
    pub max: f64,
}

impl NormalRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Health tier of a value or channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Normal,
    Warning,
    Anomaly,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Anomaly => "anomaly",
        }
    }
}

/// One timestamped observation. Fields are private so the anomaly flag cannot
/// drift from the value after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    timestamp: DateTime<Utc>,
    value: f64,
    normal_range: NormalRange,
    is_anomaly: bool,
}

impl Sample {
    /// Flag derived from the range check
    pub fn from_range(timestamp: DateTime<Utc>, value: f64, normal_range: NormalRange) -> Self {
        Self {
            timestamp,
            value,
            normal_range,
            is_anomaly: !normal_range.contains(value),
        }
    }

    /// Flag taken from an explicit label (dataset rows)
    pub fn labeled(
        timestamp: DateTime<Utc>,
        value: f64,
        normal_range: NormalRange,
        is_anomaly: bool,
    ) -> Self {
        Self {
            timestamp,
            value,
            normal_range,
            is_anomaly,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn normal_range(&self) -> NormalRange {
        self.normal_range
    }

    pub fn is_anomaly(&self) -> bool {
        self.is_anomaly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_check_flags_out_of_range() {
        let range = NormalRange::new(10.0, 20.0);
        let now = Utc::now();

        assert!(!Sample::from_range(now, 10.0, range).is_anomaly());
        assert!(!Sample::from_range(now, 20.0, range).is_anomaly());
        assert!(Sample::from_range(now, 9.99, range).is_anomaly());
        assert!(Sample::from_range(now, 24.0, range).is_anomaly());
    }

    #[test]
    fn test_degenerate_range_is_exact_match() {
        let range = NormalRange::new(5.0, 5.0);
        let now = Utc::now();

        assert!(!Sample::from_range(now, 5.0, range).is_anomaly());
        assert!(Sample::from_range(now, 5.0001, range).is_anomaly());
    }

    #[test]
    fn test_sample_serializes_camel_case() {
        let sample = Sample::labeled(Utc::now(), 1.5, NormalRange::new(0.0, 1.0), true);
        let json = serde_json::to_value(&sample).unwrap();

        assert_eq!(json["isAnomaly"], true);
        assert_eq!(json["normalRange"]["max"], 1.0);
    }
}
