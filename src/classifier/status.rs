use crate::core::{NormalRange, Status};
use serde::{Deserialize, Serialize};

/// Range-based three-tier labeling.
///
/// Values outside the range are `Anomaly`. Values inside the range but
/// strictly closer to a bound than `warning_margin * width` are `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusClassifier {
    warning_margin: f64,
}

impl StatusClassifier {
    pub fn new(warning_margin: f64) -> Self {
        Self { warning_margin }
    }

    /// Two-tier classifier: never emits `Warning`
    pub fn two_tier() -> Self {
        Self::new(0.0)
    }

    pub fn warning_margin(&self) -> f64 {
        self.warning_margin
    }

    pub fn status(&self, value: f64, range: NormalRange) -> Status {
        if !range.contains(value) {
            return Status::Anomaly;
        }

        let band = range.width() * self.warning_margin;
        if value < range.min + band || value > range.max - band {
            Status::Warning
        } else {
            Status::Normal
        }
    }
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new(0.1)
    }
}
