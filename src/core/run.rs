use serde::{Deserialize, Serialize};

/// Aggregate progress counters for a replay.
///
/// `processed_points` never exceeds `total_points` and `is_complete` holds
/// exactly when they are equal. All mutation goes through the methods below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInfo {
    total_points: u64,
    processed_points: u64,
    anomalies_found: u64,
    is_complete: bool,
}

impl RunInfo {
    pub fn new(total_points: u64) -> Self {
        Self {
            total_points,
            processed_points: 0,
            anomalies_found: 0,
            is_complete: total_points == 0,
        }
    }

    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    pub fn processed_points(&self) -> u64 {
        self.processed_points
    }

    pub fn anomalies_found(&self) -> u64 {
        self.anomalies_found
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn remaining(&self) -> u64 {
        self.total_points - self.processed_points
    }

    /// Advance by `step`, clamped to the total. Returns the number of points
    /// actually consumed.
    pub fn advance(&mut self, step: u64) -> u64 {
        let consumed = step.min(self.remaining());
        self.processed_points += consumed;
        self.is_complete = self.processed_points == self.total_points;
        consumed
    }

    pub fn record_anomalies(&mut self, count: u64) {
        self.anomalies_found += count;
    }

    pub fn reset(&mut self) {
        self.processed_points = 0;
        self.anomalies_found = 0;
        self.is_complete = self.total_points == 0;
    }

    /// Share of the run processed, in percent. Empty runs count as done.
    pub fn progress_percent(&self) -> f64 {
        if self.total_points == 0 {
            return 100.0;
        }
        self.processed_points as f64 * 100.0 / self.total_points as f64
    }
}

impl Default for RunInfo {
    fn default() -> Self {
        Self::new(0)
    }
}
