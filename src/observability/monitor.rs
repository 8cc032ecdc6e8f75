use super::PlaybackMetrics;
use std::sync::Arc;

pub struct PlaybackMonitor {
    metrics: Arc<PlaybackMetrics>,
}

impl PlaybackMonitor {
    pub fn new(metrics: Arc<PlaybackMetrics>) -> Self {
        Self { metrics }
    }

    pub fn generate_report(&self) -> String {
        let m = &self.metrics;

        if m.ticks() == 0 {
            return format!("[{}] no ticks recorded", m.label());
        }

        format!(
            "=== Playback Metrics ===\n\n[{}]\n  Ticks: {}\n  Points: {} processed\n  Samples: {} appended\n  Anomalies: {}\n  Avg Tick Latency: {}μs\n",
            m.label(),
            m.ticks(),
            m.points_processed(),
            m.samples_appended(),
            if m.anomalies_flagged() > 0 {
                format!(
                    "{} anomal{}",
                    m.anomalies_flagged(),
                    if m.anomalies_flagged() == 1 { "y" } else { "ies" }
                )
            } else {
                "none".to_string()
            },
            m.avg_tick_latency_us()
        )
    }

    pub fn metrics(&self) -> &PlaybackMetrics {
        &self.metrics
    }
}
