use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Counters updated by the playback timer task
pub struct PlaybackMetrics {
    label: String,
    ticks: AtomicU64,
    points_processed: AtomicU64,
    samples_appended: AtomicU64,
    anomalies_flagged: AtomicU64,
    total_latency_us: AtomicU64,
}

impl PlaybackMetrics {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ticks: AtomicU64::new(0),
            points_processed: AtomicU64::new(0),
            samples_appended: AtomicU64::new(0),
            anomalies_flagged: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn points_processed(&self) -> u64 {
        self.points_processed.load(Ordering::Relaxed)
    }

    pub fn samples_appended(&self) -> u64 {
        self.samples_appended.load(Ordering::Relaxed)
    }

    pub fn anomalies_flagged(&self) -> u64 {
        self.anomalies_flagged.load(Ordering::Relaxed)
    }

    pub fn start_tick(&self) -> Instant {
        Instant::now()
    }

    pub fn finish_tick(&self, start: Instant, points: u64, samples: u64, anomalies: u64) {
        let latency_us = start.elapsed().as_micros() as u64;
        self.total_latency_us.fetch_add(latency_us, Ordering::Relaxed);
        self.ticks.fetch_add(1, Ordering::Relaxed);
        self.points_processed.fetch_add(points, Ordering::Relaxed);
        self.samples_appended.fetch_add(samples, Ordering::Relaxed);
        self.anomalies_flagged.fetch_add(anomalies, Ordering::Relaxed);
    }

    pub fn avg_tick_latency_us(&self) -> u64 {
        let ticks = self.ticks();
        if ticks == 0 {
            return 0;
        }
        self.total_latency_us.load(Ordering::Relaxed) / ticks
    }
}
