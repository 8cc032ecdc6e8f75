pub mod metrics;
pub mod monitor;

pub use metrics::PlaybackMetrics;
pub use monitor::PlaybackMonitor;
