use crate::config::SimulationConfig;
use crate::core::{ChannelSpec, NormalRange, Sample};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Synthetic sample source for simulated equipment.
///
/// Values are drawn uniformly from the channel's normal range. An injected
/// anomaly replaces the value with `max * 1.2` or `min * 0.8`. The anomaly
/// flag is always the range check on the final value.
pub struct TelemetryGenerator<R: Rng = StdRng> {
    rng: R,
    window_size: usize,
    anomaly_probability: f64,
    sample_interval: Duration,
}

impl TelemetryGenerator<StdRng> {
    pub fn seeded(seed: u64, window_size: usize) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), window_size)
    }

    pub fn from_entropy(window_size: usize) -> Self {
        Self::with_rng(StdRng::from_entropy(), window_size)
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        let generator = match config.seed {
            Some(seed) => Self::seeded(seed, config.window_size),
            None => Self::from_entropy(config.window_size),
        };
        generator
            .with_anomaly_probability(config.anomaly_probability)
            .with_sample_interval(config.sample_interval())
    }
}

impl<R: Rng> TelemetryGenerator<R> {
    pub fn with_rng(rng: R, window_size: usize) -> Self {
        Self {
            rng,
            window_size,
            anomaly_probability: 0.15,
            sample_interval: Duration::seconds(1),
        }
    }

    pub fn with_anomaly_probability(mut self, probability: f64) -> Self {
        self.anomaly_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn sample_interval(&self) -> Duration {
        self.sample_interval
    }

    /// A full window ending at `end`, oldest first
    pub fn window(&mut self, spec: &ChannelSpec, end: DateTime<Utc>) -> Vec<Sample> {
        let range = spec.normal_range;
        let mut values: Vec<f64> = (0..self.window_size)
            .map(|_| self.draw_in_range(range))
            .collect();

        if let Some(last) = values.last_mut() {
            if self.rng.gen_bool(self.anomaly_probability) {
                *last = self.draw_out_of_range(range);
            }
        }

        let len = values.len() as i32;
        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                let at = end - self.sample_interval * (len - 1 - i as i32);
                Sample::from_range(at, value, range)
            })
            .collect()
    }

    /// One fresh sample at `at`, out of range with `anomaly_probability`
    pub fn next_sample(
        &mut self,
        spec: &ChannelSpec,
        at: DateTime<Utc>,
        anomaly_probability: f64,
    ) -> Sample {
        let range = spec.normal_range;
        let value = if self.rng.gen_bool(anomaly_probability.clamp(0.0, 1.0)) {
            self.draw_out_of_range(range)
        } else {
            self.draw_in_range(range)
        };
        Sample::from_range(at, value, range)
    }

    fn draw_in_range(&mut self, range: NormalRange) -> f64 {
        if range.min < range.max {
            self.rng.gen_range(range.min..=range.max)
        } else {
            range.min
        }
    }

    fn draw_out_of_range(&mut self, range: NormalRange) -> f64 {
        if self.rng.gen_bool(0.5) {
            range.max * 1.2
        } else {
            range.min * 0.8
        }
    }
}
