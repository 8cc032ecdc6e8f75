use crate::error::{Error, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const API_BASE_ENV: &str = "ANOMALAB_API_BASE";
pub const SEED_ENV: &str = "ANOMALAB_SEED";

/// Upper bound for `simulation.sample_interval_secs` (one day)
pub const MAX_SAMPLE_INTERVAL_SECS: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub playback: PlaybackConfig,
    pub classifier: ClassifierConfig,
    pub prediction: PredictionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Samples kept per channel
    pub window_size: usize,
    /// Chance that a freshly generated window ends in an out-of-range sample
    pub anomaly_probability: f64,
    /// Chance that a sample appended on a tick is out of range
    pub tick_anomaly_probability: f64,
    /// Length of a simulated hardware run
    pub total_points: u64,
    /// Spacing between synthetic sample timestamps
    pub sample_interval_secs: i64,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            window_size: 20,
            anomaly_probability: 0.15,
            tick_anomaly_probability: 0.2,
            total_points: 500,
            sample_interval_secs: 1,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Sample spacing, held to `1..=MAX_SAMPLE_INTERVAL_SECS` seconds
    pub fn sample_interval(&self) -> Duration {
        Duration::seconds(self.sample_interval_secs.clamp(1, MAX_SAMPLE_INTERVAL_SECS))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub speeds: Vec<f64>,
    pub default_speed: f64,
    /// Tick period at 1x
    pub base_interval_ms: u64,
    /// Points consumed per tick at 1x
    pub points_per_tick: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speeds: vec![0.5, 1.0, 2.0, 5.0],
            default_speed: 1.0,
            base_interval_ms: 1000,
            points_per_tick: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Fraction of the range width, measured inward from each bound, that
    /// counts as the warning band. 0 disables the warning tier.
    pub warning_margin: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            warning_margin: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {:?}: {}", path, e)))?;

        let config: AppConfig = match extension(path).as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
                .map_err(|e| Error::Config(format!("Failed to parse {:?}: {}", path, e)))?,
            Some("json") => serde_json::from_str(&text)
                .map_err(|e| Error::Config(format!("Failed to parse {:?}: {}", path, e)))?,
            other => {
                return Err(Error::Config(format!(
                    "Unsupported config format {:?} for {:?}",
                    other, path
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply `.env` and process environment overrides
    pub fn with_env_overrides(mut self) -> Result<Self> {
        dotenvy::dotenv().ok();

        if let Ok(api_base) = std::env::var(API_BASE_ENV) {
            self.prediction.api_base = api_base;
        }
        if let Ok(seed) = std::env::var(SEED_ENV) {
            let seed = seed.parse().map_err(|_| {
                Error::Config(format!("{} must be an integer, got {:?}", SEED_ENV, seed))
            })?;
            self.simulation.seed = Some(seed);
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        if sim.window_size == 0 {
            return Err(Error::Config("simulation.window_size must be positive".into()));
        }
        for (name, p) in [
            ("anomaly_probability", sim.anomaly_probability),
            ("tick_anomaly_probability", sim.tick_anomaly_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::Config(format!("simulation.{} must be within [0, 1]", name)));
            }
        }
        if !(1..=MAX_SAMPLE_INTERVAL_SECS).contains(&sim.sample_interval_secs) {
            return Err(Error::Config(format!(
                "simulation.sample_interval_secs must be within [1, {}], got {}",
                MAX_SAMPLE_INTERVAL_SECS, sim.sample_interval_secs
            )));
        }

        let playback = &self.playback;
        if playback.speeds.is_empty() {
            return Err(Error::Config("playback.speeds must not be empty".into()));
        }
        if playback.speeds.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(Error::Config("playback.speeds must be positive".into()));
        }
        if !playback.speeds.contains(&playback.default_speed) {
            return Err(Error::Config(format!(
                "playback.default_speed {} is not one of {:?}",
                playback.default_speed, playback.speeds
            )));
        }
        if playback.base_interval_ms == 0 || playback.points_per_tick <= 0.0 {
            return Err(Error::Config(
                "playback.base_interval_ms and playback.points_per_tick must be positive".into(),
            ));
        }

        let margin = self.classifier.warning_margin;
        if !(0.0..0.5).contains(&margin) {
            return Err(Error::Config("classifier.warning_margin must be within [0, 0.5)".into()));
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}
