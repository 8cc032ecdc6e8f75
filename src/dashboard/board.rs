use super::source::DataSource;
use crate::classifier::{feature_importance, StatusClassifier};
use crate::config::AppConfig;
use crate::core::{Channel, ChannelSpec, FeatureImportance, NormalRange, Sample, Status};
use crate::dataset::{Dataset, Label};
use crate::engine::{Playback, TickDriven, TickReport};
use crate::telemetry::TelemetryGenerator;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// Normal vs anomalous counts over what has been processed so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnomalyDistribution {
    pub normal: u64,
    pub anomaly: u64,
}

/// In-memory dashboard state for one data source.
///
/// Channels and run counters change only through `TickDriven::tick` and
/// `restart`, which the playback runner calls.
pub struct Dashboard {
    source: DataSource,
    channels: Vec<Channel>,
    playback: Playback,
    feature_importance: Vec<FeatureImportance>,
    distribution: AnomalyDistribution,
    classifier: StatusClassifier,
    generator: TelemetryGenerator,
    tick_anomaly_probability: f64,
    sample_interval: Duration,
    /// Timestamp of the next simulated sample, or of dataset row 0
    clock: DateTime<Utc>,
}

impl Dashboard {
    pub fn new(source: DataSource, config: &AppConfig) -> Self {
        Self::with_generator(source, config, TelemetryGenerator::from_config(&config.simulation))
    }

    pub fn with_generator(
        source: DataSource,
        config: &AppConfig,
        generator: TelemetryGenerator,
    ) -> Self {
        let now = Utc::now();
        let window_size = config.simulation.window_size;
        let classifier = StatusClassifier::new(config.classifier.warning_margin);

        let (channels, total_points, importance) = match &source {
            DataSource::Hardware(profile) => (
                profile
                    .channels
                    .iter()
                    .map(|spec| Channel::new(spec.clone(), window_size))
                    .collect(),
                config.simulation.total_points,
                Vec::new(),
            ),
            DataSource::Dataset(dataset) => {
                // nothing to chart without a numeric column
                let total_points = if dataset.features().is_empty() {
                    if !dataset.is_empty() {
                        warn!(
                            records = dataset.len(),
                            "Dataset has no numeric feature columns, skipping replay"
                        );
                    }
                    0
                } else {
                    dataset.len() as u64
                };
                (
                    dataset_channels(dataset, window_size),
                    total_points,
                    feature_importance(dataset),
                )
            }
        };

        let mut dashboard = Self {
            source,
            channels,
            playback: Playback::new(total_points, &config.playback),
            feature_importance: importance,
            distribution: AnomalyDistribution::default(),
            classifier,
            generator,
            tick_anomaly_probability: config.simulation.tick_anomaly_probability,
            sample_interval: config.simulation.sample_interval(),
            clock: now,
        };

        if let DataSource::Hardware(_) = dashboard.source {
            dashboard.fill_initial_windows(now);
        }

        info!(
            source = %dashboard.source.label(),
            channels = dashboard.channels.len(),
            total = dashboard.playback.run().total_points(),
            "Dashboard loaded"
        );
        dashboard
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn feature_importance(&self) -> &[FeatureImportance] {
        &self.feature_importance
    }

    pub fn distribution(&self) -> AnomalyDistribution {
        self.distribution
    }

    pub fn classifier(&self) -> StatusClassifier {
        self.classifier
    }

    /// Bulk replacement with freshly generated windows ending at `end`
    fn fill_initial_windows(&mut self, end: DateTime<Utc>) {
        for channel in &mut self.channels {
            let window = self.generator.window(channel.spec(), end);
            channel.replace(window);
            let status = channel_status(&self.classifier, channel);
            channel.set_status(status);
        }
        self.clock = end + self.sample_interval;
    }

    fn tick_hardware(&mut self) -> (u64, u64) {
        let at = self.clock;
        let mut appended = 0;
        let mut anomalies = 0;

        for channel in &mut self.channels {
            let sample = self
                .generator
                .next_sample(channel.spec(), at, self.tick_anomaly_probability);
            if sample.is_anomaly() {
                anomalies += 1;
            }
            channel.push(sample);
            let status = channel_status(&self.classifier, channel);
            channel.set_status(status);
            appended += 1;
        }

        self.clock = at + self.sample_interval;
        self.distribution.normal += appended - anomalies;
        self.distribution.anomaly += anomalies;
        (appended, anomalies)
    }

    fn tick_dataset(&mut self, dataset: &Dataset, from: u64, to: u64) -> (u64, u64) {
        let (from, to) = (from as usize, to as usize);
        let mut appended = 0;

        for channel in &mut self.channels {
            // only rows that can still be visible once the tick is applied
            let first = from.max(to.saturating_sub(channel.window_size()));
            for row in first..to {
                let Some(value) = dataset.value(row, channel.id()) else {
                    continue;
                };
                let at = row_timestamp(self.clock, self.sample_interval, row);
                channel.push(Sample::labeled(
                    at,
                    value,
                    channel.normal_range(),
                    dataset.is_failure(row),
                ));
                appended += 1;
            }
            let status = channel_status(&self.classifier, channel);
            channel.set_status(status);
        }

        let anomalies = (from..to).filter(|&row| dataset.is_failure(row)).count() as u64;
        self.distribution.normal += (to - from) as u64 - anomalies;
        self.distribution.anomaly += anomalies;
        (appended, anomalies)
    }
}

impl TickDriven for Dashboard {
    fn playback(&self) -> &Playback {
        &self.playback
    }

    fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }

    fn tick(&mut self) -> Option<TickReport> {
        let tick = self.playback.tick()?;

        let (samples_appended, anomalies) = match &self.source {
            DataSource::Hardware(_) => self.tick_hardware(),
            DataSource::Dataset(dataset) => {
                let dataset = dataset.clone();
                self.tick_dataset(&dataset, tick.from, tick.to)
            }
        };
        self.playback.record_anomalies(anomalies);

        Some(TickReport {
            tick,
            samples_appended,
            anomalies,
        })
    }

    fn restart(&mut self) {
        self.playback.restart();
        self.distribution = AnomalyDistribution::default();
        if let DataSource::Dataset(_) = self.source {
            for channel in &mut self.channels {
                channel.clear();
            }
        }
    }
}

/// `start + interval * row`, saturating at the latest representable time
fn row_timestamp(start: DateTime<Utc>, interval: Duration, row: usize) -> DateTime<Utc> {
    i32::try_from(row)
        .ok()
        .and_then(|row| interval.checked_mul(row))
        .and_then(|offset| start.checked_add_signed(offset))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Latest sample decides: a flagged sample is an anomaly, otherwise the
/// range classifier picks the tier
fn channel_status(classifier: &StatusClassifier, channel: &Channel) -> Status {
    match channel.latest() {
        Some(sample) if sample.is_anomaly() => Status::Anomaly,
        Some(sample) => classifier.status(sample.value(), channel.normal_range()),
        None => Status::Normal,
    }
}

/// One channel per numeric feature. The normal range is the span of the
/// feature over "No Failure" rows, or over all rows when there are none.
fn dataset_channels(dataset: &Dataset, window_size: usize) -> Vec<Channel> {
    dataset
        .features()
        .iter()
        .map(|feature| {
            let normal: Vec<f64> = dataset
                .column(feature)
                .filter(|(label, _)| *label == Some(Label::Normal))
                .map(|(_, v)| v)
                .collect();
            let values = if normal.is_empty() {
                dataset.column(feature).map(|(_, v)| v).collect()
            } else {
                normal
            };
            let range = span(&values);
            let spec = ChannelSpec::new(feature.as_str(), feature.as_str(), "", range);
            Channel::new(spec, window_size)
        })
        .collect()
}

fn span(values: &[f64]) -> NormalRange {
    if values.is_empty() {
        return NormalRange::new(0.0, 0.0);
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    NormalRange::new(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::equipment;
    use serde_json::json;
    use std::sync::Arc;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.simulation.seed = Some(17);
        config.simulation.total_points = 50;
        config
    }

    fn dataset() -> Arc<Dataset> {
        Arc::new(
            Dataset::from_json_value(json!([
                {"temp": 10, "rpm": 1500, "Prediction": "No Failure"},
                {"temp": 12, "rpm": 1550, "Prediction": "No Failure"},
                {"temp": 30, "rpm": 1490, "Prediction": "Failure"},
                {"temp": 11, "rpm": 1520, "Prediction": "No Failure"},
                {"temp": 31, "rpm": 1600, "Prediction": "Failure"},
                {"temp": 11, "rpm": 1510, "Prediction": "No Failure"}
            ]))
            .unwrap(),
        )
    }

    #[test]
    fn test_hardware_starts_with_full_windows() {
        let pump = equipment::find("industrial-pump").unwrap();
        let dashboard = Dashboard::new(DataSource::Hardware(pump), &config());

        assert_eq!(dashboard.channels().len(), 4);
        assert!(dashboard.channels().iter().all(|c| c.samples().len() == 20));
        assert_eq!(dashboard.playback().run().total_points(), 50);
        assert!(dashboard.feature_importance().is_empty());
    }

    #[test]
    fn test_hardware_tick_appends_one_sample_per_channel() {
        let pump = equipment::find("industrial-pump").unwrap();
        let mut dashboard = Dashboard::new(DataSource::Hardware(pump), &config());
        let before: Vec<_> = dashboard.channels().iter().map(|c| c.latest().cloned()).collect();

        dashboard.playback_mut().play().unwrap();
        let report = dashboard.tick().unwrap();

        assert_eq!(report.samples_appended, 4);
        for (channel, old) in dashboard.channels().iter().zip(before) {
            assert_eq!(channel.samples().len(), 20);
            assert!(channel.latest().unwrap().timestamp() > old.unwrap().timestamp());
        }
        let dist = dashboard.distribution();
        assert_eq!(dist.normal + dist.anomaly, 4);
        assert_eq!(dashboard.playback().run().anomalies_found(), dist.anomaly);
    }

    #[test]
    fn test_dataset_channels_use_normal_rows_for_range() {
        let dashboard = Dashboard::new(DataSource::Dataset(dataset()), &config());
        let temp = &dashboard.channels()[0];

        assert_eq!(temp.id(), "temp");
        assert_eq!(temp.normal_range(), NormalRange::new(10.0, 12.0));
        assert_eq!(temp.samples().len(), 0);
        assert_eq!(dashboard.feature_importance()[0].name, "temp");
    }

    #[test]
    fn test_dataset_tick_replays_rows() {
        let mut dashboard = Dashboard::new(DataSource::Dataset(dataset()), &config());
        dashboard.playback_mut().play().unwrap();

        let report = dashboard.tick().unwrap();
        assert_eq!((report.tick.from, report.tick.to), (0, 5));
        assert_eq!(report.anomalies, 2);
        assert_eq!(dashboard.channels()[0].samples().len(), 5);
        assert_eq!(dashboard.channels()[0].status(), Status::Anomaly);

        let report = dashboard.tick().unwrap();
        assert!(report.tick.completed);
        assert_eq!(dashboard.playback().run().anomalies_found(), 2);
        assert_eq!(dashboard.distribution(), AnomalyDistribution { normal: 4, anomaly: 2 });
        assert_eq!(dashboard.channels()[0].current_value(), Some(11.0));
        assert!(dashboard.tick().is_none());
    }

    #[test]
    fn test_restart_clears_dataset_windows() {
        let mut dashboard = Dashboard::new(DataSource::Dataset(dataset()), &config());
        dashboard.playback_mut().play().unwrap();
        dashboard.tick();
        dashboard.restart();

        assert_eq!(dashboard.playback().run().processed_points(), 0);
        assert_eq!(dashboard.playback().run().total_points(), 6);
        assert!(dashboard.channels().iter().all(|c| c.samples().len() == 0));
        assert_eq!(dashboard.distribution(), AnomalyDistribution::default());
    }

    #[test]
    fn test_row_timestamp_saturates() {
        let start = Utc::now();
        let step = Duration::seconds(2);

        assert_eq!(row_timestamp(start, step, 0), start);
        assert_eq!(row_timestamp(start, step, 3), start + Duration::seconds(6));
        assert_eq!(row_timestamp(start, step, usize::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(
            row_timestamp(start, Duration::days(365), i32::MAX as usize),
            DateTime::<Utc>::MAX_UTC
        );
    }

    #[test]
    fn test_empty_dataset() {
        let empty = Arc::new(Dataset::from_json_str("[]").unwrap());
        let dashboard = Dashboard::new(DataSource::Dataset(empty), &config());
        let run = dashboard.playback().run();

        assert!(dashboard.feature_importance().is_empty());
        assert!(dashboard.channels().is_empty());
        assert_eq!(
            (run.total_points(), run.processed_points(), run.anomalies_found(), run.is_complete()),
            (0, 0, 0, true)
        );
    }
}
