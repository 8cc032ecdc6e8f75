//! Chart-ready views derived from dashboard state. Nothing here mutates.

use super::board::{AnomalyDistribution, Dashboard};
use super::source::SourceKind;
use crate::core::{Channel, FeatureImportance, NormalRange, RunInfo, Status};
use crate::engine::{PlaybackState, TickDriven};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Wall-clock label, `HH:MM:SS`
    pub time: String,
    pub value: f64,
    pub is_anomaly: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSeries {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub normal_range: NormalRange,
    pub status: Status,
    pub current_value: Option<f64>,
    pub summary: Option<WindowSummary>,
    pub points: Vec<ChartPoint>,
}

impl ChannelSeries {
    pub fn from_channel(channel: &Channel) -> Self {
        let points: Vec<ChartPoint> = channel
            .samples()
            .map(|s| ChartPoint {
                time: s.timestamp().format("%H:%M:%S").to_string(),
                value: s.value(),
                is_anomaly: s.is_anomaly(),
            })
            .collect();

        let summary = if points.is_empty() {
            None
        } else {
            let values = points.iter().map(|p| p.value);
            Some(WindowSummary {
                min: values.clone().fold(f64::INFINITY, f64::min),
                max: values.clone().fold(f64::NEG_INFINITY, f64::max),
                mean: values.sum::<f64>() / points.len() as f64,
            })
        };

        Self {
            id: channel.id().to_string(),
            name: channel.name().to_string(),
            unit: channel.spec().unit.clone(),
            normal_range: channel.normal_range(),
            status: channel.status(),
            current_value: channel.current_value(),
            summary,
            points,
        }
    }
}

/// Everything the dashboard view renders for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub source: SourceKind,
    pub source_label: String,
    pub state: PlaybackState,
    pub speed: f64,
    pub speeds: Vec<f64>,
    pub run: RunInfo,
    pub progress_percent: f64,
    pub distribution: AnomalyDistribution,
    pub feature_importance: Vec<FeatureImportance>,
    pub channels: Vec<ChannelSeries>,
}

impl DashboardSnapshot {
    /// Channels currently reporting the given tier
    pub fn channels_with_status(&self, status: Status) -> impl Iterator<Item = &ChannelSeries> {
        self.channels.iter().filter(move |c| c.status == status)
    }
}

pub fn present(dashboard: &Dashboard) -> DashboardSnapshot {
    let playback = dashboard.playback();
    let run = *playback.run();

    DashboardSnapshot {
        source: dashboard.source().kind(),
        source_label: dashboard.source().label(),
        state: playback.state(),
        speed: playback.speed(),
        speeds: playback.speeds().to_vec(),
        run,
        progress_percent: run.progress_percent(),
        distribution: dashboard.distribution(),
        feature_importance: dashboard.feature_importance().to_vec(),
        channels: dashboard.channels().iter().map(ChannelSeries::from_channel).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::{ChannelSpec, Sample};
    use crate::dashboard::DataSource;
    use crate::telemetry::equipment;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_series_summary() {
        let mut channel = Channel::new(
            ChannelSpec::new("v", "Voltage", "V", NormalRange::new(220.0, 240.0)),
            5,
        );
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        for v in [225.0, 230.0, 250.0] {
            channel.push(Sample::from_range(at, v, channel.normal_range()));
        }

        let series = ChannelSeries::from_channel(&channel);
        assert_eq!(series.points.len(), 3);
        assert_eq!(series.points[0].time, "12:30:05");
        assert!(series.points[2].is_anomaly);
        let summary = series.summary.unwrap();
        assert_eq!((summary.min, summary.max), (225.0, 250.0));
        assert!((summary.mean - 235.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_series_has_no_summary() {
        let channel = Channel::new(
            ChannelSpec::new("v", "Voltage", "V", NormalRange::new(220.0, 240.0)),
            5,
        );
        let series = ChannelSeries::from_channel(&channel);
        assert!(series.summary.is_none());
        assert_eq!(series.current_value, None);
    }

    #[test]
    fn test_snapshot_reflects_dashboard() {
        let mut config = AppConfig::default();
        config.simulation.seed = Some(3);
        let profile = equipment::find("power-unit").unwrap();
        let dashboard = Dashboard::new(DataSource::Hardware(profile), &config);

        let snapshot = present(&dashboard);
        assert_eq!(snapshot.source, SourceKind::Hardware);
        assert_eq!(snapshot.state, PlaybackState::Paused);
        assert_eq!(snapshot.channels.len(), 3);
        assert_eq!(snapshot.progress_percent, 0.0);
        assert_eq!(snapshot.speeds, vec![0.5, 1.0, 2.0, 5.0]);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["channels"][0]["points"].is_array());
        assert_eq!(json["run"]["totalPoints"], 500);
    }
}
