use anomalab::classifier::StatusClassifier;
use anomalab::config::{AppConfig, SimulationConfig};
use anomalab::core::{ChannelSpec, NormalRange, Status};
use anomalab::telemetry::{equipment, TelemetryGenerator};
use chrono::Utc;

#[test]
fn test_anomaly_flag_matches_range_check_for_all_profiles() {
    let mut generator = TelemetryGenerator::seeded(42, 20).with_anomaly_probability(0.5);
    let now = Utc::now();

    for profile in equipment::catalog() {
        for spec in &profile.channels {
            for _ in 0..50 {
                for sample in generator.window(spec, now) {
                    let range = sample.normal_range();
                    let outside = sample.value() < range.min || sample.value() > range.max;
                    assert_eq!(sample.is_anomaly(), outside, "{} {}", profile.id, spec.id);
                }
            }
        }
    }
}

#[test]
fn test_injected_anomalies_only_at_window_end() {
    let spec = ChannelSpec::new("temperature", "Temperature", "°C", NormalRange::new(60.0, 80.0));
    let mut generator = TelemetryGenerator::seeded(9, 20).with_anomaly_probability(1.0);

    let window = generator.window(&spec, Utc::now());
    assert_eq!(window.len(), 20);
    assert!(window[..19].iter().all(|s| !s.is_anomaly()));
    let last = window[19].value();
    assert!((last - 96.0).abs() < 1e-9 || (last - 48.0).abs() < 1e-9);
}

#[test]
fn test_same_seed_same_telemetry() {
    let config = SimulationConfig {
        seed: Some(1234),
        ..SimulationConfig::default()
    };
    let spec = &equipment::find("power-unit").unwrap().channels[0];
    let now = Utc::now();

    let a: Vec<f64> = TelemetryGenerator::from_config(&config)
        .window(spec, now)
        .iter()
        .map(|s| s.value())
        .collect();
    let b: Vec<f64> = TelemetryGenerator::from_config(&config)
        .window(spec, now)
        .iter()
        .map(|s| s.value())
        .collect();
    assert_eq!(a, b);
}

#[test]
fn test_degenerate_range_is_exact_match() {
    let spec = ChannelSpec::new("setpoint", "Setpoint", "", NormalRange::new(5.0, 5.0));
    let mut generator = TelemetryGenerator::seeded(1, 10).with_anomaly_probability(0.0);

    let window = generator.window(&spec, Utc::now());
    assert!(window.iter().all(|s| s.value() == 5.0 && !s.is_anomaly()));

    let classifier = StatusClassifier::default();
    assert_eq!(classifier.status(5.0, spec.normal_range), Status::Normal);
    assert_eq!(classifier.status(5.1, spec.normal_range), Status::Anomaly);
}

#[test]
fn test_three_tier_status() {
    let classifier = StatusClassifier::new(AppConfig::default().classifier.warning_margin);
    let range = NormalRange::new(100.0, 150.0);

    assert_eq!(classifier.status(125.0, range), Status::Normal);
    assert_eq!(classifier.status(101.0, range), Status::Warning);
    assert_eq!(classifier.status(149.0, range), Status::Warning);
    assert_eq!(classifier.status(150.0, range), Status::Warning);
    assert_eq!(classifier.status(150.5, range), Status::Anomaly);
    assert_eq!(classifier.status(99.0, range), Status::Anomaly);

    let two_tier = StatusClassifier::two_tier();
    assert_eq!(two_tier.status(101.0, range), Status::Normal);
}

#[test]
fn test_catalog_lookup() {
    let ids: Vec<String> = equipment::catalog().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, ["cnc-spindle", "industrial-pump", "power-unit"]);
    assert!(equipment::find("reactor").is_err());
}
