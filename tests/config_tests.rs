use anomalab::config::{AppConfig, API_BASE_ENV, SEED_ENV};
use anomalab::engine::{PlaybackState, TickDriven};
use anomalab::AppContext;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_yaml_config_drives_hardware_dashboard() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("anomalab.yml");
    fs::write(
        &path,
        "simulation:\n  window_size: 8\n  total_points: 40\n  seed: 11\nplayback:\n  speeds: [1.0, 2.0]\n  default_speed: 2.0\n",
    )
    .unwrap();

    let mut ctx = AppContext::new(AppConfig::load(&path).unwrap());
    ctx.connect("power-unit").unwrap();
    let mut dashboard = ctx.open_dashboard().unwrap();

    assert_eq!(dashboard.channels().len(), 3);
    assert!(dashboard.channels().iter().all(|c| c.samples().len() == 8));
    assert_eq!(dashboard.playback().speed(), 2.0);
    assert!(dashboard.playback_mut().set_speed(5.0).is_err());

    dashboard.playback_mut().play().unwrap();
    let mut ticks = 0;
    while dashboard.tick().is_some() {
        ticks += 1;
    }
    assert_eq!(ticks, 4);
    assert!(dashboard.playback().run().is_complete());
    assert_eq!(dashboard.playback().state(), PlaybackState::Paused);
    assert_eq!(
        dashboard.distribution().normal + dashboard.distribution().anomaly,
        4 * 3
    );
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("anomalab.yaml");
    fs::write(&path, "playback:\n  speeds: []\n").unwrap();

    let err = AppConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("playback.speeds"));
}

#[test]
fn test_env_overrides() {
    std::env::set_var(API_BASE_ENV, "http://models.internal:9000");
    std::env::set_var(SEED_ENV, "99");

    let config = AppConfig::default().with_env_overrides().unwrap();
    assert_eq!(config.prediction.api_base, "http://models.internal:9000");
    assert_eq!(config.simulation.seed, Some(99));

    std::env::set_var(SEED_ENV, "not-a-number");
    assert!(AppConfig::default().with_env_overrides().is_err());

    std::env::remove_var(API_BASE_ENV);
    std::env::remove_var(SEED_ENV);
}
