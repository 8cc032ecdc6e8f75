use crate::config::PlaybackConfig;
use crate::core::RunInfo;
use crate::engine::state::PlaybackState;
use crate::error::{Error, Result};
use std::time::Duration;
use tracing::{debug, info};

/// Points consumed by one tick: `from..to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub from: u64,
    pub to: u64,
    pub completed: bool,
}

impl Tick {
    pub fn len(&self) -> u64 {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// Synchronous playback state machine. Owns the `RunInfo`; the async timer in
/// `engine::runner` only decides when `tick` is called.
#[derive(Debug, Clone)]
pub struct Playback {
    state: PlaybackState,
    run: RunInfo,
    speed: f64,
    speeds: Vec<f64>,
    base_interval: Duration,
    points_per_tick: f64,
}

impl Playback {
    pub fn new(total_points: u64, config: &PlaybackConfig) -> Self {
        Self {
            state: PlaybackState::Paused,
            run: RunInfo::new(total_points),
            speed: config.default_speed,
            speeds: config.speeds.clone(),
            base_interval: Duration::from_millis(config.base_interval_ms),
            points_per_tick: config.points_per_tick,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn run(&self) -> &RunInfo {
        &self.run
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    /// Timer period at the current speed
    pub fn tick_interval(&self) -> Duration {
        let micros = self.base_interval.as_micros() as f64 / self.speed;
        Duration::from_micros(micros.round() as u64)
    }

    /// Points per tick at the current speed, at least one
    pub fn step(&self) -> u64 {
        (self.points_per_tick * self.speed).round().max(1.0) as u64
    }

    fn transition_to(&mut self, new_state: PlaybackState) -> Result<()> {
        if !self.state.can_transition_to(&new_state) {
            return Err(Error::InvalidTransition {
                from: self.state.name().to_string(),
                to: new_state.name().to_string(),
            });
        }
        self.state = new_state;
        Ok(())
    }

    pub fn play(&mut self) -> Result<()> {
        if self.run.is_complete() {
            return Err(Error::InvalidTransition {
                from: "Completed".to_string(),
                to: PlaybackState::Running.name().to_string(),
            });
        }
        self.transition_to(PlaybackState::Running)?;
        info!(speed = self.speed, processed = self.run.processed_points(), "Playback started");
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.transition_to(PlaybackState::Paused)?;
        info!(processed = self.run.processed_points(), "Playback paused");
        Ok(())
    }

    /// Rewind to zero and run again. Totals are untouched.
    pub fn restart(&mut self) {
        self.run.reset();
        self.state = if self.run.is_complete() {
            PlaybackState::Paused
        } else {
            PlaybackState::Running
        };
        info!(total = self.run.total_points(), "Playback restarted");
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        if !self.speeds.contains(&speed) {
            return Err(Error::UnsupportedSpeed {
                speed,
                allowed: self.speeds.clone(),
            });
        }
        self.speed = speed;
        debug!(speed, "Playback speed changed");
        Ok(())
    }

    pub fn record_anomalies(&mut self, count: u64) {
        self.run.record_anomalies(count);
    }

    /// Advance one tick. Returns `None` without touching state unless Running.
    /// Reaching the total pauses playback.
    pub fn tick(&mut self) -> Option<Tick> {
        if !self.state.is_running() || self.run.is_complete() {
            return None;
        }

        let from = self.run.processed_points();
        self.run.advance(self.step());
        let to = self.run.processed_points();
        let completed = self.run.is_complete();

        if completed {
            self.state = PlaybackState::Paused;
            info!(
                total = self.run.total_points(),
                anomalies = self.run.anomalies_found(),
                "Playback complete"
            );
        } else {
            debug!(from, to, "Playback tick");
        }

        Some(Tick { from, to, completed })
    }
}
