use crate::core::RunInfo;
use crate::engine::playback::{Playback, Tick};
use crate::error::Result;
use crate::observability::{PlaybackMetrics, PlaybackMonitor};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// What one tick changed beyond the playback counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    pub samples_appended: u64,
    pub anomalies: u64,
}

/// State that a `PlaybackRunner` can drive
pub trait TickDriven: Send + 'static {
    fn playback(&self) -> &Playback;

    fn playback_mut(&mut self) -> &mut Playback;

    /// Advance one tick and apply its effects. `None` when nothing happened.
    fn tick(&mut self) -> Option<TickReport>;

    /// Rewind to the start of the run
    fn restart(&mut self) {
        self.playback_mut().restart();
    }
}

impl TickDriven for Playback {
    fn playback(&self) -> &Playback {
        self
    }

    fn playback_mut(&mut self) -> &mut Playback {
        self
    }

    fn tick(&mut self) -> Option<TickReport> {
        Playback::tick(self).map(|tick| TickReport {
            tick,
            samples_appended: 0,
            anomalies: 0,
        })
    }
}

/// Timer-driven driver for a `TickDriven` target.
///
/// At most one timer task exists at a time. Every timer carries a generation
/// number and applies a tick only while holding the target lock and only if
/// its generation is still current, so once `pause`, `stop` or drop returns
/// no further tick can land.
pub struct PlaybackRunner<T: TickDriven> {
    target: Arc<Mutex<T>>,
    generation: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
    metrics: Arc<PlaybackMetrics>,
    progress_tx: Arc<watch::Sender<RunInfo>>,
}

impl<T: TickDriven> PlaybackRunner<T> {
    pub fn new(target: T, label: impl Into<String>) -> Self {
        let (progress_tx, _) = watch::channel(*target.playback().run());
        Self {
            target: Arc::new(Mutex::new(target)),
            generation: Arc::new(AtomicU64::new(0)),
            handle: None,
            metrics: Arc::new(PlaybackMetrics::new(label)),
            progress_tx: Arc::new(progress_tx),
        }
    }

    /// Shared handle for readers. The runner is the only writer.
    pub fn target(&self) -> Arc<Mutex<T>> {
        self.target.clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.target.lock())
    }

    pub fn run_info(&self) -> RunInfo {
        *self.target.lock().playback().run()
    }

    /// Progress updates, one per applied tick
    pub fn subscribe(&self) -> watch::Receiver<RunInfo> {
        self.progress_tx.subscribe()
    }

    pub fn monitor(&self) -> PlaybackMonitor {
        PlaybackMonitor::new(self.metrics.clone())
    }

    pub fn is_timer_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn play(&mut self) -> Result<()> {
        self.target.lock().playback_mut().play()?;
        self.spawn_timer();
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.cancel_timer();
        self.target.lock().playback_mut().pause()
    }

    pub fn restart(&mut self) {
        self.cancel_timer();
        let running = {
            let mut target = self.target.lock();
            target.restart();
            self.progress_tx.send_replace(*target.playback().run());
            target.playback().state().is_running()
        };
        if running {
            self.spawn_timer();
        }
    }

    /// Change speed; a running timer is rescheduled at the new period
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        let running = {
            let mut target = self.target.lock();
            target.playback_mut().set_speed(speed)?;
            target.playback().state().is_running()
        };
        if running {
            self.spawn_timer();
        }
        Ok(())
    }

    /// Tear down: cancel the timer and leave the target paused
    pub fn stop(&mut self) {
        self.cancel_timer();
        let mut target = self.target.lock();
        if target.playback().state().is_running() {
            let _ = target.playback_mut().pause();
        }
    }

    /// Wait until the current timer task ends (completion or cancellation)
    pub async fn finished(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    fn cancel_timer(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    fn spawn_timer(&mut self) {
        self.cancel_timer();

        let generation = self.generation.load(Ordering::SeqCst);
        let period = self.target.lock().playback().tick_interval();
        let target = self.target.clone();
        let current = self.generation.clone();
        let metrics = self.metrics.clone();
        let progress_tx = self.progress_tx.clone();

        debug!(?period, generation, "Scheduling playback timer");

        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if !apply_tick(&target, &current, generation, &metrics, &progress_tx) {
                    break;
                }
            }
        }));
    }
}

/// Returns false once the timer should stop
fn apply_tick<T: TickDriven>(
    target: &Mutex<T>,
    current: &AtomicU64,
    generation: u64,
    metrics: &PlaybackMetrics,
    progress_tx: &watch::Sender<RunInfo>,
) -> bool {
    let mut target = target.lock();
    if current.load(Ordering::SeqCst) != generation {
        return false;
    }

    let start = metrics.start_tick();
    match target.tick() {
        Some(report) => {
            metrics.finish_tick(
                start,
                report.tick.len(),
                report.samples_appended,
                report.anomalies,
            );
            progress_tx.send_replace(*target.playback().run());
            !report.tick.completed
        }
        None => false,
    }
}

impl<T: TickDriven> Drop for PlaybackRunner<T> {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaybackConfig;

    #[tokio::test]
    async fn test_runner_starts_paused() {
        let runner = PlaybackRunner::new(Playback::new(10, &PlaybackConfig::default()), "test");
        assert!(!runner.is_timer_active());
        assert_eq!(runner.run_info().processed_points(), 0);
    }

    #[tokio::test]
    async fn test_play_on_complete_run_fails() {
        let mut runner = PlaybackRunner::new(Playback::new(0, &PlaybackConfig::default()), "empty");
        assert!(runner.play().is_err());
        assert!(!runner.is_timer_active());
    }
}
