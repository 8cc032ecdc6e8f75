pub mod playback;
pub mod runner;
pub mod state;

pub use playback::{Playback, Tick};
pub use runner::{PlaybackRunner, TickDriven, TickReport};
pub use state::PlaybackState;
