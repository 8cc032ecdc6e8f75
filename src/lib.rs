pub mod app;
pub mod classifier;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod observability;
pub mod prediction;
pub mod telemetry;

pub use app::AppContext;
pub use config::AppConfig;
pub use error::{Error, Result};
