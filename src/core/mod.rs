pub mod channel;
pub mod run;
pub mod sample;

pub use channel::{Channel, ChannelSpec};
pub use run::RunInfo;
pub use sample::{NormalRange, Sample, Status};

use serde::{Deserialize, Serialize};

/// Normalized separability score of one dataset column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub name: String,
    pub value: f64,
}
